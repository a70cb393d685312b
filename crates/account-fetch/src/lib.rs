//! HTTP client utilities for student account views.
//!
//! Requests are built with [`RequestBuilder`] and handed to an
//! [`HttpTransport`]. The transport is the only piece that touches the
//! network, so views can be driven in tests with [`RecordingTransport`].
//!
//! # Example
//!
//! ```rust,ignore
//! use account_fetch::{FetchClient, RecordingTransport};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct ResetForm<'a> {
//!     email: &'a str,
//! }
//!
//! let transport = RecordingTransport::new();
//! transport.respond_with_json(200, serde_json::json!({}));
//!
//! let client = FetchClient::new(transport.clone());
//! let request = client
//!     .post("/account/password")
//!     .form(&ResetForm { email: "foo@bar.baz" })?
//!     .build();
//! let response = client.send(request).await?;
//! assert!(response.is_success());
//! ```

mod error;
mod recording;
mod request;
mod response;
mod transport;

pub use error::FetchError;
pub use recording::RecordingTransport;
pub use request::{Method, Request, RequestBuilder, FORM_CONTENT_TYPE};
pub use response::Response;
#[cfg(target_arch = "wasm32")]
pub use transport::SpinTransport;
pub use transport::HttpTransport;

use std::collections::HashMap;

/// Sends requests through a transport, stamping default headers on each.
pub struct FetchClient<T: HttpTransport> {
    transport: T,
    default_headers: HashMap<String, String>,
}

impl<T: HttpTransport> FetchClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            default_headers: HashMap::new(),
        }
    }

    /// Add a header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Start a POST to `url` carrying the default headers.
    pub fn post(&self, url: impl Into<String>) -> RequestBuilder {
        self.default_headers
            .iter()
            .fold(RequestBuilder::new(Method::Post, url), |builder, (key, value)| {
                builder.header(key.clone(), value.clone())
            })
    }

    /// Send a built request.
    pub async fn send(&self, request: Request) -> Result<Response, FetchError> {
        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        let result = self.transport.send(request).await;
        match &result {
            Ok(response) => tracing::debug!(status = response.status, "request settled"),
            Err(err) => tracing::debug!(error = %err, "request failed in transport"),
        }
        result
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, HttpTransport, Method, Request, Response};
}
