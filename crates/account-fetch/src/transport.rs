//! Transport seam between request builders and the network.

use std::rc::Rc;

use async_trait::async_trait;

use crate::{FetchError, Request, Response};

/// Sends a built request and yields the settled response.
///
/// Views run on a single thread, so futures are not required to be `Send`.
/// A transport reports a response for every status code; only failures to
/// deliver the request at all surface as `Err`.
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, request: Request) -> Result<Response, FetchError>;
}

#[async_trait(?Send)]
impl<T: HttpTransport + ?Sized> HttpTransport for Box<T> {
    async fn send(&self, request: Request) -> Result<Response, FetchError> {
        (**self).send(request).await
    }
}

#[async_trait(?Send)]
impl<T: HttpTransport + ?Sized> HttpTransport for Rc<T> {
    async fn send(&self, request: Request) -> Result<Response, FetchError> {
        (**self).send(request).await
    }
}

/// Transport backed by Spin's outbound HTTP.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct SpinTransport;

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl HttpTransport for SpinTransport {
    async fn send(&self, request: Request) -> Result<Response, FetchError> {
        use crate::Method;
        use spin_sdk::http::{Method as SpinMethod, Request as SpinRequest};

        let method = match request.method {
            Method::Post => SpinMethod::Post,
        };

        let mut builder = SpinRequest::builder();
        builder.method(method);
        builder.uri(request.url.as_str());
        for (key, value) in &request.headers {
            builder.header(key.as_str(), value.as_str());
        }
        let outgoing = builder.body(request.body.unwrap_or_default()).build();

        let response: spin_sdk::http::Response = spin_sdk::http::send(outgoing)
            .await
            .map_err(|e| FetchError::RequestError(e.to_string()))?;

        let status = *response.status();
        let headers = response
            .headers()
            .map(|(k, v)| (k.to_string(), v.as_str().unwrap_or("").to_string()))
            .collect();

        Ok(Response::new(status, headers, response.into_body()))
    }
}
