//! Outbound requests.

use crate::FetchError;
use serde::Serialize;
use std::collections::HashMap;

/// Content type used for URL-encoded form bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Methods account views issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Post => "POST",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
}

impl Request {
    /// Header lookup, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find_map(|(k, v)| k.eq_ignore_ascii_case(name).then_some(v.as_str()))
    }

    /// The body decoded as UTF-8; `None` when absent or not UTF-8.
    pub fn body_text(&self) -> Option<&str> {
        std::str::from_utf8(self.body.as_deref()?).ok()
    }
}

/// Assembles a [`Request`].
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    request: Request,
}

impl RequestBuilder {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            request: Request {
                method,
                url: url.into(),
                headers: HashMap::new(),
                body: None,
            },
        }
    }

    /// Set `name` to `value`, replacing any earlier value.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.headers.insert(name.into(), value.into());
        self
    }

    /// URL-encode `fields` as the body.
    ///
    /// Keys follow the field order of `fields`, so a one-field struct
    /// `{ email }` encodes to exactly `email=<value>`.
    pub fn form<F: Serialize>(self, fields: &F) -> Result<Self, FetchError> {
        let encoded = serde_urlencoded::to_string(fields)?;
        let mut builder = self.header("Content-Type", FORM_CONTENT_TYPE);
        builder.request.body = Some(encoded.into_bytes());
        Ok(builder)
    }

    pub fn build(self) -> Request {
        self.request
    }
}
