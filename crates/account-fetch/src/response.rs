//! Settled responses.

use crate::FetchError;
use std::collections::HashMap;

/// What the server answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// `value` serialized as the body, tagged `application/json`.
    pub fn with_json(status: u16, value: &serde_json::Value) -> Self {
        let headers = HashMap::from([(
            "Content-Type".to_string(),
            "application/json".to_string(),
        )]);
        Self::new(status, headers, value.to_string().into_bytes())
    }

    /// Empty body.
    pub fn with_status(status: u16) -> Self {
        Self::new(status, HashMap::new(), Vec::new())
    }

    /// 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> Result<String, FetchError> {
        String::from_utf8(self.body.clone())
            .map_err(|e| FetchError::ParseError(format!("body is not UTF-8: {e}")))
    }

    /// Turn any non-2xx status into [`FetchError::HttpError`], keeping the
    /// body as its message.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            return Ok(self);
        }
        let message = self.text().unwrap_or_default();
        Err(FetchError::HttpError {
            status: self.status,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_response(status: u16, body: &[u8]) -> Response {
        Response::new(status, HashMap::new(), body.to_vec())
    }

    #[test]
    fn test_success_is_2xx_only() {
        assert!(make_response(200, b"").is_success());
        assert!(make_response(204, b"").is_success());
        assert!(!make_response(199, b"").is_success());
        assert!(!make_response(302, b"").is_success());
        assert!(!make_response(404, b"").is_success());
    }

    #[test]
    fn test_with_json_body() {
        let resp = Response::with_json(200, &serde_json::json!({}));
        assert_eq!(resp.headers.get("Content-Type").map(String::as_str), Some("application/json"));
        assert_eq!(resp.text().unwrap(), "{}");
    }

    #[test]
    fn test_text_rejects_invalid_utf8() {
        let resp = make_response(200, &[0xff, 0xfe]);
        assert!(matches!(resp.text(), Err(FetchError::ParseError(_))));
    }

    #[test]
    fn test_error_for_status_keeps_body_as_message() {
        let err = make_response(500, b"Internal Server Error")
            .error_for_status()
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");

        assert!(make_response(201, b"").error_for_status().is_ok());
    }

    #[test]
    fn test_error_for_status_with_binary_body() {
        let err = make_response(502, &[0xff]).error_for_status().unwrap_err();
        assert_eq!(
            err,
            FetchError::HttpError {
                status: 502,
                message: String::new()
            }
        );
    }
}
