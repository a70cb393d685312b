//! In-memory transport that records requests and replies from a script
//! (for development/testing).

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;

use crate::{FetchError, HttpTransport, Request, Response};

/// A scripted outcome for the next request.
#[derive(Debug, Clone)]
enum Reply {
    Respond(Response),
    Fail(String),
}

#[derive(Debug, Default)]
struct Inner {
    requests: Vec<Request>,
    replies: VecDeque<Reply>,
}

/// Transport that records every request it is asked to send.
///
/// Clones share state, so a test can hand one clone to a view and inspect
/// the other. Replies are consumed in the order they were scripted; a
/// request with nothing scripted fails with a transport error.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    inner: Rc<RefCell<Inner>>,
}

impl RecordingTransport {
    /// Create a transport with no scripted replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON reply.
    pub fn respond_with_json(&self, status: u16, value: serde_json::Value) -> &Self {
        self.push(Reply::Respond(Response::with_json(status, &value)))
    }

    /// Queue an empty reply with the given status.
    pub fn respond_with_status(&self, status: u16) -> &Self {
        self.push(Reply::Respond(Response::with_status(status)))
    }

    /// Queue a generic server error (500, empty body).
    pub fn respond_with_error(&self) -> &Self {
        self.respond_with_status(500)
    }

    /// Queue a transport failure; no response reaches the caller.
    pub fn fail_with(&self, message: impl Into<String>) -> &Self {
        self.push(Reply::Fail(message.into()))
    }

    fn push(&self, reply: Reply) -> &Self {
        self.inner.borrow_mut().replies.push_back(reply);
        self
    }

    /// All requests sent so far, oldest first.
    pub fn requests(&self) -> Vec<Request> {
        self.inner.borrow().requests.clone()
    }

    /// Number of requests sent so far.
    pub fn request_count(&self) -> usize {
        self.inner.borrow().requests.len()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<Request> {
        self.inner.borrow().requests.last().cloned()
    }

    /// Number of scripted replies not yet consumed.
    pub fn pending_replies(&self) -> usize {
        self.inner.borrow().replies.len()
    }
}

#[async_trait(?Send)]
impl HttpTransport for RecordingTransport {
    async fn send(&self, request: Request) -> Result<Response, FetchError> {
        let reply = {
            let mut inner = self.inner.borrow_mut();
            inner.requests.push(request);
            inner.replies.pop_front()
        };

        match reply {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Fail(message)) => Err(FetchError::RequestError(message)),
            None => Err(FetchError::RequestError(
                "no reply scripted for request".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Method, RequestBuilder};
    use futures::executor::block_on;

    fn post(path: &str) -> Request {
        RequestBuilder::new(Method::Post, path).build()
    }

    #[test]
    fn test_replies_in_script_order() {
        let transport = RecordingTransport::new();
        transport.respond_with_error().respond_with_json(200, serde_json::json!({}));

        let first = block_on(transport.send(post("/a"))).unwrap();
        let second = block_on(transport.send(post("/b"))).unwrap();

        assert_eq!(first.status, 500);
        assert!(second.is_success());
        assert_eq!(transport.request_count(), 2);
        assert_eq!(transport.pending_replies(), 0);
    }

    #[test]
    fn test_unscripted_request_fails_but_is_recorded() {
        let transport = RecordingTransport::new();

        let result = block_on(transport.send(post("/a")));

        assert!(matches!(result, Err(FetchError::RequestError(_))));
        assert_eq!(transport.last_request().unwrap().url, "/a");
    }

    #[test]
    fn test_clones_share_state() {
        let transport = RecordingTransport::new();
        let handle = transport.clone();
        transport.fail_with("connection refused");

        let result = block_on(handle.send(post("/a")));

        assert_eq!(
            result.unwrap_err(),
            FetchError::RequestError("connection refused".to_string())
        );
        assert_eq!(transport.request_count(), 1);
    }
}
