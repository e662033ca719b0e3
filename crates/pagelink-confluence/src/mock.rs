//! Mock transport for testing.
//!
//! Provides [`MockTransport`] for exercising the connector without network access.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::ConfluenceError;
use crate::transport::{HttpResponse, Transport};

/// A request captured by [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Requested URL.
    pub url: String,
    /// Request headers in the order they were sent.
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    /// Look up a header value by exact name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Mock transport that replays queued responses in order.
///
/// Requests are recorded so tests can assert on URLs and headers. When the
/// queue runs dry the transport answers with a connection error.
///
/// # Example
///
/// ```ignore
/// use pagelink_confluence::MockTransport;
///
/// let transport = MockTransport::new().with_json(200, serde_json::json!({"results": []}));
/// ```
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, String>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    /// Create a mock with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with a raw text body.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_response(self, status: u16, body: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    /// Queue a response with a JSON body.
    #[must_use]
    pub fn with_json(self, status: u16, body: serde_json::Value) -> Self {
        self.with_response(status, body.to_string())
    }

    /// Queue a transport failure.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.into()));
        self
    }

    /// Requests received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str, headers: &[(&str, String)]) -> Result<HttpResponse, ConfluenceError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_owned(),
            headers: headers
                .iter()
                .map(|(name, value)| ((*name).to_owned(), value.clone()))
                .collect(),
        });

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                message,
            )
            .into()),
            None => Err(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "no mock response queued",
            )
            .into()),
        }
    }
}
