//! Outbound HTTP transport.
//!
//! [`Transport`] is the seam between the connector and the network. The
//! default implementation, [`UreqTransport`], issues blocking requests with a
//! global timeout and hands every status code back to the caller.

use std::time::Duration;

use ureq::Agent;

use crate::error::ConfluenceError;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Raw HTTP response: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    /// Create a response from status and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Blocking HTTP GET transport.
///
/// Implementations must not treat 4xx/5xx statuses as errors; those are
/// returned as [`HttpResponse`] so callers can pass them through.
pub trait Transport: Send + Sync {
    /// Perform a GET request with the given headers.
    ///
    /// # Errors
    ///
    /// Returns an error only if no response could be obtained.
    fn get(&self, url: &str, headers: &[(&str, String)]) -> Result<HttpResponse, ConfluenceError>;
}

/// [`Transport`] backed by a `ureq` agent.
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    /// Create transport with the given global request timeout.
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT))
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str, headers: &[(&str, String)]) -> Result<HttpResponse, ConfluenceError> {
        let mut request = self.agent.get(url);
        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }

        let response = request.call()?;
        let status = response.status().as_u16();
        let body = response.into_body().read_to_string()?;

        Ok(HttpResponse { status, body })
    }
}
