//! Error types for the Confluence connector.

/// Error from Confluence API operations.
///
/// Upstream error statuses are not errors here: they come back as an
/// [`Envelope`](crate::Envelope) carrying the upstream body. These variants
/// cover failures to talk to the server or to read what it sent.
#[derive(Debug, thiserror::Error)]
pub enum ConfluenceError {
    /// HTTP request failed (network error, timeout, TLS, etc).
    #[error("HTTP request failed: {0}")]
    Request(#[from] ureq::Error),

    /// I/O error while reading a response.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
