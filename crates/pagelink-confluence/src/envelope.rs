//! Normalized `{status, data}` response envelope.

use serde::Serialize;
use serde_json::{Value, json};

use crate::error::ConfluenceError;
use crate::transport::HttpResponse;

/// Status code for a successful operation.
pub const STATUS_OK: u16 = 200;

/// Uniform result of every connector and node operation.
///
/// `data` holds the operation payload on success, `{"error": message}` for
/// locally produced errors, or the upstream body for passed-through failures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    /// HTTP-style status code.
    pub status: u16,
    /// Payload, error description, or upstream body.
    pub data: Value,
}

impl Envelope {
    /// Successful envelope with a serialized payload.
    pub fn ok(payload: &impl Serialize) -> Result<Self, ConfluenceError> {
        Ok(Self {
            status: STATUS_OK,
            data: serde_json::to_value(payload)?,
        })
    }

    /// Error envelope: `{"status": status, "data": {"error": message}}`.
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            data: json!({ "error": message.into() }),
        }
    }

    /// Upstream response passed through unmodified.
    ///
    /// JSON bodies are kept as parsed JSON; anything else becomes a string.
    pub fn passthrough(response: HttpResponse) -> Self {
        let data = serde_json::from_str(&response.body).unwrap_or(Value::String(response.body));
        Self {
            status: response.status,
            data,
        }
    }

    /// Whether the status is 200.
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Error message carried in `data.error`, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.data.get("error").and_then(Value::as_str)
    }
}
