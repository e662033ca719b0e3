//! HTTP Basic authentication for Confluence Cloud.
//!
//! Confluence Cloud accepts `email:api_token` as Basic credentials.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Basic authentication credentials (internal use only).
pub(crate) struct BasicAuth {
    email: String,
    api_token: String,
}

impl BasicAuth {
    pub(crate) fn new(email: &str, api_token: &str) -> Self {
        Self {
            email: email.to_owned(),
            api_token: api_token.to_owned(),
        }
    }

    /// Authorization header value: `Basic base64(email:api_token)`.
    pub(crate) fn header_value(&self) -> String {
        let credentials = format!("{}:{}", self.email, self.api_token);
        format!("Basic {}", STANDARD.encode(credentials.as_bytes()))
    }
}
