//! Confluence REST API connector.
//!
//! Provides a blocking client for the Confluence Cloud REST API with
//! Basic (email + API token) authentication. Every operation issues exactly
//! one GET and reshapes the reply into an [`Envelope`](crate::Envelope).

mod pages;
mod search;

pub use search::DEFAULT_SEARCH_LIMIT;

use std::sync::Arc;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use tracing::info;

use crate::auth::BasicAuth;
use crate::error::ConfluenceError;
use crate::transport::{HttpResponse, Transport};

/// Characters left unescaped in query values: RFC 3986 unreserved.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Confluence REST API connector.
pub struct ConfluenceConnector {
    transport: Arc<dyn Transport>,
    base_url: String,
    auth: BasicAuth,
}

impl ConfluenceConnector {
    /// Create connector for a Confluence site.
    ///
    /// # Arguments
    /// * `host` - Site host (e.g. `acme.atlassian.net`); `https://` is
    ///   prepended unless the value already carries a scheme
    /// * `email` - Account email
    /// * `api_token` - API token for the account
    /// * `transport` - HTTP transport used for every request
    pub fn new(host: &str, email: &str, api_token: &str, transport: Arc<dyn Transport>) -> Self {
        let host = host.trim_end_matches('/');
        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_owned()
        } else {
            format!("https://{host}")
        };

        Self {
            transport,
            base_url,
            auth: BasicAuth::new(email, api_token),
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the API base URL.
    fn api_url(&self) -> String {
        format!("{}/rest/api", self.base_url)
    }

    /// Headers sent with every request.
    fn headers(&self) -> [(&'static str, String); 3] {
        [
            ("Content-Type", "application/json".to_owned()),
            ("Accept", "application/json".to_owned()),
            ("Authorization", self.auth.header_value()),
        ]
    }

    /// Issue an authenticated GET.
    fn get(&self, url: &str) -> Result<HttpResponse, ConfluenceError> {
        let response = self.transport.get(url, &self.headers())?;
        info!("GET {} -> {}", url, response.status);
        Ok(response)
    }
}
