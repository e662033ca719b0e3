//! Confluence connector for pagelink.
//!
//! This crate provides:
//! - [`ConfluenceConnector`]: Basic-auth REST client exposing page lookup by
//!   id, page lookup by title, and CQL keyword search
//! - [`Envelope`]: the `{status, data}` shape every operation returns
//! - [`Transport`]: HTTP seam, with [`UreqTransport`] as the default
//! - [`html_to_text`]: plain-text rendering of page markup
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use pagelink_confluence::{ConfluenceConnector, UreqTransport};
//!
//! let connector = ConfluenceConnector::new(
//!     "acme.atlassian.net",
//!     "bot@acme.io",
//!     "api-token",
//!     Arc::new(UreqTransport::default()),
//! );
//!
//! let envelope = connector.get_page_content("65601")?;
//! println!("{}", envelope.data["html_parsed"]);
//! ```

mod auth;

// API client
mod client;
pub use client::ConfluenceConnector;
pub use client::DEFAULT_SEARCH_LIMIT;

mod envelope;
pub use envelope::{Envelope, STATUS_OK};

mod html;
pub use html::html_to_text;

mod transport;
pub use transport::{HttpResponse, Transport, UreqTransport};

#[cfg(any(test, feature = "mock"))]
mod mock;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockTransport, RecordedRequest};

// Types (exposed via envelope payloads)
mod types;
pub use types::{PageContent, PageInfo, PageSummary, SearchResults};

// Errors
pub mod error;
pub use error::ConfluenceError;
