//! Confluence workflow node for pagelink.
//!
//! [`ConfluenceNode`] takes a resolved node configuration, looks up the
//! stored credentials it references, and runs one connector operation.
//! Every outcome, including failures, comes back as an
//! [`Envelope`](pagelink_confluence::Envelope).
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use pagelink_confluence::UreqTransport;
//! use pagelink_node::{ConfluenceNode, MemorySettingsStore};
//!
//! let node = ConfluenceNode::new(
//!     Arc::new(MemorySettingsStore::new()),
//!     Arc::new(UreqTransport::default()),
//! );
//! let config = serde_json::json!({
//!     "app_settings_id": "0b5c2a8e-4f3d-4d8e-9a51-6f1e2d3c4b5a",
//!     "operation": "search_pages",
//!     "keywords": "deploy",
//! });
//! let envelope = node.process(config.as_object().unwrap());
//! ```

mod error;
mod node;
mod operation;
mod params;
mod settings;

pub use error::NodeError;
pub use node::{ConfluenceNode, NodeConfig};
pub use operation::{Operation, UnknownOperation};
pub use settings::{AppSettings, MemorySettingsStore, SettingsError, SettingsStore};
