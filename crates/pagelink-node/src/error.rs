//! Node error types.

use pagelink_confluence::ConfluenceError;

use crate::settings::SettingsError;

/// Failure inside a node run.
///
/// Never returned to callers of [`ConfluenceNode::process`](crate::ConfluenceNode::process);
/// it is rendered into a 500 envelope.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// Settings lookup failed.
    #[error("{0}")]
    Settings(#[from] SettingsError),

    /// Connector request failed.
    #[error("{0}")]
    Confluence(#[from] ConfluenceError),
}
