//! `pagelink run` command implementation.

use std::path::PathBuf;

use clap::Args;
use pagelink_confluence::Envelope;
use pagelink_node::NodeConfig;

use super::{CommonArgs, run_node};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the run command.
#[derive(Args)]
pub(crate) struct RunArgs {
    /// Path to a JSON file holding the node configuration object.
    node_config: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

impl RunArgs {
    /// Execute the run command.
    ///
    /// # Errors
    ///
    /// Returns an error if the node config or pagelink config cannot be read.
    pub(crate) fn execute(self, output: &Output) -> Result<Envelope, CliError> {
        let content = std::fs::read_to_string(&self.node_config)?;
        let node_config = parse_node_config(&content)?;
        run_node(&self.common, &node_config, output)
    }
}

fn parse_node_config(content: &str) -> Result<NodeConfig, CliError> {
    match serde_json::from_str(content)? {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(CliError::Validation(
            "node configuration must be a JSON object".to_owned(),
        )),
    }
}
