//! `pagelink search` command implementation.

use clap::Args;
use pagelink_confluence::{DEFAULT_SEARCH_LIMIT, Envelope};
use serde_json::Value;

use super::{CommonArgs, SettingsArgs, run_node};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the search command.
#[derive(Args)]
pub(crate) struct SearchArgs {
    /// Keywords to search for in page text.
    keywords: String,

    /// Restrict the search to one space.
    #[arg(long)]
    space: Option<String>,

    /// Maximum number of results.
    #[arg(short = 'n', long, default_value_t = DEFAULT_SEARCH_LIMIT)]
    limit: u32,

    #[command(flatten)]
    settings: SettingsArgs,

    #[command(flatten)]
    common: CommonArgs,
}

impl SearchArgs {
    /// Execute the search command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded.
    pub(crate) fn execute(self, output: &Output) -> Result<Envelope, CliError> {
        let mut config = self.settings.node_config("search_pages");
        config.insert("keywords".to_owned(), Value::String(self.keywords));
        if let Some(space) = self.space {
            config.insert("space_key".to_owned(), Value::String(space));
        }
        config.insert("limit".to_owned(), Value::from(self.limit));
        run_node(&self.common, &config, output)
    }
}
