//! `pagelink page` and `pagelink page-by-title` command implementations.

use clap::Args;
use pagelink_confluence::Envelope;
use serde_json::Value;

use super::{CommonArgs, SettingsArgs, run_node};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the page command.
#[derive(Args)]
pub(crate) struct PageArgs {
    /// Confluence page ID.
    page_id: String,

    #[command(flatten)]
    settings: SettingsArgs,

    #[command(flatten)]
    common: CommonArgs,
}

impl PageArgs {
    /// Execute the page command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded.
    pub(crate) fn execute(self, output: &Output) -> Result<Envelope, CliError> {
        let mut config = self.settings.node_config("get_page_content");
        config.insert("page_id".to_owned(), Value::String(self.page_id));
        run_node(&self.common, &config, output)
    }
}

/// Arguments for the page-by-title command.
#[derive(Args)]
pub(crate) struct PageByTitleArgs {
    /// Space key (e.g. OPS).
    space_key: String,

    /// Exact page title.
    title: String,

    #[command(flatten)]
    settings: SettingsArgs,

    #[command(flatten)]
    common: CommonArgs,
}

impl PageByTitleArgs {
    /// Execute the page-by-title command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded.
    pub(crate) fn execute(self, output: &Output) -> Result<Envelope, CliError> {
        let mut config = self.settings.node_config("get_page_by_title");
        config.insert("space_key".to_owned(), Value::String(self.space_key));
        config.insert("title".to_owned(), Value::String(self.title));
        run_node(&self.common, &config, output)
    }
}
