//! CLI command implementations.

mod page;
mod run;
mod search;

pub(crate) use page::{PageArgs, PageByTitleArgs};
pub(crate) use run::RunArgs;
pub(crate) use search::SearchArgs;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use pagelink_config::{CliSettings, Config};
use pagelink_confluence::{Envelope, UreqTransport};
use pagelink_node::{AppSettings, ConfluenceNode, MemorySettingsStore, NodeConfig};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::error::CliError;
use crate::output::Output;

/// Options shared by every command.
#[derive(Args)]
pub(crate) struct CommonArgs {
    /// Path to configuration file (default: auto-discover pagelink.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP timeout in seconds (overrides config).
    #[arg(long)]
    timeout: Option<u64>,
}

/// Options for commands that name the settings record directly.
#[derive(Args)]
pub(crate) struct SettingsArgs {
    /// App settings id holding the Confluence credentials.
    #[arg(short, long = "settings", env = "PAGELINK_SETTINGS_ID")]
    settings_id: Uuid,
}

impl SettingsArgs {
    /// Start a node config with `app_settings_id` and `operation` set.
    fn node_config(&self, operation: &str) -> NodeConfig {
        let mut config = NodeConfig::new();
        config.insert(
            "app_settings_id".to_owned(),
            Value::String(self.settings_id.to_string()),
        );
        config.insert("operation".to_owned(), Value::String(operation.to_owned()));
        config
    }
}

/// Load config, build the node, and run it once.
fn run_node(
    common: &CommonArgs,
    node_config: &NodeConfig,
    output: &Output,
) -> Result<Envelope, CliError> {
    let cli_settings = CliSettings {
        timeout_secs: common.timeout,
    };
    let config = Config::load(common.config.as_deref(), Some(&cli_settings))?;

    let store = settings_store(&config);
    info!(
        "Loaded {} app settings from {}",
        store.len(),
        config
            .config_path
            .as_deref()
            .map_or_else(|| "defaults".to_owned(), |p| p.display().to_string())
    );
    if store.is_empty() {
        output.warning("No app settings configured; add [settings.\"<uuid>\"] to pagelink.toml");
    }

    let transport = UreqTransport::new(Duration::from_secs(config.http.timeout_secs));
    let node = ConfluenceNode::new(Arc::new(store), Arc::new(transport));
    Ok(node.process(node_config))
}

/// Settings store backed by the `[settings]` tables of the config file.
fn settings_store(config: &Config) -> MemorySettingsStore {
    let mut store = MemorySettingsStore::new();
    for (id, settings) in config.app_settings() {
        store.insert(AppSettings {
            id,
            name: settings.name.clone(),
            values: settings.values.clone(),
        });
    }
    store
}

#[cfg(test)]
mod tests {
    use pagelink_node::SettingsStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_settings_store_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pagelink.toml");
        std::fs::write(
            &path,
            r#"
[settings."0b5c2a8e-4f3d-4d8e-9a51-6f1e2d3c4b5a"]
name = "Team wiki"
values = { confluence_subdomain = "acme.atlassian.net" }
"#,
        )
        .unwrap();
        let config = Config::load(Some(&path), None).unwrap();

        let store = settings_store(&config);
        let id = Uuid::parse_str("0b5c2a8e-4f3d-4d8e-9a51-6f1e2d3c4b5a").unwrap();
        let settings = store.get_by_id(&id).unwrap();
        assert_eq!(settings.name, "Team wiki");
        assert_eq!(
            settings.values["confluence_subdomain"],
            json!("acme.atlassian.net")
        );
    }

    #[test]
    fn test_node_config_has_settings_and_operation() {
        let args = SettingsArgs {
            settings_id: Uuid::parse_str("0b5c2a8e-4f3d-4d8e-9a51-6f1e2d3c4b5a").unwrap(),
        };
        let config = args.node_config("search_pages");
        assert_eq!(
            Value::Object(config),
            json!({
                "app_settings_id": "0b5c2a8e-4f3d-4d8e-9a51-6f1e2d3c4b5a",
                "operation": "search_pages"
            })
        );
    }
}
