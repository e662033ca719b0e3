//! Confluence workflow node.

use std::sync::Arc;

use pagelink_confluence::{ConfluenceConnector, Envelope, Transport};
use serde_json::{Map, Value};
use tracing::{error, info};
use uuid::Uuid;

use crate::error::NodeError;
use crate::operation::Operation;
use crate::params;
use crate::settings::{AppSettings, SettingsError, SettingsStore};

/// Resolved node configuration: a JSON object of node inputs.
pub type NodeConfig = Map<String, Value>;

const BAD_REQUEST: u16 = 400;
const INTERNAL_ERROR: u16 = 500;

/// Workflow node running Confluence operations.
///
/// Reads `app_settings_id` and `operation` from the node config, resolves
/// credentials from the settings store, and dispatches to the connector.
/// [`process`](Self::process) never fails: problems are reported as
/// 400/404/500 envelopes or as the upstream status.
pub struct ConfluenceNode {
    settings: Arc<dyn SettingsStore>,
    transport: Arc<dyn Transport>,
}

impl ConfluenceNode {
    /// Create node with its settings store and HTTP transport.
    pub fn new(settings: Arc<dyn SettingsStore>, transport: Arc<dyn Transport>) -> Self {
        Self {
            settings,
            transport,
        }
    }

    /// Run the operation described by `config`.
    pub fn process(&self, config: &NodeConfig) -> Envelope {
        let (settings_id, operation) = match (
            params::required(config, "app_settings_id"),
            params::required(config, "operation"),
        ) {
            (Some(id), Some(op)) => (id, op.to_lowercase()),
            (id, op) => {
                let missing = params::missing(&[
                    ("app_settings_id", id.as_ref()),
                    ("operation", op.as_ref()),
                ]);
                return bad_request(format!(
                    "Confluence node missing these parameters: {}",
                    missing.join(", ")
                ));
            }
        };

        match self.run(&settings_id, &operation, config) {
            Ok(envelope) => envelope,
            Err(err) => {
                let message = format!("Error in Confluence operation: {err}");
                error!("{message}");
                Envelope::error(INTERNAL_ERROR, message)
            }
        }
    }

    fn run(
        &self,
        settings_id: &str,
        operation: &str,
        config: &NodeConfig,
    ) -> Result<Envelope, NodeError> {
        let id = Uuid::parse_str(settings_id).map_err(SettingsError::from)?;
        let settings = self.settings.get_by_id(&id)?;
        let connector = self.connector(&settings);

        let operation = match operation.parse::<Operation>() {
            Ok(operation) => operation,
            Err(err) => return Ok(bad_request(err.to_string())),
        };
        info!("Running Confluence {operation} with settings {id}");

        match operation {
            Operation::GetPageContent => get_page_content(&connector, config),
            Operation::GetPageByTitle => get_page_by_title(&connector, config),
            Operation::SearchPages => search_pages(&connector, config),
        }
    }

    fn connector(&self, settings: &AppSettings) -> ConfluenceConnector {
        let host = params::credential(&settings.values, "confluence_subdomain");
        let email = params::credential(&settings.values, "confluence_email");
        let api_token = params::credential(&settings.values, "confluence_api_token");
        ConfluenceConnector::new(&host, &email, &api_token, Arc::clone(&self.transport))
    }
}

fn get_page_content(
    connector: &ConfluenceConnector,
    config: &NodeConfig,
) -> Result<Envelope, NodeError> {
    let Some(page_id) = params::required(config, "page_id") else {
        return Ok(bad_request(
            "Confluence get_page_content operation missing page_id parameter",
        ));
    };

    Ok(connector.get_page_content(&page_id)?)
}

fn get_page_by_title(
    connector: &ConfluenceConnector,
    config: &NodeConfig,
) -> Result<Envelope, NodeError> {
    let (space_key, title) = match (
        params::required(config, "space_key"),
        params::required(config, "title"),
    ) {
        (Some(space_key), Some(title)) => (space_key, title),
        (space_key, title) => {
            let missing = params::missing(&[
                ("space_key", space_key.as_ref()),
                ("title", title.as_ref()),
            ]);
            return Ok(bad_request(format!(
                "Confluence get_page_by_title operation missing these parameters: {}",
                missing.join(", ")
            )));
        }
    };

    Ok(connector.get_page_by_title(&space_key, &title)?)
}

fn search_pages(
    connector: &ConfluenceConnector,
    config: &NodeConfig,
) -> Result<Envelope, NodeError> {
    let Some(keywords) = params::required(config, "keywords") else {
        return Ok(bad_request(
            "Confluence search_pages operation missing keywords parameter",
        ));
    };
    let space_key = params::required(config, "space_key");
    let limit = params::limit(config);

    Ok(connector.search_pages(&keywords, space_key.as_deref(), limit)?)
}

fn bad_request(message: impl Into<String>) -> Envelope {
    let message = message.into();
    error!("{message}");
    Envelope::error(BAD_REQUEST, message)
}

#[cfg(test)]
mod tests {
    use pagelink_confluence::MockTransport;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::settings::MemorySettingsStore;

    static_assertions::assert_impl_all!(ConfluenceNode: Send, Sync);

    const SETTINGS_ID: &str = "0b5c2a8e-4f3d-4d8e-9a51-6f1e2d3c4b5a";

    fn settings() -> AppSettings {
        AppSettings::new(Uuid::parse_str(SETTINGS_ID).unwrap(), "Team wiki")
            .with_value("confluence_subdomain", "acme.atlassian.net")
            .with_value("confluence_email", "bot@acme.io")
            .with_value("confluence_api_token", "secret")
    }

    fn node_with(settings: AppSettings, transport: &Arc<MockTransport>) -> ConfluenceNode {
        ConfluenceNode::new(
            Arc::new(MemorySettingsStore::new().with_settings(settings)),
            Arc::clone(transport) as Arc<dyn Transport>,
        )
    }

    fn node(transport: &Arc<MockTransport>) -> ConfluenceNode {
        node_with(settings(), transport)
    }

    fn config(value: Value) -> NodeConfig {
        value.as_object().cloned().unwrap()
    }

    fn page(body: Value) -> Value {
        json!({
            "id": "65601",
            "type": "page",
            "title": "Deploy guide",
            "space": {"key": "OPS"},
            "version": {"number": 3},
            "body": body
        })
    }

    #[test]
    fn test_missing_node_parameters() {
        let transport = Arc::new(MockTransport::new());
        let node = node(&transport);

        let cases = [
            (json!({}), "app_settings_id, operation"),
            (json!({"operation": "search_pages"}), "app_settings_id"),
            (json!({"app_settings_id": SETTINGS_ID}), "operation"),
            (json!({"app_settings_id": "", "operation": null}), "app_settings_id, operation"),
        ];
        for (cfg, keys) in cases {
            let envelope = node.process(&config(cfg));
            assert_eq!(envelope.status, 400);
            assert_eq!(
                envelope.error_message(),
                Some(format!("Confluence node missing these parameters: {keys}").as_str())
            );
        }
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_unknown_operation() {
        let transport = Arc::new(MockTransport::new());
        let envelope = node(&transport).process(&config(json!({
            "app_settings_id": SETTINGS_ID,
            "operation": "delete_page"
        })));

        assert_eq!(envelope.status, 400);
        let message = envelope.error_message().unwrap();
        assert!(message.contains("delete_page"));
        for name in ["get_page_content", "get_page_by_title", "search_pages"] {
            assert!(message.contains(name), "{message} should list {name}");
        }
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_operation_is_case_insensitive() {
        let transport = Arc::new(MockTransport::new().with_json(200, page(json!({}))));
        let envelope = node(&transport).process(&config(json!({
            "app_settings_id": SETTINGS_ID,
            "operation": "Get_Page_Content",
            "page_id": "65601"
        })));

        assert_eq!(envelope.status, 200);
    }

    #[test]
    fn test_get_page_content() {
        let body = json!({"storage": {"value": "<h2>Steps</h2><p>Ship it</p>"}});
        let transport = Arc::new(MockTransport::new().with_json(200, page(body)));

        let envelope = node(&transport).process(&config(json!({
            "app_settings_id": SETTINGS_ID,
            "operation": "get_page_content",
            "page_id": 65601
        })));

        assert_eq!(envelope.status, 200);
        assert_eq!(envelope.data["html_parsed"], json!("## Steps\n\nShip it"));
        assert_eq!(envelope.data["page_info"]["version"], json!(3));

        let requests = transport.requests();
        assert_eq!(
            requests[0].url,
            "https://acme.atlassian.net/rest/api/content/65601?expand=body.storage,body.view"
        );
        assert_eq!(
            requests[0].header("Authorization"),
            Some("Basic Ym90QGFjbWUuaW86c2VjcmV0")
        );
    }

    #[test]
    fn test_get_page_content_view_fallback() {
        let body = json!({"view": {"value": "<p>Rendered only</p>"}});
        let transport = Arc::new(MockTransport::new().with_json(200, page(body)));

        let envelope = node(&transport).process(&config(json!({
            "app_settings_id": SETTINGS_ID,
            "operation": "get_page_content",
            "page_id": "65601"
        })));

        assert_eq!(envelope.data["raw_content"], json!("<p>Rendered only</p>"));
        assert_eq!(envelope.data["html_parsed"], json!("Rendered only"));
    }

    #[test]
    fn test_get_page_content_missing_page_id() {
        let transport = Arc::new(MockTransport::new());
        let envelope = node(&transport).process(&config(json!({
            "app_settings_id": SETTINGS_ID,
            "operation": "get_page_content"
        })));

        assert_eq!(envelope.status, 400);
        assert_eq!(
            envelope.error_message(),
            Some("Confluence get_page_content operation missing page_id parameter")
        );
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_get_page_by_title_missing_parameters() {
        let transport = Arc::new(MockTransport::new());
        let node = node(&transport);

        let cases = [
            (json!({}), "space_key, title"),
            (json!({"title": "Runbook"}), "space_key"),
            (json!({"space_key": "OPS"}), "title"),
        ];
        for (extra, keys) in cases {
            let mut cfg = config(json!({
                "app_settings_id": SETTINGS_ID,
                "operation": "get_page_by_title"
            }));
            cfg.extend(config(extra));

            let envelope = node.process(&cfg);
            assert_eq!(envelope.status, 400);
            assert_eq!(
                envelope.error_message(),
                Some(
                    format!("Confluence get_page_by_title operation missing these parameters: {keys}")
                        .as_str()
                )
            );
        }
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_get_page_by_title_not_found() {
        let transport = Arc::new(MockTransport::new().with_json(200, json!({"results": []})));
        let envelope = node(&transport).process(&config(json!({
            "app_settings_id": SETTINGS_ID,
            "operation": "get_page_by_title",
            "space_key": "OPS",
            "title": "Runbook"
        })));

        assert_eq!(envelope.status, 404);
        assert_eq!(
            envelope.error_message(),
            Some("Page with title 'Runbook' not found in space 'OPS'")
        );
    }

    #[test]
    fn test_search_pages_missing_keywords() {
        let transport = Arc::new(MockTransport::new());
        let envelope = node(&transport).process(&config(json!({
            "app_settings_id": SETTINGS_ID,
            "operation": "search_pages",
            "space_key": "OPS"
        })));

        assert_eq!(envelope.status, 400);
        assert_eq!(
            envelope.error_message(),
            Some("Confluence search_pages operation missing keywords parameter")
        );
    }

    #[test]
    fn test_search_pages_invalid_limit_uses_default() {
        let transport = Arc::new(MockTransport::new().with_json(
            200,
            json!({"results": [{"id": "101", "title": "Deploy guide"}], "size": 1}),
        ));
        let envelope = node(&transport).process(&config(json!({
            "app_settings_id": SETTINGS_ID,
            "operation": "search_pages",
            "keywords": "deploy",
            "limit": "many"
        })));

        assert_eq!(envelope.status, 200);
        assert_eq!(envelope.data["page_ids"], json!(["101"]));
        assert!(transport.requests()[0].url.ends_with("&limit=25"));
    }

    #[test]
    fn test_search_pages_with_space_and_limit() {
        let transport = Arc::new(MockTransport::new().with_json(200, json!({"results": []})));
        node(&transport).process(&config(json!({
            "app_settings_id": SETTINGS_ID,
            "operation": "search_pages",
            "keywords": "deploy",
            "space_key": "OPS",
            "limit": 5
        })));

        assert_eq!(
            transport.requests()[0].url,
            "https://acme.atlassian.net/rest/api/content/search?cql=space%3DOPS%20AND%20text~%22deploy%22&limit=5"
        );
    }

    #[test]
    fn test_upstream_error_passes_through() {
        let upstream = json!({"statusCode": 403, "message": "Forbidden"});
        let transport = Arc::new(MockTransport::new().with_json(403, upstream.clone()));
        let envelope = node(&transport).process(&config(json!({
            "app_settings_id": SETTINGS_ID,
            "operation": "get_page_content",
            "page_id": "1"
        })));

        assert_eq!(envelope.status, 403);
        assert_eq!(envelope.data, upstream);
    }

    #[test]
    fn test_missing_credentials_become_none_literal() {
        let settings = AppSettings::new(Uuid::parse_str(SETTINGS_ID).unwrap(), "Partial")
            .with_value("confluence_subdomain", "acme.atlassian.net");
        let transport = Arc::new(MockTransport::new().with_response(401, "Unauthorized"));

        let envelope = node_with(settings, &transport).process(&config(json!({
            "app_settings_id": SETTINGS_ID,
            "operation": "get_page_content",
            "page_id": "1"
        })));

        assert_eq!(envelope.status, 401);
        // base64("None:None")
        assert_eq!(
            transport.requests()[0].header("Authorization"),
            Some("Basic Tm9uZTpOb25l")
        );
    }

    #[test]
    fn test_invalid_settings_id_is_internal_error() {
        let transport = Arc::new(MockTransport::new());
        let envelope = node(&transport).process(&config(json!({
            "app_settings_id": "not-a-uuid",
            "operation": "get_page_content",
            "page_id": "1"
        })));

        assert_eq!(envelope.status, 500);
        assert!(
            envelope
                .error_message()
                .unwrap()
                .starts_with("Error in Confluence operation: invalid settings id")
        );
    }

    #[test]
    fn test_unknown_settings_is_internal_error() {
        let transport = Arc::new(MockTransport::new());
        let other = "11111111-2222-4333-8444-555555555555";
        let envelope = node(&transport).process(&config(json!({
            "app_settings_id": other,
            "operation": "search_pages",
            "keywords": "x"
        })));

        assert_eq!(envelope.status, 500);
        assert_eq!(
            envelope.error_message(),
            Some(format!("Error in Confluence operation: app settings {other} not found").as_str())
        );
    }

    #[test]
    fn test_transport_failure_is_internal_error() {
        let transport = Arc::new(MockTransport::new().with_error("connection reset"));
        let envelope = node(&transport).process(&config(json!({
            "app_settings_id": SETTINGS_ID,
            "operation": "get_page_content",
            "page_id": "1"
        })));

        assert_eq!(envelope.status, 500);
        let message = envelope.error_message().unwrap();
        assert!(message.starts_with("Error in Confluence operation:"));
        assert!(message.contains("connection reset"));
        assert_eq!(transport.requests().len(), 1);
    }
}
