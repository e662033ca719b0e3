//! Reading node parameters and credentials out of JSON config.

use pagelink_confluence::DEFAULT_SEARCH_LIMIT;
use serde_json::{Map, Value};
use tracing::warn;

/// Placeholder used for credential fields absent from stored settings.
pub(crate) const MISSING_CREDENTIAL: &str = "None";

/// Render a scalar as the string the node works with.
fn coerce(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Required string parameter.
///
/// Absent keys, `null` and blank strings count as missing. Numbers and
/// booleans are accepted and rendered as strings. Values are passed on
/// untrimmed.
pub(crate) fn required(config: &Map<String, Value>, key: &str) -> Option<String> {
    match config.get(key)? {
        Value::Null => None,
        value => {
            let text = coerce(value);
            (!text.trim().is_empty()).then_some(text)
        }
    }
}

/// Names of parameters whose value is `None`, in the given order.
pub(crate) fn missing<'a>(params: &[(&'a str, Option<&String>)]) -> Vec<&'a str> {
    params
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(key, _)| *key)
        .collect()
}

/// Credential value from stored settings.
///
/// A missing or `null` field becomes the literal `"None"` rather than an
/// empty value; the request still goes out and the server rejects it.
pub(crate) fn credential(values: &Map<String, Value>, key: &str) -> String {
    match values.get(key) {
        None | Some(Value::Null) => {
            warn!("App settings have no {key}, using \"{MISSING_CREDENTIAL}\"");
            MISSING_CREDENTIAL.to_owned()
        }
        Some(value) => coerce(value),
    }
}

/// Search result limit; absent means the default, garbage falls back to it.
pub(crate) fn limit(config: &Map<String, Value>) -> u32 {
    let parsed = match config.get("limit") {
        None | Some(Value::Null) => return DEFAULT_SEARCH_LIMIT,
        Some(Value::String(s)) if s.trim().is_empty() => return DEFAULT_SEARCH_LIMIT,
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(truncate))
            .and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        Some(_) => None,
    };

    parsed.unwrap_or_else(|| {
        warn!("Invalid limit value, using default: {DEFAULT_SEARCH_LIMIT}");
        DEFAULT_SEARCH_LIMIT
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn truncate(f: f64) -> u64 {
    f.trunc() as u64
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn config(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_required_string() {
        let cfg = config(json!({"page_id": "65601"}));
        assert_eq!(required(&cfg, "page_id"), Some("65601".to_owned()));
    }

    #[test]
    fn test_required_coerces_number() {
        let cfg = config(json!({"page_id": 65601}));
        assert_eq!(required(&cfg, "page_id"), Some("65601".to_owned()));
    }

    #[test]
    fn test_required_keeps_surrounding_whitespace() {
        let cfg = config(json!({"keywords": " deploy ", "space_key": " OPS "}));
        assert_eq!(required(&cfg, "keywords"), Some(" deploy ".to_owned()));
        assert_eq!(required(&cfg, "space_key"), Some(" OPS ".to_owned()));
    }

    #[test]
    fn test_required_missing_null_and_blank() {
        let cfg = config(json!({"a": null, "b": "", "c": "   "}));
        assert_eq!(required(&cfg, "a"), None);
        assert_eq!(required(&cfg, "b"), None);
        assert_eq!(required(&cfg, "c"), None);
        assert_eq!(required(&cfg, "absent"), None);
    }

    #[test]
    fn test_missing_keeps_order() {
        let title = "T".to_owned();
        assert_eq!(
            missing(&[("space_key", None), ("title", Some(&title))]),
            vec!["space_key"]
        );
        assert!(missing(&[("title", Some(&title))]).is_empty());
    }

    #[test]
    fn test_credential_placeholder() {
        let values = config(json!({"confluence_email": "a@b.c", "confluence_api_token": null}));
        assert_eq!(credential(&values, "confluence_email"), "a@b.c");
        assert_eq!(credential(&values, "confluence_api_token"), "None");
        assert_eq!(credential(&values, "confluence_subdomain"), "None");
    }

    #[test]
    fn test_credential_empty_string_kept() {
        let values = config(json!({"confluence_email": ""}));
        assert_eq!(credential(&values, "confluence_email"), "");
    }

    #[test]
    fn test_limit_values() {
        assert_eq!(limit(&config(json!({}))), 25);
        assert_eq!(limit(&config(json!({"limit": 10}))), 10);
        assert_eq!(limit(&config(json!({"limit": "40"}))), 40);
        assert_eq!(limit(&config(json!({"limit": 7.9}))), 7);
        assert_eq!(limit(&config(json!({"limit": 0}))), 0);
    }

    #[test]
    fn test_limit_falls_back_on_garbage() {
        assert_eq!(limit(&config(json!({"limit": "lots"}))), 25);
        assert_eq!(limit(&config(json!({"limit": -3}))), 25);
        assert_eq!(limit(&config(json!({"limit": [1]}))), 25);
        assert_eq!(limit(&config(json!({"limit": ""}))), 25);
    }
}
