//! Tolerant readers for scalar fields.
//!
//! Confluence and its proxies are not always consistent about scalar types
//! (numeric ids, `1.0` version numbers). A field of the wrong type is read
//! as `None` or converted instead of failing the whole response.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// String field; numbers and booleans are rendered, anything else is `None`.
pub(crate) fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// Non-negative integer field; floats are truncated and numeric strings parsed.
pub(crate) fn count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(truncate)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn truncate(f: f64) -> u64 {
    f.trunc() as u64
}
