//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Returns the original string unchanged if no `${}` patterns are present.
/// Bare `$VAR` syntax is not expanded (only `${VAR}` with braces).
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Err(LookupError {
                var_name: var.to_owned(),
            }),
        }
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

/// Expand every string found in a JSON value, recursing into arrays and objects.
///
/// `field` is the config path of `value`; nested paths are reported as
/// `field.key` or `field[index]` in errors.
pub(crate) fn expand_json(value: &mut serde_json::Value, field: &str) -> Result<(), ConfigError> {
    match value {
        serde_json::Value::String(s) => {
            *s = expand_env(s, field)?;
        }
        serde_json::Value::Array(items) => {
            for (index, item) in items.iter_mut().enumerate() {
                expand_json(item, &format!("{field}[{index}]"))?;
            }
        }
        serde_json::Value::Object(map) => {
            for (key, item) in map.iter_mut() {
                expand_json(item, &format!("{field}.{key}"))?;
            }
        }
        serde_json::Value::Null | serde_json::Value::Bool(_) | serde_json::Value::Number(_) => {}
    }
    Ok(())
}

/// Error returned when environment variable lookup fails.
struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_expand_simple_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("PAGELINK_TEST_SIMPLE", "hello");
        }
        let result = expand_env("${PAGELINK_TEST_SIMPLE}", "test.field").unwrap();
        assert_eq!(result, "hello");
        unsafe {
            std::env::remove_var("PAGELINK_TEST_SIMPLE");
        }
    }

    #[test]
    fn test_expand_with_default_uses_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("PAGELINK_TEST_UNSET");
        }
        let result = expand_env("${PAGELINK_TEST_UNSET:-fallback}", "test.field").unwrap();
        assert_eq!(result, "fallback");
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("PAGELINK_TEST_MISSING");
        }
        let err = expand_env("${PAGELINK_TEST_MISSING}", "settings.token").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("PAGELINK_TEST_MISSING"));
        assert!(err.to_string().contains("settings.token"));
    }

    #[test]
    fn test_bare_dollar_not_expanded() {
        let result = expand_env("pa$$word", "test.field").unwrap();
        assert_eq!(result, "pa$$word");
    }

    #[test]
    fn test_expand_json_nested() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("PAGELINK_TEST_JSON", "secret");
        }
        let mut value = json!({
            "token": "${PAGELINK_TEST_JSON}",
            "port": 443,
            "list": ["a", "${PAGELINK_TEST_JSON}"]
        });
        expand_json(&mut value, "values").unwrap();
        assert_eq!(
            value,
            json!({"token": "secret", "port": 443, "list": ["a", "secret"]})
        );
        unsafe {
            std::env::remove_var("PAGELINK_TEST_JSON");
        }
    }

    #[test]
    fn test_expand_json_reports_nested_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("PAGELINK_TEST_NESTED_MISSING");
        }
        let mut value = json!({"token": "${PAGELINK_TEST_NESTED_MISSING}"});
        let err = expand_json(&mut value, "settings.wiki.values").unwrap_err();
        assert!(err.to_string().contains("settings.wiki.values.token"));
    }
}
