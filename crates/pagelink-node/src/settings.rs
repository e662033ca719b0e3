//! Stored app settings and the store abstraction.
//!
//! The node never reaches for a global settings service: a [`SettingsStore`]
//! is handed to [`ConfluenceNode::new`](crate::ConfluenceNode::new).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A stored settings record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Settings id referenced by `app_settings_id`.
    pub id: Uuid,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Free-form values; Confluence credentials live here.
    #[serde(default)]
    pub values: Map<String, Value>,
}

impl AppSettings {
    /// Create an empty settings record.
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            values: Map::new(),
        }
    }

    /// Add a value.
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

/// Error from a settings lookup.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The id is not a valid UUID.
    #[error("invalid settings id: {0}")]
    InvalidId(#[from] uuid::Error),

    /// No settings stored under the id.
    #[error("app settings {0} not found")]
    NotFound(Uuid),

    /// The backing store failed.
    #[error("settings store error: {0}")]
    Backend(String),
}

/// Lookup of stored settings by id.
pub trait SettingsStore: Send + Sync {
    /// Fetch the settings record with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NotFound`] when no record exists, or
    /// [`SettingsError::Backend`] when the store cannot be read.
    fn get_by_id(&self, id: &Uuid) -> Result<AppSettings, SettingsError>;
}

/// In-memory settings store.
///
/// # Example
///
/// ```ignore
/// use pagelink_node::{AppSettings, MemorySettingsStore};
///
/// let store = MemorySettingsStore::new().with_settings(
///     AppSettings::new(id, "Team wiki").with_value("confluence_subdomain", "acme.atlassian.net"),
/// );
/// ```
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    records: HashMap<Uuid, AppSettings>,
}

impl MemorySettingsStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, replacing any with the same id.
    #[must_use]
    pub fn with_settings(mut self, settings: AppSettings) -> Self {
        self.insert(settings);
        self
    }

    /// Add a record, replacing any with the same id.
    pub fn insert(&mut self, settings: AppSettings) {
        self.records.insert(settings.id, settings);
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get_by_id(&self, id: &Uuid) -> Result<AppSettings, SettingsError> {
        self.records
            .get(id)
            .cloned()
            .ok_or(SettingsError::NotFound(*id))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_memory_store_lookup() {
        let id = Uuid::new_v4();
        let store = MemorySettingsStore::new()
            .with_settings(AppSettings::new(id, "Wiki").with_value("confluence_email", "a@b.c"));

        let settings = store.get_by_id(&id).unwrap();
        assert_eq!(settings.name, "Wiki");
        assert_eq!(settings.values["confluence_email"], json!("a@b.c"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_memory_store_not_found() {
        let store = MemorySettingsStore::new();
        let id = Uuid::new_v4();

        let err = store.get_by_id(&id).unwrap_err();
        assert!(matches!(err, SettingsError::NotFound(missing) if missing == id));
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn test_insert_replaces() {
        let id = Uuid::new_v4();
        let mut store = MemorySettingsStore::new().with_settings(AppSettings::new(id, "old"));
        store.insert(AppSettings::new(id, "new"));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get_by_id(&id).unwrap().name, "new");
    }

    #[test]
    fn test_app_settings_deserialize() {
        let settings: AppSettings = serde_json::from_value(json!({
            "id": "0b5c2a8e-4f3d-4d8e-9a51-6f1e2d3c4b5a",
            "values": {"confluence_api_token": "tok"}
        }))
        .unwrap();
        assert_eq!(settings.name, "");
        assert_eq!(settings.values["confluence_api_token"], json!("tok"));
    }
}
