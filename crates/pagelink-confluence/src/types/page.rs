//! Confluence page types.

use serde::{Deserialize, Serialize};

/// Confluence page as returned by the content API.
///
/// Every field is optional: the connector reshapes whatever the server
/// sends and reports missing metadata as `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Page {
    /// Page ID.
    #[serde(default, deserialize_with = "super::lenient::string")]
    pub id: Option<String>,
    /// Content type ("page", "blogpost", ...).
    #[serde(rename = "type", default, deserialize_with = "super::lenient::string")]
    pub content_type: Option<String>,
    /// Page title.
    #[serde(default, deserialize_with = "super::lenient::string")]
    pub title: Option<String>,
    /// Owning space.
    #[serde(default)]
    pub space: Option<Space>,
    /// Version information.
    #[serde(default)]
    pub version: Option<Version>,
    /// Page body content.
    #[serde(default)]
    pub body: Option<Body>,
}

impl Page {
    /// Page markup: storage format when present, view format otherwise.
    ///
    /// Returns an empty string when neither representation carries a value.
    pub(crate) fn markup(&self) -> &str {
        let Some(body) = &self.body else {
            return "";
        };
        body.storage
            .as_ref()
            .and_then(|r| r.value.as_deref())
            .or_else(|| body.view.as_ref().and_then(|r| r.value.as_deref()))
            .unwrap_or_default()
    }

    /// Metadata subset reported alongside page content.
    pub(crate) fn info(&self) -> PageInfo {
        PageInfo {
            id: self.id.clone(),
            title: self.title.clone(),
            content_type: self.content_type.clone(),
            space: self.space.as_ref().and_then(|s| s.key.clone()),
            version: self.version.as_ref().and_then(|v| v.number),
        }
    }
}

/// Space reference.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Space {
    /// Space key.
    #[serde(default, deserialize_with = "super::lenient::string")]
    pub key: Option<String>,
}

/// Page version.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Version {
    /// Version number.
    #[serde(default, deserialize_with = "super::lenient::count")]
    pub number: Option<u64>,
}

/// Page body content.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Body {
    /// Storage format content.
    #[serde(default)]
    pub storage: Option<Representation>,
    /// Rendered view content.
    #[serde(default)]
    pub view: Option<Representation>,
}

/// One body representation.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Representation {
    /// Markup in this representation.
    #[serde(default)]
    pub value: Option<String>,
}

/// Content listing response (`GET /rest/api/content?...`).
///
/// Only `results` is read; serde ignores paging fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct PageResults {
    /// Matching pages.
    #[serde(default)]
    pub results: Vec<Page>,
}

/// Page metadata in the normalized response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// Page ID.
    pub id: Option<String>,
    /// Page title.
    pub title: Option<String>,
    /// Content type.
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    /// Space key.
    pub space: Option<String>,
    /// Version number.
    pub version: Option<u64>,
}

/// Normalized page content payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageContent {
    /// Markup converted to plain text.
    pub html_parsed: String,
    /// Markup as returned by Confluence.
    pub raw_content: String,
    /// Page metadata.
    pub page_info: PageInfo,
}
