//! Confluence CQL search types.

use serde::{Deserialize, Serialize};

use super::page::Space;

/// CQL search response (`GET /rest/api/content/search`).
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SearchResponse {
    /// Matching content.
    #[serde(default)]
    pub results: Vec<SearchHit>,
    /// Number of results reported by the server.
    #[serde(default, deserialize_with = "super::lenient::count")]
    pub size: Option<u64>,
}

/// One search hit.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SearchHit {
    #[serde(default, deserialize_with = "super::lenient::string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::string")]
    pub title: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "super::lenient::string")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub space: Option<Space>,
    #[serde(rename = "_links", default)]
    pub links: Option<Links>,
}

/// Hypermedia links.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Links {
    /// Web UI link, relative to the site base URL.
    #[serde(default)]
    pub webui: Option<String>,
}

/// Search hit summary in the normalized response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    /// Page ID.
    pub id: String,
    /// Page title.
    pub title: Option<String>,
    /// Content type.
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    /// Space key.
    pub space: Option<String>,
    /// Absolute web link, when the server provided one.
    pub url: Option<String>,
}

/// Normalized search payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    /// IDs of matching pages, in result order.
    pub page_ids: Vec<String>,
    /// Summaries parallel to `page_ids`.
    pub pages: Vec<PageSummary>,
    /// Total result count reported by the server.
    pub total_results: u64,
}

impl SearchResponse {
    /// Reshape into the normalized payload.
    ///
    /// Hits without an id are dropped. Web links are made absolute against `base_url`.
    pub(crate) fn into_results(self, base_url: &str) -> SearchResults {
        let total_results = self.size.unwrap_or(self.results.len() as u64);

        let pages: Vec<PageSummary> = self
            .results
            .into_iter()
            .filter_map(|hit| {
                let id = hit.id.filter(|id| !id.is_empty())?;
                let url = hit
                    .links
                    .and_then(|links| links.webui)
                    .filter(|webui| !webui.is_empty())
                    .map(|webui| format!("{base_url}{webui}"));
                Some(PageSummary {
                    id,
                    title: hit.title,
                    content_type: hit.content_type,
                    space: hit.space.and_then(|s| s.key),
                    url,
                })
            })
            .collect();

        SearchResults {
            page_ids: pages.iter().map(|p| p.id.clone()).collect(),
            pages,
            total_results,
        }
    }
}
