//! CQL search operations for Confluence API.

use percent_encoding::{AsciiSet, utf8_percent_encode};

use super::{ConfluenceConnector, QUERY_VALUE};
use crate::envelope::{Envelope, STATUS_OK};
use crate::error::ConfluenceError;
use crate::types::SearchResponse;

/// Default number of search results.
pub const DEFAULT_SEARCH_LIMIT: u32 = 25;

/// Characters left unescaped in the CQL parameter: unreserved plus `/`.
const CQL_VALUE: &AsciiSet = &QUERY_VALUE.remove(b'/');

impl ConfluenceConnector {
    /// Search pages whose text matches `keywords`.
    ///
    /// Restricted to `space_key` when given. On 200 the envelope carries
    /// [`SearchResults`](crate::SearchResults).
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or a 200 body is not
    /// valid JSON.
    pub fn search_pages(
        &self,
        keywords: &str,
        space_key: Option<&str>,
        limit: u32,
    ) -> Result<Envelope, ConfluenceError> {
        let cql = build_cql(keywords, space_key);
        let url = format!(
            "{}/content/search?cql={}&limit={limit}",
            self.api_url(),
            utf8_percent_encode(&cql, CQL_VALUE)
        );

        let response = self.get(&url)?;
        if response.status != STATUS_OK {
            return Ok(Envelope::passthrough(response));
        }

        let search: SearchResponse = serde_json::from_str(&response.body)?;
        Envelope::ok(&search.into_results(self.base_url()))
    }
}

/// Build the CQL expression: `text~"keywords"`, optionally scoped to a space.
fn build_cql(keywords: &str, space_key: Option<&str>) -> String {
    let escaped = keywords.replace('\\', "\\\\").replace('"', "\\\"");
    let text = format!("text~\"{escaped}\"");
    match space_key.filter(|key| !key.is_empty()) {
        Some(space) => format!("space={space} AND {text}"),
        None => text,
    }
}
