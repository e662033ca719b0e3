//! Page operations for Confluence API.

use percent_encoding::utf8_percent_encode;

use super::{ConfluenceConnector, QUERY_VALUE};
use crate::envelope::{Envelope, STATUS_OK};
use crate::error::ConfluenceError;
use crate::html::html_to_text;
use crate::types::{Page, PageContent, PageResults};

/// Body representations requested with every page.
const BODY_EXPAND: &str = "body.storage,body.view";

impl ConfluenceConnector {
    /// Get page content by ID.
    ///
    /// On 200 the envelope carries [`PageContent`]; any other status is
    /// returned with the upstream body unmodified.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or a 200 body is not
    /// valid page JSON.
    pub fn get_page_content(&self, page_id: &str) -> Result<Envelope, ConfluenceError> {
        let url = format!(
            "{}/content/{}?expand={BODY_EXPAND}",
            self.api_url(),
            utf8_percent_encode(page_id, QUERY_VALUE)
        );

        let response = self.get(&url)?;
        if response.status != STATUS_OK {
            return Ok(Envelope::passthrough(response));
        }

        let page: Page = serde_json::from_str(&response.body)?;
        Envelope::ok(&page_content(&page))
    }

    /// Get page content by space key and exact title.
    ///
    /// The first match wins. No match yields a locally built 404.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or a 200 body is not
    /// valid JSON.
    pub fn get_page_by_title(
        &self,
        space_key: &str,
        title: &str,
    ) -> Result<Envelope, ConfluenceError> {
        let url = format!(
            "{}/content?spaceKey={}&title={}&expand={BODY_EXPAND}",
            self.api_url(),
            utf8_percent_encode(space_key, QUERY_VALUE),
            utf8_percent_encode(title, QUERY_VALUE)
        );

        let response = self.get(&url)?;
        if response.status != STATUS_OK {
            return Ok(Envelope::passthrough(response));
        }

        let listing: PageResults = serde_json::from_str(&response.body)?;
        let Some(page) = listing.results.first() else {
            return Ok(Envelope::error(
                404,
                format!("Page with title '{title}' not found in space '{space_key}'"),
            ));
        };

        Envelope::ok(&page_content(page))
    }
}

/// Reshape a page into the normalized content payload.
fn page_content(page: &Page) -> PageContent {
    let raw_content = page.markup().to_owned();
    let html_parsed = if raw_content.is_empty() {
        String::new()
    } else {
        html_to_text(&raw_content)
    };

    PageContent {
        html_parsed,
        raw_content,
        page_info: page.info(),
    }
}
