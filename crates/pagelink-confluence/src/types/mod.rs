//! Confluence API types.

mod lenient;
mod page;
mod search;

pub use page::{PageContent, PageInfo};
pub(crate) use page::{Page, PageResults};
pub use search::{PageSummary, SearchResults};
pub(crate) use search::SearchResponse;
