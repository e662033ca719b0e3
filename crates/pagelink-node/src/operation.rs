//! Supported node operations.

use std::fmt;
use std::str::FromStr;

/// Operation requested through the `operation` config key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Fetch a page by id.
    GetPageContent,
    /// Fetch a page by space key and title.
    GetPageByTitle,
    /// CQL keyword search.
    SearchPages,
}

impl Operation {
    /// All operations, in the order they are listed to users.
    pub const ALL: [Self; 3] = [Self::GetPageContent, Self::GetPageByTitle, Self::SearchPages];

    /// Config name of the operation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetPageContent => "get_page_content",
            Self::GetPageByTitle => "get_page_by_title",
            Self::SearchPages => "search_pages",
        }
    }

    /// Comma-separated list of supported operation names.
    pub fn supported() -> String {
        Self::ALL
            .iter()
            .map(|op| op.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation name that matches no [`Operation`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown operation: {0}. Supported operations: {supported}", supported = Operation::supported())]
pub struct UnknownOperation(pub String);

impl FromStr for Operation {
    type Err = UnknownOperation;

    /// Parse an operation name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownOperation(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known() {
        assert_eq!("search_pages".parse::<Operation>(), Ok(Operation::SearchPages));
        assert_eq!(
            "GET_PAGE_BY_TITLE".parse::<Operation>(),
            Ok(Operation::GetPageByTitle)
        );
    }

    #[test]
    fn test_parse_unknown_lists_supported() {
        let err = "delete_page".parse::<Operation>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown operation: delete_page. Supported operations: get_page_content, get_page_by_title, search_pages"
        );
    }

    #[test]
    fn test_display_roundtrips_name() {
        for op in Operation::ALL {
            assert_eq!(op.to_string().parse::<Operation>(), Ok(op));
        }
    }
}
