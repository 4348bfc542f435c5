//! Pagination extractor.

use roster_core::ListRequest;
use serde::Deserialize;

/// Query parameters for pagination. Pages are 1-based.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationQuery {
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub page_size: Option<usize>,
}

impl PaginationQuery {
    /// The requested page, never below 1.
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }
}

impl From<PaginationQuery> for ListRequest {
    fn from(query: PaginationQuery) -> Self {
        ListRequest::from_page(
            query.page(),
            query.page_size.unwrap_or(ListRequest::DEFAULT_LIMIT),
        )
    }
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: Some(1),
            page_size: Some(ListRequest::DEFAULT_LIMIT),
        }
    }
}
