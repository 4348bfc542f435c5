//! Pagination types for list operations.

use serde::{Deserialize, Serialize};

/// A bounded window over the identity-ordered record sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRequest {
    /// Maximum number of records to return.
    pub limit: usize,
    /// Number of records to skip.
    pub offset: usize,
}

impl ListRequest {
    /// The default number of records per request.
    pub const DEFAULT_LIMIT: usize = 20;
    /// The maximum allowed number of records per request.
    pub const MAX_LIMIT: usize = 100;

    /// Creates a list request, clamping `limit` to [`Self::MAX_LIMIT`].
    #[must_use]
    pub fn new(limit: usize, offset: usize) -> Self {
        Self {
            limit: limit.min(Self::MAX_LIMIT),
            offset,
        }
    }

    /// Creates a list request from a 1-based page number and page size.
    ///
    /// A page of `0` is treated as the first page.
    #[must_use]
    pub fn from_page(page: usize, page_size: usize) -> Self {
        let limit = page_size.clamp(1, Self::MAX_LIMIT);
        Self::new(limit, page.saturating_sub(1).saturating_mul(limit))
    }

    /// Returns the limit as a signed value for SQL binding.
    #[must_use]
    pub fn limit_i64(&self) -> i64 {
        i64::try_from(self.limit).unwrap_or(i64::MAX)
    }

    /// Returns the offset as a signed value for SQL binding.
    #[must_use]
    pub fn offset_i64(&self) -> i64 {
        i64::try_from(self.offset).unwrap_or(i64::MAX)
    }
}

impl Default for ListRequest {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT, 0)
    }
}

/// Pagination metadata returned alongside a page of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// The current page number (1-based).
    pub page: usize,
    /// The number of items per page.
    pub page_size: usize,
    /// The total number of items across all pages.
    pub total_items: u64,
    /// The total number of pages.
    pub total_pages: u64,
}

impl PageInfo {
    /// Creates page metadata for a 1-based page.
    #[must_use]
    pub fn new(page: usize, page_size: usize, total_items: u64) -> Self {
        let total_pages = if page_size > 0 {
            total_items.div_ceil(page_size as u64)
        } else {
            0
        };

        Self {
            page: page.max(1),
            page_size,
            total_items,
            total_pages,
        }
    }
}
