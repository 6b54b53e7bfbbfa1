//! Pagination envelope
//!
//! All listing pipelines return their rows wrapped in a [`Page`]: the
//! windowed items plus the metadata a client needs to walk the result set.
//! Pagination is computed as a count pass plus a skip/limit pass; ordering
//! is always fully determined before the window is applied.

use serde::Serialize;
use thiserror::Error;

use crate::config::PaginationConfig;

/// Error returned when caller-supplied page parameters are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageParamError {
    /// `page` must be a positive integer
    #[error("page must be a positive integer")]
    ZeroPage,

    /// `limit` must be a positive integer
    #[error("limit must be a positive integer")]
    ZeroLimit,
}

/// Validated page/limit parameters for a listing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Validate caller-supplied parameters, applying defaults for absent
    /// values and clamping `limit` to the configured maximum.
    pub fn new(
        page: Option<u32>,
        limit: Option<u32>,
        config: &PaginationConfig,
    ) -> Result<Self, PageParamError> {
        if page == Some(0) {
            return Err(PageParamError::ZeroPage);
        }
        if limit == Some(0) {
            return Err(PageParamError::ZeroLimit);
        }

        Ok(Self {
            page: page.unwrap_or(1),
            limit: limit
                .unwrap_or(config.default_page_size)
                .min(config.max_page_size),
        })
    }

    /// First page with the configured default limit.
    pub fn first(config: &PaginationConfig) -> Self {
        Self {
            page: 1,
            limit: config.default_page_size,
        }
    }

    /// 1-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip before the window starts.
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

/// One page of results plus pagination metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub total_pages: u64,
    pub current_page: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl<T> Page<T> {
    /// Wrap a window of items fetched for `request` against a collection
    /// holding `total_items` matching rows.
    ///
    /// A `request.page` beyond the last page yields an empty `items` list,
    /// not an error.
    pub fn new(items: Vec<T>, total_items: u64, request: &PageRequest) -> Self {
        let total_pages = total_items.div_ceil(request.limit() as u64);
        let current_page = request.page();

        Self {
            items,
            total_items,
            total_pages,
            current_page,
            has_next_page: (current_page as u64) < total_pages,
            // Any page past the first has a predecessor, overrun pages
            // included.
            has_prev_page: current_page > 1,
        }
    }

    /// Replace the items while keeping the pagination metadata, used when a
    /// later pipeline stage reshapes the windowed rows.
    pub fn with_items<U>(self, items: Vec<U>) -> Page<U> {
        Page {
            items,
            total_items: self.total_items,
            total_pages: self.total_pages,
            current_page: self.current_page,
            has_next_page: self.has_next_page,
            has_prev_page: self.has_prev_page,
        }
    }
}
