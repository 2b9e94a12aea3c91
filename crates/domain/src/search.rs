//! Paginated search.

use serde::{Deserialize, Serialize};

use crate::movie::MovieSummary;

/// Results per page served by the search endpoint.
pub const PAGE_SIZE: u64 = 20;

/// Query string sent to the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Search term.
    pub search: String,
    /// One-based page number.
    pub page: u32,
}

impl SearchQuery {
    /// Creates a query for the given term and page.
    #[must_use]
    pub fn new(search: impl Into<String>, page: u32) -> Self {
        Self {
            search: search.into(),
            page: page.max(1),
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    /// Total number of hits across all pages.
    pub count: u64,
    /// Hits on this page.
    #[serde(default)]
    pub results: Vec<MovieSummary>,
}

impl SearchPage {
    /// Total number of pages for this result set.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        total_pages(self.count)
    }
}

/// Number of pages needed for `count` hits; never less than one.
#[must_use]
pub fn total_pages(count: u64) -> u32 {
    let pages = count.div_ceil(PAGE_SIZE).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}
