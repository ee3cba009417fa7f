use pushkind_common::pagination::DEFAULT_ITEMS_PER_PAGE;
use serde::{Deserialize, Serialize};

pub mod bookmarks;
pub mod errors;
pub mod ingredients;
pub mod recipes;
pub mod shopping_list;
pub mod subscriptions;
pub mod tags;
pub mod users;

pub use errors::{ErrorKind, ServiceError, ServiceResult};

/// Largest page size a client may request.
pub const MAX_ITEMS_PER_PAGE: usize = 100;

/// Largest page number a client may request.
pub const MAX_PAGE: usize = 1_000_000;

/// `page` / `limit` query parameters shared by the list endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    /// Page number requested by the client (1-based).
    pub page: Option<usize>,
    /// Page size requested by the client.
    pub limit: Option<usize>,
}

impl PageQuery {
    /// Page number and page size with defaults and bounds applied.
    pub fn resolve(&self) -> (usize, usize) {
        let page = self.page.unwrap_or(1).clamp(1, MAX_PAGE);
        let per_page = self
            .limit
            .unwrap_or(DEFAULT_ITEMS_PER_PAGE)
            .clamp(1, MAX_ITEMS_PER_PAGE);
        (page, per_page)
    }
}

/// One page of a list result.
#[derive(Debug, Clone, Serialize)]
pub struct ListPage<T> {
    /// Number of items across all pages.
    pub count: usize,
    pub page: usize,
    pub total_pages: usize,
    pub results: Vec<T>,
}

impl<T> ListPage<T> {
    pub fn new(results: Vec<T>, count: usize, page: usize, per_page: usize) -> Self {
        Self {
            count,
            page,
            total_pages: count.div_ceil(per_page.max(1)),
            results,
        }
    }
}
