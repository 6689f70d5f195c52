//! Query parameters and paginated responses for list endpoints

use crate::core::page::{PageResult, PageSize};
use crate::core::range::{PageRange, parse_start};
use crate::core::window::KeysetConfig;
use serde::{Deserialize, Serialize};

/// Query parameters of a keyset-paginated list
///
/// This structure is used to extract navigation and search parameters from
/// URL query strings. Every parameter is optional.
///
/// # Example
/// ```rust,ignore
/// // In handler:
/// pub async fn list_members(
///     Query(params): Query<ListQuery>,
/// ) -> Json<ListResponse<Member>> {
///     let request = PageRequest::new(filter, field, size).with_keyset(params.keyset());
///     // ...
/// }
///
/// // Usage:
/// GET /members
/// GET /members?after=eyJrIjoi...&start=51
/// GET /members?before=eyJrIjoi...&start=51&q=ann
/// ```
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ListQuery {
    /// Cursor of the last row of the previous page
    pub after: Option<String>,

    /// Cursor of the first row of the next page
    pub before: Option<String>,

    /// 1-based index of the first row, for display only
    pub start: Option<String>,

    /// Search text
    pub q: Option<String>,
}

impl ListQuery {
    /// Display index of the first row, at least 1
    pub fn start(&self) -> usize {
        parse_start(self.start.as_deref())
    }

    /// Trimmed search text, empty when absent
    pub fn search(&self) -> &str {
        self.q.as_deref().map(str::trim).unwrap_or_default()
    }

    /// Direction and anchor from `before` / `after`
    pub fn keyset(&self) -> KeysetConfig {
        KeysetConfig::from_tokens(self.before.as_deref(), self.after.as_deref())
    }
}

/// Paginated response structure
///
/// This structure wraps one page of data with the links a client needs to
/// move to the neighbouring pages.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    /// The page data in display order
    pub data: Vec<T>,

    /// Pagination metadata
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PaginationMeta {
    /// Total number of items (after filters)
    pub total: u64,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,

    /// `after` token for the next page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,

    /// `before` token for the previous page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,

    /// Display range of this page
    pub range: PageRange,
}

impl<T> ListResponse<T> {
    /// Build a response from a page and the request's display start
    pub fn from_page(page: PageResult<T>, start: usize, page_size: PageSize) -> Self {
        let range = PageRange::compute(start, page.len(), page_size);
        let pagination = PaginationMeta {
            total: page.total,
            has_next: page.has_next,
            has_prev: page.has_prev,
            next: page.has_next.then(|| page.last_token()).flatten(),
            prev: page.has_prev.then(|| page.first_token()).flatten(),
            range,
        };
        Self {
            data: page.items,
            pagination,
        }
    }
}
