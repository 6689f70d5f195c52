//! Page requests, page results and the trimming rules between them

use crate::core::cursor::Cursor;
use crate::core::error::RequestError;
use crate::core::filter::Filter;
use crate::core::record::Record;
use crate::core::window::{Direction, KeysetConfig, SortField};
use serde::Serialize;
use std::num::NonZeroUsize;

/// Rows per page, at least one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PageSize(NonZeroUsize);

impl PageSize {
    /// Default size of full list views
    pub const DEFAULT: PageSize = PageSize::from_const(50);

    /// Default size of picker dialogs
    pub const MODAL: PageSize = PageSize::from_const(20);

    const fn from_const(n: usize) -> Self {
        match NonZeroUsize::new(n) {
            Some(n) => Self(n),
            None => panic!("page size must be at least 1"),
        }
    }

    pub fn new(n: usize) -> Result<Self, RequestError> {
        NonZeroUsize::new(n)
            .map(Self)
            .ok_or(RequestError::InvalidPageSize { value: n })
    }

    pub fn get(self) -> usize {
        self.0.get()
    }

    /// Rows to request so that one extra row reveals a further page
    pub fn limit_plus_one(self) -> usize {
        self.0.get() + 1
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Everything needed to read one page
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    /// Tenant/authorization scope plus any search condition
    pub base_filter: Filter,
    pub sort_field: SortField,
    pub keyset: KeysetConfig,
    pub page_size: PageSize,
}

impl PageRequest {
    /// Request for the first page
    pub fn new(base_filter: Filter, sort_field: SortField, page_size: PageSize) -> Self {
        Self {
            base_filter,
            sort_field,
            keyset: KeysetConfig::first(),
            page_size,
        }
    }

    pub fn with_keyset(mut self, keyset: KeysetConfig) -> Self {
        self.keyset = keyset;
        self
    }

    /// Resolve raw `before` / `after` query tokens (see [`KeysetConfig::from_tokens`])
    pub fn with_tokens(self, before: Option<&str>, after: Option<&str>) -> Self {
        self.with_keyset(KeysetConfig::from_tokens(before, after))
    }

    pub fn after(self, anchor: Cursor) -> Self {
        self.with_keyset(KeysetConfig::after(anchor))
    }

    pub fn before(self, anchor: Cursor) -> Self {
        self.with_keyset(KeysetConfig::before(anchor))
    }

    pub fn last(self) -> Self {
        self.with_keyset(KeysetConfig::last())
    }

    pub fn direction(&self) -> Direction {
        self.keyset.direction
    }

    pub fn anchor(&self) -> Option<&Cursor> {
        self.keyset.anchor.as_ref()
    }
}

/// One page of records in ascending display order
#[derive(Debug, Clone, Serialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub has_next: bool,
    pub has_prev: bool,
    pub first_cursor: Option<Cursor>,
    pub last_cursor: Option<Cursor>,
    /// Records matching the base filter, ignoring the window
    pub total: u64,
}

impl<T: Record> PageResult<T> {
    /// Build a page from rows already in ascending order
    pub fn from_rows(
        items: Vec<T>,
        sort_field: &SortField,
        has_prev: bool,
        has_next: bool,
        total: u64,
    ) -> Self {
        let first_cursor = items.first().and_then(|r| cursor_of(r, sort_field));
        let last_cursor = items.last().and_then(|r| cursor_of(r, sort_field));
        Self {
            items,
            has_next,
            has_prev,
            first_cursor,
            last_cursor,
            total,
        }
    }
}

impl<T> PageResult<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Token for a "previous" link (`before=`)
    pub fn first_token(&self) -> Option<String> {
        self.first_cursor.as_ref().map(Cursor::encode)
    }

    /// Token for a "next" link (`after=`)
    pub fn last_token(&self) -> Option<String> {
        self.last_cursor.as_ref().map(Cursor::encode)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            items: self.items.into_iter().map(f).collect(),
            has_next: self.has_next,
            has_prev: self.has_prev,
            first_cursor: self.first_cursor,
            last_cursor: self.last_cursor,
            total: self.total,
        }
    }
}

/// Position of `record` in the `(sort_field, id)` order, if it has a key
pub fn cursor_of<T: Record>(record: &T, sort_field: &SortField) -> Option<Cursor> {
    record
        .sort_key(sort_field.as_str())
        .map(|key| Cursor::new(key, record.id()))
}

/// Drop the over-fetched row, if any, from rows already in ascending order.
///
/// The extra row sits past the far end of the window: at the tail when
/// reading forward, at the head when reading backward. Returns whether a row
/// was dropped, i.e. whether more data exists in `direction`.
pub fn trim_overflow<T>(rows: &mut Vec<T>, direction: Direction, page_size: PageSize) -> bool {
    if rows.len() <= page_size.get() {
        return false;
    }
    match direction {
        Direction::Forward => rows.truncate(page_size.get()),
        Direction::Backward => {
            let extra = rows.len() - page_size.get();
            rows.drain(..extra);
        }
    }
    true
}

/// `(has_prev, has_next)` after a plain fetch.
///
/// The flag in the fetch direction comes from the over-fetch; the opposite
/// one from whether the request was anchored. An empty page has neither.
pub fn boundary_flags(
    direction: Direction,
    anchored: bool,
    overflow: bool,
    shown: usize,
) -> (bool, bool) {
    if shown == 0 {
        return (false, false);
    }
    match direction {
        Direction::Forward => (anchored, overflow),
        Direction::Backward => (overflow, anchored),
    }
}
