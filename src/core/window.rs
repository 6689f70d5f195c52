//! Keyset window construction
//!
//! Given an anchor cursor and a direction, the window is the condition that
//! keeps only rows strictly after (forward) or strictly before (backward) the
//! anchor in `(sort_key, id)` order:
//!
//! ```text
//! forward:  key > k  OR (key == k AND id > id0)
//! backward: key < k  OR (key == k AND id < id0)
//! ```
//!
//! The window is always combined with the base filter as a separate
//! conjunct. A base filter that is itself a disjunction (two-field search)
//! stays intact: `AND(OR(search_a, search_b), window)`.

use crate::core::cursor::Cursor;
use crate::core::error::RequestError;
use crate::core::filter::Filter;
use crate::core::record::ID_FIELD;
use crate::core::store::SortOrder;
use std::borrow::Cow;
use std::fmt;

/// Name of the folded field a list is ordered (and searched) on.
///
/// Never empty and never the tiebreak field itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortField(Cow<'static, str>);

impl SortField {
    /// Checked at compile time when used in a `const`:
    ///
    /// ```rust
    /// use keyset::core::window::SortField;
    /// const NAME_CI: SortField = SortField::from_static("name_ci");
    /// assert_eq!(NAME_CI.as_str(), "name_ci");
    /// ```
    pub const fn from_static(name: &'static str) -> Self {
        assert!(!name.is_empty(), "sort field must not be empty");
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Result<Self, RequestError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RequestError::InvalidSortField {
                value: name,
                message: "must not be empty".to_string(),
            });
        }
        if name == ID_FIELD {
            return Err(RequestError::InvalidSortField {
                value: name,
                message: "the tiebreak field is always sorted on implicitly".to_string(),
            });
        }
        Ok(Self(Cow::Owned(name)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which way a page is read relative to its anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    /// Store order used to fetch rows in this direction
    pub fn sort_order(self) -> SortOrder {
        match self {
            Direction::Forward => SortOrder::Ascending,
            Direction::Backward => SortOrder::Descending,
        }
    }
}

/// Whether the anchor row itself belongs to the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exclusive,
    Inclusive,
}

/// The `(sort_key, id)` condition for rows past `anchor` in `direction`
pub fn keyset_window(
    field: &SortField,
    direction: Direction,
    anchor: &Cursor,
    bound: Bound,
) -> Filter {
    let key = anchor.sort_key().to_string();
    let id = anchor.id();
    let (past_key, past_id) = match (direction, bound) {
        (Direction::Forward, Bound::Exclusive) => (
            Filter::gt(field.as_str(), key.clone()),
            Filter::gt(ID_FIELD, id),
        ),
        (Direction::Forward, Bound::Inclusive) => (
            Filter::gt(field.as_str(), key.clone()),
            Filter::gte(ID_FIELD, id),
        ),
        (Direction::Backward, Bound::Exclusive) => (
            Filter::lt(field.as_str(), key.clone()),
            Filter::lt(ID_FIELD, id),
        ),
        (Direction::Backward, Bound::Inclusive) => (
            Filter::lt(field.as_str(), key.clone()),
            Filter::lte(ID_FIELD, id),
        ),
    };
    Filter::Or(vec![
        past_key,
        Filter::And(vec![Filter::eq(field.as_str(), key), past_id]),
    ])
}

/// Combine a base filter with an optional window as separate conjuncts
pub fn compose(base: Filter, window: Option<Filter>) -> Filter {
    match window {
        Some(window) => base.and(window),
        None => base,
    }
}

/// Direction and anchor resolved from a request's `before` / `after` tokens
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeysetConfig {
    pub direction: Direction,
    pub anchor: Option<Cursor>,
}

impl KeysetConfig {
    /// First page, no anchor
    pub fn first() -> Self {
        Self::default()
    }

    /// Last page: read backward from the unbounded end
    pub fn last() -> Self {
        Self {
            direction: Direction::Backward,
            anchor: None,
        }
    }

    pub fn after(anchor: Cursor) -> Self {
        Self {
            direction: Direction::Forward,
            anchor: Some(anchor),
        }
    }

    pub fn before(anchor: Cursor) -> Self {
        Self {
            direction: Direction::Backward,
            anchor: Some(anchor),
        }
    }

    /// Resolve raw query tokens.
    ///
    /// `before` wins when both are present. Blank or unreadable tokens count
    /// as absent, so a stale bookmark lands on the first page.
    pub fn from_tokens(before: Option<&str>, after: Option<&str>) -> Self {
        if let Some(anchor) = Cursor::decode_param(before) {
            return Self::before(anchor);
        }
        if let Some(anchor) = Cursor::decode_param(after) {
            return Self::after(anchor);
        }
        Self::first()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.direction.sort_order()
    }

    /// Exclusive window for this configuration, `None` when unanchored
    pub fn window(&self, field: &SortField) -> Option<Filter> {
        self.anchor
            .as_ref()
            .map(|anchor| keyset_window(field, self.direction, anchor, Bound::Exclusive))
    }
}
