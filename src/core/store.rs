//! Store trait for keyset queries

use crate::core::filter::Filter;
use crate::core::record::Record;
use crate::core::window::SortField;
use anyhow::Result;
use async_trait::async_trait;

/// Order of the compound `(sort_field, id)` key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// `1` / `-1`, as document stores spell it
    pub fn as_i32(self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }
}

/// One bounded, ordered read
#[derive(Debug, Clone, PartialEq)]
pub struct FindQuery {
    pub filter: Filter,
    pub sort_field: SortField,
    pub order: SortOrder,
    pub limit: usize,
}

/// A document collection that can serve keyset pages.
///
/// Implementations must sort by `sort_field` and then by record id, both in
/// `order`, and return at most `limit` records. The engine only reads; the
/// collection is mutated by other parts of the application.
#[async_trait]
pub trait DocumentStore<T: Record>: Send + Sync {
    /// Matching records in `(sort_field, id)` order
    async fn find(&self, query: &FindQuery) -> Result<Vec<T>>;

    /// Number of records matching `filter`
    async fn count(&self, filter: &Filter) -> Result<u64>;
}
