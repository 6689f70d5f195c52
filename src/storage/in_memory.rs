//! In-memory implementation of DocumentStore for testing and development

use crate::core::filter::Filter;
use crate::core::record::Record;
use crate::core::store::{DocumentStore, FindQuery, SortOrder};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory document store
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
/// Cloning shares the underlying collection, so a handler can mutate the
/// same rows a [`Paginator`](crate::paging::Paginator) reads.
#[derive(Clone)]
pub struct InMemoryStore<T: Record> {
    records: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Record> InMemoryStore<T> {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a store holding `records`
    pub fn with_records(records: impl IntoIterator<Item = T>) -> Self {
        let map = records.into_iter().map(|r| (r.id(), r)).collect();
        Self {
            records: Arc::new(RwLock::new(map)),
        }
    }

    /// Insert or replace a record
    pub fn insert(&self, record: T) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        records.insert(record.id(), record);

        Ok(())
    }

    /// Remove a record, returning it if it existed
    pub fn remove(&self, id: &Uuid) -> Result<Option<T>> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(records.remove(id))
    }

    /// Remove every record matching `filter`, returning how many went
    pub fn remove_where(&self, filter: &Filter) -> Result<usize> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let before = records.len();
        records.retain(|_, record| !filter.matches(&*record));

        Ok(before - records.len())
    }

    pub fn len(&self) -> Result<usize> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl<T: Record> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> DocumentStore<T> for InMemoryStore<T> {
    async fn find(&self, query: &FindQuery) -> Result<Vec<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let field = query.sort_field.as_str();
        // rows without a key sort first; the paginator rejects them
        let mut rows: Vec<(Option<String>, T)> = records
            .values()
            .filter(|record| query.filter.matches(*record))
            .map(|record| (record.sort_key(field), record.clone()))
            .collect();
        drop(records);

        rows.sort_by(|(ka, a), (kb, b)| {
            let ascending = ka
                .as_deref()
                .map(str::as_bytes)
                .cmp(&kb.as_deref().map(str::as_bytes))
                .then(a.id().cmp(&b.id()));
            match query.order {
                SortOrder::Ascending => ascending,
                SortOrder::Descending => ascending.reverse(),
            }
        });
        rows.truncate(query.limit);

        Ok(rows.into_iter().map(|(_, record)| record).collect())
    }

    async fn count(&self, filter: &Filter) -> Result<u64> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.values().filter(|record| filter.matches(*record)).count() as u64)
    }
}
