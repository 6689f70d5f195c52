//! Page fetching over a [`DocumentStore`]
//!
//! One fetch is two store calls: a count over the base filter and a read of
//! `page_size + 1` rows through the keyset window. The extra row only tells
//! whether another page exists in the fetch direction; it is never shown.

use crate::config::PagingConfig;
use crate::core::error::{PageResultOf, QueryError};
use crate::core::filter::Filter;
use crate::core::page::{PageRequest, PageResult, boundary_flags, trim_overflow};
use crate::core::record::Record;
use crate::core::store::{DocumentStore, FindQuery};
use crate::core::window::{Direction, compose};
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

/// Keyset pagination engine for records of type `T` held in store `S`.
///
/// The paginator is read-only and keeps no state between calls: everything
/// a follow-up request needs travels in its cursors.
///
/// # Example
///
/// ```rust,ignore
/// let paginator = Paginator::new(Arc::new(store), &PagingConfig::default());
/// let request = PageRequest::new(scope, SortField::from_static("name_ci"), PageSize::DEFAULT)
///     .with_tokens(params.before.as_deref(), params.after.as_deref());
/// let page = paginator.fetch(&request).await?;
/// ```
pub struct Paginator<T, S> {
    store: Arc<S>,
    query_timeout: Duration,
    _record: PhantomData<fn() -> T>,
}

impl<T, S> Clone for Paginator<T, S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            query_timeout: self.query_timeout,
            _record: PhantomData,
        }
    }
}

impl<T: Record, S: DocumentStore<T>> Paginator<T, S> {
    pub fn new(store: Arc<S>, config: &PagingConfig) -> Self {
        Self::with_timeout(store, config.query_timeout())
    }

    pub fn with_timeout(store: Arc<S>, query_timeout: Duration) -> Self {
        Self {
            store,
            query_timeout,
            _record: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    /// Read one page.
    ///
    /// Rows come back in ascending `(sort_key, id)` order whatever the
    /// direction. An empty page has both flags false; use
    /// [`fetch_after_mutation`](Self::fetch_after_mutation) when the window
    /// may have been emptied by a removal.
    pub async fn fetch(&self, request: &PageRequest) -> PageResultOf<PageResult<T>> {
        let total = self.count(&request.base_filter).await?;

        let direction = request.direction();
        let query = FindQuery {
            filter: compose(
                request.base_filter.clone(),
                request.keyset.window(&request.sort_field),
            ),
            sort_field: request.sort_field.clone(),
            order: direction.sort_order(),
            limit: request.page_size.limit_plus_one(),
        };
        let mut rows = self.find("find", &query).await?;
        let fetched = rows.len();

        if direction == Direction::Backward {
            rows.reverse();
        }
        let overflow = trim_overflow(&mut rows, direction, request.page_size);
        let (has_prev, has_next) = boundary_flags(
            direction,
            request.anchor().is_some(),
            overflow,
            rows.len(),
        );

        tracing::debug!(
            sort_field = %request.sort_field,
            direction = ?direction,
            anchored = request.anchor().is_some(),
            fetched,
            shown = rows.len(),
            has_prev,
            has_next,
            total,
            "fetched page"
        );

        Ok(PageResult::from_rows(
            rows,
            &request.sort_field,
            has_prev,
            has_next,
            total,
        ))
    }

    /// Bounded store read; every returned row must carry a sort key
    pub(crate) async fn find(
        &self,
        operation: &'static str,
        query: &FindQuery,
    ) -> PageResultOf<Vec<T>> {
        let rows = self.bounded(operation, self.store.find(query)).await?;
        let field = query.sort_field.as_str();
        if let Some(row) = rows.iter().find(|r| r.sort_key(field).is_none()) {
            tracing::warn!(
                operation,
                sort_field = field,
                id = %row.id(),
                "row has no sort key"
            );
            return Err(QueryError::MissingSortKey {
                field: field.to_string(),
                id: row.id(),
            }
            .into());
        }
        Ok(rows)
    }

    pub(crate) async fn count(&self, filter: &Filter) -> PageResultOf<u64> {
        self.bounded("count", self.store.count(filter)).await
    }

    /// Run one store call under the query deadline
    async fn bounded<R>(
        &self,
        operation: &'static str,
        call: impl Future<Output = anyhow::Result<R>>,
    ) -> PageResultOf<R> {
        match tokio::time::timeout(self.query_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::warn!(operation, error = %e, "store query failed");
                Err(QueryError::Failed {
                    operation: operation.to_string(),
                    message: e.to_string(),
                }
                .into())
            }
            Err(_) => {
                let timeout_ms =
                    u64::try_from(self.query_timeout.as_millis()).unwrap_or(u64::MAX);
                tracing::warn!(operation, timeout_ms, "store query timed out");
                Err(QueryError::TimedOut {
                    operation: operation.to_string(),
                    timeout_ms,
                }
                .into())
            }
        }
    }
}
