//! Re-displaying a list after a mutation emptied its window
//!
//! A page anchored at `after = X` goes empty when every row that followed
//! `X` is removed. Instead of showing a dead end, the list falls back to the
//! nearest page ending at or before `X`:
//!
//! 1. read backward with an inclusive bound at `X`, `page_size + 1` rows
//! 2. probe one row strictly after the last recovered row for `has_next`
//! 3. if that is empty too, serve the first page
//!
//! Flags of a recovered page are always recomputed against the current
//! data, never carried over from the request.

use crate::core::cursor::Cursor;
use crate::core::error::PageResultOf;
use crate::core::page::{PageRequest, PageResult, cursor_of, trim_overflow};
use crate::core::record::Record;
use crate::core::store::{DocumentStore, FindQuery};
use crate::core::window::{Bound, Direction, KeysetConfig, compose, keyset_window};
use crate::paging::fetcher::Paginator;
use serde::Serialize;

/// How a re-displayed page was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryStrategy {
    /// The requested window still had rows
    NotNeeded,
    /// Backward read ending at the stale anchor
    InclusiveBackward,
    /// First page of the list
    ResetToFirst,
}

/// A page plus the way it was obtained
#[derive(Debug, Clone, Serialize)]
pub struct Recovery<T> {
    pub page: PageResult<T>,
    pub strategy: RecoveryStrategy,
}

impl<T> Recovery<T> {
    pub fn recovered(&self) -> bool {
        self.strategy != RecoveryStrategy::NotNeeded
    }
}

impl<T: Record, S: DocumentStore<T>> Paginator<T, S> {
    /// Fetch `request`, recovering only if the page came back empty.
    ///
    /// Meant for handlers that remove a row and immediately re-render the
    /// same list position.
    pub async fn fetch_after_mutation(
        &self,
        request: &PageRequest,
    ) -> PageResultOf<Recovery<T>> {
        let page = self.fetch(request).await?;
        if !page.is_empty() {
            return Ok(Recovery {
                page,
                strategy: RecoveryStrategy::NotNeeded,
            });
        }
        if request.anchor().is_none() && request.direction() == Direction::Forward {
            // already the first page: nothing left to fall back to
            return Ok(Recovery {
                page,
                strategy: RecoveryStrategy::ResetToFirst,
            });
        }
        self.recover(request).await
    }

    /// Rebuild a page for a request whose window is (assumed) empty.
    ///
    /// Forward-anchored requests go through the inclusive backward read;
    /// everything else, and an empty backward read, resets to the first page.
    pub async fn recover(&self, request: &PageRequest) -> PageResultOf<Recovery<T>> {
        if let (Direction::Forward, Some(anchor)) = (request.direction(), request.anchor()) {
            let page = self.fetch_inclusive_backward(request, anchor).await?;
            if !page.is_empty() {
                tracing::info!(
                    sort_field = %request.sort_field,
                    shown = page.len(),
                    has_prev = page.has_prev,
                    has_next = page.has_next,
                    "recovered page ending at stale cursor"
                );
                return Ok(Recovery {
                    page,
                    strategy: RecoveryStrategy::InclusiveBackward,
                });
            }
        }

        tracing::info!(
            sort_field = %request.sort_field,
            direction = ?request.direction(),
            anchored = request.anchor().is_some(),
            "reset to first page"
        );
        let first = request.clone().with_keyset(KeysetConfig::first());
        let page = self.fetch(&first).await?;
        Ok(Recovery {
            page,
            strategy: RecoveryStrategy::ResetToFirst,
        })
    }

    async fn fetch_inclusive_backward(
        &self,
        request: &PageRequest,
        anchor: &Cursor,
    ) -> PageResultOf<PageResult<T>> {
        let total = self.count(&request.base_filter).await?;

        let window = keyset_window(
            &request.sort_field,
            Direction::Backward,
            anchor,
            Bound::Inclusive,
        );
        let query = FindQuery {
            filter: compose(request.base_filter.clone(), Some(window)),
            sort_field: request.sort_field.clone(),
            order: Direction::Backward.sort_order(),
            limit: request.page_size.limit_plus_one(),
        };
        let mut rows = self.find("find_inclusive_backward", &query).await?;
        rows.reverse();
        let has_prev = trim_overflow(&mut rows, Direction::Backward, request.page_size);

        let has_next = match rows.last().and_then(|last| cursor_of(last, &request.sort_field)) {
            Some(after) => self.probe_next(request, &after).await?,
            None => false,
        };

        Ok(PageResult::from_rows(
            rows,
            &request.sort_field,
            has_prev,
            has_next,
            total,
        ))
    }

    /// One-row lookahead strictly after `after`
    async fn probe_next(&self, request: &PageRequest, after: &Cursor) -> PageResultOf<bool> {
        let window = keyset_window(
            &request.sort_field,
            Direction::Forward,
            after,
            Bound::Exclusive,
        );
        let query = FindQuery {
            filter: compose(request.base_filter.clone(), Some(window)),
            sort_field: request.sort_field.clone(),
            order: Direction::Forward.sort_order(),
            limit: 1,
        };
        let rows = self.find("lookahead", &query).await?;
        Ok(!rows.is_empty())
    }
}
