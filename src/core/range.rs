//! "Showing X–Y of N" labels
//!
//! Keyset pages have no numeric offset, so list views carry a running
//! `start` index in their links and derive labels from it. This is display
//! math only. If the page size changes mid-navigation the labels drift; the
//! rows themselves stay correct.

use crate::core::page::PageSize;
use serde::Serialize;

/// Display range of one page and the `start` values for its neighbour links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRange {
    pub start: usize,
    pub end: usize,
    pub prev_start: usize,
    pub next_start: usize,
}

impl PageRange {
    /// `start` is 1-based; `shown` is how many rows the page actually holds.
    ///
    /// `start` comes from the client, so the arithmetic saturates instead of
    /// overflowing.
    pub fn compute(start: usize, shown: usize, page_size: PageSize) -> Self {
        let start = start.max(1);
        let (first, last) = if shown == 0 {
            (0, 0)
        } else {
            (start, start.saturating_add(shown - 1))
        };
        Self {
            start: first,
            end: last,
            prev_start: start.saturating_sub(page_size.get()).max(1),
            next_start: start.saturating_add(shown),
        }
    }
}

/// Parse a `start` query value: missing, invalid or zero means 1
pub fn parse_start(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|n| *n >= 1)
        .unwrap_or(1)
}
