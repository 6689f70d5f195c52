//! Keyset pagination engine
//!
//! [`Paginator::fetch`] reads one page through a keyset window;
//! [`Paginator::fetch_after_mutation`] and [`Paginator::recover`] rebuild a
//! page whose window was emptied by a concurrent removal.

pub mod fetcher;
pub mod recovery;

pub use fetcher::Paginator;
pub use recovery::{Recovery, RecoveryStrategy};
