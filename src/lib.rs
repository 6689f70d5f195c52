//! # Keyset Pager
//!
//! Cursor-based (keyset) pagination over document collections.
//!
//! ## Features
//!
//! - **Opaque Cursors**: URL-safe tokens encoding a `(sort key, id)` position
//! - **Stable Ordering**: rows sharing a sort key are ordered by id in both directions
//! - **Bidirectional Paging**: over-fetch by one row to detect further pages without a second query
//! - **Search-Safe Windows**: keyset windows never merge into a search's `OR` clause
//! - **Folded Keys**: case and diacritic-insensitive sort and prefix search
//! - **Recovery**: a list whose window was emptied by a removal falls back to a nearby page
//! - **Pluggable Storage**: in-memory store built in, MongoDB behind `mongodb_backend`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use keyset::prelude::*;
//!
//! const NAME_CI: SortField = SortField::from_static("name_ci");
//!
//! let paginator = Paginator::new(Arc::new(store), &PagingConfig::default());
//!
//! // GET /groups?after=...
//! let request = PageRequest::new(Filter::eq("org", org_id), NAME_CI, PageSize::DEFAULT)
//!     .with_keyset(params.keyset());
//! let page = paginator.fetch(&request).await?;
//!
//! // "next" link
//! if page.has_next {
//!     let next = page.last_token();
//! }
//! ```

pub mod config;
pub mod core;
pub mod paging;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Types ===
    pub use crate::core::{
        cursor::Cursor,
        error::{ConfigError, PageError, PageResultOf, QueryError, RequestError},
        field::FieldValue,
        filter::{CmpOp, Filter},
        fold::{PrefixRange, fold},
        page::{PageRequest, PageResult, PageSize},
        query::{ListQuery, ListResponse, PaginationMeta},
        range::{PageRange, parse_start},
        record::{ID_FIELD, Record},
        search::{
            SearchPlan, email_pivot_no_org_ok, email_pivot_ok, fold_email, name_or_email_filter,
            prefix_filter,
        },
        store::{DocumentStore, FindQuery, SortOrder},
        window::{Bound, Direction, KeysetConfig, SortField, compose, keyset_window},
    };

    // === Engine ===
    pub use crate::paging::{Paginator, Recovery, RecoveryStrategy};

    // === Storage ===
    pub use crate::storage::InMemoryStore;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoStore;

    // === Config ===
    pub use crate::config::PagingConfig;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use std::sync::Arc;
    pub use uuid::Uuid;
}
