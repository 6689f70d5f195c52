//! Core module containing the fundamental types and traits of the engine

pub mod cursor;
pub mod error;
pub mod field;
pub mod filter;
pub mod fold;
pub mod page;
pub mod query;
pub mod range;
pub mod record;
pub mod search;
pub mod store;
pub mod window;

pub use cursor::{Cursor, CursorError};
pub use error::{ConfigError, PageError, PageResultOf, QueryError, RequestError};
pub use field::FieldValue;
pub use filter::{CmpOp, Filter};
pub use fold::{HIGH, PrefixRange, fold};
pub use page::{PageRequest, PageResult, PageSize};
pub use query::{ListQuery, ListResponse, PaginationMeta};
pub use range::{PageRange, parse_start};
pub use record::{ID_FIELD, Record};
pub use search::SearchPlan;
pub use store::{DocumentStore, FindQuery, SortOrder};
pub use window::{Bound, Direction, KeysetConfig, SortField};
