//! Typed error handling for the pagination engine
//!
//! Callers get a single [`PageError`] from every engine operation and can
//! match on its category instead of dealing with `anyhow::Error`.
//!
//! # Error Categories
//!
//! - [`QueryError`]: a store call failed or hit its deadline (retryable), or
//!   returned a row the list cannot be ordered by
//! - [`RequestError`]: the caller asked for something the engine cannot serve
//! - [`ConfigError`]: configuration could not be loaded or is invalid
//!
//! A malformed cursor is *not* an error: it is dropped and the request is
//! served from the first page.
//!
//! # Example
//!
//! ```rust,ignore
//! match paginator.fetch(&request).await {
//!     Ok(page) => render(page),
//!     Err(err) if err.is_retryable() => retry_later(),
//!     Err(err) => return err.into_response(),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// The main error type for the pagination engine
#[derive(Debug)]
pub enum PageError {
    /// Store query failures (including timeouts)
    Query(QueryError),

    /// Invalid page requests
    Request(RequestError),

    /// Configuration errors
    Config(ConfigError),

    /// Internal engine errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::Query(e) => write!(f, "{}", e),
            PageError::Request(e) => write!(f, "{}", e),
            PageError::Config(e) => write!(f, "{}", e),
            PageError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for PageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PageError::Query(e) => Some(e),
            PageError::Request(e) => Some(e),
            PageError::Config(e) => Some(e),
            PageError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl PageError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            PageError::Query(e) => e.status_code(),
            PageError::Request(_) => StatusCode::BAD_REQUEST,
            PageError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PageError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            PageError::Query(e) => e.error_code(),
            PageError::Request(e) => e.error_code(),
            PageError::Config(_) => "CONFIG_ERROR",
            PageError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether resubmitting the same request (same cursors) may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            PageError::Query(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            PageError::Query(QueryError::TimedOut {
                operation,
                timeout_ms,
            }) => Some(serde_json::json!({
                "operation": operation,
                "timeout_ms": timeout_ms,
                "retryable": true
            })),
            PageError::Query(QueryError::Failed { operation, .. }) => Some(serde_json::json!({
                "operation": operation,
                "retryable": true
            })),
            _ => None,
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Query Errors
// =============================================================================

/// A store query did not produce a usable result.
///
/// Reads never partially mutate anything, so failures and timeouts are
/// retryable and the cursors that produced the request stay valid.
#[derive(Debug)]
pub enum QueryError {
    /// The store reported a failure (connection loss, bad response, ...)
    Failed {
        operation: String,
        message: String,
    },

    /// The store did not answer before the configured deadline
    TimedOut {
        operation: String,
        timeout_ms: u64,
    },

    /// A returned row has no string value for the sort field
    MissingSortKey {
        field: String,
        id: Uuid,
    },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::Failed { operation, message } => {
                write!(f, "Query '{}' failed: {}", operation, message)
            }
            QueryError::TimedOut {
                operation,
                timeout_ms,
            } => {
                write!(f, "Query '{}' timed out after {}ms", operation, timeout_ms)
            }
            QueryError::MissingSortKey { field, id } => {
                write!(f, "Record {} has no sort key '{}'", id, field)
            }
        }
    }
}

impl std::error::Error for QueryError {}

impl QueryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            QueryError::Failed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            QueryError::TimedOut { .. } => StatusCode::SERVICE_UNAVAILABLE,
            QueryError::MissingSortKey { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            QueryError::Failed { .. } => "QUERY_FAILED",
            QueryError::TimedOut { .. } => "QUERY_TIMED_OUT",
            QueryError::MissingSortKey { .. } => "QUERY_MISSING_SORT_KEY",
        }
    }

    pub fn is_retryable(&self) -> bool {
        !matches!(self, QueryError::MissingSortKey { .. })
    }
}

impl From<QueryError> for PageError {
    fn from(err: QueryError) -> Self {
        PageError::Query(err)
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to the shape of a page request
#[derive(Debug)]
pub enum RequestError {
    /// Page size must be at least one row
    InvalidPageSize {
        value: usize,
    },

    /// Sort field name is empty or reserved
    InvalidSortField {
        value: String,
        message: String,
    },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::InvalidPageSize { value } => {
                write!(f, "Invalid page size {}: must be at least 1", value)
            }
            RequestError::InvalidSortField { value, message } => {
                write!(f, "Invalid sort field '{}': {}", value, message)
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidPageSize { .. } => "INVALID_PAGE_SIZE",
            RequestError::InvalidSortField { .. } => "INVALID_SORT_FIELD",
        }
    }
}

impl From<RequestError> for PageError {
    fn from(err: RequestError) -> Self {
        PageError::Request(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// IO error while reading configuration
    IoError {
        path: String,
        message: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::IoError { path, message } => {
                write!(f, "IO error reading '{}': {}", path, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for PageError {
    fn from(err: ConfigError) -> Self {
        PageError::Config(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for engine operations
pub type PageResultOf<T> = Result<T, PageError>;
