//! Error types for the store layer

use thiserror::Error;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading the event streams.
///
/// Every variant is recoverable from the caller's point of view: the store
/// never returns a partial result set alongside an error.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backend unreachable or connection lost
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Query exceeded the caller-imposed deadline
    #[error("Query timed out: {0}")]
    Timeout(String),

    /// A stored row could not be decoded (bad decision code, bad timestamp)
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// The query itself was invalid (e.g. an empty rule-id set)
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Database error (when the postgres feature is enabled)
    #[cfg(feature = "postgres")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<fraudval_core::CoreError> for StoreError {
    fn from(err: fraudval_core::CoreError) -> Self {
        StoreError::MalformedRecord(err.to_string())
    }
}
