//! Orchestrator error taxonomy
//!
//! Two failure classes reach callers: bad input (`InvalidArgument`, never
//! retried) and store trouble (`DataAccess`, carries the store error). A
//! query that matches nothing is empty output, not an error.

use fraudval_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Data access failed: {0}")]
    DataAccess(#[from] StoreError),

    #[error("Engine configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, ValidationError>;
