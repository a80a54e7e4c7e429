//! Error types for the core domain model

use chrono::NaiveDate;
use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid window: start {start} is after end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },

    #[error("Unknown decision code: {0}")]
    UnknownDecisionCode(String),

    #[error("Unknown rule kind: {0}")]
    UnknownRuleKind(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
