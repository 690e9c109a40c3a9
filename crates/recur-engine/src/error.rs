//! Error types for recur-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecurError {
    #[error("Invalid recurrence: {0}")]
    InvalidRecurrenceFormat(String),

    #[error("Malformed `{key}:` date: '{value}'")]
    InvalidDateFormat { key: String, value: String },

    #[error("Task has multiple `{0}:` keys")]
    DuplicateKey(String),

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),
}

pub type Result<T> = std::result::Result<T, RecurError>;
