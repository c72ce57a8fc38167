use thiserror::Error;

/// Errors that can occur when parsing or updating event documents.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Invalid ID format: {0}")]
    InvalidId(String),
    #[error("No fields provided to update")]
    EmptyUpdate,
    #[error("Invalid event: {0}")]
    InvalidPayload(String),
}
