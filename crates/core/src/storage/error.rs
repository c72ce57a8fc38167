use thiserror::Error;
use uuid::Uuid;

use crate::event::EventError;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl RepositoryError {
    /// A merged document that no longer parses as an event.
    pub fn invalid_event(err: EventError) -> Self {
        Self::InvalidData(err.to_string())
    }

    /// Shorthand for a missing event.
    pub fn event_not_found(id: Uuid) -> Self {
        Self::NotFound {
            entity_type: "Event",
            id: id.to_string(),
        }
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
