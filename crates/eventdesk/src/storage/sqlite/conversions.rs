//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without database access.

use chrono::{DateTime, Utc};
use eventdesk_core::event::{EventPayload, StoredEvent};
use eventdesk_core::storage::RepositoryError;
use rusqlite::Row;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Convert a SQLite row to a StoredEvent.
///
/// Expected columns: id, document
pub fn row_to_event(row: &Row) -> rusqlite::Result<StoredEvent> {
    let id: String = row.get(0)?;
    let document: String = row.get(1)?;

    Ok(StoredEvent::new(
        parse_uuid(&id)?,
        json_to_payload_internal(&document)?,
    ))
}

/// Serialize a payload into the JSON text stored in the `document` column.
pub fn payload_to_json(payload: &EventPayload) -> Result<String, RepositoryError> {
    serde_json::to_string(&Value::Object(payload.to_document()))
        .map_err(|e| RepositoryError::Serialization(e.to_string()))
}

/// Parse the `document` column back into a payload.
pub fn json_to_payload(json: &str) -> Result<EventPayload, RepositoryError> {
    let document: Map<String, Value> =
        serde_json::from_str(json).map_err(|e| RepositoryError::Serialization(e.to_string()))?;
    EventPayload::from_document(document).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

fn json_to_payload_internal(json: &str) -> rusqlite::Result<EventPayload> {
    json_to_payload(json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}
