use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::error::EventError;
use crate::serde::format_timestamp;

/// Document key holding the identity assigned by storage.
pub const ID_FIELD: &str = "_id";

/// An event as submitted by a client, before it has an identity.
///
/// Only `start`, `end` and `email` are interpreted. Every other field is
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPayload {
    #[serde(with = "crate::serde::timestamp")]
    pub start: NaiveDateTime,
    #[serde(with = "crate::serde::timestamp")]
    pub end: NaiveDateTime,
    /// Owner of the event. Opaque to this crate.
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventPayload {
    /// Creates a payload with no extra fields.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, email: impl Into<String>) -> Self {
        Self {
            start,
            end,
            email: email.into(),
            extra: Map::new(),
        }
    }

    /// Sets an arbitrary extra field.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Parses a payload out of a JSON document.
    ///
    /// An `_id` key is discarded; identities are assigned by storage.
    pub fn from_document(mut document: Map<String, Value>) -> Result<Self, EventError> {
        document.remove(ID_FIELD);
        serde_json::from_value(Value::Object(document))
            .map_err(|e| EventError::InvalidPayload(e.to_string()))
    }

    /// Renders the payload as a flat JSON document.
    pub fn to_document(&self) -> Map<String, Value> {
        let mut document = self.extra.clone();
        document.insert("start".into(), Value::String(format_timestamp(&self.start)));
        document.insert("end".into(), Value::String(format_timestamp(&self.end)));
        document.insert("email".into(), Value::String(self.email.clone()));
        document
    }
}

/// A persisted event: a payload plus the identity storage gave it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvent {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub payload: EventPayload,
}

impl StoredEvent {
    pub fn new(id: Uuid, payload: EventPayload) -> Self {
        Self { id, payload }
    }

    /// Assigns a fresh identity to a payload.
    pub fn assign(payload: EventPayload) -> Self {
        Self::new(Uuid::new_v4(), payload)
    }

    /// Renders the event as a flat JSON document including `_id`.
    pub fn to_document(&self) -> Map<String, Value> {
        let mut document = self.payload.to_document();
        document.insert(ID_FIELD.into(), Value::String(self.id.to_string()));
        document
    }
}
