//! Request types for event operations.
//!
//! Pure data plus the parsing that splits a raw JSON body into its parts.

use serde_json::{Map, Value};

use super::error::EventError;
use super::types::{EventPayload, ID_FIELD};
use crate::recurrence::RecurrenceDescriptor;

/// A create-event body: the event fields interleaved with its repeat rule.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateEventRequest {
    pub payload: EventPayload,
    pub descriptor: RecurrenceDescriptor,
}

impl CreateEventRequest {
    /// Splits a JSON body into the repeat rule and the event payload.
    ///
    /// The recurrence fields are removed before the payload is parsed, so
    /// they are never copied into stored occurrences.
    pub fn from_document(mut document: Map<String, Value>) -> Result<Self, EventError> {
        let mut rule = Map::new();
        for field in RecurrenceDescriptor::FIELDS {
            if let Some(value) = document.remove(field) {
                rule.insert(field.to_string(), value);
            }
        }

        let descriptor = serde_json::from_value(Value::Object(rule))
            .map_err(|e| EventError::InvalidPayload(e.to_string()))?;
        let payload = EventPayload::from_document(document)?;

        Ok(Self {
            payload,
            descriptor,
        })
    }
}

/// Removes the identity key from an update body, returning the fields to set.
pub fn strip_identity(mut updates: Map<String, Value>) -> Map<String, Value> {
    updates.remove(ID_FIELD);
    updates
}
