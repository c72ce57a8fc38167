use serde_json::{Map, Value};
use uuid::Uuid;

use super::error::EventError;
use super::types::{EventPayload, StoredEvent, ID_FIELD};

/// Parses an event identifier from a path segment.
pub fn parse_event_id(raw: &str) -> Result<Uuid, EventError> {
    Uuid::parse_str(raw.trim()).map_err(|_| EventError::InvalidId(raw.to_string()))
}

/// Sets each field in `updates` on the event, leaving all other fields as they are.
///
/// The identity never changes. The merged document must still be a valid
/// event (parseable `start`/`end`, string `email`).
pub fn apply_updates(
    event: &StoredEvent,
    updates: Map<String, Value>,
) -> Result<StoredEvent, EventError> {
    let mut document = event.payload.to_document();
    for (key, value) in updates {
        if key != ID_FIELD {
            document.insert(key, value);
        }
    }

    let payload = EventPayload::from_document(document)?;
    Ok(StoredEvent::new(event.id, payload))
}

/// Filters events owned by `email`, keeping their order.
pub fn filter_events_by_email<'a>(events: &'a [StoredEvent], email: &str) -> Vec<&'a StoredEvent> {
    events
        .iter()
        .filter(|event| event.payload.email == email)
        .collect()
}
