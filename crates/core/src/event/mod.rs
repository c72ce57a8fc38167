mod error;
mod operations;
mod requests;
mod types;

pub use error::EventError;
pub use operations::{apply_updates, filter_events_by_email, parse_event_id};
pub use requests::{strip_identity, CreateEventRequest};
pub use types::{EventPayload, StoredEvent, ID_FIELD};
