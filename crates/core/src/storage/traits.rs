use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::event::{EventPayload, StoredEvent};

use super::Result;

/// Repository for event documents.
///
/// Listing operations return events in insertion order.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Gets all events owned by `email`.
    async fn list_events_by_email(&self, email: &str) -> Result<Vec<StoredEvent>>;

    /// Gets every stored event.
    async fn list_events(&self) -> Result<Vec<StoredEvent>>;

    /// Gets an event by its ID.
    async fn get_event(&self, id: Uuid) -> Result<Option<StoredEvent>>;

    /// Inserts all payloads or none of them.
    ///
    /// Returns the assigned IDs in input order.
    async fn create_events(&self, payloads: &[EventPayload]) -> Result<Vec<Uuid>>;

    /// Sets each field in `updates` on an existing event and returns the result.
    ///
    /// Read, merge and write happen as one step, so concurrent merges into
    /// the same event never drop each other's fields. Fails with `NotFound`
    /// for an unknown ID and `InvalidData` when the merged document is no
    /// longer a valid event.
    async fn merge_event(&self, id: Uuid, updates: Map<String, Value>) -> Result<StoredEvent>;

    /// Deletes an event by its ID.
    async fn delete_event(&self, id: Uuid) -> Result<()>;
}
