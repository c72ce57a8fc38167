//! In-memory repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use eventdesk_core::event::{apply_updates, filter_events_by_email, EventPayload, StoredEvent};
use eventdesk_core::storage::{EventRepository, RepositoryError, Result};

/// In-memory storage backend for testing.
///
/// Events live in a `Vec` wrapped in `Arc<RwLock<_>>` so listing keeps
/// insertion order. Data is not persisted and will be lost when the
/// repository is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    events: Arc<RwLock<Vec<StoredEvent>>>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

#[async_trait]
impl EventRepository for InMemoryRepository {
    async fn list_events_by_email(&self, email: &str) -> Result<Vec<StoredEvent>> {
        let events = self.events.read().await;
        Ok(filter_events_by_email(&events, email)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn list_events(&self) -> Result<Vec<StoredEvent>> {
        let events = self.events.read().await;
        Ok(events.clone())
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<StoredEvent>> {
        let events = self.events.read().await;
        Ok(events.iter().find(|e| e.id == id).cloned())
    }

    async fn create_events(&self, payloads: &[EventPayload]) -> Result<Vec<Uuid>> {
        let created: Vec<StoredEvent> = payloads.iter().cloned().map(StoredEvent::assign).collect();
        let ids = created.iter().map(|e| e.id).collect();

        let mut events = self.events.write().await;
        events.extend(created);
        Ok(ids)
    }

    async fn merge_event(&self, id: Uuid, updates: Map<String, Value>) -> Result<StoredEvent> {
        // Held across read and write so concurrent merges serialize.
        let mut events = self.events.write().await;
        let slot = events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| RepositoryError::event_not_found(id))?;

        let merged = apply_updates(slot, updates).map_err(RepositoryError::invalid_event)?;
        *slot = merged.clone();
        Ok(merged)
    }

    async fn delete_event(&self, id: Uuid) -> Result<()> {
        let mut events = self.events.write().await;
        let position = events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| RepositoryError::event_not_found(id))?;
        events.remove(position);
        Ok(())
    }
}
