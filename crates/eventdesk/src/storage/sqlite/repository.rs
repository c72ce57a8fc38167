//! SQLite repository implementation.
//!
//! Implements the repository traits from `eventdesk_core::storage` using SQLite.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio_rusqlite::Connection;
use uuid::Uuid;

use eventdesk_core::event::{apply_updates, EventPayload, StoredEvent};
use eventdesk_core::storage::{EventRepository, RepositoryError, Result};

use super::conversions::{format_datetime, payload_to_json, row_to_event};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for event documents.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    /// Runs a listing query with optional single parameter.
    async fn query_events(
        &self,
        sql: &'static str,
        param: Option<String>,
    ) -> Result<Vec<StoredEvent>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(sql).map_err(wrap_err)?;
                let rows = match &param {
                    Some(value) => stmt.query_map([value], row_to_event),
                    None => stmt.query_map([], row_to_event),
                }
                .map_err(wrap_err)?;

                let mut events = Vec::new();
                for row_result in rows {
                    events.push(row_result.map_err(wrap_err)?);
                }
                Ok(events)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Event"))
    }
}

#[async_trait]
impl EventRepository for SqliteRepository {
    async fn list_events_by_email(&self, email: &str) -> Result<Vec<StoredEvent>> {
        self.query_events(schema::SELECT_EVENTS_BY_EMAIL, Some(email.to_string()))
            .await
    }

    async fn list_events(&self) -> Result<Vec<StoredEvent>> {
        self.query_events(schema::SELECT_ALL_EVENTS, None).await
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<StoredEvent>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_EVENT_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_event) {
                    Ok(event) => Ok(Some(event)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Event", id.to_string()))
    }

    async fn create_events(&self, payloads: &[EventPayload]) -> Result<Vec<Uuid>> {
        let mut rows = Vec::with_capacity(payloads.len());
        for payload in payloads {
            rows.push((Uuid::new_v4(), payload.email.clone(), payload_to_json(payload)?));
        }
        let ids: Vec<Uuid> = rows.iter().map(|(id, _, _)| *id).collect();
        let now = format_datetime(&Utc::now());

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                {
                    let mut stmt = tx.prepare(schema::INSERT_EVENT).map_err(wrap_err)?;
                    for (id, email, document) in &rows {
                        stmt.execute(rusqlite::params![id.to_string(), email, document, now])
                            .map_err(wrap_err)?;
                    }
                }
                tx.commit().map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Event"))?;

        Ok(ids)
    }

    async fn merge_event(&self, id: Uuid, updates: Map<String, Value>) -> Result<StoredEvent> {
        let id_str = id.to_string();
        let updated_at = format_datetime(&Utc::now());

        // The outer Result carries SQLite failures, the inner one domain failures.
        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                let existing =
                    match tx.query_row(schema::SELECT_EVENT_BY_ID, [&id_str], row_to_event) {
                        Ok(event) => event,
                        Err(rusqlite::Error::QueryReturnedNoRows) => {
                            return Ok(Err(RepositoryError::event_not_found(id)));
                        }
                        Err(e) => return Err(wrap_err(e)),
                    };

                let merged = match apply_updates(&existing, updates) {
                    Ok(merged) => merged,
                    Err(e) => return Ok(Err(RepositoryError::invalid_event(e))),
                };
                let document = match payload_to_json(&merged.payload) {
                    Ok(document) => document,
                    Err(e) => return Ok(Err(e)),
                };

                tx.execute(
                    schema::UPDATE_EVENT,
                    rusqlite::params![id_str, merged.payload.email, document, updated_at],
                )
                .map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;

                Ok(Ok(merged))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Event", id.to_string()))?
    }

    async fn delete_event(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        let rows_affected = self
            .conn
            .call(move |conn| {
                conn.execute(schema::DELETE_EVENT, [&id_str])
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Event", id.to_string()))?;

        if rows_affected == 0 {
            return Err(RepositoryError::event_not_found(id));
        }

        Ok(())
    }
}
