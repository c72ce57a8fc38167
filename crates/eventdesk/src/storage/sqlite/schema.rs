//! SQLite schema definitions and SQL query constants.
//!
//! This module contains all SQL statements used by the SQLite repository,
//! following the Functional Core pattern - pure data, no I/O.
//!
//! Events are stored as JSON documents. `email` is duplicated into its own
//! column so owner lookups can use an index; `rowid` preserves insertion order.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS events (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL,
    document TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_events_email ON events(email);
"#;

pub const INSERT_EVENT: &str = r#"
INSERT INTO events (id, email, document, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?4)
"#;

pub const SELECT_EVENT_BY_ID: &str = r#"
SELECT id, document
FROM events
WHERE id = ?1
"#;

pub const SELECT_EVENTS_BY_EMAIL: &str = r#"
SELECT id, document
FROM events
WHERE email = ?1
ORDER BY rowid
"#;

pub const SELECT_ALL_EVENTS: &str = r#"
SELECT id, document
FROM events
ORDER BY rowid
"#;

pub const UPDATE_EVENT: &str = r#"
UPDATE events
SET email = ?2, document = ?3, updated_at = ?4
WHERE id = ?1
"#;

pub const DELETE_EVENT: &str = r#"
DELETE FROM events
WHERE id = ?1
"#;
