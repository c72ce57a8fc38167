//! Functional core for eventdesk.
//!
//! Pure types and functions with no I/O: event documents, recurrence
//! expansion, repository traits and error mappings. The `eventdesk` binary
//! provides the HTTP shell and storage backends on top of this crate.

pub mod event;
pub mod recurrence;
pub mod serde;
pub mod storage;
