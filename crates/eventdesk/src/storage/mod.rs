//! Storage backend implementations.
//!
//! This module provides concrete implementations of the repository traits
//! defined in `eventdesk_core::storage`. The implementations are selected
//! at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): in-process storage, lost on restart
//! - `sqlite`: SQLite storage backend using `rusqlite` and `tokio-rusqlite`
//!
//! These features are mutually exclusive - only one storage backend can be
//! enabled at a time.
//!
//! # Examples
//!
//! Build with SQLite:
//! ```bash
//! cargo build -p eventdesk --no-default-features --features sqlite
//! ```

// Compile-time checks for mutual exclusivity
#[cfg(all(feature = "sqlite", feature = "inmemory"))]
compile_error!(
    "Features 'sqlite' and 'inmemory' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "sqlite", feature = "inmemory")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'sqlite' feature. \
    Example: cargo build -p eventdesk --no-default-features --features sqlite"
);

#[cfg(any(feature = "inmemory", test))]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;
