//! Application state with repository-based storage.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. The storage backend behind the repository trait object
//! is chosen via feature flags.

use std::sync::Arc;

use axum::extract::FromRef;

use eventdesk_core::storage::EventRepository;

use crate::{auth::TokenService, config::Config};

/// Shared application state.
///
/// This is cloned for each request handler and contains shared resources
/// including the repository trait object for database access.
#[derive(Clone)]
pub struct AppState {
    /// Event repository.
    pub event_repo: Arc<dyn EventRepository>,
    /// Access token signing and verification.
    pub tokens: Arc<TokenService>,
    /// Loaded configuration.
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates a new AppState with the given repository and configuration.
    pub fn build(event_repo: Arc<dyn EventRepository>, config: Config) -> Self {
        let tokens = Arc::new(TokenService::new(&config.jwt_secret, config.token_ttl()));

        Self {
            event_repo,
            tokens,
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::*;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage.
        pub async fn new(config: Config) -> Result<Self, anyhow::Error> {
            let sqlite_repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            tracing::info!(path = %config.sqlite_path, "Using SQLite storage");

            Ok(Self::build(sqlite_repo, config))
        }
    }
}

#[cfg(feature = "inmemory")]
mod inmemory {
    use super::*;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage.
        pub async fn new(config: Config) -> Result<Self, anyhow::Error> {
            tracing::warn!("Using in-memory storage, events are lost on restart");

            Ok(Self::build(Arc::new(InMemoryRepository::new()), config))
        }
    }
}

#[cfg(test)]
mod test_support {
    use super::*;
    use crate::storage::inmemory::InMemoryRepository;

    impl Default for AppState {
        fn default() -> Self {
            Self::build(
                Arc::new(InMemoryRepository::new()),
                Config::new("test-secret"),
            )
        }
    }
}
