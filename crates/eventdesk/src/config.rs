use std::{env, time::Duration};

use thiserror::Error;

/// Local frontend dev server and the deployed frontend.
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,https://irenity0-control-panel.vercel.app";

/// Errors raised while loading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// HS256 signing secret for access tokens (required)
    pub jwt_secret: String,
    /// Token lifetime in seconds (default: 7200)
    pub token_ttl_seconds: u64,
    /// Whether the token cookie carries the `Secure` attribute (default: false)
    pub cookie_secure: bool,
    /// Origins allowed to make credentialed cross-origin requests
    pub cors_origins: Vec<String>,
    /// Upper bound for `recurrenceCount` (default: 52)
    pub max_recurrence_count: u32,
    /// Path to SQLite database file (default: "eventdesk.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `JWT_ACCESS_SECRET` - Token signing secret (required)
    /// - `TOKEN_TTL_SECONDS` - Token lifetime in seconds (default: 7200)
    /// - `COOKIE_SECURE` - Mark the token cookie `Secure` (default: false)
    /// - `CORS_ORIGINS` - Comma separated origins
    ///   (default: "http://localhost:5173,https://irenity0-control-panel.vercel.app")
    /// - `MAX_RECURRENCE_COUNT` - Maximum recurrence count (default: 52)
    /// - `SQLITE_PATH` - SQLite database path (default: "eventdesk.db")
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_ACCESS_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::Missing("JWT_ACCESS_SECRET"))?;

        Ok(Self {
            jwt_secret,
            token_ttl_seconds: lookup("TOKEN_TTL_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(7_200),
            cookie_secure: lookup("COOKIE_SECURE")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            cors_origins: parse_origins(
                &lookup("CORS_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string()),
            ),
            max_recurrence_count: lookup("MAX_RECURRENCE_COUNT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(52),
            sqlite_path: lookup("SQLITE_PATH").unwrap_or_else(|| "eventdesk.db".to_string()),
        })
    }

    /// Configuration with defaults and the given secret.
    #[cfg(test)]
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl_seconds: 7_200,
            cookie_secure: false,
            cors_origins: parse_origins(DEFAULT_CORS_ORIGINS),
            max_recurrence_count: 52,
            sqlite_path: "eventdesk.db".to_string(),
        }
    }

    /// Get the token lifetime as a Duration.
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_seconds)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}
