//! Liveness endpoints.
//!
//! - `/` - Plain-text banner
//! - `/livez` - Basic liveness probe (immediate 200, no checks)

use axum::http::StatusCode;

/// GET / - Plain-text banner.
pub async fn banner() -> &'static str {
    "eventdesk is running"
}

/// GET /livez - Basic liveness probe.
///
/// Returns 200 immediately. Does not touch storage.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}
