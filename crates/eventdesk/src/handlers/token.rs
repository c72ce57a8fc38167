//! Access token issuance.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::{json, Map, Value};

use eventdesk_core::event::EventError;

use crate::{auth::TOKEN_COOKIE, handlers::AppError, state::AppState};

/// Sign the request body into an access token cookie (POST /jwt).
///
/// The body is signed as-is; no credentials are checked.
pub async fn issue_token(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<(CookieJar, Json<Value>), AppError> {
    let Json(info) = body.map_err(|rejection| EventError::InvalidPayload(rejection.body_text()))?;

    let token = state.tokens.issue(info)?;

    let max_age = i64::try_from(state.tokens.ttl().as_secs()).unwrap_or(i64::MAX);
    let cookie = Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(state.config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age))
        .build();

    tracing::debug!("Issued access token");

    Ok((jar.add(cookie), Json(json!({ "success": true }))))
}
