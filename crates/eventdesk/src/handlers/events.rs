//! Event CRUD handlers.
//!
//! These handlers use the repository trait object for database access.
//! Creating events expands the submitted recurrence rule first, then
//! persists every occurrence in one batch.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use eventdesk_core::event::{parse_event_id, strip_identity, CreateEventRequest, EventError, StoredEvent};
use eventdesk_core::recurrence::generate;
use eventdesk_core::storage::RepositoryError;

use crate::{auth::VerifiedToken, handlers::AppError, state::AppState};

/// Query parameters for listing an owner's events.
#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    pub email: Option<String>,
}

/// Unwraps a JSON object body, turning extractor failures into a 400.
fn object_body(
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Map<String, Value>, EventError> {
    body.map(|Json(document)| document)
        .map_err(|rejection| EventError::InvalidPayload(rejection.body_text()))
}

/// List events for an owner (GET /events?email=).
pub async fn list_events_by_email(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Response, AppError> {
    let Some(email) = query.email.filter(|email| !email.is_empty()) else {
        tracing::warn!("List events without email");
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Email query param is required" })),
        )
            .into_response());
    };

    let events = state.event_repo.list_events_by_email(&email).await?;
    tracing::debug!(%email, count = events.len(), "Listed events");

    Ok(Json(events).into_response())
}

/// List every event (GET /all/events).
pub async fn list_all_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredEvent>>, AppError> {
    let events = state.event_repo.list_events().await?;
    Ok(Json(events))
}

/// Get a single event (GET /events/{id}).
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoredEvent>, AppError> {
    let id = parse_event_id(&id)?;

    let event = state
        .event_repo
        .get_event(id)
        .await?
        .ok_or_else(|| RepositoryError::event_not_found(id))?;

    Ok(Json(event))
}

/// Create an event and its recurrences (POST /events).
///
/// Requires a valid access token. Nothing is written when the rule
/// expands to no occurrences.
pub async fn create_events(
    VerifiedToken(claims): VerifiedToken,
    State(state): State<AppState>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let request = CreateEventRequest::from_document(object_body(body)?)?;
    request
        .descriptor
        .validate(state.config.max_recurrence_count)?;

    let occurrences = generate(
        Utc::now().naive_utc(),
        &request.payload,
        &request.descriptor,
    )?;

    let ids = state.event_repo.create_events(&occurrences).await?;

    tracing::info!(
        email = %request.payload.email,
        subject = ?claims.info.get("email"),
        recurrence = ?request.descriptor.recurrence,
        count = ids.len(),
        "Created events"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "insertedCount": ids.len(),
            "insertedIds": ids,
        })),
    ))
}

/// Merge fields into an event (PATCH /events/{id}).
pub async fn patch_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let id = parse_event_id(&id)?;
    let updates = strip_identity(object_body(body)?);
    if updates.is_empty() {
        return Err(EventError::EmptyUpdate.into());
    }

    update_event_impl(&state, id, updates).await
}

/// Merge fields into an event (PUT /events/{id}).
///
/// Same as PATCH, but an empty body is accepted and changes nothing.
pub async fn put_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let id = parse_event_id(&id)?;
    let updates = strip_identity(object_body(body)?);

    update_event_impl(&state, id, updates).await
}

async fn update_event_impl(
    state: &AppState,
    id: uuid::Uuid,
    updates: Map<String, Value>,
) -> Result<Json<Value>, AppError> {
    let fields: Vec<String> = updates.keys().cloned().collect();
    state.event_repo.merge_event(id, updates).await?;

    tracing::info!(%id, ?fields, "Updated event");
    Ok(Json(json!({ "message": "Event updated successfully" })))
}

/// Delete an event (DELETE /events/{id}).
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_event_id(&id)?;

    state.event_repo.delete_event(id).await?;

    tracing::info!(%id, "Deleted event");
    Ok(Json(json!({ "message": "Event deleted successfully" })))
}
