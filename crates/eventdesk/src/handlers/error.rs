use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use eventdesk_core::event::EventError;
use eventdesk_core::recurrence::RecurrenceError;
use eventdesk_core::storage::{
    event_error_to_status_code, recurrence_error_to_status_code, repository_error_to_status_code,
    RepositoryError,
};

use crate::auth::AuthError;

/// Application error type that wraps `anyhow::Error`.
///
/// Core error types are recovered by downcasting and mapped to their status
/// codes. Anything else is a 500.
pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        if let Some(err) = self.0.downcast_ref::<RepositoryError>() {
            let message = match err {
                RepositoryError::NotFound { entity_type, .. } => format!("{entity_type} not found"),
                RepositoryError::InvalidData(detail) => detail.clone(),
                other => other.to_string(),
            };
            return (status(repository_error_to_status_code(err)), message);
        }
        if let Some(err) = self.0.downcast_ref::<EventError>() {
            return (status(event_error_to_status_code(err)), err.to_string());
        }
        if let Some(err) = self.0.downcast_ref::<RecurrenceError>() {
            return (status(recurrence_error_to_status_code(err)), err.to_string());
        }

        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string())
    }
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let err = match self.0.downcast::<AuthError>() {
            Ok(auth) => return auth.into_response(),
            Err(err) => AppError(err),
        };

        let (status_code, message) = err.status_and_message();

        let message = if status_code.is_server_error() {
            tracing::error!(error = %err.0, "Application error");
            "Internal server error".to_string()
        } else {
            tracing::warn!(status = %status_code, message = %message, "API error");
            message
        };

        (status_code, Json(json!({ "message": message }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
