use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors raised while issuing or checking access tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no access token provided")]
    MissingToken,

    #[error("invalid access token: {0}")]
    InvalidToken(String),

    #[error("failed to sign access token: {0}")]
    Signing(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::MissingToken | AuthError::InvalidToken(_) => {
                tracing::debug!(error = %self, "Rejected request");
                (StatusCode::UNAUTHORIZED, "unauthorized access")
            }
            AuthError::Signing(_) => {
                tracing::error!("Auth error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_are_unauthorized() {
        let missing = AuthError::MissingToken.into_response();
        let invalid = AuthError::InvalidToken("ExpiredSignature".to_string()).into_response();

        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(invalid.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_signing_failure_is_internal() {
        let response = AuthError::Signing("bad key".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
