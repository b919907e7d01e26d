//! Error types for revdb-api
//!
//! Four request-terminal error kinds plus internal failures:
//! NotFound (404), Validation (400, with field detail),
//! Unauthenticated (401, missing/invalid credential) and Forbidden
//! (403, authenticated but lacking ownership or role).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found, or not under its claimed parent (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request payload (400)
    #[error("Validation error on '{field}': {message}")]
    Validation { field: &'static str, message: String },

    /// No valid credential presented where one is required (401)
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Authenticated but lacking ownership or role (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// revdb-common error
    #[error(transparent)]
    Common(#[from] revdb_common::Error),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Shorthand for field-level validation failures
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ApiError::Validation {
            field,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                json!({ "error": { "code": "NOT_FOUND", "message": msg } }),
            ),
            ApiError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": { "code": "VALIDATION", "field": field, "message": message } }),
            ),
            ApiError::Unauthenticated(msg) => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": { "code": "UNAUTHENTICATED", "message": msg } }),
            ),
            ApiError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                json!({ "error": { "code": "FORBIDDEN", "message": msg } }),
            ),
            ApiError::Database(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": { "code": "DATABASE_ERROR", "message": err.to_string() } }),
            ),
            ApiError::Common(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": { "code": "INTERNAL_ERROR", "message": err.to_string() } }),
            ),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": { "code": "INTERNAL_ERROR", "message": msg } }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_taxonomy() {
        assert_eq!(
            ApiError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::validation("score", "out of range")
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthenticated("no token".into())
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("not owner".into())
                .into_response()
                .status(),
            StatusCode::FORBIDDEN
        );
    }
}
