//! Maps core errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::common::CoreError;

/// Wrapper so route handlers can use `?` on activity results.
pub struct ApiError(pub CoreError);

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self(err)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    kind: &'static str,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match &self.0 {
            CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation", msg.clone()),
            CoreError::Permission(msg) => (StatusCode::FORBIDDEN, "permission", msg.clone()),
            CoreError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            CoreError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            CoreError::Database(e) => {
                error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "internal error".to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorBody {
                kind,
                error: message,
            }),
        )
            .into_response()
    }
}
