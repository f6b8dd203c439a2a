// SPDX-License-Identifier: MIT

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::store::StoreError;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Validation failed")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_failed",
                Some(errors.to_string()),
            ),
            AppError::Store(err) => match err {
                StoreError::HabitNotFound(_) | StoreError::RecordNotFound(_) => {
                    (StatusCode::NOT_FOUND, "not_found", Some(err.to_string()))
                }
                StoreError::UnknownDetail(_) | StoreError::InvalidGoal(_) => {
                    (StatusCode::BAD_REQUEST, "bad_request", Some(err.to_string()))
                }
                StoreError::SnapshotRead(_)
                | StoreError::SnapshotWrite(_)
                | StoreError::Unavailable(_) => {
                    tracing::error!(error = %err, "Store error");
                    (StatusCode::INTERNAL_SERVER_ERROR, "store_error", None)
                }
            },
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
