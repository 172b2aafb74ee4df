//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::ValidationErrors;

/// Application-wide Result type
pub type ApiResult<T> = Result<T, ApiError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // Client errors (4xx)
    #[error("Validation failed")]
    Validation(#[from] ValidationErrors),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{entity} {id} is referenced by {references} and cannot be deleted")]
    Protected {
        entity: &'static str,
        id: i64,
        references: String,
    },

    // Server errors (5xx)
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Internal error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Vec<String>>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, fields) = match &self {
            // 400 Bad Request
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                Some(errors.fields().clone()),
            ),

            // 404 Not Found
            ApiError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found", None),

            // 409 Conflict
            ApiError::Protected { .. } => (StatusCode::CONFLICT, "protected", None),

            // 500 Internal Server Error
            ApiError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
            fields,
        };

        (status, Json(body)).into_response()
    }
}

/// True when `err` is a unique-constraint violation touching the given
/// `table.column` pair. SQLite names the failing columns in the error
/// message, which is the only place that information surfaces.
pub(crate) fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation() && db_err.message().contains(constraint)
        }
        _ => false,
    }
}

/// True when `err` is a foreign-key violation. SQLite does not say which
/// key failed, so callers decide the meaning from the operation they ran.
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_foreign_key_violation(),
        _ => false,
    }
}
