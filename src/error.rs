//! Error handling

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

pub type DataResult<T> = Result<T, DataError>;

/// Failures at the data-access boundary.
///
/// These never reach the client as HTTP errors; `store::fetch_or_empty`
/// turns them into a notice plus an empty result.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("SQL Error: {0}")]
    Query(String),
}

impl DataError {
    pub fn connection(err: sqlx::Error) -> Self {
        DataError::Connection(err.to_string())
    }

    pub fn query(err: sqlx::Error) -> Self {
        DataError::Query(err.to_string())
    }
}

#[derive(Debug)]
pub enum AppError {
    // Resource errors
    NotFound(String),

    // Validation errors
    ValidationError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.as_str()),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

/// A path segment that fails to parse names a resource that cannot exist.
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::NotFound(rejection.body_text())
    }
}
