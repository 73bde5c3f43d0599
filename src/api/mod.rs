//! HTTP API
//! Mission: CRUD surface for departments, employees, and tasks
//!
//! Every route sits behind one of the two auth gates except login and
//! the health check. Persistence faults are caught here and surfaced as
//! generic 500s; the underlying error is logged, never leaked.

pub mod departments;
pub mod employees;
pub mod routes;
pub mod tasks;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

/// Handler-level error taxonomy.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Validation(String),
    /// Department has no employees to receive the task.
    NoAssignableEmployee,
    Database(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Database(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NoAssignableEmployee => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "No employees available in this department for task assignment".to_string(),
            ),
            ApiError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
