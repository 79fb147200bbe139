//! Request-level errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// A rejected prefetch request. Everything here is the client's fault.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The body decoded but a required field is missing or empty
    #[error("{0}")]
    Validation(String),

    /// The body could not be decoded as JSON
    #[error("Invalid request body: {0}")]
    Json(String),
}

impl ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "INVALID_REQUEST",
            ApiError::Json(_) => "INVALID_BODY",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error_code": self.error_code(),
            "error_message": self.to_string(),
        });

        (StatusCode::BAD_REQUEST, body.to_string()).into_response()
    }
}
