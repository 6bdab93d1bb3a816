//! Error types for the forms server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use form_engine::RenderError;
use form_types::FormError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Form not found: {0}")]
    FormNotFound(String),

    #[error("{0}")]
    Validation(#[from] FormError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No PDF generated yet for {0}")]
    NoDocument(String),

    #[error("Uploads are not accepted for {0}")]
    UploadNotAccepted(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ServerError::FormNotFound(_) => (StatusCode::NOT_FOUND, "FORM_NOT_FOUND"),
            ServerError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            ServerError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            ServerError::NoDocument(_) => (StatusCode::NOT_FOUND, "NO_DOCUMENT"),
            ServerError::UploadNotAccepted(_) => (StatusCode::BAD_REQUEST, "UPLOAD_NOT_ACCEPTED"),
            ServerError::Internal(msg) => {
                error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<RenderError> for ServerError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Form(form) => ServerError::Validation(form),
            RenderError::UnknownForm(name) => ServerError::FormNotFound(name),
            err @ RenderError::InvalidJson { .. } => ServerError::InvalidRequest(err.to_string()),
            other => ServerError::Internal(other.to_string()),
        }
    }
}
