use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// One or more submission fields failed validation.
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Quotation not found")]
    QuotationNotFound,

    #[error("Invalid request method")]
    MethodNotAllowed,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("File storage error: {0}")]
    File(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

// Convert AppError to the JSON envelope every endpoint speaks:
// { "success": false, "message": ..., "errors": [...]? }
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Validation(ref problems) => (
                StatusCode::BAD_REQUEST,
                problems.join(", "),
                Some(problems.clone()),
            ),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string(), None),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string(), None),
            AppError::QuotationNotFound => (StatusCode::NOT_FOUND, self.to_string(), None),
            AppError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, self.to_string(), None),
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred. Please try again later.".into(),
                None,
            ),
            AppError::File(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to upload file".into(),
                None,
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred. Please try again later.".into(),
                None,
            ),
        };

        // Full detail stays server-side; clients only see the generic message.
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::debug!(error = ?self, "request rejected");
        }

        let body = Json(ErrorResponse {
            success: false,
            message,
            errors,
        });

        (status, body).into_response()
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

pub type Result<T> = std::result::Result<T, AppError>;
