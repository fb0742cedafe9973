use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, warn};

use crate::storage::StorageError;
use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {message}")]
    ValidationError { message: String, details: Value },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Storage error")]
    StorageError(#[from] StorageError),

    /// The routing collaborator answered with a non-2xx status, or could not
    /// be reached at all (`status` is `None`).
    #[error("Upstream error: {message}")]
    UpstreamError { status: Option<u16>, message: String },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Internal server error")]
    InternalServerError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(message: impl Into<String>, details: Value) -> Self {
        AppError::ValidationError {
            message: message.into(),
            details,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StorageError(StorageError::Conflict { .. }) => StatusCode::CONFLICT,
            AppError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::UpstreamError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError { .. } => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::StorageError(StorageError::Conflict { .. }) => "CONFLICT",
            AppError::StorageError(_) => "STORAGE_ERROR",
            AppError::UpstreamError { .. } => "UPSTREAM_ERROR",
            AppError::ConfigurationError(_) => "CONFIGURATION_ERROR",
            AppError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::ValidationError { message, .. }
            | AppError::NotFound(message) => {
                warn!(code = self.code(), message = %message, "Request rejected");
            }
            AppError::StorageError(StorageError::Conflict { field }) => {
                warn!(code = self.code(), field = %field, "Request rejected");
            }
            AppError::StorageError(e) => {
                error!(error = ?e, "Storage error");
            }
            AppError::UpstreamError { status, message } => {
                error!(status = ?status, message = %message, "Routing collaborator failed");
            }
            AppError::ConfigurationError(msg) | AppError::InternalServerError(msg) => {
                error!(error = ?self, message = %msg, "Application error");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        // Log internal details
        self.log();

        // Only expose high-level message to the client
        let (public_message, details) = match self {
            AppError::ValidationError { message, details } => (message, Some(details)),
            AppError::NotFound(msg) | AppError::ConfigurationError(msg) => (msg, None),
            AppError::StorageError(StorageError::Conflict { field }) => (
                format!("{field} is already registered"),
                Some(json!({ "field": field })),
            ),
            AppError::StorageError(_) => ("A storage error occurred".to_string(), None),
            AppError::UpstreamError { status, message } => {
                (message, status.map(|s| json!({ "status": s })))
            }
            AppError::InternalServerError(_) => ("An internal error occurred".to_string(), None),
        };

        error_response(code, public_message, details, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_taxonomy() {
        assert_eq!(
            AppError::validation("bad", json!([])).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(StorageError::Conflict { field: "email" }).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(StorageError::Unavailable("lock".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::ConfigurationError("x".into()).code(),
            "CONFIGURATION_ERROR"
        );
        assert_eq!(
            AppError::UpstreamError {
                status: Some(503),
                message: "x".into()
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    async fn body_text(error: AppError) -> (StatusCode, String) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_internal_details_are_not_exposed() {
        let (status, body) =
            body_text(AppError::InternalServerError("thread 'main' panicked at src/x.rs".into()))
                .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("An internal error occurred"));
        assert!(!body.contains("panicked"));

        let (status, body) = body_text(AppError::from(StorageError::Unavailable(
            "lock poisoned at 10.0.0.7".into(),
        )))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("STORAGE_ERROR"));
        assert!(!body.contains("10.0.0.7"));
    }
}
