//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`.
//!
//! Every error leaves as `{"error": "<message>"}` with a JSON content type.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::routes::form::FormError;
use crate::services::TokenError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Token issue or verification failed.
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    /// Submitted form could not be read.
    #[error("Form error: {0}")]
    Form(#[from] FormError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The resource does not serve this method.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound { .. }) | Self::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Token(err) if err.is_rejection() => StatusCode::UNAUTHORIZED,
            Self::Form(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Database(_) | Self::Token(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message sent to the client.
    ///
    /// Internal details stay in the logs.
    fn client_message(&self) -> String {
        match self {
            Self::Database(RepositoryError::NotFound { .. }) => self.inner_message(),
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Token(err) if err.is_rejection() => err.to_string(),
            Self::Token(_) => "Internal server error".to_string(),
            _ => self.inner_message(),
        }
    }

    fn inner_message(&self) -> String {
        match self {
            Self::Database(err) => err.to_string(),
            Self::Token(err) => err.to_string(),
            Self::Form(err) => err.to_string(),
            Self::NotFound(msg) | Self::BadRequest(msg) | Self::Internal(msg) => msg.clone(),
            Self::MethodNotAllowed => "Method not allowed".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        (status, Json(json!({ "error": self.client_message() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
