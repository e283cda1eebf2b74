//! Application error type and its HTTP representation.
//!
//! Every handler returns `Result<_, AppError>`; the [`IntoResponse`] impl turns
//! each variant into a status code and a `{"error": "..."}` JSON body, so no
//! error escapes a handler without a well-formed response.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::domain::repositories::StoreError;
use crate::domain::selection::SelectionError;

/// Public message for exhausted allocation retries.
pub const EXHAUSTED_RETRIES_MESSAGE: &str =
    "Could not generate a unique short code. Please try again.";

/// Public message for store faults.
pub const STORE_UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable";

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request body is not valid JSON.
    #[error("{0}")]
    InvalidInput(String),

    /// The request body is JSON but a field is missing or has the wrong value.
    #[error("{0}")]
    Validation(String),

    /// A required path parameter is absent.
    #[error("{0}")]
    MissingInput(String),

    #[error("{0}")]
    NotFound(String),

    /// Every allocation attempt collided with an existing code.
    #[error("failed to generate a unique short code after {attempts} attempts")]
    ExhaustedRetries { attempts: usize },

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
    pub fn missing_input(message: impl Into<String>) -> Self {
        Self::MissingInput(message.into())
    }
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::Validation(_) | AppError::MissingInput(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ExhaustedRetries { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Message safe to show to clients.
    ///
    /// Client errors echo their message; server errors use fixed wording so
    /// infrastructure details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::InvalidInput(message)
            | AppError::Validation(message)
            | AppError::MissingInput(message)
            | AppError::NotFound(message) => message.clone(),
            AppError::ExhaustedRetries { .. } => EXHAUSTED_RETRIES_MESSAGE.to_string(),
            AppError::StoreUnavailable(_) => STORE_UNAVAILABLE_MESSAGE.to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorBody {
            error: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable(reason) => AppError::StoreUnavailable(reason),
            StoreError::AlreadyExists(code) => {
                AppError::internal(format!("unexpected conflict on short code '{code}'"))
            }
            StoreError::Malformed(reason) => AppError::internal(reason),
        }
    }
}

impl From<SelectionError> for AppError {
    fn from(e: SelectionError) -> Self {
        AppError::internal(e.to_string())
    }
}
