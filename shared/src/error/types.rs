//! Error type and API response envelope

use super::category::ErrorCategory;
use super::codes::ReturnCode;
use http::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Application error with a machine-readable return code.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// Code identifying the failure
    pub code: ReturnCode,
    /// Human-readable message
    pub message: String,
}

impl AppError {
    /// Create an error carrying the default message for its code.
    pub fn new(code: ReturnCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
        }
    }

    /// Create an error with a custom message.
    pub fn with_message(code: ReturnCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    pub fn missing_fields(msg: impl Into<String>) -> Self {
        Self::with_message(ReturnCode::MissingFields, msg)
    }

    pub fn unauthorised(msg: impl Into<String>) -> Self {
        Self::with_message(ReturnCode::UnauthorisedAction, msg)
    }

    pub fn server_error(msg: impl Into<String>) -> Self {
        Self::with_message(ReturnCode::ServerError, msg)
    }
}

#[cfg(feature = "db")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("database error: {err}");
        AppError::new(ReturnCode::ServerError)
    }
}

/// Unified API response envelope.
///
/// Serializes to the flat wire shape every endpoint uses: a `return_code`
/// string, an optional `message`, and the operation's own fields flattened
/// alongside them.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    /// Result code (`SUCCESS` on 2xx outcomes)
    pub return_code: ReturnCode,
    /// Human-readable message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Operation payload, flattened into the top-level object
    #[serde(flatten)]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Success response with payload.
    pub fn success(data: T) -> Self {
        Self {
            return_code: ReturnCode::Success,
            message: None,
            data: Some(data),
        }
    }

    /// Success response with payload and message.
    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            return_code: ReturnCode::Success,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Success response with no payload.
    pub fn ok() -> Self {
        Self {
            return_code: ReturnCode::Success,
            message: None,
            data: None,
        }
    }

    /// Success response with only a message.
    pub fn ok_with_message(message: impl Into<String>) -> Self {
        Self {
            return_code: ReturnCode::Success,
            message: Some(message.into()),
            data: None,
        }
    }

    /// Error response from an [`AppError`].
    pub fn error(err: &AppError) -> Self {
        Self {
            return_code: err.code,
            message: Some(err.message.clone()),
            data: None,
        }
    }
}

impl<T> From<AppError> for ApiResponse<T> {
    fn from(err: AppError) -> Self {
        Self {
            return_code: err.code,
            message: Some(err.message),
            data: None,
        }
    }
}

/// Type alias for Result with AppError.
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        if matches!(self.code.category(), ErrorCategory::System) {
            tracing::error!(code = %self.code, message = %self.message, "system error");
        }

        let status = self.http_status();
        let body = ApiResponse::<()>::error(&self);
        (status, Json(body)).into_response()
    }
}

impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.return_code.http_status();
        (status, Json(self)).into_response()
    }
}
