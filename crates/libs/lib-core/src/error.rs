//! # Centralized Error Handling
//!
//! This module defines the application-wide error type [`AppError`] used consistently
//! across the store, service and handler layers. It follows the `thiserror` pattern.
//!
//! ## Error Categories
//!
//! | Variant | HTTP | Meaning |
//! |---|---|---|
//! | [`InvalidRequest`](AppError::InvalidRequest) | 400 | malformed or forbidden input |
//! | [`Unauthorized`](AppError::Unauthorized) | 401 | credential invalid or unverifiable |
//! | [`Conflict`](AppError::Conflict) | 409 | duplicate email at registration |
//! | [`TransactionAborted`](AppError::TransactionAborted) | 422 | transfer rejected by the balance primitive |
//! | [`Config`](AppError::Config) | 500 | startup configuration problem |
//! | [`Internal`](AppError::Internal) | 500 | store unavailable, commit failure, scan failure |
//!
//! Server-side variants never leak their detail to the client; the detail is logged
//! when the error is turned into a response.
//!
//! ## Usage Example
//!
//! ```rust
//! use lib_core::error::{AppError, Result};
//!
//! fn check_page(per_page: i64) -> Result<()> {
//!     if per_page <= 0 {
//!         return Err(AppError::InvalidRequest("per_page must be positive".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or forbidden input.
    ///
    /// **HTTP Status**: 400 Bad Request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Missing, invalid or expired credential; wrong email/password pair.
    ///
    /// **HTTP Status**: 401 Unauthorized
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource already exists (duplicate email).
    ///
    /// **HTTP Status**: 409 Conflict
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Business-level rejection of a transfer by the balance primitive.
    ///
    /// **HTTP Status**: 422 Unprocessable Entity
    #[error("Transaction aborted: {0}")]
    TransactionAborted(String),

    /// Configuration error during startup or environment loading.
    ///
    /// **HTTP Status**: 500 Internal Server Error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error (store failures, commit failures).
    ///
    /// **HTTP Status**: 500 Internal Server Error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::TransactionAborted(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error kind, used as the `code` field of error responses.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidRequest(_) => "InvalidRequest",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Conflict(_) => "Conflict",
            AppError::TransactionAborted(_) => "TransactionAborted",
            AppError::Config(_) => "Config",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Get a user-friendly error message (without internal details).
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Conflict(msg)
            | AppError::TransactionAborted(msg) => msg.clone(),
            AppError::Config(_) | AppError::Internal(_) => {
                "An internal error occurred".to_string()
            }
        }
    }
}

/// Implement Axum's `IntoResponse` for automatic error handling.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.user_message();

        if status.is_server_error() {
            tracing::error!("Server error: {}", self);
        } else {
            tracing::debug!("Client error: {}", self);
        }

        let body = Json(json!({
            "error": message,
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Convert `sqlx::Error` to `AppError`.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                AppError::Internal(format!("Database error: {}", db_err.message()))
            }
            _ => AppError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert migration failures to `AppError`.
impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Internal(format!("Migration error: {}", err))
    }
}
