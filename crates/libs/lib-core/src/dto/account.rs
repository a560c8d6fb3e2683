//! # Account DTOs
//!
//! - `POST /crypto/register` - [`RegisterRequest`] -> [`RegisterResponse`]
//! - `POST /crypto/log_in` - [`LogInRequest`] -> [`RegisterResponse`]
//! - `GET /crypto/alive` - [`AliveResponse`]
//!
//! Errors use the body produced by [`crate::error::AppError`]: `{"error": "...", "code": "..."}`.

use serde::{Deserialize, Serialize};

/// Registration payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub pass: String,
}

/// Login payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogInRequest {
    pub email: String,
    pub pass: String,
}

/// Access token returned by registration and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub access_token: String,
}

/// Liveness answer for an authenticated caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AliveResponse {
    pub text: String,
    pub user_id: i64,
}

/// Error body, as produced by `AppError`'s `IntoResponse`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
