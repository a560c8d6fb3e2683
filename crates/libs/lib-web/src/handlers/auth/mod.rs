//! # Authentication Handlers
//!
//! Registration, login and the authenticated liveness check.
//!
//! ## Example
//!
//! ```text
//! POST /crypto/register
//! {"name": "Alice", "last_name": "Smith", "email": "alice@example.com", "pass": "MyPassword123"}
//!
//! 201 {"access_token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9..."}
//! ```

use crate::extract::ApiJson;
use crate::middleware::CurrentUser;
use crate::services::AccountService;
use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
};
use lib_core::dto::{AliveResponse, LogInRequest, RegisterRequest, RegisterResponse};
use lib_core::AppError;
use tracing::{info, instrument, warn};

/// Register a new user.
///
/// # Returns
///
/// * `201` with an access token; the user already owns two wallets with the default balance
/// * `400` on validation failure, `409` if the email is taken
#[instrument(skip(service, req), fields(email = %req.email))]
pub async fn register(
    State(service): State<AccountService>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    info!("[REGISTER] New user registration request");

    let response = service.register(req).await.inspect_err(|e| {
        warn!("[REGISTER] Registration failed: {}", e);
    })?;

    info!("[REGISTER] Registration successful");
    Ok((StatusCode::CREATED, Json(response)))
}

/// Log in with email and password.
#[instrument(skip(service, req), fields(email = %req.email))]
pub async fn log_in(
    State(service): State<AccountService>,
    ApiJson(req): ApiJson<LogInRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    info!("[LOG IN] Login attempt");

    let response = service.log_in(req).await.inspect_err(|e| {
        warn!("[LOG IN] Login failed: {}", e);
    })?;

    info!("[LOG IN] Login successful");
    Ok(Json(response))
}

/// Liveness check for an authenticated caller.
#[instrument(skip(service))]
pub async fn alive(
    State(service): State<AccountService>,
    Extension(user): Extension<CurrentUser>,
) -> Json<AliveResponse> {
    Json(service.alive(user.user_id))
}

#[cfg(test)]
mod tests;
