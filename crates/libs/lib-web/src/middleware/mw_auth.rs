//! # Authentication Middleware
//!
//! Validates the `Authorization: Bearer <token>` header with the injected
//! [`TokenService`] and stores the caller as [`CurrentUser`] in the request extensions.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/crypto/wallet", get(handlers::wallet::list_wallets))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_auth));
//! ```
//!
//! Handlers then take the identity explicitly:
//!
//! ```rust,ignore
//! async fn handler(Extension(user): Extension<CurrentUser>) -> String {
//!     format!("Hello, user {}!", user.user_id)
//! }
//! ```

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use lib_auth::TokenService;
use lib_core::AppError;
use tracing::{debug, warn};

/// Authenticated caller of the current request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: i64,
}

/// Authentication middleware.
///
/// - **Valid token**: continues with [`CurrentUser`] in extensions
/// - **Missing/invalid token**: `401 Unauthorized` with the standard error body
pub async fn require_auth(
    State(tokens): State<TokenService>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            warn!("[AUTH] Missing Authorization header");
            AppError::Unauthorized("Missing authorization token".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("[AUTH] Invalid Authorization header format");
        AppError::Unauthorized("Invalid authorization header".to_string())
    })?;

    let user_id = tokens.verify(token).map_err(|e| {
        warn!("[AUTH] JWT validation failed: {}", e);
        AppError::Unauthorized("Invalid or expired token".to_string())
    })?;

    debug!("[AUTH] Authenticated user id: {}", user_id);

    req.extensions_mut().insert(CurrentUser { user_id });

    Ok(next.run(req).await)
}
