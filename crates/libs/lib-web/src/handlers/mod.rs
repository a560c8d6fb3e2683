//! # HTTP Request Handlers
//!
//! Axum handlers for the `/crypto` API, grouped by feature. Handlers only extract,
//! log and delegate; the work happens in [`crate::services::AccountService`].
//!
//! ## Handler Modules
//!
//! - **[`auth`]**: registration, login, liveness
//!   - `POST /crypto/register` - create a user with two funded wallets
//!   - `POST /crypto/log_in` - authenticate with email/password
//!   - `GET /crypto/alive` - authenticated liveness check
//!
//! - **[`wallet`]**: wallet listing
//!   - `GET /crypto/wallet` - wallets of the caller with balances
//!
//! - **[`transaction`]**: transfers and history
//!   - `POST /crypto/transaction` - move funds between two of the caller's wallets
//!   - `GET /crypto/transaction/list` - paginated history, newest first
//!
//! ## Authentication
//!
//! Protected handlers take `Extension<CurrentUser>`, inserted by
//! [`require_auth`](crate::middleware::require_auth) after the bearer token is verified.
//!
//! ## Error Handling
//!
//! Handlers return `Result<_, AppError>`; the error renders as
//! `{"error": "...", "code": "..."}` with the status from `AppError::status_code`.

pub mod auth;
pub mod transaction;
pub mod wallet;
