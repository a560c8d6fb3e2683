//! # Services Layer
//!
//! Business logic sitting between the HTTP handlers and the store traits:
//!
//! ```text
//! Handlers (HTTP) → AccountService → AccountStore / TransferEngine / HistoryQuery
//! ```
//!
//! Services return `Result<T, AppError>`; handlers hand the error straight to axum,
//! which renders it through `AppError`'s `IntoResponse`.

pub mod account;

pub use account::AccountService;
