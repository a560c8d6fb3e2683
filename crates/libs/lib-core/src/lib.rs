//! # Core Library
//!
//! Configuration, errors, DTOs, and the wallet domain model with its SQLite store.

pub mod config;
pub mod dto;
pub mod error;
pub mod model;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
pub use model::store::{create_pool, run_migrations, DbPool};
pub use model::{AccountStore, HistoryQuery, TransferEngine};
