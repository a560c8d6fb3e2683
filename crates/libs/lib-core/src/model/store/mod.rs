//! # Database Store
//!
//! SQLite connection pool, embedded migrations, and the store implementations of the
//! model traits.

// region: --- Modules
pub mod account_store;
pub mod address;
pub mod history_query;
pub mod models;
pub mod transfer_engine;
// endregion: --- Modules

// region: --- Re-exports
pub use account_store::SqlAccountStore;
pub use history_query::SqlHistoryQuery;
pub use transfer_engine::SqlTransferEngine;
// endregion: --- Re-exports

// region: --- Types and Functions
use crate::config::Config;
use crate::error::Result;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

/// Type alias for SQLite connection pool.
pub type DbPool = SqlitePool;

/// Schema migrations, embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// How long a writer waits for the SQLite write lock before failing with `SQLITE_BUSY`.
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

/// Opening statement for units of work that write.
///
/// Takes the write lock up front, so competing writers queue on the busy timeout
/// instead of failing when a deferred transaction upgrades from read to write.
pub(crate) const BEGIN_WRITE: &str = "BEGIN IMMEDIATE";

/// Create a new SQLite connection pool for `config.database_url`.
pub async fn create_pool(config: &Config) -> Result<DbPool> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Apply all pending migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}
// endregion: --- Types and Functions
