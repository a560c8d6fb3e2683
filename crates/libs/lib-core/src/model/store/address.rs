//! # Wallet Addresses
//!
//! Random 20-digit numeric wallet addresses. `wallets.address` is `UNIQUE`; generation
//! checks for an existing row and retries a bounded number of times before giving up.

use crate::error::{AppError, Result};
use rand::Rng;
use sqlx::SqliteConnection;
use tracing::warn;

/// Number of digits in a wallet address.
pub const ADDRESS_LEN: usize = 20;

const MAX_ATTEMPTS: usize = 5;

/// Generate a random numeric address of [`ADDRESS_LEN`] digits.
pub fn generate_address() -> String {
    let mut rng = rand::thread_rng();
    (0..ADDRESS_LEN)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Generate an address not yet used by any wallet visible on `conn`.
pub async fn unused_address(conn: &mut SqliteConnection) -> Result<String> {
    for attempt in 1..=MAX_ATTEMPTS {
        let address = generate_address();

        let taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM wallets WHERE address = ?)")
            .bind(&address)
            .fetch_one(&mut *conn)
            .await?;

        if !taken {
            return Ok(address);
        }

        warn!("[ADDRESS] Collision on attempt {}, regenerating", attempt);
    }

    Err(AppError::Internal(
        "could not generate a unique wallet address".to_string(),
    ))
}
