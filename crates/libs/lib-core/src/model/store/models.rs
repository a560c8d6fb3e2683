//! # Store Models
//!
//! Row types read from and written to the wallet database. Money columns are integer
//! minor units (see [`crate::model::money`]).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Data for a user about to be registered.
///
/// The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn new(name: String, last_name: String, email: String, password_hash: String) -> Self {
        Self {
            name,
            last_name,
            email,
            password_hash,
        }
    }
}

/// Outcome of a completed registration.
#[derive(Debug, Clone)]
pub struct Registration {
    pub user_id: i64,
    pub access_token: String,
}

/// Stored login material for a user.
#[derive(Debug, Clone, FromRow)]
pub struct Credentials {
    pub user_id: i64,
    pub password_hash: String,
}

/// Wallet joined with its human-readable kind label.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct WalletView {
    pub id: i64,
    pub address: String,
    pub label: String,
    pub balance: i64,
}

/// Ledger entry joined with the external addresses of both wallets.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct TransactionRecord {
    pub id: i64,
    pub from_address: String,
    pub to_address: String,
    pub amount: i64,
    pub commission: i64,
    pub created_at: DateTime<Utc>,
    pub successful: bool,
}
