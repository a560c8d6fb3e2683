//! # Model Layer
//!
//! Capability traits for the wallet domain and their SQLite implementations.
//!
//! - [`AccountStore`]: users, wallets, ownership lookups
//! - [`TransferEngine`]: atomic balance transfers between a user's own wallets
//! - [`HistoryQuery`]: paginated transaction history
//!
//! Every operation takes the caller's user id explicitly; nothing here reads ambient
//! request state.

// region: --- Modules
pub mod money;
pub mod pagination;
pub mod store;
// endregion: --- Modules

use crate::error::Result;
use async_trait::async_trait;
use pagination::Page;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use store::models::{Credentials, NewUser, Registration, TransactionRecord, WalletView};

/// Issues the access credential for a freshly inserted user.
///
/// Runs inside the registration transaction, before commit; an error aborts the
/// registration.
pub type IssueCredential = dyn Fn(i64) -> Result<String> + Send + Sync;

/// Persistence of users and wallets.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Create the user and its default wallets in one atomic unit and return the issued
    /// credential. Duplicate email fails with `Conflict`.
    async fn register_user(
        &self,
        new_user: NewUser,
        issue_credential: &IssueCredential,
    ) -> Result<Registration>;

    /// Login material for `email`; `Unauthorized` when no such user exists.
    async fn find_user_by_email(&self, email: &str) -> Result<Credentials>;

    /// All wallets of `user_id`, possibly none.
    async fn list_wallets(&self, user_id: i64) -> Result<Vec<WalletView>>;

    /// Distinct owners of the given wallets. Unknown ids contribute nothing.
    async fn owners_of(&self, wallet_ids: &[i64]) -> Result<BTreeSet<i64>>;
}

/// Moves balance between two wallets of the same user.
#[async_trait]
pub trait TransferEngine: Send + Sync {
    /// Returns `Ok(false)` when the balance primitive rejected the transfer; nothing is
    /// mutated in that case.
    async fn transfer(&self, caller: i64, from_wallet: i64, to_wallet: i64, amount: Decimal)
        -> Result<bool>;
}

/// Read access to the transaction ledger.
#[async_trait]
pub trait HistoryQuery: Send + Sync {
    /// Records touching any wallet of `user_id`, newest first, paginated.
    async fn list_transactions(
        &self,
        user_id: i64,
        per_page: i64,
        page_num: i64,
    ) -> Result<Page<TransactionRecord>>;
}
