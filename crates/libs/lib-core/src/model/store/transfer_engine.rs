//! # Transfer Engine
//!
//! Moves balance between two wallets owned by the caller, withholding a commission.
//!
//! ## Flow
//!
//! 1. Reject `from == to` and non-positive or unrepresentable amounts.
//! 2. Begin a transaction.
//! 3. Resolve the owners of both wallets on that transaction; the set must be exactly
//!    `{caller}`.
//! 4. Run [`make_transfer`] on the same transaction. It is the only code that changes
//!    balances, each change being a single guarded `UPDATE`.
//! 5. Commit on success. On rejection roll back, record the failed attempt in the
//!    ledger and report `Ok(false)`.
//!
//! Dropping the future mid-flight drops the open transaction, which rolls it back.

use super::account_store::owners_of;
use super::{DbPool, BEGIN_WRITE};
use crate::error::{AppError, Result};
use crate::model::money::{commission_minor, transfer_amount_minor, COMMISSION_RATE};
use crate::model::TransferEngine;
use async_trait::async_trait;
use lib_utils::time::now_utc;
use rust_decimal::Decimal;
use sqlx::{Sqlite, SqliteConnection, Transaction};
use tracing::{debug, info, warn};

/// Transfer engine backed by a SQLite pool.
#[derive(Clone)]
pub struct SqlTransferEngine {
    pool: DbPool,
    commission_rate: Decimal,
}

impl SqlTransferEngine {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            commission_rate: COMMISSION_RATE,
        }
    }

    /// Record a rejected attempt outside the rolled-back unit of work.
    async fn record_failed_attempt(&self, from_wallet: i64, to_wallet: i64, amount: i64, commission: i64) {
        let result = insert_ledger_row(&self.pool, from_wallet, to_wallet, amount, commission, false).await;

        if let Err(e) = result {
            warn!(
                "[TRANSFER] Could not record failed transfer {} -> {}: {}",
                from_wallet, to_wallet, e
            );
        }
    }
}

#[async_trait]
impl TransferEngine for SqlTransferEngine {
    async fn transfer(
        &self,
        caller: i64,
        from_wallet: i64,
        to_wallet: i64,
        amount: Decimal,
    ) -> Result<bool> {
        if from_wallet == to_wallet {
            return Err(AppError::InvalidRequest(
                "source and destination wallets must differ".to_string(),
            ));
        }
        let amount_minor = transfer_amount_minor(amount)?;
        let commission = commission_minor(amount_minor, self.commission_rate)?;

        let mut tx = self.pool.begin_with(BEGIN_WRITE).await?;

        let outcome = run_in_tx(&mut tx, caller, from_wallet, to_wallet, amount_minor, commission).await;

        match outcome {
            Ok(true) => {
                tx.commit().await.map_err(|e| {
                    AppError::Internal(format!("Failed to commit transfer: {}", e))
                })?;
                info!(
                    "[TRANSFER] User {} moved {} from wallet {} to wallet {}",
                    caller, amount, from_wallet, to_wallet
                );
                Ok(true)
            }
            Ok(false) => {
                rollback(tx).await;
                info!(
                    "[TRANSFER] Rejected {} from wallet {} to wallet {} for user {}",
                    amount, from_wallet, to_wallet, caller
                );
                self.record_failed_attempt(from_wallet, to_wallet, amount_minor, commission)
                    .await;
                Ok(false)
            }
            Err(e) => {
                rollback(tx).await;
                Err(e)
            }
        }
    }
}

async fn rollback(tx: Transaction<'_, Sqlite>) {
    if let Err(e) = tx.rollback().await {
        warn!("[TRANSFER] Rollback failed: {}", e);
    }
}

async fn run_in_tx(
    conn: &mut SqliteConnection,
    caller: i64,
    from_wallet: i64,
    to_wallet: i64,
    amount: i64,
    commission: i64,
) -> Result<bool> {
    let owners = owners_of(&mut *conn, &[from_wallet, to_wallet]).await?;
    if owners.len() != 1 || !owners.contains(&caller) {
        debug!("[TRANSFER] Owner set {:?} does not match caller {}", owners, caller);
        return Err(AppError::InvalidRequest(
            "wallets must both belong to the requesting user".to_string(),
        ));
    }

    make_transfer(conn, from_wallet, to_wallet, amount, commission).await
}

/// Balance-transfer primitive.
///
/// Debits `amount` from `from_wallet` only if the balance covers it, credits
/// `amount - commission` to `to_wallet`, and appends a successful ledger row. Returns
/// `false` as soon as a step touches no row; the caller must then roll back.
pub async fn make_transfer(
    conn: &mut SqliteConnection,
    from_wallet: i64,
    to_wallet: i64,
    amount: i64,
    commission: i64,
) -> Result<bool> {
    let debited = sqlx::query("UPDATE wallets SET balance = balance - ? WHERE id = ? AND balance >= ?")
        .bind(amount)
        .bind(from_wallet)
        .bind(amount)
        .execute(&mut *conn)
        .await?;

    if debited.rows_affected() != 1 {
        return Ok(false);
    }

    let credited = sqlx::query("UPDATE wallets SET balance = balance + ? WHERE id = ?")
        .bind(amount - commission)
        .bind(to_wallet)
        .execute(&mut *conn)
        .await?;

    if credited.rows_affected() != 1 {
        return Ok(false);
    }

    insert_ledger_row(&mut *conn, from_wallet, to_wallet, amount, commission, true).await?;

    Ok(true)
}

async fn insert_ledger_row<'e, E>(
    executor: E,
    from_wallet: i64,
    to_wallet: i64,
    amount: i64,
    commission: i64,
    successful: bool,
) -> Result<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO transactions (from_wallet_id, to_wallet_id, amount, commission, created_at, successful)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(from_wallet)
    .bind(to_wallet)
    .bind(amount)
    .bind(commission)
    .bind(now_utc())
    .bind(successful)
    .execute(executor)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::store::models::NewUser;
    use crate::model::store::test_utils::{setup_file_db, setup_test_db};
    use crate::model::store::SqlAccountStore;
    use crate::model::AccountStore;
    use rust_decimal_macros::dec;

    async fn register(pool: &DbPool, email: &str) -> (i64, Vec<i64>) {
        let store = SqlAccountStore::new(pool.clone());
        let issue = |id: i64| -> Result<String> { Ok(id.to_string()) };
        let registration = store
            .register_user(
                NewUser::new(
                    "Alice".to_string(),
                    "Smith".to_string(),
                    email.to_string(),
                    "hash".to_string(),
                ),
                &issue,
            )
            .await
            .unwrap();
        let wallets = store.list_wallets(registration.user_id).await.unwrap();
        (registration.user_id, wallets.into_iter().map(|w| w.id).collect())
    }

    async fn balance(pool: &DbPool, wallet_id: i64) -> i64 {
        sqlx::query_scalar("SELECT balance FROM wallets WHERE id = ?")
            .bind(wallet_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn ledger(pool: &DbPool) -> Vec<(i64, i64, bool)> {
        sqlx::query_as("SELECT amount, commission, successful FROM transactions ORDER BY id")
            .fetch_all(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_transfer_conserves_amount_minus_commission() {
        // Arrange
        let pool = setup_test_db().await;
        let (user, wallets) = register(&pool, "alice@example.com").await;
        let engine = SqlTransferEngine::new(pool.clone());

        // Act
        let success = engine
            .transfer(user, wallets[0], wallets[1], dec!(100))
            .await
            .unwrap();

        // Assert: source debited by exactly 100, destination credited by exactly 99
        assert!(success);
        assert_eq!(balance(&pool, wallets[0]).await, 0);
        assert_eq!(balance(&pool, wallets[1]).await, 19_900_000_000);
        assert_eq!(ledger(&pool).await, vec![(10_000_000_000, 100_000_000, true)]);
    }

    #[tokio::test]
    async fn test_transfer_fractional_amount() {
        let pool = setup_test_db().await;
        let (user, wallets) = register(&pool, "alice@example.com").await;
        let engine = SqlTransferEngine::new(pool.clone());

        let success = engine
            .transfer(user, wallets[1], wallets[0], dec!(12.5))
            .await
            .unwrap();

        assert!(success);
        assert_eq!(balance(&pool, wallets[1]).await, 8_750_000_000);
        // 12.5 - 0.125 commission
        assert_eq!(balance(&pool, wallets[0]).await, 11_237_500_000);
    }

    #[tokio::test]
    async fn test_transfer_same_wallet_rejected() {
        let pool = setup_test_db().await;
        let (user, wallets) = register(&pool, "alice@example.com").await;
        let engine = SqlTransferEngine::new(pool.clone());

        let result = engine.transfer(user, wallets[0], wallets[0], dec!(10)).await;

        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
        assert_eq!(balance(&pool, wallets[0]).await, 10_000_000_000);
        assert!(ledger(&pool).await.is_empty());
    }

    #[tokio::test]
    async fn test_transfer_non_positive_amount_rejected() {
        let pool = setup_test_db().await;
        let (user, wallets) = register(&pool, "alice@example.com").await;
        let engine = SqlTransferEngine::new(pool.clone());

        let zero = engine.transfer(user, wallets[0], wallets[1], dec!(0)).await;
        let negative = engine.transfer(user, wallets[0], wallets[1], dec!(-1)).await;

        assert!(matches!(zero, Err(AppError::InvalidRequest(_))));
        assert!(matches!(negative, Err(AppError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_transfer_between_users_rejected() {
        // Arrange
        let pool = setup_test_db().await;
        let (alice, alice_wallets) = register(&pool, "alice@example.com").await;
        let (_bob, bob_wallets) = register(&pool, "bob@example.com").await;
        let engine = SqlTransferEngine::new(pool.clone());

        // Act
        let result = engine
            .transfer(alice, alice_wallets[0], bob_wallets[0], dec!(10))
            .await;

        // Assert
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
        assert_eq!(balance(&pool, alice_wallets[0]).await, 10_000_000_000);
        assert_eq!(balance(&pool, bob_wallets[0]).await, 10_000_000_000);
        assert!(ledger(&pool).await.is_empty());
    }

    #[tokio::test]
    async fn test_transfer_of_foreign_wallets_rejected() {
        let pool = setup_test_db().await;
        let (alice, _) = register(&pool, "alice@example.com").await;
        let (_bob, bob_wallets) = register(&pool, "bob@example.com").await;
        let engine = SqlTransferEngine::new(pool.clone());

        let result = engine
            .transfer(alice, bob_wallets[0], bob_wallets[1], dec!(10))
            .await;

        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
        assert_eq!(balance(&pool, bob_wallets[0]).await, 10_000_000_000);
    }

    #[tokio::test]
    async fn test_transfer_unknown_wallet_rejected() {
        let pool = setup_test_db().await;
        let (user, wallets) = register(&pool, "alice@example.com").await;
        let engine = SqlTransferEngine::new(pool.clone());

        let result = engine.transfer(user, wallets[0], 9999, dec!(10)).await;

        // The owner set of {wallet, unknown} is {user}, but the credit touches no row
        assert!(!result.unwrap());
        assert_eq!(balance(&pool, wallets[0]).await, 10_000_000_000);
    }

    #[tokio::test]
    async fn test_transfer_insufficient_balance_returns_false() {
        // Arrange
        let pool = setup_test_db().await;
        let (user, wallets) = register(&pool, "alice@example.com").await;
        let engine = SqlTransferEngine::new(pool.clone());

        // Act
        let success = engine
            .transfer(user, wallets[0], wallets[1], dec!(100.00000001))
            .await
            .unwrap();

        // Assert: nothing moved, the rejected attempt is on the ledger
        assert!(!success);
        assert_eq!(balance(&pool, wallets[0]).await, 10_000_000_000);
        assert_eq!(balance(&pool, wallets[1]).await, 10_000_000_000);
        assert_eq!(ledger(&pool).await, vec![(10_000_000_001, 100_000_000, false)]);
    }

    #[tokio::test]
    async fn test_make_transfer_primitive() {
        let pool = setup_test_db().await;
        let (_user, wallets) = register(&pool, "alice@example.com").await;
        let mut conn = pool.acquire().await.unwrap();

        let moved = make_transfer(&mut conn, wallets[0], wallets[1], 5_000_000_000, 50_000_000)
            .await
            .unwrap();
        let overdraft = make_transfer(&mut conn, wallets[0], wallets[1], 5_000_000_001, 0)
            .await
            .unwrap();
        drop(conn);

        assert!(moved);
        assert!(!overdraft);
        assert_eq!(balance(&pool, wallets[0]).await, 5_000_000_000);
        assert_eq!(balance(&pool, wallets[1]).await, 14_950_000_000);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_transfers_serialize() {
        // Arrange
        let (_dir, pool) = setup_file_db().await;
        let (user, wallets) = register(&pool, "alice@example.com").await;
        let engine = SqlTransferEngine::new(pool.clone());

        // Act: 20 parallel transfers of 1, alternating direction
        let handles: Vec<_> = (0..20)
            .map(|i| {
                let engine = engine.clone();
                let (from, to) = if i % 2 == 0 {
                    (wallets[0], wallets[1])
                } else {
                    (wallets[1], wallets[0])
                };
                tokio::spawn(async move { engine.transfer(user, from, to, dec!(1)).await })
            })
            .collect();

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }

        // Assert: all applied, 20 commissions of 0.01 withheld in total
        assert!(results.iter().all(|r| matches!(r, Ok(true))), "results: {:?}", results);
        let total = balance(&pool, wallets[0]).await + balance(&pool, wallets[1]).await;
        assert_eq!(total, 20_000_000_000 - 20 * 1_000_000);
        let rows = ledger(&pool).await;
        assert_eq!(rows.len(), 20);
        assert!(rows.iter().all(|(_, _, successful)| *successful));
    }
}
