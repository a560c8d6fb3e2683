//! # Account Store
//!
//! SQLite implementation of [`AccountStore`]: user registration with default wallet
//! provisioning, credential lookup, wallet listing and wallet ownership queries.
//!
//! Registration is a single transaction covering the email check, the user row, both
//! default wallets and credential issuance. Any failure rolls all of it back, so a
//! caller never observes a user without wallets.

use super::address::unused_address;
use super::models::{Credentials, NewUser, Registration, WalletView};
use super::{DbPool, BEGIN_WRITE};
use crate::error::{AppError, Result};
use crate::model::money::default_balance_minor;
use crate::model::{AccountStore, IssueCredential};
use async_trait::async_trait;
use lib_utils::validation::validate_not_empty;
use sqlx::{Executor, QueryBuilder, Sqlite, SqliteConnection};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Wallet kinds provisioned for every new user (`wallet_kinds.id`).
pub const DEFAULT_WALLET_KINDS: [i64; 2] = [1, 2];

/// Account store backed by a SQLite pool.
#[derive(Clone)]
pub struct SqlAccountStore {
    pool: DbPool,
}

impl SqlAccountStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for SqlAccountStore {
    async fn register_user(
        &self,
        new_user: NewUser,
        issue_credential: &IssueCredential,
    ) -> Result<Registration> {
        let mut tx = self.pool.begin_with(BEGIN_WRITE).await?;

        match register_in_tx(&mut tx, &new_user, issue_credential).await {
            Ok(registration) => {
                tx.commit().await.map_err(|e| {
                    AppError::Internal(format!("Failed to commit registration: {}", e))
                })?;
                info!("[ACCOUNT] Registered user {}", registration.user_id);
                Ok(registration)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("[ACCOUNT] Rollback after failed registration failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Credentials> {
        sqlx::query_as::<_, Credentials>(
            "SELECT id AS user_id, password_hash FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))
    }

    async fn list_wallets(&self, user_id: i64) -> Result<Vec<WalletView>> {
        let wallets = sqlx::query_as::<_, WalletView>(
            r#"
            SELECT w.id, w.address, k.name AS label, w.balance
            FROM wallets w
            JOIN wallet_kinds k ON k.id = w.kind_id
            WHERE w.user_id = ?
            ORDER BY w.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(wallets)
    }

    async fn owners_of(&self, wallet_ids: &[i64]) -> Result<BTreeSet<i64>> {
        owners_of(&self.pool, wallet_ids).await
    }
}

async fn register_in_tx(
    conn: &mut SqliteConnection,
    new_user: &NewUser,
    issue_credential: &IssueCredential,
) -> Result<Registration> {
    for (value, field) in [
        (&new_user.name, "name"),
        (&new_user.last_name, "last_name"),
        (&new_user.email, "email"),
        (&new_user.password_hash, "password"),
    ] {
        validate_not_empty(value, field).map_err(AppError::InvalidRequest)?;
    }

    let email_taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)")
        .bind(&new_user.email)
        .fetch_one(&mut *conn)
        .await?;

    if email_taken {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let inserted = sqlx::query(
        "INSERT INTO users (name, last_name, email, password_hash) VALUES (?, ?, ?, ?)",
    )
    .bind(&new_user.name)
    .bind(&new_user.last_name)
    .bind(&new_user.email)
    .bind(&new_user.password_hash)
    .execute(&mut *conn)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("Email already registered".to_string())
        }
        other => other.into(),
    })?;

    let user_id = inserted.last_insert_rowid();
    debug!("[ACCOUNT] Inserted user row {}", user_id);

    provision_default_wallets(conn, user_id).await?;

    let access_token = issue_credential(user_id)?;

    Ok(Registration {
        user_id,
        access_token,
    })
}

/// Create the default wallets for `user_id` on `conn`, each holding the default balance.
///
/// Must run on the registration's transaction so the user and wallets commit together.
pub async fn provision_default_wallets(conn: &mut SqliteConnection, user_id: i64) -> Result<()> {
    let balance = default_balance_minor()?;

    for kind_id in DEFAULT_WALLET_KINDS {
        let address = unused_address(conn).await?;

        sqlx::query("INSERT INTO wallets (address, user_id, kind_id, balance) VALUES (?, ?, ?, ?)")
            .bind(&address)
            .bind(user_id)
            .bind(kind_id)
            .bind(balance)
            .execute(&mut *conn)
            .await?;
    }

    debug!("[ACCOUNT] Provisioned {} wallets for user {}", DEFAULT_WALLET_KINDS.len(), user_id);
    Ok(())
}

/// Distinct owners of `wallet_ids`, on any executor (pool or open transaction).
pub async fn owners_of<'e, E>(executor: E, wallet_ids: &[i64]) -> Result<BTreeSet<i64>>
where
    E: Executor<'e, Database = Sqlite>,
{
    if wallet_ids.is_empty() {
        return Ok(BTreeSet::new());
    }

    let mut query = QueryBuilder::<Sqlite>::new("SELECT DISTINCT user_id FROM wallets WHERE id IN (");
    let mut separated = query.separated(", ");
    for id in wallet_ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    let owners: Vec<i64> = query.build_query_scalar().fetch_all(executor).await?;

    Ok(owners.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::store::test_utils::{setup_file_db, setup_test_db};

    fn new_user(email: &str) -> NewUser {
        NewUser::new(
            "Alice".to_string(),
            "Smith".to_string(),
            email.to_string(),
            "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".to_string(),
        )
    }

    fn issue_ok(user_id: i64) -> Result<String> {
        Ok(format!("token-{}", user_id))
    }

    async fn count(pool: &DbPool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    // ========== Registration Tests ==========

    #[tokio::test]
    async fn test_register_user_provisions_two_wallets() {
        // Arrange
        let pool = setup_test_db().await;
        let store = SqlAccountStore::new(pool.clone());

        // Act
        let registration = store
            .register_user(new_user("alice@example.com"), &issue_ok)
            .await
            .unwrap();

        // Assert
        assert_eq!(registration.access_token, format!("token-{}", registration.user_id));

        let wallets = store.list_wallets(registration.user_id).await.unwrap();
        assert_eq!(wallets.len(), 2);
        assert_eq!(wallets[0].label, "BTC");
        assert_eq!(wallets[1].label, "ETH");
        assert!(wallets.iter().all(|w| w.balance == 10_000_000_000));
        assert!(wallets.iter().all(|w| w.address.len() == 20));
        assert_ne!(wallets[0].address, wallets[1].address);
    }

    #[tokio::test]
    async fn test_register_user_duplicate_email() {
        let pool = setup_test_db().await;
        let store = SqlAccountStore::new(pool.clone());

        store
            .register_user(new_user("alice@example.com"), &issue_ok)
            .await
            .unwrap();

        let result = store
            .register_user(new_user("alice@example.com"), &issue_ok)
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(count(&pool, "users").await, 1);
        assert_eq!(count(&pool, "wallets").await, 2);
    }

    #[tokio::test]
    async fn test_register_user_empty_field() {
        let pool = setup_test_db().await;
        let store = SqlAccountStore::new(pool.clone());
        let mut user = new_user("alice@example.com");
        user.last_name = String::new();

        let result = store.register_user(user, &issue_ok).await;

        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
        assert_eq!(count(&pool, "users").await, 0);
    }

    #[tokio::test]
    async fn test_register_rolls_back_when_wallet_provisioning_fails() {
        // Arrange: second default wallet kind no longer exists, so its insert hits the FK
        let pool = setup_test_db().await;
        sqlx::query("DELETE FROM wallet_kinds WHERE id = 2")
            .execute(&pool)
            .await
            .unwrap();
        let store = SqlAccountStore::new(pool.clone());

        // Act
        let result = store
            .register_user(new_user("alice@example.com"), &issue_ok)
            .await;

        // Assert
        assert!(matches!(result, Err(AppError::Internal(_))));
        assert_eq!(count(&pool, "users").await, 0);
        assert_eq!(count(&pool, "wallets").await, 0);
    }

    #[tokio::test]
    async fn test_register_rolls_back_when_credential_issuance_fails() {
        let pool = setup_test_db().await;
        let store = SqlAccountStore::new(pool.clone());
        let issue_fail = |_: i64| -> Result<String> {
            Err(AppError::Internal("signing failed".to_string()))
        };

        let result = store
            .register_user(new_user("alice@example.com"), &issue_fail)
            .await;

        assert!(result.is_err());
        assert_eq!(count(&pool, "users").await, 0);
        assert_eq!(count(&pool, "wallets").await, 0);
    }

    // ========== Lookup Tests ==========

    #[tokio::test]
    async fn test_find_user_by_email() {
        let pool = setup_test_db().await;
        let store = SqlAccountStore::new(pool);
        let registration = store
            .register_user(new_user("alice@example.com"), &issue_ok)
            .await
            .unwrap();

        let credentials = store.find_user_by_email("alice@example.com").await.unwrap();

        assert_eq!(credentials.user_id, registration.user_id);
        assert!(credentials.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_find_user_by_email_not_found() {
        let pool = setup_test_db().await;
        let store = SqlAccountStore::new(pool);

        let result = store.find_user_by_email("nobody@example.com").await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_list_wallets_empty_for_unknown_user() {
        let pool = setup_test_db().await;
        let store = SqlAccountStore::new(pool);

        let wallets = store.list_wallets(999).await.unwrap();

        assert!(wallets.is_empty());
    }

    #[tokio::test]
    async fn test_list_wallets_is_repeatable() {
        let pool = setup_test_db().await;
        let store = SqlAccountStore::new(pool);
        let registration = store
            .register_user(new_user("alice@example.com"), &issue_ok)
            .await
            .unwrap();

        let first = store.list_wallets(registration.user_id).await.unwrap();
        let second = store.list_wallets(registration.user_id).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_owners_of() {
        let pool = setup_test_db().await;
        let store = SqlAccountStore::new(pool);
        let alice = store
            .register_user(new_user("alice@example.com"), &issue_ok)
            .await
            .unwrap();
        let bob = store
            .register_user(new_user("bob@example.com"), &issue_ok)
            .await
            .unwrap();
        let alice_wallets = store.list_wallets(alice.user_id).await.unwrap();
        let bob_wallets = store.list_wallets(bob.user_id).await.unwrap();

        let own = store
            .owners_of(&[alice_wallets[0].id, alice_wallets[1].id])
            .await
            .unwrap();
        let mixed = store
            .owners_of(&[alice_wallets[0].id, bob_wallets[0].id])
            .await
            .unwrap();
        let unknown = store.owners_of(&[12345]).await.unwrap();

        assert_eq!(own, BTreeSet::from([alice.user_id]));
        assert_eq!(mixed, BTreeSet::from([alice.user_id, bob.user_id]));
        assert!(unknown.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registrations_all_succeed() {
        // Arrange
        let (_dir, pool) = setup_file_db().await;

        // Act
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let store = SqlAccountStore::new(pool.clone());
                tokio::spawn(async move {
                    store
                        .register_user(new_user(&format!("user{}@example.com", i)), &issue_ok)
                        .await
                })
            })
            .collect();

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }

        // Assert: every writer waited for the lock instead of failing
        assert!(results.iter().all(|r| r.is_ok()), "results: {:?}", results);
        let wallets: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM wallets")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(wallets, 20);
    }
}
