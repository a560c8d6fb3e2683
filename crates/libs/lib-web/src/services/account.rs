//! # Account Service
//!
//! Composition root of the wallet domain. It validates and normalizes request payloads,
//! hashes and checks passwords, issues tokens, and delegates persistence to the injected
//! [`AccountStore`], [`TransferEngine`] and [`HistoryQuery`].
//!
//! The caller identity is always an explicit `user_id` argument, resolved beforehand by
//! the auth middleware.

use lib_auth::{hash_password, verify_password, TokenService};
use lib_core::dto::{
    AliveResponse, GetTransactionResponse, LogInRequest, RegisterRequest, RegisterResponse,
    SingleTransaction, TransactionRequest, TransferResponse, WalletsResponse,
};
use lib_core::model::money::from_minor_units;
use lib_core::model::store::models::NewUser;
use lib_core::model::store::{SqlAccountStore, SqlHistoryQuery, SqlTransferEngine};
use lib_core::{AccountStore, AppError, Config, DbPool, HistoryQuery, Result, TransferEngine};
use lib_utils::time::format_time;
use lib_utils::validation::{
    domain_resolves, validate_email_syntax, validate_letters_only, validate_not_empty,
    validate_password_policy, validate_present,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

const ALIVE_TEXT: &str = "service is okay";

/// Account, wallet and transaction operations for authenticated users.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    transfers: Arc<dyn TransferEngine>,
    history: Arc<dyn HistoryQuery>,
    tokens: TokenService,
    verify_email_domain: bool,
}

impl AccountService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        transfers: Arc<dyn TransferEngine>,
        history: Arc<dyn HistoryQuery>,
        tokens: TokenService,
        verify_email_domain: bool,
    ) -> Self {
        Self {
            accounts,
            transfers,
            history,
            tokens,
            verify_email_domain,
        }
    }

    /// Wire the SQLite-backed stores over `pool`.
    pub fn from_pool(pool: DbPool, tokens: TokenService, config: &Config) -> Self {
        Self::new(
            Arc::new(SqlAccountStore::new(pool.clone())),
            Arc::new(SqlTransferEngine::new(pool.clone())),
            Arc::new(SqlHistoryQuery::new(pool)),
            tokens,
            config.verify_email_domain,
        )
    }

    pub fn alive(&self, user_id: i64) -> AliveResponse {
        AliveResponse {
            text: ALIVE_TEXT.to_string(),
            user_id,
        }
    }

    /// Register a user, provision their wallets and return an access token.
    pub async fn register(&self, req: RegisterRequest) -> Result<RegisterResponse> {
        for (value, field) in [
            (&req.name, "name"),
            (&req.last_name, "last_name"),
            (&req.email, "email"),
        ] {
            validate_not_empty(value, field).map_err(AppError::InvalidRequest)?;
        }
        validate_present(&req.pass, "pass").map_err(AppError::InvalidRequest)?;
        validate_letters_only(&req.name, "name").map_err(AppError::InvalidRequest)?;
        validate_letters_only(&req.last_name, "last_name").map_err(AppError::InvalidRequest)?;
        validate_password_policy(&req.pass).map_err(AppError::InvalidRequest)?;
        self.check_email(&req.email).await?;

        debug!("[ACCOUNT SERVICE] Hashing password...");
        let password_hash =
            hash_password(&req.pass).map_err(|e| AppError::Internal(e.to_string()))?;

        let tokens = self.tokens.clone();
        let issue = move |user_id: i64| -> Result<String> {
            tokens
                .issue(user_id)
                .map_err(|e| AppError::Internal(e.to_string()))
        };

        let registration = self
            .accounts
            .register_user(
                NewUser::new(req.name, req.last_name, req.email, password_hash),
                &issue,
            )
            .await?;

        info!("[ACCOUNT SERVICE] User {} registered", registration.user_id);
        Ok(RegisterResponse {
            access_token: registration.access_token,
        })
    }

    /// Check email and password and return a fresh access token.
    pub async fn log_in(&self, req: LogInRequest) -> Result<RegisterResponse> {
        self.check_email(&req.email).await?;

        let credentials = self.accounts.find_user_by_email(&req.email).await?;

        let matches = verify_password(&req.pass, &credentials.password_hash)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        if !matches {
            warn!("[ACCOUNT SERVICE] Wrong password for user {}", credentials.user_id);
            return Err(AppError::Unauthorized("Invalid email or password".to_string()));
        }

        let access_token = self
            .tokens
            .issue(credentials.user_id)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(RegisterResponse { access_token })
    }

    pub async fn wallets(&self, user_id: i64) -> Result<Vec<WalletsResponse>> {
        let wallets = self.accounts.list_wallets(user_id).await?;

        Ok(wallets
            .into_iter()
            .map(|w| WalletsResponse {
                id: w.id,
                address: w.address,
                label: w.label,
                balance: from_minor_units(w.balance),
            })
            .collect())
    }

    /// Transfer between two wallets of `user_id`.
    ///
    /// A rejection by the balance primitive becomes `TransactionAborted`.
    pub async fn transfer(&self, user_id: i64, req: TransactionRequest) -> Result<TransferResponse> {
        let success = self
            .transfers
            .transfer(user_id, req.from_address, req.to_address, req.amount)
            .await?;

        if !success {
            return Err(AppError::TransactionAborted("transaction aborted".to_string()));
        }

        Ok(TransferResponse { success })
    }

    pub async fn transactions(
        &self,
        user_id: i64,
        per_page: i64,
        page_num: i64,
    ) -> Result<GetTransactionResponse> {
        let page = self
            .history
            .list_transactions(user_id, per_page, page_num)
            .await?;

        let items = page
            .items
            .into_iter()
            .map(|record| SingleTransaction {
                from_address: record.from_address,
                to_address: record.to_address,
                sum: from_minor_units(record.amount),
                commission: from_minor_units(record.commission),
                date: format_time(record.created_at),
                success: record.successful,
            })
            .collect();

        Ok(GetTransactionResponse {
            items,
            meta: page.meta,
        })
    }

    async fn check_email(&self, email: &str) -> Result<()> {
        validate_email_syntax(email).map_err(AppError::InvalidRequest)?;

        if self.verify_email_domain && !domain_resolves(email).await {
            return Err(AppError::InvalidRequest(
                "Email domain does not resolve".to_string(),
            ));
        }
        Ok(())
    }
}
