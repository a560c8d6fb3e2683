//! # History Query
//!
//! Paginated transaction history for a user: every ledger row where the user owns the
//! source or the destination wallet, newest first (ties broken by newest id).

use super::models::TransactionRecord;
use super::DbPool;
use crate::error::Result;
use crate::model::pagination::{check_page_params, paginate, Page};
use crate::model::HistoryQuery;
use async_trait::async_trait;
use tracing::debug;

/// History query backed by a SQLite pool.
#[derive(Clone)]
pub struct SqlHistoryQuery {
    pool: DbPool,
}

impl SqlHistoryQuery {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryQuery for SqlHistoryQuery {
    async fn list_transactions(
        &self,
        user_id: i64,
        per_page: i64,
        page_num: i64,
    ) -> Result<Page<TransactionRecord>> {
        check_page_params(per_page, page_num)?;

        let records = sqlx::query_as::<_, TransactionRecord>(
            r#"
            SELECT t.id,
                   w_from.address AS from_address,
                   w_to.address AS to_address,
                   t.amount,
                   t.commission,
                   t.created_at,
                   t.successful
            FROM transactions t
            JOIN wallets w_from ON w_from.id = t.from_wallet_id
            JOIN wallets w_to ON w_to.id = t.to_wallet_id
            WHERE w_from.user_id = ? OR w_to.user_id = ?
            ORDER BY t.created_at DESC, t.id DESC
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        debug!("[HISTORY] {} records for user {}", records.len(), user_id);

        paginate(records, per_page, page_num)
    }
}
