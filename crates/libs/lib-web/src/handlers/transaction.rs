//! # Transaction Handlers
//!
//! - `POST /crypto/transaction` - transfer between two of the caller's wallets
//! - `GET /crypto/transaction/list?per_page=10&page_num=0` - history, newest first
//!
//! A transfer rejected by the balance primitive (e.g. insufficient funds) answers
//! `422` with code `TransactionAborted`; ownership and input problems answer `400`.

use crate::extract::{ApiJson, ApiQuery};
use crate::middleware::CurrentUser;
use crate::services::AccountService;
use axum::extract::{Extension, Json, State};
use lib_core::dto::{GetTransactionResponse, TransactionListQuery, TransactionRequest, TransferResponse};
use lib_core::AppError;
use tracing::{info, instrument, warn};

/// Transfer funds between two wallets of the caller.
#[instrument(
    skip(service, req),
    fields(user_id = user.user_id, from = req.from_address, to = req.to_address)
)]
pub async fn make_transaction(
    State(service): State<AccountService>,
    Extension(user): Extension<CurrentUser>,
    ApiJson(req): ApiJson<TransactionRequest>,
) -> Result<Json<TransferResponse>, AppError> {
    info!("[TRANSACTION] Transfer of {} requested", req.amount);

    let response = service.transfer(user.user_id, req).await.inspect_err(|e| {
        warn!("[TRANSACTION] Transfer failed: {}", e);
    })?;

    Ok(Json(response))
}

/// Page through the caller's transaction history.
#[instrument(skip(service), fields(user_id = user.user_id))]
pub async fn list_transactions(
    State(service): State<AccountService>,
    Extension(user): Extension<CurrentUser>,
    ApiQuery(query): ApiQuery<TransactionListQuery>,
) -> Result<Json<GetTransactionResponse>, AppError> {
    let page = service
        .transactions(user.user_id, query.per_page, query.page_num)
        .await?;

    Ok(Json(page))
}
