//! # Transaction DTOs
//!
//! - `POST /crypto/transaction` - [`TransactionRequest`] -> [`TransferResponse`]
//! - `GET /crypto/transaction/list?per_page=10&page_num=0` - [`TransactionListQuery`] -> [`GetTransactionResponse`]
//!
//! `from_address` / `to_address` are wallet **ids** in the request and external wallet
//! **addresses** in the history items.

use crate::model::pagination::PageMeta;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Transfer between two wallets of the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub from_address: i64,
    pub to_address: i64,
    pub amount: Decimal,
}

/// Successful transfer acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferResponse {
    pub success: bool,
}

/// Query string of the history endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionListQuery {
    pub per_page: i64,
    pub page_num: i64,
}

/// One ledger entry as seen by the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SingleTransaction {
    pub from_address: String,
    pub to_address: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub sum: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub commission: Decimal,
    /// RFC3339, second precision
    pub date: String,
    pub success: bool,
}

/// One page of transaction history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetTransactionResponse {
    pub items: Vec<SingleTransaction>,
    pub meta: PageMeta,
}
