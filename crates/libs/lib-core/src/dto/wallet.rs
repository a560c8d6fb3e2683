use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One wallet of the authenticated user (`GET /crypto/wallet`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WalletsResponse {
    pub id: i64,
    pub address: String,
    /// Wallet kind, e.g. `BTC`
    pub label: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}
