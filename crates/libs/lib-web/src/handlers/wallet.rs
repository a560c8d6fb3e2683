//! # Wallet Handlers
//!
//! - `GET /crypto/wallet` - wallets of the authenticated user
//!
//! ```bash
//! curl -H "Authorization: Bearer $TOKEN" http://localhost:3001/crypto/wallet
//! ```

use crate::middleware::CurrentUser;
use crate::services::AccountService;
use axum::extract::{Extension, Json, State};
use lib_core::dto::WalletsResponse;
use lib_core::AppError;
use tracing::{debug, instrument};

/// List the caller's wallets with address, kind label and balance.
#[instrument(skip(service), fields(user_id = user.user_id))]
pub async fn list_wallets(
    State(service): State<AccountService>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<WalletsResponse>>, AppError> {
    let wallets = service.wallets(user.user_id).await?;

    debug!("[WALLET] Returning {} wallets", wallets.len());
    Ok(Json(wallets))
}
