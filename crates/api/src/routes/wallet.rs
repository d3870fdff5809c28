//! Wallet routes: balance and ledger history of the caller.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Serialize;

use hearts_db::WalletRepository;
use hearts_shared::types::{PageRequest, PageResponse};

use super::dto::TransactionResponse;
use crate::{AppState, error::ApiResult, middleware::AuthUser};

/// Creates the wallet routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wallets/me", get(get_my_wallet))
        .route("/wallets/me/transactions", get(list_my_transactions))
}

/// Balance plus the most recent ledger entries.
#[derive(Debug, Serialize)]
pub struct WalletResponse {
    /// Current balance.
    pub balance: i64,
    /// Newest entries first.
    pub recent_transactions: Vec<TransactionResponse>,
}

/// GET `/wallets/me` - Balance and recent history.
async fn get_my_wallet(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<WalletResponse>> {
    let wallets = WalletRepository::new((*state.db).clone());
    let user_id = auth.user_id();

    let balance = wallets.get_balance(user_id).await?;
    let recent = wallets
        .recent_transactions(user_id, state.billing.recent_limit)
        .await?;

    Ok(Json(WalletResponse {
        balance,
        recent_transactions: recent.into_iter().map(Into::into).collect(),
    }))
}

/// GET `/wallets/me/transactions` - Paged ledger history, newest first.
async fn list_my_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> ApiResult<Json<PageResponse<TransactionResponse>>> {
    let page = page.clamped(state.billing.max_page_size);
    let wallets = WalletRepository::new((*state.db).clone());

    let (entries, total) = wallets.list_transactions(auth.user_id(), page).await?;

    Ok(Json(PageResponse::new(
        entries.into_iter().map(Into::into).collect(),
        page.page,
        page.per_page,
        total,
    )))
}
