//! Admin routes: manual balance corrections and reconciliation.
//!
//! Authorization is decided here from the token role and handed to the
//! ledger as an [`Actor`](hearts_core::ledger::Actor); the wallet repository
//! enforces it and audits every attempt.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use hearts_core::ledger::Reconciliation;
use hearts_db::repositories::{AdjustInput, WalletRepository};
use hearts_shared::AppError;

use super::dto::TransactionResponse;
use crate::{AppState, error::ApiResult, middleware::AuthUser};

/// Creates the admin routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/wallets/{user_id}/adjust", post(adjust_wallet))
        .route(
            "/admin/wallets/{user_id}/reconciliation",
            get(reconcile_wallet),
        )
}

/// Request body for an adjustment.
#[derive(Debug, Deserialize)]
pub struct AdjustRequest {
    /// Signed change: positive credits, negative debits.
    pub delta: i64,
    /// Why the correction is made.
    pub reason: String,
    /// Extra context stored with the ledger entry.
    pub metadata: Option<Value>,
}

/// Response for an applied adjustment.
#[derive(Debug, Serialize)]
pub struct AdjustResponse {
    /// The `ADMIN_ADJUST` entry.
    pub transaction: TransactionResponse,
    /// Balance after the adjustment.
    pub balance: i64,
}

/// Reconciliation report.
#[derive(Debug, Serialize)]
pub struct ReconciliationResponse {
    /// Wallet owner.
    pub user_id: Uuid,
    /// Stored balance, stored ledger sum and latest entry.
    #[serde(flatten)]
    pub report: Reconciliation,
    /// True when the ledger explains the balance.
    pub consistent: bool,
}

/// POST `/admin/wallets/{user_id}/adjust` - Apply a manual correction.
async fn adjust_wallet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(body): Json<AdjustRequest>,
) -> ApiResult<Json<AdjustResponse>> {
    let entry = WalletRepository::new((*state.db).clone())
        .adjust_hearts(AdjustInput {
            actor: auth.actor(&state.admin_role),
            target_user_id: user_id,
            delta: body.delta,
            reason: body.reason,
            metadata: body.metadata,
        })
        .await?;

    let balance = entry.balance_after;
    Ok(Json(AdjustResponse {
        transaction: entry.into(),
        balance,
    }))
}

/// GET `/admin/wallets/{user_id}/reconciliation` - Check a wallet against its ledger.
async fn reconcile_wallet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<ReconciliationResponse>> {
    if !auth.actor(&state.admin_role).is_admin {
        return Err(AppError::Forbidden("Admin role required".to_string()).into());
    }

    let report = WalletRepository::new((*state.db).clone())
        .reconcile(user_id)
        .await?;

    Ok(Json(ReconciliationResponse {
        user_id,
        consistent: report.is_consistent(),
        report,
    }))
}
