//! Admin audit trail repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use hearts_core::ledger::AdjustmentOutcome;

use crate::entities::admin_audit_logs;

/// Input for writing an audit record.
#[derive(Debug, Clone)]
pub struct CreateAuditInput {
    /// Who attempted the action.
    pub actor_id: Uuid,
    /// Action name, e.g. `WALLET_ADJUST`.
    pub action: String,
    /// Wallet owner the action targeted.
    pub target_user_id: Uuid,
    /// Requested signed delta.
    pub delta: i64,
    /// Reason and, for failed attempts, the error.
    pub detail: String,
    /// What happened.
    pub outcome: AdjustmentOutcome,
    /// Ledger entry written by the action, if any.
    pub transaction_id: Option<Uuid>,
}

/// Repository for the admin audit trail.
///
/// Records are written with the plain connection, never inside a ledger
/// transaction, so they survive a rolled-back adjustment.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    db: DatabaseConnection,
}

impl AuditRepository {
    /// Creates a new audit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Writes one audit record.
    pub async fn record(&self, input: CreateAuditInput) -> Result<admin_audit_logs::Model, DbErr> {
        admin_audit_logs::ActiveModel {
            id: Set(Uuid::now_v7()),
            actor_id: Set(input.actor_id),
            action: Set(input.action),
            target_user_id: Set(input.target_user_id),
            delta: Set(input.delta),
            detail: Set(input.detail),
            outcome: Set(input.outcome.into()),
            transaction_id: Set(input.transaction_id),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
    }

    /// Lists the newest audit records that target a user.
    pub async fn list_for_target(
        &self,
        target_user_id: Uuid,
        limit: u64,
    ) -> Result<Vec<admin_audit_logs::Model>, DbErr> {
        admin_audit_logs::Entity::find()
            .filter(admin_audit_logs::Column::TargetUserId.eq(target_user_id))
            .order_by_desc(admin_audit_logs::Column::CreatedAt)
            .order_by_desc(admin_audit_logs::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
    }
}
