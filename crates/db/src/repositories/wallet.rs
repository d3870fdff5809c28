//! Wallet repository: the ledger mutation engine.
//!
//! Every balance change runs inside one database transaction that holds an
//! exclusive lock on the user's wallet row, recomputes the balance through
//! `LedgerService`, and writes the wallet plus a new ledger entry before
//! committing. Dropping the transaction on any error rolls everything back.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait, TryInsertResult, sea_query::Expr, sea_query::OnConflict,
};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use hearts_core::ledger::{
    Actor, AdjustmentOutcome, HeartAmount, LedgerError, LedgerService, Posting, Reconciliation,
    TransactionType, admin::ADJUST_ACTION,
};
use hearts_shared::AppError;
use hearts_shared::types::PageRequest;

use crate::entities::{heart_transactions, heart_wallets};
use crate::repositories::audit::{AuditRepository, CreateAuditInput};

/// Error types for wallet operations.
#[derive(Debug, Error)]
pub enum WalletError {
    /// A ledger rule rejected the operation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The wallet row vanished between creation and lock.
    #[error("Wallet for user {0} is unavailable")]
    WalletUnavailable(Uuid),

    /// Another writer changed the wallet under us.
    #[error("Concurrent modification detected for wallet {0}, please retry")]
    ConcurrentModification(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl WalletError {
    /// Returns true for the insufficient-balance outcome.
    #[must_use]
    pub const fn is_insufficient_hearts(&self) -> bool {
        matches!(self, Self::Ledger(err) if err.is_insufficient_hearts())
    }
}

impl From<WalletError> for AppError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::Ledger(e) => super::ledger_app_error(e),
            WalletError::ConcurrentModification(_) => Self::Conflict(err.to_string()),
            WalletError::WalletUnavailable(_) => Self::Internal(err.to_string()),
            WalletError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for crediting hearts.
#[derive(Debug, Clone)]
pub struct ChargeInput {
    /// Wallet owner.
    pub user_id: Uuid,
    /// Hearts to add; must be positive.
    pub amount: i64,
    /// CHARGE or `ADMIN_ADJUST`.
    pub transaction_type: TransactionType,
    /// Ledger description.
    pub description: String,
    /// Order that caused the credit, if any.
    pub order_id: Option<Uuid>,
    /// Opaque metadata stored as JSON text.
    pub metadata: Option<Value>,
}

/// Input for spending hearts.
#[derive(Debug, Clone)]
pub struct SpendInput {
    /// Wallet owner.
    pub user_id: Uuid,
    /// Hearts to remove; must be positive.
    pub amount: i64,
    /// Ledger description.
    pub description: String,
    /// Opaque metadata stored as JSON text.
    pub metadata: Option<Value>,
}

/// Input for an administrative balance correction.
#[derive(Debug, Clone)]
pub struct AdjustInput {
    /// Caller and their authorization decision.
    pub actor: Actor,
    /// Wallet being corrected.
    pub target_user_id: Uuid,
    /// Signed change: positive credits, negative debits.
    pub delta: i64,
    /// Why the correction is made.
    pub reason: String,
    /// Extra context stored with the ledger entry.
    pub metadata: Option<Value>,
}

/// Ledger entry fields written alongside a balance change.
#[derive(Debug, Clone, Default)]
pub(crate) struct EntryDetails {
    pub description: Option<String>,
    pub order_id: Option<Uuid>,
    pub metadata: Option<Value>,
}

/// Wallet repository for balance reads and mutations.
#[derive(Debug, Clone)]
pub struct WalletRepository {
    db: DatabaseConnection,
}

impl WalletRepository {
    /// Creates a new wallet repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the current balance without locking; 0 when the user has no wallet.
    ///
    /// Does not create a wallet.
    pub async fn get_balance(&self, user_id: Uuid) -> Result<i64, WalletError> {
        let wallet = heart_wallets::Entity::find_by_id(user_id).one(&self.db).await?;
        Ok(wallet.map_or(0, |w| w.balance))
    }

    /// Returns the user's wallet, creating an empty one if needed.
    ///
    /// Concurrent first calls are resolved by the primary key: losers of the
    /// insert race see a conflict and re-read the winner's row.
    pub async fn ensure_wallet(&self, user_id: Uuid) -> Result<heart_wallets::Model, WalletError> {
        if let Some(wallet) = heart_wallets::Entity::find_by_id(user_id).one(&self.db).await? {
            return Ok(wallet);
        }

        if insert_wallet_if_absent(&self.db, user_id).await? {
            info!(user_id = %user_id, "Wallet created");
        }

        heart_wallets::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(WalletError::WalletUnavailable(user_id))
    }

    /// Credits hearts to a wallet and records the ledger entry atomically.
    ///
    /// # Errors
    ///
    /// - `LedgerError::NonPositiveAmount` if `amount <= 0`
    /// - `LedgerError::InvalidTransactionType` for SPEND
    pub async fn charge_hearts(
        &self,
        input: ChargeInput,
    ) -> Result<heart_transactions::Model, WalletError> {
        let amount = HeartAmount::new(input.amount)?;

        let txn = self.db.begin().await?;
        let entry = credit_in_txn(
            &txn,
            input.user_id,
            amount,
            input.transaction_type,
            EntryDetails {
                description: Some(input.description),
                order_id: input.order_id,
                metadata: input.metadata,
            },
        )
        .await?;
        txn.commit().await?;

        Ok(entry)
    }

    /// Debits hearts from a wallet and records a SPEND entry atomically.
    ///
    /// The balance check runs under the wallet lock; a rejected spend writes nothing.
    ///
    /// # Errors
    ///
    /// - `LedgerError::NonPositiveAmount` if `amount <= 0`
    /// - `LedgerError::InsufficientHearts` if the balance cannot cover `amount`
    pub async fn spend_hearts(
        &self,
        input: SpendInput,
    ) -> Result<heart_transactions::Model, WalletError> {
        let amount = HeartAmount::new(input.amount)?;

        let txn = self.db.begin().await?;
        let wallet = lock_wallet(&txn, input.user_id).await?;

        let posting =
            match LedgerService::debit(wallet.balance, wallet.version, amount, TransactionType::Spend)
            {
                Ok(posting) => posting,
                Err(err) => {
                    warn!(user_id = %input.user_id, requested = amount.get(), balance = wallet.balance, "Spend rejected");
                    return Err(err.into());
                }
            };

        let entry = write_posting(
            &txn,
            &wallet,
            posting,
            EntryDetails {
                description: Some(input.description),
                order_id: None,
                metadata: input.metadata,
            },
        )
        .await?;
        txn.commit().await?;

        Ok(entry)
    }

    /// Advisory pre-check that the wallet holds at least `amount` hearts.
    ///
    /// Takes no lock; `spend_hearts` repeats the check authoritatively.
    ///
    /// # Errors
    ///
    /// - `LedgerError::NonPositiveAmount` if `amount <= 0`
    /// - `LedgerError::InsufficientHearts` if the balance is lower
    pub async fn assert_sufficient_balance(
        &self,
        user_id: Uuid,
        amount: i64,
    ) -> Result<(), WalletError> {
        let amount = HeartAmount::new(amount)?;
        let balance = self.get_balance(user_id).await?;
        LedgerService::check_sufficient(balance, amount)?;
        Ok(())
    }

    /// Applies an administrative correction, always recorded as `ADMIN_ADJUST`.
    ///
    /// Every attempt, including forbidden and rejected ones, writes an audit
    /// record in its own unit after the ledger unit has finished.
    ///
    /// # Errors
    ///
    /// - `LedgerError::Forbidden` if the actor is not an administrator
    /// - `LedgerError::ZeroAdjustment` / `LedgerError::Required` on validation failure
    /// - `LedgerError::InsufficientHearts` if a debit would go negative
    pub async fn adjust_hearts(
        &self,
        input: AdjustInput,
    ) -> Result<heart_transactions::Model, WalletError> {
        let result = self.apply_adjustment(&input).await;

        let (outcome, transaction_id) = match &result {
            Ok(entry) => (AdjustmentOutcome::Applied, Some(entry.id)),
            Err(WalletError::Ledger(err)) => (AdjustmentOutcome::from_error(err), None),
            Err(_) => (AdjustmentOutcome::Failed, None),
        };
        let reason = input.reason.trim();
        let detail = match &result {
            Ok(_) => reason.to_string(),
            Err(err) if reason.is_empty() => err.to_string(),
            Err(err) => format!("{reason} ({err})"),
        };

        let audit = AuditRepository::new(self.db.clone())
            .record(CreateAuditInput {
                actor_id: input.actor.id,
                action: ADJUST_ACTION.to_string(),
                target_user_id: input.target_user_id,
                delta: input.delta,
                detail,
                outcome,
                transaction_id,
            })
            .await;
        if let Err(err) = audit {
            error!(
                actor_id = %input.actor.id,
                target_user_id = %input.target_user_id,
                error = %err,
                "Failed to write admin audit record"
            );
        }

        match &result {
            Ok(entry) => info!(
                actor_id = %input.actor.id,
                target_user_id = %input.target_user_id,
                delta = input.delta,
                balance_after = entry.balance_after,
                "Admin adjustment applied"
            ),
            Err(err) => warn!(
                actor_id = %input.actor.id,
                target_user_id = %input.target_user_id,
                delta = input.delta,
                error = %err,
                "Admin adjustment not applied"
            ),
        }

        result
    }

    async fn apply_adjustment(
        &self,
        input: &AdjustInput,
    ) -> Result<heart_transactions::Model, WalletError> {
        let adjustment = input.actor.authorize_adjustment(input.delta, &input.reason)?;

        let mut metadata = json!({
            "actorId": input.actor.id.to_string(),
            "reason": input.reason.trim(),
        });
        if let Some(extra) = &input.metadata {
            metadata["context"] = extra.clone();
        }

        let txn = self.db.begin().await?;
        let wallet = lock_wallet(&txn, input.target_user_id).await?;
        let posting = LedgerService::adjust(wallet.balance, wallet.version, adjustment)?;
        let entry = write_posting(
            &txn,
            &wallet,
            posting,
            EntryDetails {
                description: Some(format!("Admin adjustment: {}", input.reason.trim())),
                order_id: None,
                metadata: Some(metadata),
            },
        )
        .await?;
        txn.commit().await?;

        Ok(entry)
    }

    /// Returns the newest `limit` ledger entries for a user.
    pub async fn recent_transactions(
        &self,
        user_id: Uuid,
        limit: u64,
    ) -> Result<Vec<heart_transactions::Model>, WalletError> {
        let entries = heart_transactions::Entity::find()
            .filter(heart_transactions::Column::UserId.eq(user_id))
            .order_by_desc(heart_transactions::Column::WalletVersion)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(entries)
    }

    /// Returns one page of a user's ledger, newest first, with the total count.
    pub async fn list_transactions(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<(Vec<heart_transactions::Model>, u64), WalletError> {
        let paginator = heart_transactions::Entity::find()
            .filter(heart_transactions::Column::UserId.eq(user_id))
            .order_by_desc(heart_transactions::Column::WalletVersion)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let entries = paginator.fetch_page(page.index()).await?;
        Ok((entries, total))
    }

    /// Compares the stored balance with the ledger that should explain it.
    ///
    /// Runs in one transaction under a shared lock on the wallet row so the
    /// balance and the ledger are read from the same state.
    pub async fn reconcile(&self, user_id: Uuid) -> Result<Reconciliation, WalletError> {
        let txn = self.db.begin().await?;

        let balance = heart_wallets::Entity::find_by_id(user_id)
            .lock_shared()
            .one(&txn)
            .await?
            .map_or(0, |w| w.balance);

        let amounts: Vec<i64> = heart_transactions::Entity::find()
            .select_only()
            .column(heart_transactions::Column::Amount)
            .filter(heart_transactions::Column::UserId.eq(user_id))
            .into_tuple()
            .all(&txn)
            .await?;

        let latest = heart_transactions::Entity::find()
            .filter(heart_transactions::Column::UserId.eq(user_id))
            .order_by_desc(heart_transactions::Column::WalletVersion)
            .one(&txn)
            .await?
            .map(|entry| entry.balance_after);

        txn.commit().await?;

        let report = LedgerService::reconcile(balance, &amounts, latest)?;
        if !report.is_consistent() {
            error!(
                user_id = %user_id,
                balance = report.balance,
                ledger_sum = report.ledger_sum,
                latest_balance_after = ?report.latest_balance_after,
                "Wallet does not reconcile with its ledger"
            );
        }
        Ok(report)
    }
}

/// Inserts an empty wallet unless one exists. Returns true if this call created it.
pub(crate) async fn insert_wallet_if_absent<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
) -> Result<bool, DbErr> {
    let now = Utc::now().into();
    let wallet = heart_wallets::ActiveModel {
        user_id: Set(user_id),
        balance: Set(0),
        version: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let result = heart_wallets::Entity::insert(wallet)
        .on_conflict(
            OnConflict::column(heart_wallets::Column::UserId)
                .do_nothing()
                .to_owned(),
        )
        .do_nothing()
        .exec(conn)
        .await?;

    Ok(matches!(result, TryInsertResult::Inserted(_)))
}

/// Loads the wallet row with `SELECT ... FOR UPDATE`, creating it first if absent.
pub(crate) async fn lock_wallet(
    txn: &DatabaseTransaction,
    user_id: Uuid,
) -> Result<heart_wallets::Model, WalletError> {
    let locked = heart_wallets::Entity::find_by_id(user_id)
        .lock_exclusive()
        .one(txn)
        .await?;
    if let Some(wallet) = locked {
        return Ok(wallet);
    }

    insert_wallet_if_absent(txn, user_id).await?;

    heart_wallets::Entity::find_by_id(user_id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(WalletError::WalletUnavailable(user_id))
}

/// Credits a wallet inside an existing transaction.
///
/// Used by `charge_hearts` and by order confirmation, which must flip the
/// order and credit the wallet in the same unit.
pub(crate) async fn credit_in_txn(
    txn: &DatabaseTransaction,
    user_id: Uuid,
    amount: HeartAmount,
    transaction_type: TransactionType,
    details: EntryDetails,
) -> Result<heart_transactions::Model, WalletError> {
    let wallet = lock_wallet(txn, user_id).await?;
    let posting = LedgerService::credit(wallet.balance, wallet.version, amount, transaction_type)?;
    write_posting(txn, &wallet, posting, details).await
}

/// Persists a computed posting: wallet update plus ledger entry.
async fn write_posting(
    txn: &DatabaseTransaction,
    wallet: &heart_wallets::Model,
    posting: Posting,
    details: EntryDetails,
) -> Result<heart_transactions::Model, WalletError> {
    let now = Utc::now();

    // Version guard: the row is locked, so a mismatch means the lock was not honored.
    let updated = heart_wallets::Entity::update_many()
        .col_expr(heart_wallets::Column::Balance, Expr::value(posting.balance_after))
        .col_expr(heart_wallets::Column::Version, Expr::value(posting.wallet_version))
        .col_expr(heart_wallets::Column::UpdatedAt, Expr::value(now.fixed_offset()))
        .filter(heart_wallets::Column::UserId.eq(wallet.user_id))
        .filter(heart_wallets::Column::Version.eq(wallet.version))
        .exec(txn)
        .await?;
    if updated.rows_affected != 1 {
        return Err(WalletError::ConcurrentModification(wallet.user_id));
    }

    let entry = heart_transactions::ActiveModel {
        id: Set(Uuid::now_v7()),
        user_id: Set(wallet.user_id),
        order_id: Set(details.order_id),
        amount: Set(posting.amount),
        balance_after: Set(posting.balance_after),
        wallet_version: Set(posting.wallet_version),
        transaction_type: Set(posting.transaction_type.into()),
        description: Set(details.description),
        metadata: Set(encode_metadata(details.metadata.as_ref())),
        created_at: Set(now.into()),
    }
    .insert(txn)
    .await?;

    info!(
        user_id = %wallet.user_id,
        transaction_id = %entry.id,
        transaction_type = %posting.transaction_type,
        amount = posting.amount,
        balance_after = posting.balance_after,
        wallet_version = posting.wallet_version,
        "Ledger entry recorded"
    );

    Ok(entry)
}

/// Serializes metadata to JSON text; unserializable metadata is dropped with a warning.
pub(crate) fn encode_metadata(metadata: Option<&Value>) -> Option<String> {
    metadata.and_then(|value| {
        serde_json::to_string(value)
            .map_err(|err| warn!(error = %err, "Failed to serialize metadata, storing none"))
            .ok()
    })
}
