//! Billing order repository.
//!
//! Confirmation locks the order row, then the wallet row, and commits the
//! PAID flip together with the CHARGE ledger entry.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, sea_query::Expr,
};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use hearts_core::billing::{BillingError, BillingService, OrderStatus as CoreOrderStatus};
use hearts_core::ledger::{HeartAmount, TransactionType};
use hearts_shared::AppError;
use hearts_shared::types::PageRequest;

use crate::entities::{billing_orders, heart_products, heart_transactions};
use crate::entities::sea_orm_active_enums::OrderStatus;
use crate::repositories::wallet::{EntryDetails, WalletError, credit_in_txn};

/// Error types for order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Order not found, or owned by someone else.
    #[error("Order not found: {0}")]
    NotFound(Uuid),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Workflow rule violated.
    #[error(transparent)]
    Billing(#[from] BillingError),

    /// Crediting the wallet failed.
    #[error(transparent)]
    Wallet(#[from] WalletError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(_) | OrderError::ProductNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            OrderError::Billing(e) => super::billing_app_error(e),
            OrderError::Wallet(e) => e.into(),
            OrderError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating an order.
#[derive(Debug, Clone)]
pub struct CreateOrderInput {
    /// Buyer.
    pub user_id: Uuid,
    /// Product to buy.
    pub product_code: String,
    /// Units; values below 1 are treated as 1.
    pub quantity: i32,
}

/// Input for confirming a payment.
#[derive(Debug, Clone)]
pub struct ConfirmPaymentInput {
    /// Buyer; the order must belong to them.
    pub user_id: Uuid,
    /// Order to confirm.
    pub order_id: Uuid,
    /// Gateway payment key; defaults to `TEST-<orderId>`.
    pub payment_key: Option<String>,
    /// Payment provider; defaults to `MOCK`.
    pub pg_provider: Option<String>,
}

/// A paid order together with the credit it produced.
#[derive(Debug, Clone)]
pub struct ConfirmedOrder {
    /// The order, now PAID.
    pub order: billing_orders::Model,
    /// The CHARGE ledger entry.
    pub transaction: heart_transactions::Model,
}

/// Billing order repository.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    db: DatabaseConnection,
}

impl OrderRepository {
    /// Creates a new order repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a PENDING order, snapshotting the product's price and hearts.
    ///
    /// # Errors
    ///
    /// - `BillingError::Required` if the product code is blank
    /// - `OrderError::ProductNotFound` if the product does not exist
    /// - `BillingError::ProductInactive` if it cannot be ordered
    /// - `BillingError::AmountOverflow` if totals overflow
    pub async fn create_order(
        &self,
        input: CreateOrderInput,
    ) -> Result<billing_orders::Model, OrderError> {
        let code = BillingService::requested_product_code(&input.product_code)?;
        let product = heart_products::Entity::find_by_id(code.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| OrderError::ProductNotFound(code.to_string()))?;

        let draft = BillingService::draft_order(&(&product).into(), input.quantity)?;

        let order = billing_orders::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(input.user_id),
            product_code: Set(draft.product_code),
            quantity: Set(draft.snapshot.quantity),
            price_per_unit: Set(draft.snapshot.price_per_unit),
            hearts_per_unit: Set(draft.snapshot.hearts_per_unit),
            bonus_hearts_per_unit: Set(draft.snapshot.bonus_hearts_per_unit),
            total_amount: Set(draft.total_amount),
            status: Set(OrderStatus::Pending),
            payment_key: Set(None),
            pg_provider: Set(None),
            requested_at: Set(Utc::now().into()),
            paid_at: Set(None),
            canceled_at: Set(None),
            metadata: Set(None),
        }
        .insert(&self.db)
        .await?;

        info!(
            order_id = %order.id,
            user_id = %order.user_id,
            product_code = %order.product_code,
            quantity = order.quantity,
            total_amount = order.total_amount,
            "Order created"
        );
        Ok(order)
    }

    /// Marks a PENDING order as PAID and credits its hearts, atomically.
    ///
    /// # Errors
    ///
    /// - `OrderError::NotFound` if the order does not exist for this user
    /// - `BillingError::AlreadyProcessed` if the order is not PENDING
    pub async fn confirm_payment(
        &self,
        input: ConfirmPaymentInput,
    ) -> Result<ConfirmedOrder, OrderError> {
        let txn = self.db.begin().await?;

        let order = billing_orders::Entity::find_by_id(input.order_id)
            .filter(billing_orders::Column::UserId.eq(input.user_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(OrderError::NotFound(input.order_id))?;

        if let Err(err) = BillingService::confirm(order.status.into()) {
            warn!(order_id = %order.id, status = ?order.status, "Confirmation rejected");
            return Err(err.into());
        }

        let hearts = order
            .snapshot()
            .grantable_hearts()
            .map_err(OrderError::Billing)
            .and_then(|h| HeartAmount::new(h).map_err(|e| OrderError::Wallet(e.into())))?;
        let reference = BillingService::payment_reference(
            order.id,
            input.payment_key.as_deref(),
            input.pg_provider.as_deref(),
        );
        let now = Utc::now().fixed_offset();

        // Status guard: only a PENDING row may flip.
        let updated = billing_orders::Entity::update_many()
            .col_expr(billing_orders::Column::Status, Expr::value(OrderStatus::Paid))
            .col_expr(billing_orders::Column::PaidAt, Expr::value(now))
            .col_expr(billing_orders::Column::PaymentKey, Expr::value(reference.payment_key))
            .col_expr(billing_orders::Column::PgProvider, Expr::value(reference.pg_provider))
            .filter(billing_orders::Column::Id.eq(order.id))
            .filter(billing_orders::Column::Status.eq(OrderStatus::Pending))
            .exec(&txn)
            .await?;
        if updated.rows_affected != 1 {
            return Err(BillingError::AlreadyProcessed {
                status: CoreOrderStatus::Paid,
            }
            .into());
        }

        let transaction = credit_in_txn(
            &txn,
            order.user_id,
            hearts,
            TransactionType::Charge,
            EntryDetails {
                description: Some(BillingService::charge_description(order.id)),
                order_id: Some(order.id),
                metadata: Some(BillingService::charge_metadata(
                    order.id,
                    &order.product_code,
                    order.quantity,
                )),
            },
        )
        .await?;

        let order = billing_orders::Entity::find_by_id(order.id)
            .one(&txn)
            .await?
            .ok_or(OrderError::NotFound(order.id))?;

        txn.commit().await?;

        info!(
            order_id = %order.id,
            user_id = %order.user_id,
            hearts = transaction.amount,
            balance_after = transaction.balance_after,
            "Order paid"
        );
        Ok(ConfirmedOrder { order, transaction })
    }

    /// Cancels a PENDING order. Never touches the ledger.
    ///
    /// # Errors
    ///
    /// - `OrderError::NotFound` if the order does not exist for this user
    /// - `BillingError::AlreadyProcessed` if the order is not PENDING
    pub async fn cancel_order(
        &self,
        user_id: Uuid,
        order_id: Uuid,
    ) -> Result<billing_orders::Model, OrderError> {
        let txn = self.db.begin().await?;

        let order = billing_orders::Entity::find_by_id(order_id)
            .filter(billing_orders::Column::UserId.eq(user_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(OrderError::NotFound(order_id))?;

        BillingService::cancel(order.status.into())?;

        let mut active: billing_orders::ActiveModel = order.into();
        active.status = Set(OrderStatus::Canceled);
        active.canceled_at = Set(Some(Utc::now().into()));
        let order = active.update(&txn).await?;

        txn.commit().await?;

        info!(order_id = %order.id, user_id = %order.user_id, "Order canceled");
        Ok(order)
    }

    /// Finds one of the user's orders.
    pub async fn get_order(
        &self,
        user_id: Uuid,
        order_id: Uuid,
    ) -> Result<billing_orders::Model, OrderError> {
        billing_orders::Entity::find_by_id(order_id)
            .filter(billing_orders::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(OrderError::NotFound(order_id))
    }

    /// Returns the user's newest `limit` orders.
    pub async fn recent_orders(
        &self,
        user_id: Uuid,
        limit: u64,
    ) -> Result<Vec<billing_orders::Model>, OrderError> {
        let orders = billing_orders::Entity::find()
            .filter(billing_orders::Column::UserId.eq(user_id))
            .order_by_desc(billing_orders::Column::RequestedAt)
            .order_by_desc(billing_orders::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(orders)
    }

    /// Returns one page of the user's orders, newest first, with the total count.
    pub async fn list_orders(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<(Vec<billing_orders::Model>, u64), OrderError> {
        let paginator = billing_orders::Entity::find()
            .filter(billing_orders::Column::UserId.eq(user_id))
            .order_by_desc(billing_orders::Column::RequestedAt)
            .order_by_desc(billing_orders::Column::Id)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let orders = paginator.fetch_page(page.index()).await?;
        Ok((orders, total))
    }
}
