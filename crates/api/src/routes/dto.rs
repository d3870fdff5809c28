//! Response bodies shared by the route modules.

use serde::Serialize;
use uuid::Uuid;

use hearts_core::billing::OrderStatus;
use hearts_core::ledger::TransactionType;
use hearts_db::entities::{billing_orders, heart_products, heart_transactions};

/// A ledger entry as shown to clients.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Entry ID.
    pub id: Uuid,
    /// CHARGE, SPEND or `ADMIN_ADJUST`.
    pub transaction_type: &'static str,
    /// Signed amount.
    pub amount: i64,
    /// Balance after this entry.
    pub balance_after: i64,
    /// Free-text description.
    pub description: Option<String>,
    /// RFC 3339 timestamp.
    pub created_at: String,
}

impl From<heart_transactions::Model> for TransactionResponse {
    fn from(model: heart_transactions::Model) -> Self {
        Self {
            id: model.id,
            transaction_type: TransactionType::from(model.transaction_type).as_str(),
            amount: model.amount,
            balance_after: model.balance_after,
            description: model.description,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// An order as shown to clients.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    /// Order ID.
    pub id: Uuid,
    /// Product code snapshot.
    pub product_code: String,
    /// Units ordered.
    pub quantity: i32,
    /// Price to pay.
    pub total_amount: i64,
    /// PENDING, PAID or CANCELED.
    pub status: &'static str,
    /// RFC 3339 creation timestamp.
    pub requested_at: String,
    /// RFC 3339 payment timestamp.
    pub paid_at: Option<String>,
}

impl From<billing_orders::Model> for OrderResponse {
    fn from(model: billing_orders::Model) -> Self {
        Self {
            id: model.id,
            product_code: model.product_code,
            quantity: model.quantity,
            total_amount: model.total_amount,
            status: OrderStatus::from(model.status).as_str(),
            requested_at: model.requested_at.to_rfc3339(),
            paid_at: model.paid_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// A purchasable bundle.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    /// Product code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Base hearts.
    pub hearts: i64,
    /// Bonus hearts.
    pub bonus_hearts: i64,
    /// `hearts + bonus_hearts`.
    pub total_hearts: i64,
    /// Price per unit.
    pub price: i64,
}

impl From<heart_products::Model> for ProductResponse {
    fn from(model: heart_products::Model) -> Self {
        let total_hearts = model.total_hearts();
        Self {
            code: model.code,
            name: model.name,
            description: model.description,
            hearts: model.hearts,
            bonus_hearts: model.bonus_hearts,
            total_hearts,
            price: model.price,
        }
    }
}
