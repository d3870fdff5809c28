//! `SeaORM` Entity for billing_orders table.
//!
//! Priced fields are snapshots taken at creation; there is no foreign key to
//! `heart_products`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::OrderStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "billing_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_code: String,
    pub quantity: i32,
    pub price_per_unit: i64,
    pub hearts_per_unit: i64,
    pub bonus_hearts_per_unit: i64,
    pub total_amount: i64,
    pub status: OrderStatus,
    pub payment_key: Option<String>,
    pub pg_provider: Option<String>,
    pub requested_at: DateTimeWithTimeZone,
    pub paid_at: Option<DateTimeWithTimeZone>,
    pub canceled_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_type = "Text", nullable)]
    pub metadata: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Snapshot of the priced fields frozen at creation.
    #[must_use]
    pub const fn snapshot(&self) -> hearts_core::billing::OrderSnapshot {
        hearts_core::billing::OrderSnapshot {
            price_per_unit: self.price_per_unit,
            hearts_per_unit: self.hearts_per_unit,
            bonus_hearts_per_unit: self.bonus_hearts_per_unit,
            quantity: self.quantity,
        }
    }
}
