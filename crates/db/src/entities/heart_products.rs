//! `SeaORM` Entity for heart_products table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "heart_products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub hearts: i64,
    pub bonus_hearts: i64,
    pub price: i64,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Hearts granted per unit, saturating on overflow.
    #[must_use]
    pub const fn total_hearts(&self) -> i64 {
        self.hearts.saturating_add(self.bonus_hearts)
    }
}

impl From<&Model> for hearts_core::billing::ProductInfo {
    fn from(model: &Model) -> Self {
        Self {
            code: model.code.clone(),
            hearts: model.hearts,
            bonus_hearts: model.bonus_hearts,
            price: model.price,
            is_active: model.is_active,
        }
    }
}
