//! `SeaORM` Entity for heart_transactions table.
//!
//! Rows are append-only: repositories insert them and never update or delete.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::TransactionType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "heart_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_id: Option<Uuid>,
    pub amount: i64,
    pub balance_after: i64,
    pub wallet_version: i64,
    pub transaction_type: TransactionType,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub metadata: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::heart_wallets::Entity",
        from = "Column::UserId",
        to = "super::heart_wallets::Column::UserId"
    )]
    HeartWallets,
}

impl Related<super::heart_wallets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HeartWallets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
