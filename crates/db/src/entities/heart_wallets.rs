//! `SeaORM` Entity for heart_wallets table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "heart_wallets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    pub balance: i64,
    pub version: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::heart_transactions::Entity")]
    HeartTransactions,
}

impl Related<super::heart_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HeartTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
