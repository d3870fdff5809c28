//! Closed enums stored as strings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use hearts_core::billing::OrderStatus as CoreOrderStatus;
use hearts_core::ledger::{AdjustmentOutcome, TransactionType as CoreTransactionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    #[sea_orm(string_value = "CHARGE")]
    Charge,
    #[sea_orm(string_value = "SPEND")]
    Spend,
    #[sea_orm(string_value = "ADMIN_ADJUST")]
    AdminAdjust,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "PAID")]
    Paid,
    #[sea_orm(string_value = "CANCELED")]
    Canceled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditOutcome {
    #[sea_orm(string_value = "APPLIED")]
    Applied,
    #[sea_orm(string_value = "FORBIDDEN")]
    Forbidden,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
    #[sea_orm(string_value = "FAILED")]
    Failed,
}

impl From<CoreTransactionType> for TransactionType {
    fn from(value: CoreTransactionType) -> Self {
        match value {
            CoreTransactionType::Charge => Self::Charge,
            CoreTransactionType::Spend => Self::Spend,
            CoreTransactionType::AdminAdjust => Self::AdminAdjust,
        }
    }
}

impl From<TransactionType> for CoreTransactionType {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Charge => Self::Charge,
            TransactionType::Spend => Self::Spend,
            TransactionType::AdminAdjust => Self::AdminAdjust,
        }
    }
}

impl From<CoreOrderStatus> for OrderStatus {
    fn from(value: CoreOrderStatus) -> Self {
        match value {
            CoreOrderStatus::Pending => Self::Pending,
            CoreOrderStatus::Paid => Self::Paid,
            CoreOrderStatus::Canceled => Self::Canceled,
        }
    }
}

impl From<OrderStatus> for CoreOrderStatus {
    fn from(value: OrderStatus) -> Self {
        match value {
            OrderStatus::Pending => Self::Pending,
            OrderStatus::Paid => Self::Paid,
            OrderStatus::Canceled => Self::Canceled,
        }
    }
}

impl From<AdjustmentOutcome> for AuditOutcome {
    fn from(value: AdjustmentOutcome) -> Self {
        match value {
            AdjustmentOutcome::Applied => Self::Applied,
            AdjustmentOutcome::Forbidden => Self::Forbidden,
            AdjustmentOutcome::Rejected => Self::Rejected,
            AdjustmentOutcome::Failed => Self::Failed,
        }
    }
}
