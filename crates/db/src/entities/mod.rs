//! `SeaORM` entity definitions for the hearts ledger tables.

pub mod prelude;

pub mod admin_audit_logs;
pub mod billing_orders;
pub mod heart_products;
pub mod heart_transactions;
pub mod heart_wallets;
pub mod sea_orm_active_enums;
