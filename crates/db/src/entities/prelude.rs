//! Entity re-exports.

pub use super::admin_audit_logs::Entity as AdminAuditLogs;
pub use super::billing_orders::Entity as BillingOrders;
pub use super::heart_products::Entity as HeartProducts;
pub use super::heart_transactions::Entity as HeartTransactions;
pub use super::heart_wallets::Entity as HeartWallets;
