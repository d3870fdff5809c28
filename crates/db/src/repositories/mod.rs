//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod audit;
pub mod order;
pub mod product;
pub mod wallet;

pub use audit::{AuditRepository, CreateAuditInput};
pub use order::{ConfirmPaymentInput, ConfirmedOrder, CreateOrderInput, OrderError, OrderRepository};
pub use product::{ProductError, ProductRepository, UpsertProductInput};
pub use wallet::{AdjustInput, ChargeInput, SpendInput, WalletError, WalletRepository};

use hearts_core::billing::BillingError;
use hearts_core::ledger::LedgerError;
use hearts_shared::AppError;

/// Maps a ledger rule violation onto the application error taxonomy.
pub(crate) fn ledger_app_error(err: LedgerError) -> AppError {
    match err {
        LedgerError::InsufficientHearts { .. } => AppError::InsufficientHearts(err.to_string()),
        LedgerError::Forbidden => AppError::Forbidden(err.to_string()),
        LedgerError::NonPositiveAmount(_)
        | LedgerError::ZeroAdjustment
        | LedgerError::Required(_)
        | LedgerError::InvalidTransactionType { .. }
        | LedgerError::BalanceOverflow => AppError::Validation(err.to_string()),
    }
}

/// Maps an order workflow violation onto the application error taxonomy.
pub(crate) fn billing_app_error(err: BillingError) -> AppError {
    match err {
        BillingError::ProductInactive(_) => AppError::Conflict(err.to_string()),
        BillingError::AlreadyProcessed { .. } => AppError::AlreadyProcessed(err.to_string()),
        BillingError::Required(_)
        | BillingError::EmptyProduct(_)
        | BillingError::InvalidProduct(_)
        | BillingError::AmountOverflow => AppError::Validation(err.to_string()),
    }
}
