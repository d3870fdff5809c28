//! Ledger error types.

use thiserror::Error;

use super::types::TransactionType;

/// Errors that can occur while validating or applying a balance change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Heart amounts must be strictly positive.
    #[error("Heart amount must be positive, got {0}")]
    NonPositiveAmount(i64),

    /// An admin adjustment of zero hearts is meaningless.
    #[error("Adjustment delta must not be zero")]
    ZeroAdjustment,

    /// A required free-text field was blank.
    #[error("{0} is required")]
    Required(&'static str),

    /// The transaction type cannot be used for this kind of balance change.
    #[error("Transaction type {transaction_type} cannot be used for a {direction}")]
    InvalidTransactionType {
        /// The rejected type.
        transaction_type: TransactionType,
        /// "credit" or "debit".
        direction: &'static str,
    },

    /// The resulting balance does not fit the storage type.
    #[error("Balance overflow")]
    BalanceOverflow,

    // ========== Business Errors ==========
    /// The wallet does not hold enough hearts for the debit.
    #[error("Insufficient hearts: balance {balance}, requested {requested}")]
    InsufficientHearts {
        /// Balance at the time of the check.
        balance: i64,
        /// Hearts the caller tried to debit.
        requested: i64,
    },

    // ========== Authorization Errors ==========
    /// The caller is not allowed to adjust balances.
    #[error("Only administrators can adjust heart balances")]
    Forbidden,
}

impl LedgerError {
    /// Returns true for the insufficient-balance outcome callers are expected to handle.
    #[must_use]
    pub const fn is_insufficient_hearts(&self) -> bool {
        matches!(self, Self::InsufficientHearts { .. })
    }
}
