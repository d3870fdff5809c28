//! Ledger service for balance arithmetic.
//!
//! Every wallet mutation is computed here before it is persisted: the
//! repository reads the locked wallet row, asks `LedgerService` for a
//! [`Posting`], then writes the wallet and the ledger entry in one unit.

use super::error::LedgerError;
use super::types::{Adjustment, HeartAmount, Posting, Reconciliation, TransactionType};

/// Ledger service for balance arithmetic.
///
/// Pure business logic with no database dependencies.
pub struct LedgerService;

impl LedgerService {
    /// Computes a credit of `amount` hearts on a wallet.
    ///
    /// # Arguments
    ///
    /// * `balance` - Current (locked) wallet balance
    /// * `version` - Current wallet version
    /// * `amount` - Hearts to add
    /// * `transaction_type` - Must be a credit type (CHARGE or `ADMIN_ADJUST`)
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidTransactionType` for SPEND and
    /// `LedgerError::BalanceOverflow` if the new balance does not fit.
    pub fn credit(
        balance: i64,
        version: i64,
        amount: HeartAmount,
        transaction_type: TransactionType,
    ) -> Result<Posting, LedgerError> {
        if !transaction_type.allows_credit() {
            return Err(LedgerError::InvalidTransactionType {
                transaction_type,
                direction: "credit",
            });
        }

        let balance_after = balance
            .checked_add(amount.get())
            .ok_or(LedgerError::BalanceOverflow)?;

        Ok(Posting {
            transaction_type,
            amount: amount.get(),
            balance_after,
            wallet_version: Self::next_version(version)?,
        })
    }

    /// Computes a debit of `amount` hearts on a wallet.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InsufficientHearts` if the balance is lower than
    /// `amount`, and `LedgerError::InvalidTransactionType` for CHARGE.
    pub fn debit(
        balance: i64,
        version: i64,
        amount: HeartAmount,
        transaction_type: TransactionType,
    ) -> Result<Posting, LedgerError> {
        if !transaction_type.allows_debit() {
            return Err(LedgerError::InvalidTransactionType {
                transaction_type,
                direction: "debit",
            });
        }

        Self::check_sufficient(balance, amount)?;

        Ok(Posting {
            transaction_type,
            amount: -amount.get(),
            balance_after: balance - amount.get(),
            wallet_version: Self::next_version(version)?,
        })
    }

    /// Fails with `InsufficientHearts` when `balance < amount`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InsufficientHearts` when the balance cannot cover the amount.
    pub const fn check_sufficient(balance: i64, amount: HeartAmount) -> Result<(), LedgerError> {
        if balance < amount.get() {
            return Err(LedgerError::InsufficientHearts {
                balance,
                requested: amount.get(),
            });
        }
        Ok(())
    }

    /// Routes a signed admin delta to a credit or a debit.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ZeroAdjustment` for a zero delta and
    /// `LedgerError::BalanceOverflow` for `i64::MIN`, whose magnitude has no positive form.
    pub fn route_adjustment(delta: i64) -> Result<Adjustment, LedgerError> {
        match delta {
            0 => Err(LedgerError::ZeroAdjustment),
            d if d > 0 => Ok(Adjustment::Credit(HeartAmount::new(d)?)),
            d => {
                let magnitude = d.checked_neg().ok_or(LedgerError::BalanceOverflow)?;
                Ok(Adjustment::Debit(HeartAmount::new(magnitude)?))
            }
        }
    }

    /// Applies a routed admin adjustment, always recorded as `ADMIN_ADJUST`.
    ///
    /// # Errors
    ///
    /// Same as [`LedgerService::credit`] and [`LedgerService::debit`].
    pub fn adjust(
        balance: i64,
        version: i64,
        adjustment: Adjustment,
    ) -> Result<Posting, LedgerError> {
        match adjustment {
            Adjustment::Credit(amount) => {
                Self::credit(balance, version, amount, TransactionType::AdminAdjust)
            }
            Adjustment::Debit(amount) => {
                Self::debit(balance, version, amount, TransactionType::AdminAdjust)
            }
        }
    }

    /// Builds a reconciliation report from a wallet balance and its ledger amounts.
    ///
    /// `amounts` may be in any order; `latest_balance_after` is taken from the
    /// newest entry by the caller.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::BalanceOverflow` if the ledger sum overflows.
    pub fn reconcile(
        balance: i64,
        amounts: &[i64],
        latest_balance_after: Option<i64>,
    ) -> Result<Reconciliation, LedgerError> {
        let ledger_sum = amounts
            .iter()
            .try_fold(0i64, |acc, amount| acc.checked_add(*amount))
            .ok_or(LedgerError::BalanceOverflow)?;

        Ok(Reconciliation {
            balance,
            ledger_sum,
            latest_balance_after,
            entry_count: amounts.len() as u64,
        })
    }

    fn next_version(version: i64) -> Result<i64, LedgerError> {
        version.checked_add(1).ok_or(LedgerError::BalanceOverflow)
    }
}
