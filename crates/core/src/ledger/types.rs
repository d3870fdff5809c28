//! Ledger domain types.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::LedgerError;

/// Kind of balance-affecting event recorded in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Hearts credited by a paid order.
    Charge,
    /// Hearts debited by using the paid feature.
    Spend,
    /// Manual correction by an administrator (credit or debit).
    AdminAdjust,
}

impl TransactionType {
    /// Returns the string representation stored in the ledger.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Charge => "CHARGE",
            Self::Spend => "SPEND",
            Self::AdminAdjust => "ADMIN_ADJUST",
        }
    }

    /// Returns true if entries of this type may increase a balance.
    #[must_use]
    pub const fn allows_credit(&self) -> bool {
        matches!(self, Self::Charge | Self::AdminAdjust)
    }

    /// Returns true if entries of this type may decrease a balance.
    #[must_use]
    pub const fn allows_debit(&self) -> bool {
        matches!(self, Self::Spend | Self::AdminAdjust)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A strictly positive number of hearts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct HeartAmount(i64);

impl HeartAmount {
    /// Validates that `value` is greater than zero.
    pub const fn new(value: i64) -> Result<Self, LedgerError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(LedgerError::NonPositiveAmount(value))
        }
    }

    /// Returns the number of hearts.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for HeartAmount {
    type Error = LedgerError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for HeartAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of an admin adjustment after routing its signed delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// Positive delta: hearts are added.
    Credit(HeartAmount),
    /// Negative delta: hearts are removed.
    Debit(HeartAmount),
}

impl Adjustment {
    /// Returns the signed delta this adjustment applies.
    #[must_use]
    pub const fn signed(&self) -> i64 {
        match self {
            Self::Credit(amount) => amount.get(),
            Self::Debit(amount) => -amount.get(),
        }
    }
}

/// A validated balance change, ready to be written as wallet update + ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    /// Type recorded on the ledger entry.
    pub transaction_type: TransactionType,
    /// Signed amount: positive for credits, negative for debits.
    pub amount: i64,
    /// Wallet balance after the change; stored as `balance_after`.
    pub balance_after: i64,
    /// Wallet version produced by this change.
    pub wallet_version: i64,
}

/// Result of checking a wallet against its ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    /// Balance stored on the wallet.
    pub balance: i64,
    /// Sum of all ledger amounts for the wallet.
    pub ledger_sum: i64,
    /// `balance_after` of the newest ledger entry, if any.
    pub latest_balance_after: Option<i64>,
    /// Number of ledger entries.
    pub entry_count: u64,
}

impl Reconciliation {
    /// True when the ledger fully explains the balance.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let sum_matches = self.ledger_sum == self.balance;
        let latest_matches = self
            .latest_balance_after
            .map_or(self.balance == 0, |after| after == self.balance);
        self.balance >= 0 && sum_matches && latest_matches
    }
}
