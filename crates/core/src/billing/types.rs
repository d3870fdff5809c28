//! Billing domain types.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::BillingError;

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Created, waiting for payment confirmation.
    Pending,
    /// Payment confirmed and hearts granted.
    Paid,
    /// Abandoned before payment.
    Canceled,
}

impl OrderStatus {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Canceled => "CANCELED",
        }
    }

    /// PAID and CANCELED never change again.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns true if the status machine allows moving to `next`.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Paid | Self::Canceled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog fields needed to draft an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInfo {
    /// Product code.
    pub code: String,
    /// Base hearts per unit.
    pub hearts: i64,
    /// Bonus hearts per unit.
    pub bonus_hearts: i64,
    /// Price per unit in the smallest currency unit.
    pub price: i64,
    /// Whether the product can be ordered.
    pub is_active: bool,
}

impl ProductInfo {
    /// Hearts granted per unit.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::AmountOverflow` if the sum overflows.
    pub fn total_hearts(&self) -> Result<i64, BillingError> {
        self.hearts
            .checked_add(self.bonus_hearts)
            .ok_or(BillingError::AmountOverflow)
    }
}

/// Fields frozen onto an order when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSnapshot {
    /// Price per unit at creation time.
    pub price_per_unit: i64,
    /// Base hearts per unit at creation time.
    pub hearts_per_unit: i64,
    /// Bonus hearts per unit at creation time.
    pub bonus_hearts_per_unit: i64,
    /// Units ordered (at least 1).
    pub quantity: i32,
}

impl OrderSnapshot {
    /// `(hearts_per_unit + bonus_hearts_per_unit) * quantity`.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::AmountOverflow` on overflow.
    pub fn grantable_hearts(&self) -> Result<i64, BillingError> {
        self.hearts_per_unit
            .checked_add(self.bonus_hearts_per_unit)
            .and_then(|per_unit| per_unit.checked_mul(i64::from(self.quantity)))
            .ok_or(BillingError::AmountOverflow)
    }

    /// `price_per_unit * quantity`.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::AmountOverflow` on overflow.
    pub fn total_amount(&self) -> Result<i64, BillingError> {
        self.price_per_unit
            .checked_mul(i64::from(self.quantity))
            .ok_or(BillingError::AmountOverflow)
    }
}

/// A validated order ready to be inserted as PENDING.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    /// Product code the order was drafted from.
    pub product_code: String,
    /// Frozen catalog values.
    pub snapshot: OrderSnapshot,
    /// `price_per_unit * quantity`.
    pub total_amount: i64,
}

/// Payment identifiers recorded when an order is confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReference {
    /// Gateway payment key.
    pub payment_key: String,
    /// Payment provider name.
    pub pg_provider: String,
}
