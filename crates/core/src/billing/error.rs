//! Billing error types.

use thiserror::Error;

use super::types::OrderStatus;

/// Errors raised by the order workflow rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BillingError {
    /// A required field was blank.
    #[error("{0} is required")]
    Required(&'static str),

    /// The product exists but cannot be ordered.
    #[error("Product {0} is not available for purchase")]
    ProductInactive(String),

    /// The product would grant no hearts.
    #[error("Product {0} grants no hearts")]
    EmptyProduct(String),

    /// A product field is out of range.
    #[error("Invalid product: {0}")]
    InvalidProduct(String),

    /// The order already left PENDING.
    #[error("Order already processed (status {status})")]
    AlreadyProcessed {
        /// Current status of the order.
        status: OrderStatus,
    },

    /// Price or hearts multiplied by quantity overflowed.
    #[error("Order amount overflow")]
    AmountOverflow,
}
