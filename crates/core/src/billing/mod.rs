//! Purchase workflow rules.
//!
//! Orders snapshot the catalog at creation time and move through a small
//! state machine: `PENDING -> PAID` or `PENDING -> CANCELED`. Only the paid
//! transition grants hearts.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::BillingError;
pub use service::BillingService;
pub use types::{OrderDraft, OrderSnapshot, OrderStatus, PaymentReference, ProductInfo};
