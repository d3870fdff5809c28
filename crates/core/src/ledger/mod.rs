//! Hearts ledger rules.
//!
//! This module implements the balance side of the ledger:
//! - Transaction types recorded in the append-only log
//! - Positive heart amounts
//! - Balance arithmetic for credits and debits (never below zero)
//! - Routing of admin adjustments and their authorization
//! - Reconciliation of a wallet against its ledger

pub mod admin;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use admin::{Actor, AdjustmentOutcome};
pub use error::LedgerError;
pub use service::LedgerService;
pub use types::{Adjustment, HeartAmount, Posting, Reconciliation, TransactionType};
