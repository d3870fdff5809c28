//! Core business rules for the hearts ledger.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Wallet balance arithmetic, transaction types, admin adjustments
//! - `billing` - Product snapshots and the order state machine

pub mod billing;
pub mod ledger;
