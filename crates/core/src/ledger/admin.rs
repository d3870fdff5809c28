//! Admin adjustment authorization and audit outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::error::LedgerError;
use super::service::LedgerService;
use super::types::Adjustment;

/// Audit action name for manual balance corrections.
pub const ADJUST_ACTION: &str = "WALLET_ADJUST";

/// The caller of an administrative operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// Authenticated user id.
    pub id: Uuid,
    /// Result of the authorization decision made at the boundary.
    pub is_admin: bool,
}

impl Actor {
    /// Creates an actor.
    #[must_use]
    pub const fn new(id: Uuid, is_admin: bool) -> Self {
        Self { id, is_admin }
    }

    /// Validates an adjustment request for this actor.
    ///
    /// Checks run in order: authorization, then delta, then reason.
    ///
    /// # Errors
    ///
    /// - `LedgerError::Forbidden` if the actor is not an administrator
    /// - `LedgerError::ZeroAdjustment` if `delta == 0`
    /// - `LedgerError::Required` if `reason` is blank
    pub fn authorize_adjustment(&self, delta: i64, reason: &str) -> Result<Adjustment, LedgerError> {
        if !self.is_admin {
            return Err(LedgerError::Forbidden);
        }
        let adjustment = LedgerService::route_adjustment(delta)?;
        if reason.trim().is_empty() {
            return Err(LedgerError::Required("reason"));
        }
        Ok(adjustment)
    }
}

/// Outcome stored on every admin audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdjustmentOutcome {
    /// The ledger entry was committed.
    Applied,
    /// The actor was not an administrator.
    Forbidden,
    /// The request failed validation or the balance check.
    Rejected,
    /// The ledger unit failed for an internal reason.
    Failed,
}

impl AdjustmentOutcome {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "APPLIED",
            Self::Forbidden => "FORBIDDEN",
            Self::Rejected => "REJECTED",
            Self::Failed => "FAILED",
        }
    }

    /// Classifies a ledger error into an audit outcome.
    #[must_use]
    pub const fn from_error(err: &LedgerError) -> Self {
        match err {
            LedgerError::Forbidden => Self::Forbidden,
            _ => Self::Rejected,
        }
    }
}

impl fmt::Display for AdjustmentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
