//! Property-based tests for `LedgerService`.
//!
//! - Balance equals the sum of recorded amounts after any charge/spend sequence
//! - Rejected debits leave balance and history untouched
//! - Admin adjustments are always recorded as `ADMIN_ADJUST`

use proptest::prelude::*;

use super::error::LedgerError;
use super::service::LedgerService;
use super::types::{HeartAmount, TransactionType};

#[derive(Debug, Clone, Copy)]
enum Op {
    Charge(i64),
    Spend(i64),
}

/// Strategy to generate a charge or spend of 1 to 500 hearts.
fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1i64..=500).prop_map(Op::Charge),
        (1i64..=500).prop_map(Op::Spend),
    ]
}

/// In-memory wallet used to drive the service like the repository does.
#[derive(Default)]
struct Wallet {
    balance: i64,
    version: i64,
    history: Vec<(i64, i64)>,
}

impl Wallet {
    fn apply(&mut self, op: Op) -> Result<(), LedgerError> {
        let posting = match op {
            Op::Charge(n) => LedgerService::credit(
                self.balance,
                self.version,
                HeartAmount::new(n)?,
                TransactionType::Charge,
            )?,
            Op::Spend(n) => LedgerService::debit(
                self.balance,
                self.version,
                HeartAmount::new(n)?,
                TransactionType::Spend,
            )?,
        };
        self.balance = posting.balance_after;
        self.version = posting.wallet_version;
        self.history.push((posting.amount, posting.balance_after));
        Ok(())
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_balance_equals_ledger_sum(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut wallet = Wallet::default();
        for op in ops {
            let _ = wallet.apply(op);
        }

        let amounts: Vec<i64> = wallet.history.iter().map(|(a, _)| *a).collect();
        let latest = wallet.history.last().map(|(_, after)| *after);
        let rec = LedgerService::reconcile(wallet.balance, &amounts, latest).unwrap();

        prop_assert!(wallet.balance >= 0);
        prop_assert!(rec.is_consistent());
        prop_assert_eq!(wallet.version, wallet.history.len() as i64);
    }

    #[test]
    fn prop_failed_spend_changes_nothing(balance in 0i64..1000, extra in 1i64..1000) {
        let requested = balance + extra;
        let result = LedgerService::debit(
            balance,
            7,
            HeartAmount::new(requested).unwrap(),
            TransactionType::Spend,
        );
        prop_assert_eq!(
            result,
            Err(LedgerError::InsufficientHearts { balance, requested })
        );
    }

    #[test]
    fn prop_adjustments_use_admin_type(balance in 0i64..10_000, delta in -10_000i64..10_000) {
        prop_assume!(delta != 0);
        let adjustment = LedgerService::route_adjustment(delta).unwrap();
        prop_assert_eq!(adjustment.signed(), delta);

        match LedgerService::adjust(balance, 0, adjustment) {
            Ok(posting) => {
                prop_assert_eq!(posting.transaction_type, TransactionType::AdminAdjust);
                prop_assert_eq!(posting.amount, delta);
                prop_assert_eq!(posting.balance_after, balance + delta);
                prop_assert!(posting.balance_after >= 0);
            }
            Err(err) => {
                prop_assert!(err.is_insufficient_hearts());
                prop_assert!(balance + delta < 0);
            }
        }
    }
}
