//! Property-based tests for `BillingService`.
//!
//! - Grantable hearts are fixed by the snapshot, whatever happens to the catalog later
//! - Only PENDING orders can be confirmed or canceled

use proptest::prelude::*;

use super::error::BillingError;
use super::service::BillingService;
use super::types::{OrderStatus, ProductInfo};

fn product_strategy() -> impl Strategy<Value = ProductInfo> {
    (1i64..1_000, 0i64..100, 0i64..100_000).prop_map(|(hearts, bonus_hearts, price)| ProductInfo {
        code: "HEART_X".to_string(),
        hearts,
        bonus_hearts,
        price,
        is_active: true,
    })
}

fn status_strategy() -> impl Strategy<Value = OrderStatus> {
    prop_oneof![
        Just(OrderStatus::Pending),
        Just(OrderStatus::Paid),
        Just(OrderStatus::Canceled),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_snapshot_survives_catalog_edits(
        product in product_strategy(),
        edited in product_strategy(),
        quantity in 1i32..50,
    ) {
        let draft = BillingService::draft_order(&product, quantity).unwrap();
        let before = draft.snapshot.grantable_hearts().unwrap();

        // The draft owns copies; editing the catalog entry cannot reach it.
        let mut product = product;
        product.hearts = edited.hearts;
        product.bonus_hearts = edited.bonus_hearts;
        product.price = edited.price;

        prop_assert_eq!(draft.snapshot.grantable_hearts().unwrap(), before);
        prop_assert_eq!(
            before,
            (draft.snapshot.hearts_per_unit + draft.snapshot.bonus_hearts_per_unit)
                * i64::from(quantity)
        );
        prop_assert_eq!(draft.total_amount, draft.snapshot.price_per_unit * i64::from(quantity));
    }

    #[test]
    fn prop_terminal_orders_reject_transitions(status in status_strategy()) {
        let confirmed = BillingService::confirm(status);
        if status == OrderStatus::Pending {
            prop_assert_eq!(confirmed, Ok(OrderStatus::Paid));
        } else {
            prop_assert_eq!(confirmed, Err(BillingError::AlreadyProcessed { status }));
        }
    }
}
