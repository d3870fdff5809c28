//! Billing service for the order workflow.

use serde_json::{Value, json};
use std::fmt::Display;

use super::error::BillingError;
use super::types::{OrderDraft, OrderSnapshot, OrderStatus, PaymentReference, ProductInfo};

/// Payment key prefix used when the caller supplies none.
pub const TEST_PAYMENT_KEY_PREFIX: &str = "TEST-";

/// Provider recorded when the caller supplies none.
pub const MOCK_PROVIDER: &str = "MOCK";

/// Billing service for order drafting and state transitions.
///
/// Pure business logic with no database dependencies.
pub struct BillingService;

impl BillingService {
    /// Drafts an order for `quantity` units of `product`.
    ///
    /// Quantity is clamped to at least 1.
    ///
    /// # Errors
    ///
    /// - `BillingError::ProductInactive` if the product is not active
    /// - `BillingError::InvalidProduct` for negative prices or hearts
    /// - `BillingError::EmptyProduct` if the order would grant no hearts
    /// - `BillingError::AmountOverflow` if totals overflow
    pub fn draft_order(product: &ProductInfo, quantity: i32) -> Result<OrderDraft, BillingError> {
        if !product.is_active {
            return Err(BillingError::ProductInactive(product.code.clone()));
        }
        Self::validate_product(product)?;
        if product.total_hearts()? == 0 {
            return Err(BillingError::EmptyProduct(product.code.clone()));
        }

        let snapshot = OrderSnapshot {
            price_per_unit: product.price,
            hearts_per_unit: product.hearts,
            bonus_hearts_per_unit: product.bonus_hearts,
            quantity: quantity.max(1),
        };
        snapshot.grantable_hearts()?;
        let total_amount = snapshot.total_amount()?;

        Ok(OrderDraft {
            product_code: product.code.clone(),
            snapshot,
            total_amount,
        })
    }

    /// Normalizes the product code a caller asked for.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::Required` if the code is blank.
    pub fn requested_product_code(code: &str) -> Result<&str, BillingError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(BillingError::Required("product_code"));
        }
        Ok(code)
    }

    /// Validates catalog values before they are stored or ordered.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::InvalidProduct` naming the first bad field.
    pub fn validate_product(product: &ProductInfo) -> Result<(), BillingError> {
        if product.code.trim().is_empty() {
            return Err(BillingError::InvalidProduct("code is required".to_string()));
        }
        if product.hearts < 0 {
            return Err(BillingError::InvalidProduct("hearts must not be negative".to_string()));
        }
        if product.bonus_hearts < 0 {
            return Err(BillingError::InvalidProduct(
                "bonus_hearts must not be negative".to_string(),
            ));
        }
        if product.price < 0 {
            return Err(BillingError::InvalidProduct("price must not be negative".to_string()));
        }
        product.total_hearts()?;
        Ok(())
    }

    /// Checks that an order in `status` may be confirmed.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::AlreadyProcessed` unless the order is PENDING.
    pub const fn confirm(status: OrderStatus) -> Result<OrderStatus, BillingError> {
        Self::transition(status, OrderStatus::Paid)
    }

    /// Checks that an order in `status` may be canceled.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::AlreadyProcessed` unless the order is PENDING.
    pub const fn cancel(status: OrderStatus) -> Result<OrderStatus, BillingError> {
        Self::transition(status, OrderStatus::Canceled)
    }

    const fn transition(from: OrderStatus, to: OrderStatus) -> Result<OrderStatus, BillingError> {
        if from.can_transition_to(to) {
            Ok(to)
        } else {
            Err(BillingError::AlreadyProcessed { status: from })
        }
    }

    /// Resolves payment identifiers, falling back to the test defaults.
    ///
    /// Blank values count as absent.
    #[must_use]
    pub fn payment_reference(
        order_id: impl Display,
        payment_key: Option<&str>,
        pg_provider: Option<&str>,
    ) -> PaymentReference {
        let non_blank = |s: Option<&str>| s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
        PaymentReference {
            payment_key: non_blank(payment_key)
                .unwrap_or_else(|| format!("{TEST_PAYMENT_KEY_PREFIX}{order_id}")),
            pg_provider: non_blank(pg_provider).unwrap_or_else(|| MOCK_PROVIDER.to_string()),
        }
    }

    /// Ledger description for the credit granted by a paid order.
    #[must_use]
    pub fn charge_description(order_id: impl Display) -> String {
        format!("Heart top-up - order #{order_id}")
    }

    /// Ledger metadata for the credit granted by a paid order.
    #[must_use]
    pub fn charge_metadata(order_id: impl Display, product_code: &str, quantity: i32) -> Value {
        json!({
            "orderId": order_id.to_string(),
            "productCode": product_code,
            "quantity": quantity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn heart_10() -> ProductInfo {
        ProductInfo {
            code: "HEART_10".to_string(),
            hearts: 10,
            bonus_hearts: 0,
            price: 10_000,
            is_active: true,
        }
    }

    #[test]
    fn test_draft_order_snapshots_product() {
        let draft = BillingService::draft_order(&heart_10(), 2).unwrap();
        assert_eq!(draft.product_code, "HEART_10");
        assert_eq!(draft.total_amount, 20_000);
        assert_eq!(draft.snapshot.grantable_hearts().unwrap(), 20);
    }

    #[rstest]
    #[case(0)]
    #[case(-5)]
    fn test_draft_order_clamps_quantity(#[case] quantity: i32) {
        let draft = BillingService::draft_order(&heart_10(), quantity).unwrap();
        assert_eq!(draft.snapshot.quantity, 1);
        assert_eq!(draft.total_amount, 10_000);
    }

    #[test]
    fn test_draft_order_inactive() {
        let product = ProductInfo {
            is_active: false,
            ..heart_10()
        };
        assert_eq!(
            BillingService::draft_order(&product, 1),
            Err(BillingError::ProductInactive("HEART_10".to_string()))
        );
    }

    #[test]
    fn test_draft_order_empty_product() {
        let product = ProductInfo {
            hearts: 0,
            ..heart_10()
        };
        assert!(matches!(
            BillingService::draft_order(&product, 1),
            Err(BillingError::EmptyProduct(_))
        ));
    }

    #[test]
    fn test_draft_order_overflow() {
        let product = ProductInfo {
            price: i64::MAX,
            ..heart_10()
        };
        assert_eq!(
            BillingService::draft_order(&product, 2),
            Err(BillingError::AmountOverflow)
        );
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn test_requested_product_code_rejects_blank(#[case] code: &str) {
        assert_eq!(
            BillingService::requested_product_code(code),
            Err(BillingError::Required("product_code"))
        );
    }

    #[test]
    fn test_requested_product_code_trims() {
        assert_eq!(
            BillingService::requested_product_code(" HEART_10 "),
            Ok("HEART_10")
        );
    }

    #[test]
    fn test_validate_product_rejects_negative() {
        let product = ProductInfo {
            bonus_hearts: -1,
            ..heart_10()
        };
        assert!(matches!(
            BillingService::validate_product(&product),
            Err(BillingError::InvalidProduct(_))
        ));
    }

    #[rstest]
    #[case(OrderStatus::Pending, true)]
    #[case(OrderStatus::Paid, false)]
    #[case(OrderStatus::Canceled, false)]
    fn test_confirm_only_from_pending(#[case] status: OrderStatus, #[case] allowed: bool) {
        assert_eq!(BillingService::confirm(status).is_ok(), allowed);
        assert_eq!(BillingService::cancel(status).is_ok(), allowed);
    }

    #[test]
    fn test_confirm_paid_reports_status() {
        assert_eq!(
            BillingService::confirm(OrderStatus::Paid),
            Err(BillingError::AlreadyProcessed {
                status: OrderStatus::Paid
            })
        );
    }

    #[test]
    fn test_payment_reference_defaults() {
        let reference = BillingService::payment_reference(42, None, Some("  "));
        assert_eq!(reference.payment_key, "TEST-42");
        assert_eq!(reference.pg_provider, "MOCK");

        let reference = BillingService::payment_reference(42, Some("pk_1"), Some("TOSS"));
        assert_eq!(reference.payment_key, "pk_1");
        assert_eq!(reference.pg_provider, "TOSS");
    }

    #[test]
    fn test_charge_description_and_metadata() {
        assert_eq!(
            BillingService::charge_description(7),
            "Heart top-up - order #7"
        );
        let meta = BillingService::charge_metadata(7, "HEART_10", 2);
        assert_eq!(meta["orderId"], "7");
        assert_eq!(meta["productCode"], "HEART_10");
        assert_eq!(meta["quantity"], 2);
    }

    #[test]
    fn test_status_terminal() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(OrderStatus::Paid.is_terminal());
        assert!(OrderStatus::Canceled.is_terminal());
        assert!(!OrderStatus::Paid.can_transition_to(OrderStatus::Canceled));
    }
}
