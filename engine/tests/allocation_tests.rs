//! Allocation ledger tests
//!
//! Covers the sum-equals-delta invariant, duplicate-retailer rejection
//! within a ledger, and over/under-allocation reporting.

use liquidation_engine::AllocationLedger;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{RetailerRef, Sku, StockDirection};
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn sku(current_stock: &str) -> Sku {
    Sku {
        product_code: "P100".to_string(),
        sku_code: "S1".to_string(),
        sku_name: "Gromax 500ml".to_string(),
        unit: "ml".to_string(),
        current_stock: dec(current_stock),
        unit_price: dec("120"),
    }
}

fn retailer(id: &str, phone: &str) -> RetailerRef {
    RetailerRef {
        id: id.to_string(),
        code: format!("RT-{}", id),
        name: format!("Retailer {}", id),
        phone: phone.to_string(),
        address: "Main Road".to_string(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_delta_is_absolute() {
        let outward = AllocationLedger::new(&sku("70"), dec("50")).unwrap();
        assert_eq!(outward.delta(), dec("20"));
        assert_eq!(outward.direction(), StockDirection::Outward);

        let returned = AllocationLedger::new(&sku("50"), dec("70")).unwrap();
        assert_eq!(returned.delta(), dec("20"));
        assert_eq!(returned.direction(), StockDirection::Return);
    }

    #[test]
    fn test_negative_entry_rejected() {
        assert!(AllocationLedger::new(&sku("70"), dec("-1")).is_err());
    }

    #[test]
    fn test_unchanged_stock_is_outward_zero_delta() {
        let ledger = AllocationLedger::new(&sku("70"), dec("70")).unwrap();
        assert_eq!(ledger.delta(), Decimal::ZERO);
        assert_eq!(ledger.direction(), StockDirection::Outward);
    }

    #[test]
    fn test_farmer_quantity_negative_rejected() {
        let mut ledger = AllocationLedger::new(&sku("70"), dec("50")).unwrap();
        assert!(ledger.set_farmer_quantity(dec("-5")).is_err());
        assert_eq!(ledger.farmer_quantity, Decimal::ZERO);
    }

    #[test]
    fn test_farmer_quantity_not_clamped() {
        // Clamping feedback belongs to the caller via remaining()
        let mut ledger = AllocationLedger::new(&sku("70"), dec("50")).unwrap();
        ledger.set_farmer_quantity(dec("35")).unwrap();
        assert_eq!(ledger.remaining(), dec("-15"));
        assert!(ledger.is_over_allocated());
    }

    #[test]
    fn test_duplicate_retailer_phone_rejected() {
        let mut ledger = AllocationLedger::new(&sku("70"), dec("50")).unwrap();
        ledger
            .add_retailer_allocation(retailer("r1", "9876543210"), dec("5"))
            .unwrap();

        // Same phone in a different format still collides
        let result = ledger.add_retailer_allocation(retailer("r2", "98765-43210"), dec("5"));
        assert!(result.is_err());
        assert_eq!(ledger.retailer_allocations.len(), 1);
    }

    #[test]
    fn test_phoneless_retailers_do_not_collide() {
        let mut ledger = AllocationLedger::new(&sku("70"), dec("50")).unwrap();
        ledger
            .add_retailer_allocation(retailer("r1", ""), dec("5"))
            .unwrap();
        ledger
            .add_retailer_allocation(retailer("r2", ""), dec("5"))
            .unwrap();

        assert_eq!(ledger.retailer_allocations.len(), 2);
    }

    #[test]
    fn test_remove_allocation() {
        let mut ledger = AllocationLedger::new(&sku("70"), dec("50")).unwrap();
        ledger
            .add_retailer_allocation(retailer("r1", "9876543210"), dec("5"))
            .unwrap();
        ledger.remove_retailer_allocation(0).unwrap();
        assert!(ledger.retailer_allocations.is_empty());

        assert!(ledger.remove_retailer_allocation(0).is_err());
    }

    /// End-to-end allocation scenario: stock 70 -> 50, farmer 12, retailer 8
    #[test]
    fn test_complete_allocation_scenario() {
        let mut ledger = AllocationLedger::new(&sku("70"), dec("50")).unwrap();
        assert_eq!(ledger.delta(), dec("20"));

        ledger.set_farmer_quantity(dec("12")).unwrap();
        ledger
            .add_retailer_allocation(retailer("r1", "9876543210"), dec("8"))
            .unwrap();

        assert_eq!(ledger.remaining(), Decimal::ZERO);
        assert!(ledger.is_complete());
        assert!(!ledger.is_over_allocated());
        assert!(ledger.completion_issues().is_empty());

        // Shrinking the retailer share leaves 3 unallocated
        ledger.remove_retailer_allocation(0).unwrap();
        ledger
            .add_retailer_allocation(retailer("r1", "9876543210"), dec("5"))
            .unwrap();
        assert_eq!(ledger.remaining(), dec("3"));
        assert!(!ledger.is_complete());

        let issues = ledger.completion_issues();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("Gromax 500ml"));
        assert!(issues[0].message.contains("3"));
    }

    #[test]
    fn test_unresolved_retailer_blocks_completion() {
        let mut ledger = AllocationLedger::new(&sku("70"), dec("50")).unwrap();
        ledger.set_farmer_quantity(dec("10")).unwrap();
        ledger
            .add_retailer_allocation(retailer("", "9876543210"), dec("10"))
            .unwrap();

        assert_eq!(ledger.remaining(), Decimal::ZERO);
        assert!(!ledger.is_complete());
        assert!(!ledger.completion_issues().is_empty());
    }

    #[test]
    fn test_zero_quantity_row_blocks_completion() {
        let mut ledger = AllocationLedger::new(&sku("70"), dec("50")).unwrap();
        ledger.set_farmer_quantity(dec("20")).unwrap();
        ledger
            .add_retailer_allocation(retailer("r1", "9876543210"), Decimal::ZERO)
            .unwrap();

        assert_eq!(ledger.remaining(), Decimal::ZERO);
        assert!(!ledger.is_complete());
    }

    #[test]
    fn test_fractional_units_allocate_exactly() {
        // Decimal arithmetic keeps 0.1-litre splits exact
        let mut ledger = AllocationLedger::new(&sku("1.0"), dec("0.4")).unwrap();
        ledger.set_farmer_quantity(dec("0.3")).unwrap();
        ledger
            .add_retailer_allocation(retailer("r1", "9876543210"), dec("0.2"))
            .unwrap();
        ledger
            .add_retailer_allocation(retailer("r2", "9111111111"), dec("0.1"))
            .unwrap();

        assert_eq!(ledger.remaining(), Decimal::ZERO);
        assert!(ledger.is_complete());
    }

    #[test]
    fn test_completion_issues_itemize_everything() {
        let mut ledger = AllocationLedger::new(&sku("70"), dec("50")).unwrap();
        ledger.set_farmer_quantity(dec("25")).unwrap();
        ledger
            .add_retailer_allocation(retailer("", "9876543210"), Decimal::ZERO)
            .unwrap();

        // Over-allocation plus an unresolved, zero-quantity row
        let issues = ledger.completion_issues();
        assert_eq!(issues.len(), 3);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Quantities in tenths, 0.1 to 500.0
    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=5000i64).prop_map(|n| Decimal::new(n, 1))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The invariant: complete iff farmer + retailer sum equals delta
        /// exactly, with every row resolved and positive
        #[test]
        fn prop_complete_iff_sum_equals_delta(
            farmer in quantity_strategy(),
            shares in prop::collection::vec(quantity_strategy(), 0..5),
        ) {
            let delta: Decimal = farmer + shares.iter().sum::<Decimal>();
            let current = delta + dec("10");
            let mut ledger = AllocationLedger::new(&sku(&current.to_string()), dec("10")).unwrap();

            ledger.set_farmer_quantity(farmer).unwrap();
            for (index, share) in shares.iter().enumerate() {
                let phone = format!("9{:09}", index);
                ledger
                    .add_retailer_allocation(retailer(&format!("r{}", index), &phone), *share)
                    .unwrap();
            }

            prop_assert_eq!(ledger.remaining(), Decimal::ZERO);
            prop_assert!(ledger.is_complete());

            // Any extra farmer quantity breaks completeness
            ledger.set_farmer_quantity(farmer + dec("0.1")).unwrap();
            prop_assert!(!ledger.is_complete());
            prop_assert!(ledger.is_over_allocated());
        }

        /// remaining() is always delta minus the full split
        #[test]
        fn prop_remaining_accounts_for_all_buckets(
            delta in quantity_strategy(),
            farmer in quantity_strategy(),
            share in quantity_strategy(),
        ) {
            let current = delta + dec("5");
            let mut ledger = AllocationLedger::new(&sku(&current.to_string()), dec("5")).unwrap();
            ledger.set_farmer_quantity(farmer).unwrap();
            ledger
                .add_retailer_allocation(retailer("r1", "9876543210"), share)
                .unwrap();

            prop_assert_eq!(ledger.remaining(), delta - farmer - share);
            prop_assert_eq!(ledger.is_over_allocated(), ledger.remaining() < Decimal::ZERO);
        }
    }
}
