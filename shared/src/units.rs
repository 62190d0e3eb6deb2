//! Unit conversion for sub-unit SKUs
//!
//! Product SKUs arrive with raw unit strings ("ml", "Kg", "Ltr", ...).
//! Sub-units are converted to the main unit for display and for consistent
//! delta arithmetic; everything else passes through unchanged.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A quantity expressed in its main unit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MainUnitQuantity {
    pub value: Decimal,
    pub unit: String,
}

/// Convert a quantity in a raw SKU unit to its main unit.
///
/// `ml` becomes litres, `mg`/`g`/`gm` become kilograms; any other unit is
/// passed through with the value unchanged. Unit matching is
/// case-insensitive.
pub fn to_main_unit(value: Decimal, unit: &str) -> MainUnitQuantity {
    let thousand = Decimal::from(1000);
    match unit.trim().to_lowercase().as_str() {
        "ml" => MainUnitQuantity {
            value: value / thousand,
            unit: "Ltr".to_string(),
        },
        "mg" | "g" | "gm" => MainUnitQuantity {
            value: value / thousand,
            unit: "Kg".to_string(),
        },
        _ => MainUnitQuantity {
            value,
            unit: unit.to_string(),
        },
    }
}
