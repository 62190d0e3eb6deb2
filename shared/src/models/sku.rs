//! Product SKU models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A sellable stock-keeping unit as snapshotted at the last verification.
///
/// Immutable input to the verification engine; fetched from the product-data
/// collaborator and never mutated by the core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sku {
    pub product_code: String,
    pub sku_code: String,
    pub sku_name: String,
    /// Raw unit string as recorded upstream (e.g. "ml", "Kg", "Ltr")
    pub unit: String,
    /// Stock on hand at the last verification, in the SKU's native unit
    pub current_stock: Decimal,
    /// Currency per unit
    pub unit_price: Decimal,
}

impl Sku {
    /// Key identifying this SKU within a verification session
    pub fn key(&self) -> String {
        format!("{}-{}", self.product_code, self.sku_code)
    }

    /// A SKU participates in verification only while it has stock on hand
    pub fn is_active(&self) -> bool {
        self.current_stock > Decimal::ZERO
    }
}

/// A user-supplied replacement value for one SKU's current stock
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockEntry {
    pub sku_key: String,
    pub new_stock: Decimal,
}
