//! Allocation models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::RetailerRef;

/// One retailer's share of a SKU's stock delta
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetailerAllocation {
    pub retailer: RetailerRef,
    pub quantity: Decimal,
}

impl RetailerAllocation {
    /// An allocation row counts toward completion only with a resolved
    /// retailer id and a positive quantity
    pub fn is_resolved(&self) -> bool {
        !self.retailer.id.is_empty() && self.quantity > Decimal::ZERO
    }
}
