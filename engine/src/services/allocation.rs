//! Per-SKU allocation bookkeeping
//!
//! Each SKU whose entered stock differs from the recorded stock gets one
//! ledger. The ledger splits the absolute delta across a farmer direct-sale
//! bucket and zero or more named retailers, and is complete only when the
//! split accounts for the delta exactly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{RetailerAllocation, RetailerRef, Sku, StockDirection};

use crate::error::{EngineError, EngineResult, ValidationIssue};

/// Allocation state for one SKU under verification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AllocationLedger {
    pub product_code: String,
    pub sku_code: String,
    pub sku_name: String,
    pub unit: String,
    /// Stock recorded at the last verification
    pub current_stock: Decimal,
    /// Stock entered by the user this visit
    pub new_stock: Decimal,
    pub farmer_quantity: Decimal,
    pub retailer_allocations: Vec<RetailerAllocation>,
}

impl AllocationLedger {
    /// Open a ledger for a SKU and the user's entered stock value
    pub fn new(sku: &Sku, new_stock: Decimal) -> EngineResult<Self> {
        if new_stock < Decimal::ZERO {
            return Err(EngineError::invalid(
                sku.key(),
                "Entered stock cannot be negative",
            ));
        }
        Ok(Self {
            product_code: sku.product_code.clone(),
            sku_code: sku.sku_code.clone(),
            sku_name: sku.sku_name.clone(),
            unit: sku.unit.clone(),
            current_stock: sku.current_stock,
            new_stock,
            farmer_quantity: Decimal::ZERO,
            retailer_allocations: Vec::new(),
        })
    }

    /// Key identifying this ledger within a session
    pub fn key(&self) -> String {
        format!("{}-{}", self.product_code, self.sku_code)
    }

    /// Absolute stock difference to be allocated; never negative
    pub fn delta(&self) -> Decimal {
        (self.current_stock - self.new_stock).abs()
    }

    /// Whether the delta left the inventory or came back into it.
    /// Labeling only; the allocation invariant is direction-agnostic.
    pub fn direction(&self) -> StockDirection {
        if self.new_stock > self.current_stock {
            StockDirection::Return
        } else {
            StockDirection::Outward
        }
    }

    /// Set the farmer direct-sale quantity.
    ///
    /// Does not clamp against the delta; callers give feedback from
    /// [`remaining`](Self::remaining).
    pub fn set_farmer_quantity(&mut self, quantity: Decimal) -> EngineResult<()> {
        if quantity < Decimal::ZERO {
            return Err(EngineError::invalid(
                self.key(),
                "Farmer quantity cannot be negative",
            ));
        }
        self.farmer_quantity = quantity;
        Ok(())
    }

    /// Append a retailer allocation row.
    ///
    /// A retailer phone may appear at most once per ledger. Retailers
    /// without a phone never collide on it.
    pub fn add_retailer_allocation(
        &mut self,
        retailer: RetailerRef,
        quantity: Decimal,
    ) -> EngineResult<()> {
        if quantity < Decimal::ZERO {
            return Err(EngineError::invalid(
                self.key(),
                "Retailer quantity cannot be negative",
            ));
        }
        let phone = shared::digits_only(&retailer.phone);
        let already_present = !phone.is_empty()
            && self
                .retailer_allocations
                .iter()
                .any(|row| shared::digits_only(&row.retailer.phone) == phone);
        if already_present {
            return Err(EngineError::invalid(
                self.key(),
                format!(
                    "Retailer with phone {} is already allocated for this SKU",
                    retailer.phone
                ),
            ));
        }
        self.retailer_allocations
            .push(RetailerAllocation { retailer, quantity });
        Ok(())
    }

    /// Remove a retailer allocation row by index
    pub fn remove_retailer_allocation(&mut self, index: usize) -> EngineResult<()> {
        if index >= self.retailer_allocations.len() {
            return Err(EngineError::NotFound(format!(
                "Allocation row {} for SKU {}",
                index,
                self.key()
            )));
        }
        self.retailer_allocations.remove(index);
        Ok(())
    }

    /// Sum of all retailer allocation quantities
    pub fn retailer_total(&self) -> Decimal {
        self.retailer_allocations
            .iter()
            .map(|row| row.quantity)
            .sum()
    }

    /// Delta still unaccounted for; negative when over-allocated
    pub fn remaining(&self) -> Decimal {
        self.delta() - self.farmer_quantity - self.retailer_total()
    }

    pub fn is_over_allocated(&self) -> bool {
        self.remaining() < Decimal::ZERO
    }

    /// The ledger is complete when the split equals the delta exactly and
    /// every retailer row carries a resolved id and a positive quantity
    pub fn is_complete(&self) -> bool {
        self.remaining() == Decimal::ZERO
            && self
                .retailer_allocations
                .iter()
                .all(RetailerAllocation::is_resolved)
    }

    /// Itemized reasons this ledger blocks progression; empty when complete
    pub fn completion_issues(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let remaining = self.remaining();
        if remaining > Decimal::ZERO {
            issues.push(ValidationIssue::new(
                self.key(),
                format!("{}: {} {} still unallocated", self.sku_name, remaining, self.unit),
            ));
        } else if remaining < Decimal::ZERO {
            issues.push(ValidationIssue::new(
                self.key(),
                format!(
                    "{}: allocated {} {} more than the delta",
                    self.sku_name,
                    -remaining,
                    self.unit
                ),
            ));
        }
        for (index, row) in self.retailer_allocations.iter().enumerate() {
            if row.retailer.id.is_empty() {
                issues.push(ValidationIssue::new(
                    self.key(),
                    format!("{}: allocation row {} has no resolved retailer", self.sku_name, index),
                ));
            }
            if row.quantity <= Decimal::ZERO {
                issues.push(ValidationIssue::new(
                    self.key(),
                    format!(
                        "{}: allocation row {} needs a positive quantity",
                        self.sku_name, index
                    ),
                ));
            }
        }
        issues
    }
}
