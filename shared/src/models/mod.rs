//! Domain models for the Field Liquidation Platform

mod allocation;
mod retailer;
mod sku;

pub use allocation::*;
pub use retailer::*;
pub use sku::*;
