//! Shared types and models for the Field Liquidation Platform
//!
//! This crate contains types shared between the verification engine, the
//! frontend (via WASM), and other components of the system.

pub mod models;
pub mod types;
pub mod units;
pub mod validation;

pub use models::*;
pub use types::*;
pub use units::*;
pub use validation::*;
