//! WebAssembly module for the Field Liquidation Platform
//!
//! Provides client-side computation for:
//! - Per-keystroke duplicate-retailer screening
//! - Name similarity scoring
//! - Unit conversion for stock display
//! - Offline field validation

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

use liquidation_engine::services::{duplicate, similarity};

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Normalize free text the way duplicate screening does
#[wasm_bindgen]
pub fn normalize_name(s: &str) -> String {
    shared::normalize_text(s)
}

/// Similarity score between two names, in [0, 1]
#[wasm_bindgen]
pub fn name_similarity(a: &str, b: &str) -> f64 {
    similarity::similarity(a, b)
}

/// Screen a candidate retailer against a roster.
///
/// Takes the candidate and roster as JSON; returns the duplicate match as
/// JSON, or `null` when no rule fires.
#[wasm_bindgen]
pub fn screen_retailer_candidate(candidate_json: &str, roster_json: &str) -> Result<String, JsValue> {
    let candidate: NewRetailerCandidate = serde_json::from_str(candidate_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid candidate JSON: {}", e)))?;
    let roster: Vec<RetailerRef> = serde_json::from_str(roster_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid roster JSON: {}", e)))?;

    let result = duplicate::detect_duplicates(&candidate, &roster);
    serde_json::to_string(&result).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Convert a quantity in a raw SKU unit to its main unit value
#[wasm_bindgen]
pub fn to_main_unit_value(value: f64, unit: &str) -> f64 {
    let decimal_value = Decimal::try_from(value).unwrap_or(Decimal::ZERO);
    let converted = shared::to_main_unit(decimal_value, unit);
    converted.value.to_string().parse().unwrap_or(0.0)
}

/// Main unit label for a raw SKU unit ("ml" -> "Ltr", "g" -> "Kg", ...)
#[wasm_bindgen]
pub fn to_main_unit_label(unit: &str) -> String {
    shared::to_main_unit(Decimal::ZERO, unit).unit
}

/// Validate an Indian mobile number for retailer onboarding
#[wasm_bindgen]
pub fn is_valid_mobile(phone: &str) -> bool {
    shared::validate_indian_mobile(phone).is_ok()
}

/// Validate an Indian PIN code for retailer onboarding
#[wasm_bindgen]
pub fn is_valid_pincode(pincode: &str) -> bool {
    shared::validate_pincode(pincode).is_ok()
}
