//! Validation utilities for the Field Liquidation Platform
//!
//! Includes India-specific validations for retailer onboarding in the field.

use rust_decimal::Decimal;

// ============================================================================
// Text Normalization
// ============================================================================

/// Normalize free text for comparison: lowercase, trim, collapse internal
/// whitespace to single spaces, strip everything outside `[a-z0-9 ]`.
pub fn normalize_text(s: &str) -> String {
    let lowered = s.to_lowercase();
    let stripped: String = lowered
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                ' '
            }
        })
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep only ASCII digits from a string (phone numbers, PIN codes)
pub fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

// ============================================================================
// Stock Entry Validations
// ============================================================================

/// Validate a user-entered replacement stock value for one SKU.
///
/// Negative values are never valid. Values above the current stock are
/// permitted (returned stock); the workflow labels them by direction.
pub fn validate_stock_entry(value: Decimal) -> Result<(), &'static str> {
    if value < Decimal::ZERO {
        return Err("Stock value cannot be negative");
    }
    Ok(())
}

// ============================================================================
// India-Specific Validations
// ============================================================================

/// Validate an Indian mobile number.
/// Accepts: 9876543210, 98765-43210, +919876543210
pub fn validate_indian_mobile(phone: &str) -> Result<(), &'static str> {
    let digits = digits_only(phone);

    // Standard mobile: 10 digits starting with 6-9
    if digits.len() == 10 && matches!(digits.chars().next(), Some('6'..='9')) {
        return Ok(());
    }
    // International format with country code: 12 digits starting with 91
    if digits.len() == 12 && digits.starts_with("91") {
        return Ok(());
    }

    Err("Invalid Indian mobile number format")
}

/// Validate an Indian PIN code (6 digits, first digit 1-9)
pub fn validate_pincode(pincode: &str) -> Result<(), &'static str> {
    let digits = digits_only(pincode);

    if digits.len() != 6 {
        return Err("PIN code must be 6 digits");
    }
    if digits.starts_with('0') {
        return Err("PIN code cannot start with 0");
    }
    Ok(())
}

/// Validate a retailer outlet name is usable after normalization
pub fn validate_outlet_name(name: &str) -> Result<(), &'static str> {
    if normalize_text(name).is_empty() {
        return Err("Outlet name is required");
    }
    Ok(())
}
