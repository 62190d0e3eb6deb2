//! Duplicate-retailer screening
//!
//! Classifies an ad-hoc retailer candidate against the existing roster to
//! prevent double-booking the same physical outlet. Pure classification;
//! the caller owns debouncing and any override acknowledgment UI.
//!
//! Rule priority (first match wins): phone rules, then exact name, then
//! similar name. A phone match at a distinct address is permitted outright,
//! even when the name also matches exactly elsewhere; this ordering mirrors
//! the production behavior and is deliberate.

use shared::{
    digits_only, normalize_text, DuplicateMatch, MatchKind, NewRetailerCandidate, RetailerRef,
};

use crate::services::similarity::similarity;

/// Name-similarity score above which two retailers are flagged as similar
pub const SIMILARITY_THRESHOLD: f64 = 0.8;

/// Minimum digits for a phone number to participate in matching
pub const MIN_PHONE_DIGITS: usize = 10;

/// Screen a candidate against the roster.
///
/// Returns `None` when the roster is empty or the candidate has neither a
/// usable name nor a phone of at least [`MIN_PHONE_DIGITS`] digits.
pub fn detect_duplicates(
    candidate: &NewRetailerCandidate,
    roster: &[RetailerRef],
) -> Option<DuplicateMatch> {
    let name = normalize_text(&candidate.name);
    let phone = digits_only(&candidate.phone);
    let phone_usable = phone.len() >= MIN_PHONE_DIGITS;

    if roster.is_empty() || (name.is_empty() && !phone_usable) {
        return None;
    }

    let mut exact_matches = Vec::new();
    let mut similar_matches = Vec::new();
    let mut phone_matches = Vec::new();

    for existing in roster {
        if phone_usable && digits_only(&existing.phone) == phone {
            phone_matches.push(existing.clone());
        }
        if !name.is_empty() {
            let existing_name = normalize_text(&existing.name);
            if existing_name == name {
                exact_matches.push(existing.clone());
            } else if similarity(&candidate.name, &existing.name) > SIMILARITY_THRESHOLD {
                similar_matches.push(existing.clone());
            }
        }
    }

    if let Some(first) = phone_matches.first() {
        let candidate_address = normalize_text(&candidate.address);
        let existing_address = normalize_text(&first.address);
        let distinct_location = !candidate_address.is_empty()
            && !existing_address.is_empty()
            && candidate_address != existing_address;

        let kind = if distinct_location {
            MatchKind::PhoneAddress
        } else {
            MatchKind::Phone
        };
        return Some(DuplicateMatch {
            kind,
            matches: phone_matches,
            allow_submit: distinct_location,
        });
    }

    if !exact_matches.is_empty() {
        return Some(DuplicateMatch {
            kind: MatchKind::Exact,
            matches: exact_matches,
            allow_submit: false,
        });
    }

    if !similar_matches.is_empty() {
        return Some(DuplicateMatch {
            kind: MatchKind::Similar,
            matches: similar_matches,
            allow_submit: false,
        });
    }

    None
}
