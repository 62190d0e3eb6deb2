//! Retailer models and duplicate-screening results

use serde::{Deserialize, Serialize};

/// A resolved retailer identity.
///
/// Either selected from the directory or created through the screened
/// ad-hoc creation flow. Allocation rows without a resolved `id` are invalid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetailerRef {
    pub id: String,
    pub code: String,
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// Free-text input for creating a retailer, screened for duplicates before
/// it becomes a persisted [`RetailerRef`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewRetailerCandidate {
    pub name: String,
    pub outlet_name: String,
    pub phone: String,
    pub address: String,
    pub pincode: String,
    pub market: String,
    pub city: String,
    pub state: String,
}

/// Classification of a candidate retailer against the existing roster
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum MatchKind {
    /// Normalized name identical to an existing retailer; hard block
    Exact,
    /// Name similarity above threshold; override required
    Similar,
    /// Phone identical, same (or unknown) address; override required
    Phone,
    /// Phone identical but a distinct address; permitted
    PhoneAddress,
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchKind::Exact => write!(f, "exact"),
            MatchKind::Similar => write!(f, "similar"),
            MatchKind::Phone => write!(f, "phone"),
            MatchKind::PhoneAddress => write!(f, "phone-address"),
        }
    }
}

/// Output of duplicate screening for a [`NewRetailerCandidate`].
///
/// Recomputed on candidate-field changes and discarded once the candidate is
/// saved or the form is closed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateMatch {
    pub kind: MatchKind,
    pub matches: Vec<RetailerRef>,
    /// Whether the caller may proceed without an explicit user override
    pub allow_submit: bool,
}
