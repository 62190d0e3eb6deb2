//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Direction of a stock delta relative to the last verified stock
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockDirection {
    /// Stock decreased since the last verification (liquidation)
    Outward,
    /// Stock increased since the last verification (return)
    Return,
}

impl StockDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockDirection::Outward => "outward",
            StockDirection::Return => "return",
        }
    }
}

impl std::fmt::Display for StockDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockDirection::Outward => write!(f, "Liquidated"),
            StockDirection::Return => write!(f, "Returned"),
        }
    }
}

/// Kinds of uploaded evidence artifacts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Signature,
    ProofPhoto,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Signature => "signature",
            ArtifactKind::ProofPhoto => "proof_photo",
        }
    }
}
