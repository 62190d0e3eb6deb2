//! Error handling for the verification engine
//!
//! Validation failures carry the full list of offending items so a caller
//! can surface every problem at once rather than first-error-wins.

use serde::Serialize;
use shared::DuplicateMatch;
use thiserror::Error;

/// One enumerable validation problem, tied to the field or SKU it concerns
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidationIssue {
    /// What the issue is about (a SKU key, a form field, an allocation row)
    pub subject: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
        }
    }
}

/// Engine error types
#[derive(Error, Debug)]
pub enum EngineError {
    // Recoverable input problems; always itemized
    #[error("Validation failed with {} issue(s)", issues.len())]
    Validation { issues: Vec<ValidationIssue> },

    // Duplicate-retailer screening outcomes the user must decide on
    #[error("Candidate retailer conflicts with an existing entry ({})", conflict.kind)]
    DuplicateConflict { conflict: DuplicateMatch },

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // External collaborator failures; the caller owns retry policy
    #[error("Transient external failure: {0}")]
    Transient(String),

    #[error("Submission rejected: {0}")]
    SubmissionRejected(String),

    // Invariant violations; a defect in the caller, not user input
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl EngineError {
    /// Build a validation error from a non-empty list of issues
    pub fn validation(issues: Vec<ValidationIssue>) -> Self {
        EngineError::Validation { issues }
    }

    /// Single-issue convenience constructor
    pub fn invalid(subject: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Validation {
            issues: vec![ValidationIssue::new(subject, message)],
        }
    }

    /// True for failures the UI should answer with "retry" rather than
    /// "fix your input"
    pub fn is_transient(&self) -> bool {
        matches!(self, EngineError::Transient(_))
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
