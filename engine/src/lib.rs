//! Stock verification and allocation reconciliation engine
//!
//! The core behind the "Verify Stock" workflow: per-SKU stock deltas, strict
//! farmer/retailer allocation bookkeeping, duplicate-retailer screening, and
//! the resumable multi-step verification session. The engine is a library;
//! rendering, storage, and transport live behind the traits in [`ports`].

pub mod error;
pub mod ports;
pub mod services;

pub use error::{EngineError, EngineResult, ValidationIssue};
pub use services::allocation::AllocationLedger;
pub use services::duplicate::detect_duplicates;
pub use services::session::{
    SessionSnapshot, SkuSubmission, Step, SubmissionPayload, VerificationSession,
};
pub use services::workflow::VerificationService;
