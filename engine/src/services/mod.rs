//! Business logic services for the verification engine

pub mod allocation;
pub mod duplicate;
pub mod session;
pub mod similarity;
pub mod workflow;

pub use allocation::AllocationLedger;
pub use session::VerificationSession;
pub use workflow::VerificationService;
