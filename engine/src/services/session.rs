//! Verification session state machine
//!
//! A session walks one distributor/retailer visit through stock entry,
//! allocation, signature, and proof capture. Forward transitions are gated;
//! a single step back is always allowed; skipping is not. Sessions serialize
//! to a day-scoped snapshot so a field user can continue where they left off
//! after a reload.
//!
//! Cancelling a session is dropping the value. A persisted snapshot is
//! cleared only on successful submission or an explicit start-fresh, never by
//! cancellation alone.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{validate_stock_entry, RetailerAllocation, Sku, StockEntry};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult, ValidationIssue};
use crate::services::allocation::AllocationLedger;

/// Workflow steps, linear and forward-only with single-step back
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    StockEntry,
    Allocation,
    Signature,
    ProofCapture,
    Submitted,
}

impl Step {
    pub fn number(&self) -> u8 {
        match self {
            Step::StockEntry => 1,
            Step::Allocation => 2,
            Step::Signature => 3,
            Step::ProofCapture => 4,
            Step::Submitted => 5,
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::StockEntry => write!(f, "Stock Entry"),
            Step::Allocation => write!(f, "Allocation"),
            Step::Signature => write!(f, "Signature"),
            Step::ProofCapture => write!(f, "Proof Capture"),
            Step::Submitted => write!(f, "Submitted"),
        }
    }
}

/// Durable form of a session, keyed externally by entity id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub entity_id: String,
    pub step: Step,
    pub skus: Vec<Sku>,
    pub stock_entries: BTreeMap<String, Decimal>,
    pub ledgers: Vec<AllocationLedger>,
    pub signature_ref: Option<String>,
    pub proof_refs: Vec<String>,
    pub saved_at: DateTime<Utc>,
    /// Calendar day the snapshot belongs to; snapshots from another day are
    /// discarded on restore
    pub saved_date: NaiveDate,
}

/// Per-SKU slice of the final submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuSubmission {
    pub product_code: String,
    pub sku_code: String,
    pub new_stock: Decimal,
    pub farmer_quantity: Decimal,
    pub retailer_allocations: Vec<RetailerAllocation>,
}

/// Assembled submission, handed to the submission sink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub session_id: Uuid,
    pub entity_id: String,
    pub entries: Vec<SkuSubmission>,
    pub signature_url: String,
    pub proof_urls: Vec<String>,
}

/// The stateful multi-step verification workflow for one entity visit
#[derive(Debug, Clone)]
pub struct VerificationSession {
    id: Uuid,
    entity_id: String,
    skus: Vec<Sku>,
    stock_entries: BTreeMap<String, Decimal>,
    ledgers: Vec<AllocationLedger>,
    signature_ref: Option<String>,
    proof_refs: Vec<String>,
    step: Step,
}

impl VerificationSession {
    /// Start a fresh session at the stock-entry step
    pub fn new(entity_id: impl Into<String>, skus: Vec<Sku>) -> Self {
        Self {
            id: Uuid::new_v4(),
            entity_id: entity_id.into(),
            skus,
            stock_entries: BTreeMap::new(),
            ledgers: Vec::new(),
            signature_ref: None,
            proof_refs: Vec::new(),
            step: Step::StockEntry,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn skus(&self) -> &[Sku] {
        &self.skus
    }

    pub fn stock_entry(&self, sku_key: &str) -> Option<Decimal> {
        self.stock_entries.get(sku_key).copied()
    }

    /// All entered values so far, for UI display
    pub fn stock_entries(&self) -> Vec<StockEntry> {
        self.stock_entries
            .iter()
            .map(|(sku_key, new_stock)| StockEntry {
                sku_key: sku_key.clone(),
                new_stock: *new_stock,
            })
            .collect()
    }

    pub fn ledgers(&self) -> &[AllocationLedger] {
        &self.ledgers
    }

    /// Mutable access to one SKU's ledger during the allocation step
    pub fn ledger_mut(&mut self, sku_key: &str) -> EngineResult<&mut AllocationLedger> {
        if self.step != Step::Allocation {
            return Err(EngineError::InvalidStateTransition(format!(
                "Allocations can only be edited in the Allocation step (currently {})",
                self.step
            )));
        }
        self.ledgers
            .iter_mut()
            .find(|ledger| ledger.key() == sku_key)
            .ok_or_else(|| EngineError::NotFound(format!("Ledger for SKU {}", sku_key)))
    }

    pub fn signature_ref(&self) -> Option<&str> {
        self.signature_ref.as_deref()
    }

    pub fn proof_refs(&self) -> &[String] {
        &self.proof_refs
    }

    /// Record or replace the entered stock value for one SKU
    pub fn record_stock_entry(&mut self, sku_key: &str, value: Decimal) -> EngineResult<()> {
        if self.step != Step::StockEntry {
            return Err(EngineError::InvalidStateTransition(format!(
                "Stock entries can only be edited in the Stock Entry step (currently {})",
                self.step
            )));
        }
        let sku = self
            .skus
            .iter()
            .find(|sku| sku.key() == sku_key)
            .ok_or_else(|| EngineError::NotFound(format!("SKU {}", sku_key)))?;
        validate_stock_entry(value)
            .map_err(|message| EngineError::invalid(sku.key(), message))?;
        self.stock_entries.insert(sku.key(), value);
        Ok(())
    }

    /// Attempt the forward transition out of the current step.
    ///
    /// Gate violations are returned as a full list of issues so the UI can
    /// highlight every problem at once.
    pub fn advance(&mut self) -> EngineResult<Step> {
        match self.step {
            Step::StockEntry => {
                let issues = self.stock_entry_issues();
                if !issues.is_empty() {
                    return Err(EngineError::validation(issues));
                }
                self.rebuild_ledgers();
                self.step = Step::Allocation;
            }
            Step::Allocation => {
                let issues: Vec<ValidationIssue> = self
                    .ledgers
                    .iter()
                    .flat_map(AllocationLedger::completion_issues)
                    .collect();
                if !issues.is_empty() {
                    return Err(EngineError::validation(issues));
                }
                self.step = Step::Signature;
            }
            Step::Signature => {
                if self.signature_ref.as_deref().unwrap_or("").is_empty() {
                    return Err(EngineError::invalid(
                        "signature",
                        "A signature must be captured before continuing",
                    ));
                }
                self.step = Step::ProofCapture;
            }
            Step::ProofCapture => {
                let issues = self.submission_issues();
                if !issues.is_empty() {
                    return Err(EngineError::validation(issues));
                }
                self.step = Step::Submitted;
            }
            Step::Submitted => {
                return Err(EngineError::InvalidStateTransition(
                    "Session is already submitted".to_string(),
                ));
            }
        }
        Ok(self.step)
    }

    /// Step back to the previous step. Lossless: entries, ledgers, and
    /// captured artifacts are all kept.
    pub fn step_back(&mut self) -> EngineResult<Step> {
        self.step = match self.step {
            Step::Allocation => Step::StockEntry,
            Step::Signature => Step::Allocation,
            Step::ProofCapture => Step::Signature,
            Step::StockEntry | Step::Submitted => {
                return Err(EngineError::InvalidStateTransition(format!(
                    "Cannot step back from {}",
                    self.step
                )));
            }
        };
        Ok(self.step)
    }

    /// Attach the uploaded signature artifact
    pub fn attach_signature(&mut self, url: impl Into<String>) -> EngineResult<()> {
        if self.step != Step::Signature {
            return Err(EngineError::InvalidStateTransition(format!(
                "Signature is captured in the Signature step (currently {})",
                self.step
            )));
        }
        let url = url.into();
        if url.is_empty() {
            return Err(EngineError::invalid("signature", "Empty signature reference"));
        }
        self.signature_ref = Some(url);
        Ok(())
    }

    /// Attach an uploaded proof-photo artifact
    pub fn add_proof(&mut self, url: impl Into<String>) -> EngineResult<()> {
        if self.step != Step::ProofCapture {
            return Err(EngineError::InvalidStateTransition(format!(
                "Proof photos are captured in the Proof Capture step (currently {})",
                self.step
            )));
        }
        let url = url.into();
        if url.is_empty() {
            return Err(EngineError::invalid("proof", "Empty proof reference"));
        }
        self.proof_refs.push(url);
        Ok(())
    }

    pub fn remove_proof(&mut self, index: usize) -> EngineResult<()> {
        if index >= self.proof_refs.len() {
            return Err(EngineError::NotFound(format!("Proof photo {}", index)));
        }
        self.proof_refs.remove(index);
        Ok(())
    }

    /// Missing or unchanged stock entries blocking the 1 -> 2 transition
    fn stock_entry_issues(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for sku in self.skus.iter().filter(|sku| sku.is_active()) {
            if !self.stock_entries.contains_key(&sku.key()) {
                issues.push(ValidationIssue::new(
                    sku.key(),
                    format!("{} ({}) has no stock entry", sku.sku_name, sku.sku_code),
                ));
            }
        }
        if issues.is_empty() && !self.any_stock_changed() {
            issues.push(ValidationIssue::new(
                "stock_entries",
                "No SKU has a stock change to verify",
            ));
        }
        issues
    }

    fn any_stock_changed(&self) -> bool {
        self.skus.iter().any(|sku| {
            self.stock_entries
                .get(&sku.key())
                .is_some_and(|value| *value != sku.current_stock)
        })
    }

    /// Build one ledger per changed SKU, in session SKU order.
    ///
    /// An existing ledger survives as long as its entered stock is unchanged,
    /// so a round trip back to stock entry keeps allocations already made.
    fn rebuild_ledgers(&mut self) {
        let previous = std::mem::take(&mut self.ledgers);
        for sku in &self.skus {
            let Some(new_stock) = self.stock_entries.get(&sku.key()).copied() else {
                continue;
            };
            if new_stock == sku.current_stock {
                continue;
            }
            let kept = previous
                .iter()
                .find(|ledger| ledger.key() == sku.key() && ledger.new_stock == new_stock);
            match kept {
                Some(ledger) => self.ledgers.push(ledger.clone()),
                None => {
                    // Delta is abs-derived, so the constructor cannot fail
                    // for a validated entry
                    if let Ok(ledger) = AllocationLedger::new(sku, new_stock) {
                        self.ledgers.push(ledger);
                    }
                }
            }
        }
    }

    /// Problems blocking final submission; empty when submittable
    pub fn submission_issues(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        if self.proof_refs.is_empty() {
            let has_retailer_allocation = self.ledgers.iter().any(|ledger| {
                ledger
                    .retailer_allocations
                    .iter()
                    .any(|row| row.quantity > Decimal::ZERO)
            });
            let message = if has_retailer_allocation {
                "Proof photo is mandatory when stock was allocated to retailers"
            } else {
                "At least one proof photo is required"
            };
            issues.push(ValidationIssue::new("proof", message));
        }
        issues
    }

    /// Serialize the session for durable storage
    pub fn snapshot(&self, saved_at: DateTime<Utc>, saved_date: NaiveDate) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            entity_id: self.entity_id.clone(),
            step: self.step,
            skus: self.skus.clone(),
            stock_entries: self.stock_entries.clone(),
            ledgers: self.ledgers.clone(),
            signature_ref: self.signature_ref.clone(),
            proof_refs: self.proof_refs.clone(),
            saved_at,
            saved_date,
        }
    }

    /// Rehydrate a session from a snapshot.
    ///
    /// Returns `None` when the snapshot belongs to another entity or another
    /// calendar day; stale snapshots are discarded, never merged.
    pub fn restore(
        snapshot: SessionSnapshot,
        entity_id: &str,
        today: NaiveDate,
    ) -> Option<Self> {
        if snapshot.entity_id != entity_id || snapshot.saved_date != today {
            return None;
        }
        Some(Self {
            id: snapshot.session_id,
            entity_id: snapshot.entity_id,
            skus: snapshot.skus,
            stock_entries: snapshot.stock_entries,
            ledgers: snapshot.ledgers,
            signature_ref: snapshot.signature_ref,
            proof_refs: snapshot.proof_refs,
            step: snapshot.step,
        })
    }

    /// Pure projection of session state into the final submission.
    ///
    /// Retailer rows are re-filtered to resolved ids and positive quantities
    /// even though complete ledgers already guarantee this.
    pub fn build_submission_payload(&self) -> SubmissionPayload {
        let entries = self
            .ledgers
            .iter()
            .map(|ledger| SkuSubmission {
                product_code: ledger.product_code.clone(),
                sku_code: ledger.sku_code.clone(),
                new_stock: ledger.new_stock,
                farmer_quantity: ledger.farmer_quantity,
                retailer_allocations: ledger
                    .retailer_allocations
                    .iter()
                    .filter(|row| row.is_resolved())
                    .cloned()
                    .collect(),
            })
            .collect();

        SubmissionPayload {
            session_id: self.id,
            entity_id: self.entity_id.clone(),
            entries,
            signature_url: self.signature_ref.clone().unwrap_or_default(),
            proof_urls: self.proof_refs.clone(),
        }
    }
}
