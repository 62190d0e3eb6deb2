//! Verification workflow orchestration
//!
//! Ties the session state machine to the external collaborators: resuming
//! day-scoped snapshots, checkpointing after forward transitions, gated
//! retailer creation, artifact capture, and final submission.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use shared::{
    normalize_text, validate_indian_mobile, validate_outlet_name, validate_pincode, ArtifactKind,
    MatchKind, NewRetailerCandidate, RetailerRef,
};

use crate::error::{EngineError, EngineResult, ValidationIssue};
use crate::ports::{
    ArtifactStore, ProductDataProvider, RetailerDirectory, SnapshotStore, SubmissionSink,
};
use crate::services::duplicate::detect_duplicates;
use crate::services::session::{Step, VerificationSession};

/// Itemized field problems for a retailer candidate; empty when well-formed
fn candidate_issues(candidate: &NewRetailerCandidate) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if normalize_text(&candidate.name).is_empty() {
        issues.push(ValidationIssue::new("name", "Retailer name is required"));
    }
    if let Err(message) = validate_outlet_name(&candidate.outlet_name) {
        issues.push(ValidationIssue::new("outlet_name", message));
    }
    if !candidate.phone.is_empty() {
        if let Err(message) = validate_indian_mobile(&candidate.phone) {
            issues.push(ValidationIssue::new("phone", message));
        }
    }
    if !candidate.pincode.is_empty() {
        if let Err(message) = validate_pincode(&candidate.pincode) {
            issues.push(ValidationIssue::new("pincode", message));
        }
    }
    issues
}

/// Orchestrates verification sessions over the engine's ports
#[derive(Clone)]
pub struct VerificationService {
    products: Arc<dyn ProductDataProvider>,
    directory: Arc<dyn RetailerDirectory>,
    artifacts: Arc<dyn ArtifactStore>,
    sink: Arc<dyn SubmissionSink>,
    snapshots: Arc<dyn SnapshotStore>,
}

impl VerificationService {
    pub fn new(
        products: Arc<dyn ProductDataProvider>,
        directory: Arc<dyn RetailerDirectory>,
        artifacts: Arc<dyn ArtifactStore>,
        sink: Arc<dyn SubmissionSink>,
        snapshots: Arc<dyn SnapshotStore>,
    ) -> Self {
        Self {
            products,
            directory,
            artifacts,
            sink,
            snapshots,
        }
    }

    /// Resume a same-day session for the entity, or start a new one.
    ///
    /// A snapshot from another day or another entity is discarded; it is also
    /// cleared from the store since it can never be resumed again.
    pub async fn start(
        &self,
        entity_id: &str,
        today: NaiveDate,
    ) -> EngineResult<VerificationSession> {
        if let Some(snapshot) = self.snapshots.load(entity_id).await? {
            let saved_date = snapshot.saved_date;
            match VerificationSession::restore(snapshot, entity_id, today) {
                Some(session) => {
                    tracing::info!(
                        session_id = %session.id(),
                        entity_id,
                        step = %session.step(),
                        "resumed verification session from snapshot"
                    );
                    return Ok(session);
                }
                None => {
                    tracing::info!(entity_id, %saved_date, "discarding stale snapshot");
                    self.snapshots.clear(entity_id).await?;
                }
            }
        }

        let skus = self.products.fetch_skus(entity_id).await?;
        Ok(VerificationSession::new(entity_id, skus))
    }

    /// Explicitly discard any persisted progress and start over
    pub async fn start_fresh(&self, entity_id: &str) -> EngineResult<VerificationSession> {
        self.snapshots.clear(entity_id).await?;
        let skus = self.products.fetch_skus(entity_id).await?;
        Ok(VerificationSession::new(entity_id, skus))
    }

    /// Advance the session one step and checkpoint the new state.
    ///
    /// Snapshots are written only at these defined checkpoints, never
    /// mid-edit, so a persisted snapshot is always internally consistent.
    /// Leaving the proof-capture step is refused here: that crossing happens
    /// only through [`submit`](Self::submit), after the sink accepts the
    /// payload.
    pub async fn advance(
        &self,
        session: &mut VerificationSession,
        today: NaiveDate,
    ) -> EngineResult<Step> {
        if session.step() == Step::ProofCapture {
            return Err(EngineError::InvalidStateTransition(
                "Proof Capture completes through submission, not a forward step".to_string(),
            ));
        }
        let step = session.advance()?;
        self.checkpoint(session, today).await?;
        tracing::debug!(session_id = %session.id(), step = %step, "advanced verification session");
        Ok(step)
    }

    /// Step back without writing a checkpoint
    pub fn step_back(&self, session: &mut VerificationSession) -> EngineResult<Step> {
        session.step_back()
    }

    async fn checkpoint(
        &self,
        session: &VerificationSession,
        today: NaiveDate,
    ) -> EngineResult<()> {
        let snapshot = session.snapshot(Utc::now(), today);
        self.snapshots.save(session.entity_id(), &snapshot).await
    }

    /// Create a retailer after duplicate screening.
    ///
    /// An exact name match is a hard block with no override path. Similar-name
    /// and same-phone matches require an explicit acknowledgment from the
    /// user. A phone match at a distinct address is permitted outright.
    pub async fn create_retailer(
        &self,
        candidate: &NewRetailerCandidate,
        override_acknowledged: bool,
    ) -> EngineResult<RetailerRef> {
        let issues = candidate_issues(candidate);
        if !issues.is_empty() {
            return Err(EngineError::validation(issues));
        }

        let mut roster = self.directory.search(&candidate.name).await?;
        if !candidate.phone.is_empty() {
            for found in self.directory.search(&candidate.phone).await? {
                if !roster.iter().any(|existing| existing.id == found.id) {
                    roster.push(found);
                }
            }
        }

        if let Some(conflict) = detect_duplicates(candidate, &roster) {
            let blocked = match conflict.kind {
                MatchKind::Exact => true,
                MatchKind::Similar | MatchKind::Phone => !override_acknowledged,
                MatchKind::PhoneAddress => false,
            };
            if blocked {
                return Err(EngineError::DuplicateConflict { conflict });
            }
        }

        self.directory.create(candidate).await
    }

    /// Upload a signature image and attach it to the session
    pub async fn capture_signature(
        &self,
        session: &mut VerificationSession,
        png_bytes: &[u8],
    ) -> EngineResult<()> {
        let url = self
            .artifacts
            .upload(ArtifactKind::Signature, png_bytes)
            .await?;
        session.attach_signature(url)
    }

    /// Upload a proof photo and attach it to the session
    pub async fn add_proof_photo(
        &self,
        session: &mut VerificationSession,
        bytes: &[u8],
    ) -> EngineResult<()> {
        let url = self.artifacts.upload(ArtifactKind::ProofPhoto, bytes).await?;
        session.add_proof(url)
    }

    /// Submit the finished session.
    ///
    /// The session is left untouched when the sink fails so the user can
    /// retry without re-entering anything. On success the session becomes
    /// terminal and the persisted snapshot is cleared.
    pub async fn submit(&self, session: &mut VerificationSession) -> EngineResult<()> {
        if session.step() != Step::ProofCapture {
            return Err(EngineError::InvalidStateTransition(format!(
                "Submission requires the Proof Capture step (currently {})",
                session.step()
            )));
        }
        let issues = session.submission_issues();
        if !issues.is_empty() {
            return Err(EngineError::validation(issues));
        }

        let payload = session.build_submission_payload();
        self.sink.submit(&payload).await?;

        session.advance()?;
        self.snapshots.clear(session.entity_id()).await?;
        tracing::info!(
            session_id = %session.id(),
            entity_id = %session.entity_id(),
            sku_count = payload.entries.len(),
            "verification submitted"
        );
        Ok(())
    }
}
