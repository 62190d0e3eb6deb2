//! Boundary contracts the engine consumes
//!
//! HTTP, file storage, and camera capture are implemented by the hosting
//! application; the engine only sees these traits.

use async_trait::async_trait;
use shared::{ArtifactKind, NewRetailerCandidate, RetailerRef, Sku};

use crate::error::EngineResult;
use crate::services::session::{SessionSnapshot, SubmissionPayload};

/// Source of SKU snapshots for a distributor or retailer
#[async_trait]
pub trait ProductDataProvider: Send + Sync {
    async fn fetch_skus(&self, entity_id: &str) -> EngineResult<Vec<Sku>>;
}

/// Lookup and creation of retailer identities
#[async_trait]
pub trait RetailerDirectory: Send + Sync {
    async fn search(&self, query: &str) -> EngineResult<Vec<RetailerRef>>;

    /// Persist a new retailer. Callers must have cleared duplicate screening
    /// before invoking.
    async fn create(&self, candidate: &NewRetailerCandidate) -> EngineResult<RetailerRef>;
}

/// Storage for signature and proof-photo uploads
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Upload a blob and return its opaque URL
    async fn upload(&self, kind: ArtifactKind, bytes: &[u8]) -> EngineResult<String>;
}

/// Final handoff of an assembled verification submission
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit(&self, payload: &SubmissionPayload) -> EngineResult<()>;
}

/// Durable key-value persistence for resumable sessions, keyed by entity id
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn save(&self, key: &str, snapshot: &SessionSnapshot) -> EngineResult<()>;
    async fn load(&self, key: &str) -> EngineResult<Option<SessionSnapshot>>;
    async fn clear(&self, key: &str) -> EngineResult<()>;
}
