use async_trait::async_trait;

use crate::models::{OfferRecord, OfferStatus};
use crate::WorkflowResult;

/// A record paired with the store version it was read at. Updates must carry
/// the version back so a lost concurrent-mutation race surfaces as Conflict.
#[derive(Debug, Clone)]
pub struct Versioned {
    pub record: OfferRecord,
    pub version: u64,
}

/// Repository for offer records. Each record is an independent unit of
/// concurrency; operations on the same record are serialized through the
/// optimistic version check, and every mutation commits in full or not at
/// all.
#[async_trait]
pub trait OfferRepository: Send + Sync {
    /// Persist a new record. A duplicate offer id fails with Conflict; the
    /// caller regenerates the id and retries.
    async fn create(&self, record: &OfferRecord) -> WorkflowResult<()>;

    /// Fetch by offer id, including soft-deleted records.
    async fn get(&self, offer_id: &str) -> WorkflowResult<Option<Versioned>>;

    /// Replace the record if `expected_version` still matches; returns the
    /// new version. A mismatch fails with Conflict and changes nothing.
    async fn update(&self, record: &OfferRecord, expected_version: u64) -> WorkflowResult<u64>;

    /// All non-deleted records for a contact email.
    async fn find_by_email(&self, email: &str) -> WorkflowResult<Vec<OfferRecord>>;

    /// All non-deleted records in a given status.
    async fn find_by_status(&self, status: OfferStatus) -> WorkflowResult<Vec<OfferRecord>>;

    /// All non-deleted records.
    async fn list(&self) -> WorkflowResult<Vec<OfferRecord>>;

    /// Set the soft-delete flag. Records are retained for audit, never
    /// physically purged. Allowed in any state, terminal included.
    async fn soft_delete(&self, offer_id: &str) -> WorkflowResult<()>;
}
