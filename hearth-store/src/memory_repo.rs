use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use hearth_core::repository::{OfferRepository, Versioned};
use hearth_core::{OfferRecord, OfferStatus, WorkflowError, WorkflowResult};

struct StoredRecord {
    record: OfferRecord,
    version: u64,
}

/// In-memory offer record store.
///
/// Records on distinct offer ids are fully parallel behind the map lock;
/// writers to the same record are serialized by the optimistic version
/// check, so two simultaneous mutations cannot both commit. Every update
/// replaces the whole record or nothing.
pub struct InMemoryOfferRepository {
    records: RwLock<HashMap<String, StoredRecord>>,
}

impl InMemoryOfferRepository {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryOfferRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OfferRepository for InMemoryOfferRepository {
    async fn create(&self, record: &OfferRecord) -> WorkflowResult<()> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.offer_id) {
            return Err(WorkflowError::Conflict(format!(
                "offer id {} already exists",
                record.offer_id
            )));
        }
        records.insert(
            record.offer_id.clone(),
            StoredRecord {
                record: record.clone(),
                version: 1,
            },
        );
        tracing::debug!(offer_id = %record.offer_id, "offer record created");
        Ok(())
    }

    async fn get(&self, offer_id: &str) -> WorkflowResult<Option<Versioned>> {
        let records = self.records.read().await;
        Ok(records.get(offer_id).map(|stored| Versioned {
            record: stored.record.clone(),
            version: stored.version,
        }))
    }

    async fn update(&self, record: &OfferRecord, expected_version: u64) -> WorkflowResult<u64> {
        let mut records = self.records.write().await;
        let stored = records
            .get_mut(&record.offer_id)
            .ok_or_else(|| WorkflowError::NotFound(format!("offer {}", record.offer_id)))?;

        if stored.version != expected_version {
            return Err(WorkflowError::Conflict(format!(
                "offer {} version {} (expected {})",
                record.offer_id, stored.version, expected_version
            )));
        }

        stored.record = record.clone();
        stored.version += 1;
        Ok(stored.version)
    }

    async fn find_by_email(&self, email: &str) -> WorkflowResult<Vec<OfferRecord>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|s| !s.record.is_deleted && s.record.contact_email == email)
            .map(|s| s.record.clone())
            .collect())
    }

    async fn find_by_status(&self, status: OfferStatus) -> WorkflowResult<Vec<OfferRecord>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|s| !s.record.is_deleted && s.record.status == status)
            .map(|s| s.record.clone())
            .collect())
    }

    async fn list(&self) -> WorkflowResult<Vec<OfferRecord>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|s| !s.record.is_deleted)
            .map(|s| s.record.clone())
            .collect())
    }

    async fn soft_delete(&self, offer_id: &str) -> WorkflowResult<()> {
        let mut records = self.records.write().await;
        let stored = records
            .get_mut(offer_id)
            .ok_or_else(|| WorkflowError::NotFound(format!("offer {}", offer_id)))?;
        stored.record.is_deleted = true;
        stored.version += 1;
        Ok(())
    }
}
