//! In-memory project store

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::ProjectStore;
use crate::Result;
use crate::domain::{QuerySpec, RawProjectRecord};

/// Project store kept entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectStore {
    records: Arc<RwLock<Vec<RawProjectRecord>>>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with records
    pub fn with_records(records: Vec<RawProjectRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn query(&self, spec: &QuerySpec) -> Result<Vec<RawProjectRecord>> {
        let records = self.records.read().await;
        let matched: Vec<RawProjectRecord> =
            records.iter().filter(|r| spec.matches(r)).cloned().collect();
        debug!(query = %spec, matched = matched.len(), "Queried in-memory store");
        Ok(matched)
    }

    async fn insert(&self, mut record: RawProjectRecord) -> Result<String> {
        if record.id.is_empty() {
            record.id = Uuid::new_v4().to_string();
        }
        let id = record.id.clone();
        self.records.write().await.push(record);
        Ok(id)
    }
}
