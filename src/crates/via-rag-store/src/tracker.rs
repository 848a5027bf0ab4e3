//! Index-tracking table (spec.md §3 `IndexRecord`), ported from
//! `index_tracker.py`: SHA-256 content hashing decides whether a card needs
//! re-embedding, mirrored here over an in-memory map keyed by
//! `(entity_id, entity_type)` rather than Postgres.

use chrono::Utc;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tokio::sync::RwLock;
use via_domain::rag::{IndexRecord, IndexStatus};

pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TrackerStats {
    pub indexed: usize,
    pub failed: usize,
    pub pending: usize,
    pub deleted: usize,
}

#[derive(Default)]
pub struct IndexTracker {
    records: RwLock<HashMap<(String, String), IndexRecord>>,
}

impl IndexTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_indexed(&self, entity_id: &str, entity_type: &str) -> bool {
        self.records
            .read()
            .await
            .get(&(entity_id.to_string(), entity_type.to_string()))
            .is_some_and(|r| r.status == IndexStatus::Indexed)
    }

    /// `true` unless an `Indexed` record already carries this exact content hash.
    pub async fn needs_reindex(&self, entity_id: &str, entity_type: &str, content: &str) -> bool {
        let hash = content_hash(content);
        match self
            .records
            .read()
            .await
            .get(&(entity_id.to_string(), entity_type.to_string()))
        {
            Some(record) if record.status == IndexStatus::Indexed => record.content_hash != hash,
            _ => true,
        }
    }

    pub async fn record_index(
        &self,
        entity_id: &str,
        entity_type: &str,
        content: &str,
        chunk_count: usize,
        point_ids: Vec<String>,
        model: &str,
    ) {
        let now = Utc::now();
        let mut records = self.records.write().await;
        let key = (entity_id.to_string(), entity_type.to_string());
        let entry = records.entry(key).or_insert_with(|| IndexRecord {
            entity_id: entity_id.to_string(),
            entity_type: entity_type.to_string(),
            content_hash: String::new(),
            chunk_count: 0,
            point_ids: Vec::new(),
            model: model.to_string(),
            status: IndexStatus::Pending,
            retry_count: 0,
            last_error: None,
            created_at: now,
            updated_at: now,
        });
        entry.content_hash = content_hash(content);
        entry.chunk_count = chunk_count;
        entry.point_ids = point_ids;
        entry.model = model.to_string();
        entry.status = IndexStatus::Indexed;
        entry.last_error = None;
        entry.updated_at = now;
    }

    pub async fn record_index_failure(&self, entity_id: &str, entity_type: &str, error: &str) {
        let now = Utc::now();
        let mut records = self.records.write().await;
        let key = (entity_id.to_string(), entity_type.to_string());
        let entry = records.entry(key).or_insert_with(|| IndexRecord {
            entity_id: entity_id.to_string(),
            entity_type: entity_type.to_string(),
            content_hash: String::new(),
            chunk_count: 0,
            point_ids: Vec::new(),
            model: String::new(),
            status: IndexStatus::Pending,
            retry_count: 0,
            last_error: None,
            created_at: now,
            updated_at: now,
        });
        entry.status = IndexStatus::Failed;
        entry.retry_count += 1;
        entry.last_error = Some(error.to_string());
        entry.updated_at = now;
    }

    pub async fn mark_deleted(&self, entity_id: &str, entity_type: &str) {
        if let Some(record) = self
            .records
            .write()
            .await
            .get_mut(&(entity_id.to_string(), entity_type.to_string()))
        {
            record.status = IndexStatus::Deleted;
            record.updated_at = Utc::now();
        }
    }

    pub async fn stats(&self) -> TrackerStats {
        let records = self.records.read().await;
        let mut stats = TrackerStats::default();
        for record in records.values() {
            match record.status {
                IndexStatus::Indexed => stats.indexed += 1,
                IndexStatus::Failed => stats.failed += 1,
                IndexStatus::Pending => stats.pending += 1,
                IndexStatus::Deleted => stats.deleted += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn needs_reindex_false_when_hash_unchanged() {
        let tracker = IndexTracker::new();
        tracker
            .record_index("c1", "card", "hello world", 1, vec!["c1:0".into()], "m1")
            .await;
        assert!(!tracker.needs_reindex("c1", "card", "hello world").await);
        assert!(tracker.needs_reindex("c1", "card", "changed content").await);
    }

    #[tokio::test]
    async fn record_index_failure_increments_retry_count() {
        let tracker = IndexTracker::new();
        tracker.record_index_failure("c1", "card", "timeout").await;
        tracker.record_index_failure("c1", "card", "timeout again").await;
        let stats = tracker.stats().await;
        assert_eq!(stats.failed, 1);
    }
}
