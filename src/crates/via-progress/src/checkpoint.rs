//! Operation checkpoint persistence (spec.md §4.8), ported from
//! `checkpoint_manager.py`. Deliberately its own light `CheckpointManager`
//! rather than a reuse of `via_checkpoint`'s channel-versioned Pregel
//! machinery: that crate checkpoints a graph executor's per-channel state
//! across super-steps, while this one persists a single opaque progress
//! snapshot per operation. Same trait-plus-in-memory-reference shape, a
//! different domain.

use crate::error::{ProgressError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use via_domain::OperationRecord;

/// Storage seam for operation checkpoints. An external service may back
/// this with Redis or a database; [`InMemoryCheckpointStore`] is the
/// reference implementation used by tests and default wiring.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    async fn put(&self, record: OperationRecord) -> Result<()>;
    async fn get(&self, operation_id: &str) -> Result<Option<OperationRecord>>;
    async fn delete(&self, operation_id: &str) -> Result<()>;
    async fn list(&self) -> Result<Vec<OperationRecord>>;
}

#[derive(Default)]
pub struct InMemoryCheckpointStore {
    records: RwLock<HashMap<String, OperationRecord>>,
}

impl InMemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CheckpointStore for InMemoryCheckpointStore {
    async fn put(&self, record: OperationRecord) -> Result<()> {
        self.records
            .write()
            .await
            .insert(record.operation_id.to_string(), record);
        Ok(())
    }

    async fn get(&self, operation_id: &str) -> Result<Option<OperationRecord>> {
        Ok(self.records.read().await.get(operation_id).cloned())
    }

    async fn delete(&self, operation_id: &str) -> Result<()> {
        self.records.write().await.remove(operation_id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<OperationRecord>> {
        Ok(self.records.read().await.values().cloned().collect())
    }
}

/// Saves/restores [`OperationRecord`] snapshots and exposes the incomplete
/// ones for crash recovery, matching `checkpoint_manager.py`'s
/// `get_incomplete_operations` and `cleanup_old_checkpoints`.
pub struct CheckpointManager {
    store: Arc<dyn CheckpointStore>,
}

impl CheckpointManager {
    pub fn new(store: Arc<dyn CheckpointStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryCheckpointStore::new()))
    }

    pub async fn save_checkpoint(&self, record: OperationRecord) -> Result<()> {
        self.store.put(record).await
    }

    pub async fn load_checkpoint(&self, operation_id: &str) -> Result<OperationRecord> {
        self.store
            .get(operation_id)
            .await?
            .ok_or_else(|| ProgressError::CheckpointNotFound(via_domain::OperationId::new(operation_id)))
    }

    pub async fn delete_checkpoint(&self, operation_id: &str) -> Result<()> {
        self.store.delete(operation_id).await
    }

    /// Incomplete operations (`progress < 1.0` and not terminal), optionally
    /// filtered by canvas or session.
    pub async fn get_incomplete_operations(
        &self,
        canvas_id: Option<&str>,
        session_id: Option<&str>,
    ) -> Result<Vec<OperationRecord>> {
        let all = self.store.list().await?;
        Ok(all
            .into_iter()
            .filter(|r| r.is_incomplete())
            .filter(|r| canvas_id.map_or(true, |c| r.canvas_id.as_deref() == Some(c)))
            .filter(|r| session_id.map_or(true, |s| r.session_id.as_deref() == Some(s)))
            .collect())
    }

    /// Deletes checkpoints whose `updated_at` is older than `max_age_days`
    /// (default 7, per `checkpoint_manager.py`'s `cleanup_old_checkpoints`).
    pub async fn cleanup_old_checkpoints(&self, now: DateTime<Utc>, max_age_days: i64) -> Result<usize> {
        let cutoff = now - Duration::days(max_age_days);
        let all = self.store.list().await?;
        let mut removed = 0;
        for record in all {
            if record.updated_at < cutoff {
                self.store.delete(&record.operation_id.to_string()).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use via_domain::OperationId;

    fn record(id: &str, progress: f64) -> OperationRecord {
        let mut r = OperationRecord::new(OperationId::new(id), "url_extraction", Utc::now());
        r.progress = progress;
        r
    }

    #[tokio::test]
    async fn save_and_load_round_trips() {
        let mgr = CheckpointManager::in_memory();
        mgr.save_checkpoint(record("op-1", 0.4)).await.unwrap();
        let loaded = mgr.load_checkpoint("op-1").await.unwrap();
        assert_eq!(loaded.progress, 0.4);
    }

    #[tokio::test]
    async fn load_missing_checkpoint_errors() {
        let mgr = CheckpointManager::in_memory();
        assert!(mgr.load_checkpoint("missing").await.is_err());
    }

    #[tokio::test]
    async fn incomplete_operations_excludes_finished_ones() {
        let mgr = CheckpointManager::in_memory();
        mgr.save_checkpoint(record("op-1", 0.4)).await.unwrap();
        let mut done = record("op-2", 1.0);
        done.state = via_domain::OperationState::Completed;
        mgr.save_checkpoint(done).await.unwrap();
        let incomplete = mgr.get_incomplete_operations(None, None).await.unwrap();
        assert_eq!(incomplete.len(), 1);
        assert_eq!(incomplete[0].operation_id.as_str(), "op-1");
    }

    #[tokio::test]
    async fn cleanup_removes_checkpoints_past_max_age() {
        let mgr = CheckpointManager::in_memory();
        let mut old = record("op-old", 0.2);
        old.updated_at = Utc::now() - Duration::days(10);
        mgr.save_checkpoint(old).await.unwrap();
        mgr.save_checkpoint(record("op-new", 0.2)).await.unwrap();
        let removed = mgr.cleanup_old_checkpoints(Utc::now(), 7).await.unwrap();
        assert_eq!(removed, 1);
        assert!(mgr.load_checkpoint("op-new").await.is_ok());
    }
}
