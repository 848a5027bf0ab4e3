//! RAG index-tracking and extraction-cache entities (spec.md §3).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexStatus {
    Pending,
    Indexed,
    Failed,
    Deleted,
}

impl IndexStatus {
    /// Index records transition only forward: pending -> indexed <-> failed -> deleted.
    pub fn can_transition_to(self, next: IndexStatus) -> bool {
        use IndexStatus::*;
        matches!(
            (self, next),
            (Pending, Indexed)
                | (Pending, Failed)
                | (Indexed, Failed)
                | (Indexed, Deleted)
                | (Failed, Indexed)
                | (Failed, Deleted)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRecord {
    pub entity_id: String,
    pub entity_type: String,
    pub content_hash: String,
    pub chunk_count: usize,
    pub point_ids: Vec<String>,
    pub model: String,
    pub status: IndexStatus,
    pub retry_count: u32,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IndexRecord {
    pub fn key(&self) -> (String, String) {
        (self.entity_id.clone(), self.entity_type.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionCacheEntry {
    pub url_hash: String,
    pub timestamp: DateTime<Utc>,
    pub payload: serde_json::Value,
}

pub const EXTRACTION_CACHE_TTL_HOURS: i64 = 24;

impl ExtractionCacheEntry {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.timestamp)
            > chrono::Duration::hours(EXTRACTION_CACHE_TTL_HOURS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_status_forward_transitions_only() {
        assert!(IndexStatus::Pending.can_transition_to(IndexStatus::Indexed));
        assert!(IndexStatus::Indexed.can_transition_to(IndexStatus::Failed));
        assert!(IndexStatus::Failed.can_transition_to(IndexStatus::Indexed));
        assert!(!IndexStatus::Deleted.can_transition_to(IndexStatus::Indexed));
        assert!(!IndexStatus::Pending.can_transition_to(IndexStatus::Deleted));
    }

    #[test]
    fn cache_entry_expires_after_24h() {
        let entry = ExtractionCacheEntry {
            url_hash: "abc".into(),
            timestamp: Utc::now() - chrono::Duration::hours(25),
            payload: serde_json::json!({}),
        };
        assert!(entry.is_expired(Utc::now()));
    }
}
