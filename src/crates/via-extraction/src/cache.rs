//! URL extraction cache (spec.md §3/§6 `ExtractionCacheEntry`), ported from
//! `url_extractors.py`'s in-process cache: keyed by a SHA-256 hash of the
//! normalized URL, entries expire after
//! [`via_domain::rag::EXTRACTION_CACHE_TTL_HOURS`].

use chrono::Utc;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tokio::sync::RwLock;
use via_domain::rag::ExtractionCacheEntry;

pub fn url_hash(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.trim().to_ascii_lowercase().as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Default)]
pub struct ExtractionCache {
    entries: RwLock<HashMap<String, ExtractionCacheEntry>>,
}

impl ExtractionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached payload unless it is missing or past its TTL; an
    /// expired entry is left in place for [`Self::stats`] to still see it
    /// was once cached, mirroring the original's lazy-eviction posture.
    pub async fn get(&self, url: &str) -> Option<serde_json::Value> {
        let hash = url_hash(url);
        let entries = self.entries.read().await;
        let entry = entries.get(&hash)?;
        if entry.is_expired(Utc::now()) {
            None
        } else {
            Some(entry.payload.clone())
        }
    }

    pub async fn put(&self, url: &str, payload: serde_json::Value) {
        let hash = url_hash(url);
        self.entries.write().await.insert(
            hash.clone(),
            ExtractionCacheEntry {
                url_hash: hash,
                timestamp: Utc::now(),
                payload,
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let cache = ExtractionCache::new();
        cache.put("https://example.com", json!({"title": "Example"})).await;
        let hit = cache.get("https://example.com").await;
        assert_eq!(hit.unwrap()["title"], "Example");
    }

    #[tokio::test]
    async fn expired_entry_is_not_returned() {
        let cache = ExtractionCache::new();
        let hash = url_hash("https://example.com");
        cache.entries.write().await.insert(
            hash.clone(),
            ExtractionCacheEntry {
                url_hash: hash,
                timestamp: Utc::now() - chrono::Duration::hours(25),
                payload: json!({}),
            },
        );
        assert!(cache.get("https://example.com").await.is_none());
    }

    #[tokio::test]
    async fn cache_key_is_case_and_whitespace_insensitive() {
        let cache = ExtractionCache::new();
        cache.put("HTTPS://Example.com/ ", json!({"title": "x"})).await;
        assert!(cache.get(" https://example.com/").await.is_some());
    }
}
