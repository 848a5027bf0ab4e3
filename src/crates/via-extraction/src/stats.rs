//! Extraction telemetry (spec.md §4.1), exposed via
//! [`crate::service::ExtractionService::stats`] and logged on every call.

use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default, Clone)]
pub struct ExtractionStatsSnapshot {
    pub total_extractions: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub method_usage: HashMap<String, u64>,
}

#[derive(Default)]
pub struct ExtractionStats {
    total_extractions: RwLock<u64>,
    cache_hits: RwLock<u64>,
    cache_misses: RwLock<u64>,
    method_usage: RwLock<HashMap<String, u64>>,
}

impl ExtractionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record_cache_hit(&self) {
        *self.total_extractions.write().await += 1;
        *self.cache_hits.write().await += 1;
    }

    pub async fn record_cache_miss(&self, method: &str) {
        *self.total_extractions.write().await += 1;
        *self.cache_misses.write().await += 1;
        *self.method_usage.write().await.entry(method.to_string()).or_insert(0) += 1;
    }

    pub async fn snapshot(&self) -> ExtractionStatsSnapshot {
        ExtractionStatsSnapshot {
            total_extractions: *self.total_extractions.read().await,
            cache_hits: *self.cache_hits.read().await,
            cache_misses: *self.cache_misses.read().await,
            method_usage: self.method_usage.read().await.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn method_usage_tallies_by_method_name() {
        let stats = ExtractionStats::new();
        stats.record_cache_miss("structural").await;
        stats.record_cache_miss("structural").await;
        stats.record_cache_hit().await;
        let snapshot = stats.snapshot().await;
        assert_eq!(snapshot.total_extractions, 3);
        assert_eq!(snapshot.cache_hits, 1);
        assert_eq!(snapshot.cache_misses, 2);
        assert_eq!(snapshot.method_usage.get("structural"), Some(&2));
    }
}
