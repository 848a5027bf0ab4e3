//! Layered configuration (spec.md §6's options table), grounded on
//! `via_tooling::config::{ConfigBuilder, env}` and `orchestrator::config::loader`'s
//! defaults -> file -> env precedence. Every recognized option from the
//! spec's table is represented here with its documented default.

use serde::{Deserialize, Serialize};
use std::path::Path;
use via_tooling::config::{get_env_or, get_env_parse_or};

/// Similarity thresholds shared by the knowledge-graph state, the
/// self-correction job, and the category classifier's fallback path
/// (spec.md §6 "similarity thresholds").
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimilarityThresholds {
    pub min_parent: f64,
    pub prefer_parent: f64,
    pub strong_conn: f64,
    pub duplicate: f64,
    pub conflict: f64,
    pub weak_edge: f64,
}

impl Default for SimilarityThresholds {
    fn default() -> Self {
        Self {
            min_parent: 0.3,
            prefer_parent: 0.5,
            strong_conn: 0.7,
            duplicate: 0.9,
            conflict: 0.6,
            weak_edge: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bm25Params {
    pub k1: f64,
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Dimension of all centroid / card / query embeddings (spec.md §6).
    pub embedding_dimension: usize,
    pub similarity_thresholds: SimilarityThresholds,
    /// Weight of semantic vs. lexical retrieval in the category classifier's
    /// stage A (`alpha`, spec.md §4.4).
    pub classifier_alpha: f64,
    pub bm25: Bm25Params,
    pub extraction_cache_ttl_hours: i64,
    pub per_host_rate_limit_per_sec: f64,
    pub checkpoint_interval_secs: u64,
    pub checkpoint_interval_cards: usize,
    pub chunk_size_words: usize,
    pub chunk_overlap_words: usize,
    pub session_ttl_hours: i64,
    pub self_correction_caps: SelfCorrectionCapsConfig,
    pub max_tool_call_iterations: usize,
    pub tracing_filter: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SelfCorrectionCapsConfig {
    pub orphans: usize,
    pub weak_connections: usize,
    pub uncategorized: usize,
    pub duplicates: usize,
}

impl Default for SelfCorrectionCapsConfig {
    fn default() -> Self {
        Self { orphans: 10, weak_connections: 20, uncategorized: 20, duplicates: 10 }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            embedding_dimension: via_model_provider::embedding::DEFAULT_EMBEDDING_DIMENSION,
            similarity_thresholds: SimilarityThresholds::default(),
            classifier_alpha: 0.6,
            bm25: Bm25Params::default(),
            extraction_cache_ttl_hours: 24,
            per_host_rate_limit_per_sec: 1.0,
            checkpoint_interval_secs: 30,
            checkpoint_interval_cards: 10,
            chunk_size_words: 500,
            chunk_overlap_words: 50,
            session_ttl_hours: 24,
            self_correction_caps: SelfCorrectionCapsConfig::default(),
            max_tool_call_iterations: 10,
            tracing_filter: "info".to_string(),
        }
    }
}

impl CoreConfig {
    /// Loads defaults, overlays a TOML file if present at `path`, then
    /// overlays recognized `VIA_*` environment variables. Mirrors
    /// `orchestrator::config::loader`'s defaults -> file -> env precedence
    /// without inventing a new layering scheme.
    pub fn load(path: Option<&Path>) -> Self {
        let mut config = Self::default();

        if let Some(path) = path {
            if let Ok(text) = std::fs::read_to_string(path) {
                match toml::from_str::<Self>(&text) {
                    Ok(from_file) => config = from_file,
                    Err(err) => {
                        tracing::warn!(?path, %err, "failed to parse config file, keeping defaults")
                    }
                }
            }
        }

        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        self.embedding_dimension =
            get_env_parse_or("VIA_EMBEDDING_DIMENSION", self.embedding_dimension).unwrap_or(self.embedding_dimension);
        self.classifier_alpha =
            get_env_parse_or("VIA_CLASSIFIER_ALPHA", self.classifier_alpha).unwrap_or(self.classifier_alpha);
        self.extraction_cache_ttl_hours =
            get_env_parse_or("VIA_EXTRACTION_CACHE_TTL_HOURS", self.extraction_cache_ttl_hours)
                .unwrap_or(self.extraction_cache_ttl_hours);
        self.per_host_rate_limit_per_sec =
            get_env_parse_or("VIA_PER_HOST_RATE_LIMIT_PER_SEC", self.per_host_rate_limit_per_sec)
                .unwrap_or(self.per_host_rate_limit_per_sec);
        self.session_ttl_hours =
            get_env_parse_or("VIA_SESSION_TTL_HOURS", self.session_ttl_hours).unwrap_or(self.session_ttl_hours);
        self.max_tool_call_iterations =
            get_env_parse_or("VIA_MAX_TOOL_CALL_ITERATIONS", self.max_tool_call_iterations)
                .unwrap_or(self.max_tool_call_iterations);
        self.tracing_filter =
            get_env_or("VIA_LOG_FILTER", &self.tracing_filter).unwrap_or_else(|_| self.tracing_filter.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_table() {
        let config = CoreConfig::default();
        assert_eq!(config.embedding_dimension, 768);
        assert_eq!(config.similarity_thresholds.min_parent, 0.3);
        assert_eq!(config.similarity_thresholds.prefer_parent, 0.5);
        assert_eq!(config.similarity_thresholds.weak_edge, 0.2);
        assert_eq!(config.classifier_alpha, 0.6);
        assert_eq!(config.bm25.k1, 1.5);
        assert_eq!(config.bm25.b, 0.75);
        assert_eq!(config.extraction_cache_ttl_hours, 24);
        assert_eq!(config.chunk_size_words, 500);
        assert_eq!(config.chunk_overlap_words, 50);
        assert_eq!(config.max_tool_call_iterations, 10);
        assert_eq!(config.self_correction_caps.orphans, 10);
        assert_eq!(config.self_correction_caps.weak_connections, 20);
    }

    #[test]
    fn load_with_missing_file_falls_back_to_defaults() {
        let config = CoreConfig::load(Some(Path::new("/nonexistent/via-core.toml")));
        assert_eq!(config.embedding_dimension, 768);
    }
}
