//! External vector-database collaborator (spec.md §6), mirroring
//! `via_domain::canvas::CanvasClient`'s posture: the real implementation is
//! a Qdrant/pgvector-backed service outside this crate, so the contract is
//! a trait plus an in-memory reference implementation for tests.

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
pub struct SearchHit {
    pub point_id: String,
    pub score: f64,
    pub content: String,
    pub metadata: Value,
}

#[async_trait]
pub trait VectorBackend: Send + Sync {
    /// Upserts `chunks`/`embeddings` (1:1) under `doc_id`, returns the
    /// backend-assigned point ids.
    async fn upsert(
        &self,
        doc_id: &str,
        chunks: &[String],
        embeddings: &[Vec<f32>],
        metadata: Value,
    ) -> Result<Vec<String>>;

    async fn delete_document(&self, doc_id: &str) -> Result<()>;

    async fn search(
        &self,
        query_embedding: &[f32],
        canvas_id: Option<&str>,
        limit: usize,
        score_threshold: f64,
    ) -> Result<Vec<SearchHit>>;
}

struct StoredChunk {
    point_id: String,
    content: String,
    embedding: Vec<f32>,
    metadata: Value,
}

#[derive(Default)]
pub struct InMemoryVectorBackend {
    documents: RwLock<HashMap<String, Vec<StoredChunk>>>,
}

impl InMemoryVectorBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)) as f64
}

#[async_trait]
impl VectorBackend for InMemoryVectorBackend {
    async fn upsert(
        &self,
        doc_id: &str,
        chunks: &[String],
        embeddings: &[Vec<f32>],
        metadata: Value,
    ) -> Result<Vec<String>> {
        let mut docs = self.documents.write().await;
        let stored: Vec<StoredChunk> = chunks
            .iter()
            .zip(embeddings.iter())
            .enumerate()
            .map(|(i, (chunk, embedding))| StoredChunk {
                point_id: format!("{doc_id}:{i}"),
                content: chunk.clone(),
                embedding: embedding.clone(),
                metadata: metadata.clone(),
            })
            .collect();
        let point_ids = stored.iter().map(|c| c.point_id.clone()).collect();
        docs.insert(doc_id.to_string(), stored);
        Ok(point_ids)
    }

    async fn delete_document(&self, doc_id: &str) -> Result<()> {
        self.documents.write().await.remove(doc_id);
        Ok(())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        canvas_id: Option<&str>,
        limit: usize,
        score_threshold: f64,
    ) -> Result<Vec<SearchHit>> {
        let docs = self.documents.read().await;
        let mut hits: Vec<SearchHit> = docs
            .values()
            .flatten()
            .filter(|chunk| {
                canvas_id.map_or(true, |c| {
                    chunk.metadata.get("canvas_id").and_then(|v| v.as_str()) == Some(c)
                })
            })
            .map(|chunk| SearchHit {
                point_id: chunk.point_id.clone(),
                score: cosine_similarity(query_embedding, &chunk.embedding),
                content: chunk.content.clone(),
                metadata: chunk.metadata.clone(),
            })
            .filter(|hit| hit.score >= score_threshold)
            .collect();
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(limit);
        Ok(hits)
    }
}
