//! [`RagStore`] ties chunking, embedding, the vector backend, and the
//! index tracker together, ported from `rag_service.py`'s `RAGService`.

use crate::backend::VectorBackend;
use crate::chunking::{chunk_text, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use crate::error::Result;
use crate::tracker::IndexTracker;
use serde_json::Value;
use std::sync::Arc;
use via_model_provider::embedding::EmbeddingProvider;

#[derive(Debug, Clone)]
pub enum IndexOutcome {
    Indexed { num_chunks: usize, point_ids: Vec<String> },
    SkippedUnchanged,
    SkippedNoContent,
}

pub struct RagStore {
    backend: Arc<dyn VectorBackend>,
    tracker: IndexTracker,
    embedder: Arc<dyn EmbeddingProvider>,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RagStore {
    pub fn new(backend: Arc<dyn VectorBackend>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            backend,
            tracker: IndexTracker::new(),
            embedder,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }

    pub fn with_chunking(mut self, chunk_size: usize, chunk_overlap: usize) -> Self {
        self.chunk_size = chunk_size;
        self.chunk_overlap = chunk_overlap;
        self
    }

    /// Skips re-indexing when the content hash is unchanged, unless
    /// `force_reindex` is set.
    pub async fn index_card(
        &self,
        card_id: &str,
        content: &str,
        canvas_id: &str,
        card_type: &str,
        metadata: Value,
        force_reindex: bool,
    ) -> Result<IndexOutcome> {
        const ENTITY_TYPE: &str = "card";

        if !force_reindex
            && self.tracker.is_indexed(card_id, ENTITY_TYPE).await
            && !self.tracker.needs_reindex(card_id, ENTITY_TYPE, content).await
        {
            tracing::info!(card_id, "card already indexed with same content, skipping");
            return Ok(IndexOutcome::SkippedUnchanged);
        }

        let chunks = chunk_text(content, self.chunk_size, self.chunk_overlap);
        if chunks.is_empty() {
            tracing::warn!(card_id, "no content to index");
            return Ok(IndexOutcome::SkippedNoContent);
        }

        let mut merged_metadata = match metadata {
            Value::Object(map) => Value::Object(map),
            _ => Value::Object(serde_json::Map::new()),
        };
        if let Value::Object(map) = &mut merged_metadata {
            map.insert("canvas_id".into(), canvas_id.into());
            map.insert("card_id".into(), card_id.into());
            map.insert("entity_id".into(), card_id.into());
            map.insert("entity_type".into(), ENTITY_TYPE.into());
            map.insert("card_type".into(), card_type.into());
        }

        let doc_id = format!("card_{card_id}");
        let result = async {
            let embeddings = self.embedder.embed_batch(&chunks).await?;
            let point_ids = self
                .backend
                .upsert(&doc_id, &chunks, &embeddings, merged_metadata)
                .await?;
            Ok::<_, crate::error::RagStoreError>(point_ids)
        }
        .await;

        match result {
            Ok(point_ids) => {
                self.tracker
                    .record_index(
                        card_id,
                        ENTITY_TYPE,
                        content,
                        chunks.len(),
                        point_ids.clone(),
                        "default",
                    )
                    .await;
                Ok(IndexOutcome::Indexed {
                    num_chunks: chunks.len(),
                    point_ids,
                })
            }
            Err(err) => {
                self.tracker
                    .record_index_failure(card_id, ENTITY_TYPE, &err.to_string())
                    .await;
                Err(err)
            }
        }
    }

    pub async fn delete_card_index(&self, card_id: &str) -> Result<()> {
        self.backend.delete_document(&format!("card_{card_id}")).await?;
        self.tracker.mark_deleted(card_id, "card").await;
        Ok(())
    }

    pub async fn search_knowledge_base(
        &self,
        query: &str,
        canvas_id: Option<&str>,
        top_k: usize,
        score_threshold: f64,
    ) -> Result<Vec<crate::backend::SearchHit>> {
        let embedding = self.embedder.embed(query).await?;
        self.backend.search(&embedding, canvas_id, top_k, score_threshold).await
    }

    /// Search results rendered as `[n] (Relevance: score)\ncontent`, joined
    /// with blank lines — the exact shape `rag_service.py`'s
    /// `retrieve_context` hands to the LLM prompt.
    pub async fn retrieve_context(
        &self,
        query: &str,
        canvas_id: &str,
        top_k: usize,
        score_threshold: f64,
    ) -> Result<String> {
        let hits = self
            .search_knowledge_base(query, Some(canvas_id), top_k, score_threshold)
            .await?;
        if hits.is_empty() {
            return Ok(String::new());
        }
        let parts: Vec<String> = hits
            .iter()
            .enumerate()
            .map(|(i, hit)| format!("[{}] (Relevance: {:.2})\n{}\n", i + 1, hit.score, hit.content))
            .collect();
        Ok(parts.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryVectorBackend;
    use async_trait::async_trait;
    use via_model_provider::embedding::EmbeddingError;

    struct StubEmbedder;

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, EmbeddingError> {
            if text.contains("rust") {
                Ok(vec![1.0, 0.0])
            } else {
                Ok(vec![0.0, 1.0])
            }
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    fn store() -> RagStore {
        RagStore::new(Arc::new(InMemoryVectorBackend::new()), Arc::new(StubEmbedder))
    }

    #[tokio::test]
    async fn indexing_then_reindexing_unchanged_content_is_skipped() {
        let store = store();
        let outcome = store
            .index_card("c1", "rust ownership basics", "canvas-1", "rich_text", Value::Null, false)
            .await
            .unwrap();
        assert!(matches!(outcome, IndexOutcome::Indexed { .. }));

        let outcome = store
            .index_card("c1", "rust ownership basics", "canvas-1", "rich_text", Value::Null, false)
            .await
            .unwrap();
        assert!(matches!(outcome, IndexOutcome::SkippedUnchanged));
    }

    #[tokio::test]
    async fn empty_content_is_skipped() {
        let store = store();
        let outcome = store
            .index_card("c1", "   ", "canvas-1", "rich_text", Value::Null, false)
            .await
            .unwrap();
        assert!(matches!(outcome, IndexOutcome::SkippedNoContent));
    }

    #[tokio::test]
    async fn retrieve_context_formats_results() {
        let store = store();
        store
            .index_card("c1", "rust ownership basics", "canvas-1", "rich_text", Value::Null, false)
            .await
            .unwrap();
        let context = store.retrieve_context("rust", "canvas-1", 5, 0.5).await.unwrap();
        assert!(context.contains("Relevance"));
        assert!(context.contains("rust ownership basics"));
    }
}
