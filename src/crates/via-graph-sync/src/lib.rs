//! Graph sync service (spec.md §4.5): subscribes to canvas events and keeps
//! the knowledge-graph and category system in step with them.
//!
//! `card_created` ordering: classification runs before parent-suggestion is
//! emitted, so the suggestion can be filtered to same/related-category
//! candidates once the category is known (documented as the resolution of
//! the ordering Open Question in `DESIGN.md`).

use async_trait::async_trait;
use std::sync::Arc;
use via_categories::{AssignmentOutcome, CategorySystem};
use via_event_bus::events::{CardEventPayload, ConnectionEventPayload, Event};
use via_event_bus::EventHandler;
use via_graph_backend::{EdgeData, EdgeType};
use via_kg_state::KnowledgeGraphState;
use via_model_provider::embedding::EmbeddingProvider;

/// Sentinel category name written onto a node when the classifier could not
/// place it anywhere (spec.md §8.1: every card carries exactly one category
/// assignment, even if that assignment is the sentinel).
const UNCATEGORIZED: &str = "Uncategorized";

pub struct GraphSyncHandler {
    kg: Arc<KnowledgeGraphState>,
    categories: Arc<CategorySystem>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl GraphSyncHandler {
    pub fn new(
        kg: Arc<KnowledgeGraphState>,
        categories: Arc<CategorySystem>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self { kg, categories, embedder }
    }

    /// Resolves an [`AssignmentOutcome`] to the category name that belongs
    /// on the node, falling back to [`UNCATEGORIZED`] when the outcome has
    /// no profile (or the profile vanished out from under us).
    async fn resolve_category_name(&self, outcome: &AssignmentOutcome) -> String {
        match outcome {
            AssignmentOutcome::AssignedExisting { profile_id, .. } | AssignmentOutcome::CreatedNew { profile_id, .. } => {
                self.categories
                    .store
                    .get(profile_id)
                    .await
                    .map(|profile| profile.name)
                    .unwrap_or_else(|| UNCATEGORIZED.to_string())
            }
            AssignmentOutcome::Uncategorized => UNCATEGORIZED.to_string(),
        }
    }

    /// Writes `category` onto the node's `category` field via `update_node`.
    /// A no-op if the node has since been removed.
    async fn write_category(&self, card_id: &str, category: String) -> Result<(), String> {
        if let Some(mut node) = self.kg.backend().get_node(card_id).await.map_err(|e| e.to_string())? {
            node.category = Some(category);
            self.kg.backend().update_node(node).await.map_err(|e| e.to_string())?;
        }
        Ok(())
    }

    async fn handle_card_created(&self, payload: CardEventPayload) -> Result<(), String> {
        let content = payload.content.clone().unwrap_or_default();
        let embedding = self.embedder.embed(&content).await.map_err(|e| e.to_string())?;

        // Classification precedes parent-suggestion emission (see module docs).
        let assignment = self.categories.classify_and_assign(&content, &embedding).await;

        let result = self
            .kg
            .add_card(&payload.card_id, &content, embedding)
            .await
            .map_err(|e| e.to_string())?;

        let category = self.resolve_category_name(&assignment).await;
        self.write_category(&payload.card_id, category).await?;

        if let Some(parent_id) = result.suggested_parent {
            tracing::info!(
                card_id = %payload.card_id,
                parent_id = %parent_id,
                "suggested parent-child connection for external canvas service to materialize"
            );
        }
        Ok(())
    }

    async fn handle_card_updated(&self, payload: CardEventPayload) -> Result<(), String> {
        let embedding = match &payload.content {
            Some(content) => Some(self.embedder.embed(content).await.map_err(|e| e.to_string())?),
            None => None,
        };
        self.kg
            .update_card(&payload.card_id, payload.content.as_deref().unwrap_or(""), embedding.clone())
            .await
            .map_err(|e| e.to_string())?;

        if let (Some(content), Some(embedding)) = (&payload.content, &embedding) {
            let assignment = self.categories.classify_and_assign(content, embedding).await;
            let category = self.resolve_category_name(&assignment).await;
            self.write_category(&payload.card_id, category).await?;
        }
        Ok(())
    }

    async fn handle_card_deleted(&self, payload: CardEventPayload) -> Result<(), String> {
        self.kg.remove_card(&payload.card_id).await.map_err(|e| e.to_string())
    }

    async fn handle_connection_created(&self, payload: ConnectionEventPayload) -> Result<(), String> {
        let edge_type = match payload.connection_type.as_str() {
            "parent-child" => EdgeType::ParentChild,
            "related" => EdgeType::Related,
            "reference" => EdgeType::Reference,
            "similar" => EdgeType::Similar,
            "mentions" => EdgeType::Mentions,
            "challenges" => EdgeType::Challenges,
            _ => EdgeType::Default,
        };
        let weight = match payload.similarity_score {
            Some(score) => Some(score),
            None => {
                let source = self.kg.backend().get_node(&payload.source_id).await.map_err(|e| e.to_string())?;
                let target = self.kg.backend().get_node(&payload.target_id).await.map_err(|e| e.to_string())?;
                match (source, target) {
                    (Some(s), Some(t)) => Some(cosine_similarity(&s.embedding, &t.embedding)),
                    _ => None,
                }
            }
        };
        self.kg
            .backend()
            .add_edge(EdgeData {
                source: payload.source_id,
                target: payload.target_id,
                edge_type,
                weight,
            })
            .await
            .map_err(|e| e.to_string())?;
        Ok(())
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
impl EventHandler for GraphSyncHandler {
    async fn handle(&self, event: Event) -> Result<(), String> {
        match event {
            Event::CardCreated(payload) => self.handle_card_created(payload).await,
            Event::CardUpdated(payload) => self.handle_card_updated(payload).await,
            Event::CardDeleted(payload) => self.handle_card_deleted(payload).await,
            Event::ConnectionCreated(payload) => self.handle_connection_created(payload).await,
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use via_categories::CategorySystem;
    use via_graph_backend::{GraphBackend, InMemoryGraphBackend};
    use via_graph_core::llm::{ChatModel, ChatRequest};
    use via_graph_core::error::Result as LlmResult;
    use via_graph_core::llm::response::{ChatResponse, ChatStreamResponse};
    use via_kg_state::{KgThresholds, KnowledgeGraphState};

    struct StubChatModel;

    #[async_trait]
    impl ChatModel for StubChatModel {
        async fn chat(&self, _request: ChatRequest) -> LlmResult<ChatResponse> {
            unimplemented!("fallback classification path is exercised instead")
        }

        async fn stream(&self, _request: ChatRequest) -> LlmResult<ChatStreamResponse> {
            unimplemented!("streaming is not exercised by graph-sync tests")
        }
    }

    struct StubEmbedder;

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed(&self, text: &str) -> via_model_provider::embedding::Result<Vec<f32>> {
            Ok(via_model_provider::embedding::deterministic_fallback_vector(text, 8))
        }

        fn dimension(&self) -> usize {
            8
        }
    }

    fn handler() -> GraphSyncHandler {
        let kg = Arc::new(KnowledgeGraphState::new(Arc::new(InMemoryGraphBackend::new()), KgThresholds::default()));
        let categories = Arc::new(CategorySystem::new(Arc::new(StubChatModel)));
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(StubEmbedder);
        GraphSyncHandler::new(kg, categories, embedder)
    }

    #[tokio::test]
    async fn card_created_adds_node_to_the_graph() {
        let h = handler();
        h.handle(Event::CardCreated(CardEventPayload {
            card_id: "c1".into(),
            canvas_id: "canvas-1".into(),
            content: Some("rust ownership and borrowing".into()),
            title: Some("Ownership".into()),
            metadata: None,
        }))
        .await
        .unwrap();
        assert!(h.kg.backend().get_node("c1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn card_created_writes_uncategorized_sentinel_with_no_matching_profile() {
        let h = handler();
        h.handle(Event::CardCreated(CardEventPayload {
            card_id: "c1".into(),
            canvas_id: "canvas-1".into(),
            content: Some("rust ownership and borrowing".into()),
            title: Some("Ownership".into()),
            metadata: None,
        }))
        .await
        .unwrap();
        let node = h.kg.backend().get_node("c1").await.unwrap().unwrap();
        assert_eq!(node.category.as_deref(), Some(UNCATEGORIZED));
    }

    #[tokio::test]
    async fn card_deleted_removes_node() {
        let h = handler();
        h.handle(Event::CardCreated(CardEventPayload {
            card_id: "c1".into(),
            canvas_id: "canvas-1".into(),
            content: Some("x".into()),
            title: None,
            metadata: None,
        }))
        .await
        .unwrap();
        h.handle(Event::CardDeleted(CardEventPayload {
            card_id: "c1".into(),
            canvas_id: "canvas-1".into(),
            content: None,
            title: None,
            metadata: None,
        }))
        .await
        .unwrap();
        assert!(h.kg.backend().get_node("c1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn connection_created_without_similarity_computes_one() {
        let h = handler();
        for id in ["a", "b"] {
            h.handle(Event::CardCreated(CardEventPayload {
                card_id: id.into(),
                canvas_id: "canvas-1".into(),
                content: Some("shared topic text".into()),
                title: None,
                metadata: None,
            }))
            .await
            .unwrap();
        }
        h.handle(Event::ConnectionCreated(ConnectionEventPayload {
            source_id: "a".into(),
            target_id: "b".into(),
            connection_type: "reference".into(),
            similarity_score: None,
        }))
        .await
        .unwrap();
        let edges = h.kg.backend().edges_from("a").await.unwrap();
        assert!(edges.iter().any(|e| e.edge_type == EdgeType::Reference && e.weight.is_some()));
    }
}
