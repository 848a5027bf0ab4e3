//! Bundles the services a tool's executor closure needs to capture
//! (spec.md §4.10's specialist tool lists). Mirrors how
//! [`via_graph_sync::GraphSyncHandler`] bundles its collaborators as `Arc`
//! fields rather than threading them through function arguments.

use std::sync::Arc;
use via_categories::CategorySystem;
use via_domain::canvas::CanvasClient;
use via_event_bus::EventBus;
use via_extraction::ExtractionService;
use via_graph_core::llm::ChatModel;
use via_kg_state::KnowledgeGraphState;
use via_model_provider::embedding::EmbeddingProvider;
use via_rag_store::RagStore;

use crate::academic::AcademicSearchClient;

/// Cheap to clone: every field is an `Arc`. Each tool module's `tools(&kit)`
/// constructor clones the handful of fields its closures need to capture.
#[derive(Clone)]
pub struct ToolKit {
    pub kg: Arc<KnowledgeGraphState>,
    pub categories: Arc<CategorySystem>,
    pub extraction: Arc<ExtractionService>,
    pub rag: Arc<RagStore>,
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub model: Arc<dyn ChatModel>,
    pub events: Arc<EventBus>,
    pub canvas: Option<Arc<dyn CanvasClient>>,
    pub academic: Option<Arc<dyn AcademicSearchClient>>,
}

impl ToolKit {
    pub fn new(
        kg: Arc<KnowledgeGraphState>,
        categories: Arc<CategorySystem>,
        extraction: Arc<ExtractionService>,
        rag: Arc<RagStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        model: Arc<dyn ChatModel>,
        events: Arc<EventBus>,
    ) -> Self {
        Self { kg, categories, extraction, rag, embedder, model, events, canvas: None, academic: None }
    }

    pub fn with_canvas_client(mut self, client: Arc<dyn CanvasClient>) -> Self {
        self.canvas = Some(client);
        self
    }

    pub fn with_academic_client(mut self, client: Arc<dyn AcademicSearchClient>) -> Self {
        self.academic = Some(client);
        self
    }

    pub(crate) fn canvas_or_err(&self) -> crate::error::Result<Arc<dyn CanvasClient>> {
        self.canvas.clone().ok_or(crate::error::ToolsError::NoCanvasClient)
    }
}
