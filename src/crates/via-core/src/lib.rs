//! Facade crate (spec.md §2's component table, row "(facade)" in
//! `SPEC_FULL.md`'s crate-mapping table): wires every other crate in the
//! workspace into one process-wide instance, analogous to how the
//! teacher's `orca` crate assembles `langgraph-core`/`langgraph-prebuilt`/
//! `llm`/`tooling` into a single runnable unit. Unlike `orca`, this crate
//! exposes no CLI or server binary — HTTP transport and CLI are explicitly
//! out of scope (spec.md §1) — so `ViaCore` is a library entry point only.
//!
//! The model provider, embedding provider, event bus, extraction cache, and
//! rate limiter are "global singletons" per spec.md §9, but modeled as
//! explicit `init(config)` / fields on `ViaCore` rather than ambient module
//! statics, exactly as §9's design notes require for deterministic tests.

pub mod config;
mod error;

pub use config::CoreConfig;
pub use error::{CoreError, Result};

use std::sync::Arc;
use via_categories::{AssignmentOutcome, CategorySystem};
use via_domain::canvas::CanvasClient;
use via_event_bus::events::Topic;
use via_event_bus::EventBus;
use via_extraction::ExtractionService;
use via_graph_backend::{GraphBackend, InMemoryGraphBackend};
use via_graph_core::llm::ChatModel;
use via_graph_sync::GraphSyncHandler;
use via_kg_state::{KgThresholds, KnowledgeGraphState};
use via_model_provider::embedding::EmbeddingProvider;
use via_orchestrator::events::AgentEventSink;
use via_orchestrator::Orchestrator;
use via_progress::CheckpointManager;
use via_rag_store::{InMemoryVectorBackend, RagStore};
use via_self_correction::{CategoryLookup, CorrectionCaps, CorrectionPassSummary, SelfCorrectionJob};
use via_session_store::SessionStore;
use via_tools::ToolKit;

/// Everything the chat-streaming endpoint, the event-driven sync service,
/// and the self-correction timer need, assembled once at process start.
///
/// Construction order matters: the graph backend and category system must
/// exist before the sync handler subscribes to card events, and the
/// background-intelligence worker must be registered before any canvas
/// event can arrive (spec.md §4.5/§4.10 both run off the same bus).
pub struct ViaCore {
    pub config: CoreConfig,
    pub events: Arc<EventBus>,
    pub kg: Arc<KnowledgeGraphState>,
    pub categories: Arc<CategorySystem>,
    pub rag: Arc<RagStore>,
    pub extraction: Arc<ExtractionService>,
    pub sessions: Arc<SessionStore>,
    pub checkpoints: Arc<CheckpointManager>,
    pub orchestrator: Arc<Orchestrator>,
    pub self_correction: Arc<SelfCorrectionJob>,
    embedder: Arc<dyn EmbeddingProvider>,
    model: Arc<dyn ChatModel>,
}

/// External collaborators `ViaCore::init` needs injected (spec.md §6):
/// the chat-completion and embedding providers are mandatory; the canvas
/// CRUD client and academic-search client are optional (a `ViaCore` built
/// without them still runs, but tools that need them return
/// `ToolsError::NoCanvasClient`/use the LLM-fallback academic path).
pub struct Collaborators {
    pub model: Arc<dyn ChatModel>,
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub canvas: Option<Arc<dyn CanvasClient>>,
    pub academic: Option<Arc<dyn via_tools::academic::AcademicSearchClient>>,
    /// `None` uses the in-memory backend (suitable up to ~10k nodes, spec.md
    /// §4.2); `Some` swaps in the external graph-DB-backed implementation.
    pub graph_backend: Option<Arc<dyn GraphBackend>>,
}

/// Bridges `via-self-correction`'s `CategoryLookup` seam to the real
/// category system, so an uncategorized-card correction runs the same
/// retrieve -> classify -> assign pipeline a live card-created event would.
struct CategorySystemLookup {
    categories: Arc<CategorySystem>,
}

#[async_trait::async_trait]
impl CategoryLookup for CategorySystemLookup {
    async fn classify(&self, content: &str, embedding: &[f32]) -> Option<String> {
        match self.categories.classify_and_assign(content, embedding).await {
            AssignmentOutcome::AssignedExisting { profile_id, .. } | AssignmentOutcome::CreatedNew { profile_id, .. } => {
                self.categories.store.get(&profile_id).await.map(|profile| profile.name)
            }
            AssignmentOutcome::Uncategorized => None,
        }
    }
}

impl ViaCore {
    /// Builds every component and wires the event-bus subscriptions
    /// (`GraphSyncHandler` for §4.5, `BackgroundIntelligenceWorker` for
    /// §4.10's fourth specialist) before returning. There is no implicit
    /// global state left to initialize after this call returns.
    pub async fn init(config: CoreConfig, collaborators: Collaborators) -> Self {
        let events = Arc::new(EventBus::new());

        let backend = collaborators
            .graph_backend
            .unwrap_or_else(|| Arc::new(InMemoryGraphBackend::new()));
        let thresholds = KgThresholds {
            min_parent: config.similarity_thresholds.min_parent,
            prefer_parent: config.similarity_thresholds.prefer_parent,
            strong_conn: config.similarity_thresholds.strong_conn,
            duplicate: config.similarity_thresholds.duplicate,
            conflict: config.similarity_thresholds.conflict,
            weak_edge: config.similarity_thresholds.weak_edge,
        };
        let kg = Arc::new(KnowledgeGraphState::new(backend, thresholds));

        let categories = Arc::new(CategorySystem::new(collaborators.model.clone()));
        categories.bootstrap_with_seeds(config.embedding_dimension).await;

        let rag_backend = Arc::new(InMemoryVectorBackend::new());
        let rag = Arc::new(
            RagStore::new(rag_backend, collaborators.embedder.clone())
                .with_chunking(config.chunk_size_words, config.chunk_overlap_words),
        );

        let extraction = Arc::new(ExtractionService::new());
        let sessions = Arc::new(SessionStore::new(config.session_ttl_hours));
        let checkpoints = Arc::new(CheckpointManager::in_memory());

        let mut kit = ToolKit::new(
            kg.clone(),
            categories.clone(),
            extraction.clone(),
            rag.clone(),
            collaborators.embedder.clone(),
            collaborators.model.clone(),
            events.clone(),
        );
        if let Some(canvas) = collaborators.canvas.clone() {
            kit = kit.with_canvas_client(canvas);
        }
        if let Some(academic) = collaborators.academic.clone() {
            kit = kit.with_academic_client(academic);
        }

        let orchestrator = Arc::new(Orchestrator::new(kit.clone(), events.clone(), sessions.clone()));

        let category_lookup: Arc<dyn CategoryLookup> = Arc::new(CategorySystemLookup { categories: categories.clone() });
        let caps = CorrectionCaps {
            orphans: config.self_correction_caps.orphans,
            weak_connections: config.self_correction_caps.weak_connections,
            uncategorized: config.self_correction_caps.uncategorized,
            duplicates: config.self_correction_caps.duplicates,
        };
        let self_correction = Arc::new(SelfCorrectionJob::with_caps(kg.clone(), category_lookup, caps));

        let sync_handler = Arc::new(GraphSyncHandler::new(kg.clone(), categories.clone(), collaborators.embedder.clone()));
        events.subscribe(Topic::CardCreated, sync_handler.clone()).await;
        events.subscribe(Topic::CardUpdated, sync_handler.clone()).await;
        events.subscribe(Topic::CardDeleted, sync_handler.clone()).await;
        events.subscribe(Topic::ConnectionCreated, sync_handler).await;

        via_orchestrator::background::register(kit, events.clone()).await;

        Self {
            config,
            events,
            kg,
            categories,
            rag,
            extraction,
            sessions,
            checkpoints,
            orchestrator,
            self_correction,
            embedder: collaborators.embedder,
            model: collaborators.model,
        }
    }

    /// Entry point for the chat-stream endpoint (spec.md §6): runs one
    /// full turn and streams [`via_orchestrator::AgentEvent`]s to `sink`,
    /// which a caller feeds to `via_stream_processor::process_stream` to
    /// get the wire-format sequence.
    pub async fn handle_chat_turn(
        &self,
        session_id: Option<&str>,
        canvas_id: Option<String>,
        message: String,
        sink: AgentEventSink,
    ) -> Result<()> {
        self.orchestrator
            .handle_turn(session_id, canvas_id, message, sink)
            .await
            .map_err(CoreError::from)
    }

    /// Runs one self-correction pass (spec.md §4.6), intended to be driven
    /// by an external timer (the core does not spawn its own scheduler —
    /// no hidden background tasks beyond the event-bus subscriptions
    /// registered in `init`).
    pub async fn run_self_correction_pass(&self) -> Result<CorrectionPassSummary> {
        self.self_correction.run_pass().await.map_err(CoreError::from)
    }

    /// Releases nothing owned by the OS (no sockets, no file handles held
    /// open past a single call) — present for symmetry with `init` per
    /// spec.md §9's "explicit `init(config)` and `shutdown()`" guidance, and
    /// as the place a future persistent backend would flush its snapshot.
    pub async fn shutdown(&self) {
        if let Err(err) = self.kg.backend().persist().await {
            tracing::warn!(%err, "graph snapshot persist failed during shutdown");
        }
    }

    pub fn embedder(&self) -> Arc<dyn EmbeddingProvider> {
        self.embedder.clone()
    }

    pub fn model(&self) -> Arc<dyn ChatModel> {
        self.model.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use via_graph_core::error::Result as GraphResult;
    use via_graph_core::llm::{ChatRequest, ChatResponse, ChatStreamResponse};
    use via_graph_core::Message;

    struct EchoChatModel;

    #[async_trait]
    impl ChatModel for EchoChatModel {
        async fn chat(&self, _request: ChatRequest) -> GraphResult<ChatResponse> {
            Ok(ChatResponse {
                message: Message::ai("ok"),
                usage: None,
                reasoning: None,
                metadata: Default::default(),
            })
        }

        async fn stream(&self, _request: ChatRequest) -> GraphResult<ChatStreamResponse> {
            use futures::stream;
            Ok(ChatStreamResponse {
                stream: Box::pin(stream::empty()),
                reasoning_stream: None,
                usage: None,
            })
        }

        fn clone_box(&self) -> Box<dyn ChatModel> {
            Box::new(EchoChatModel)
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

    async fn test_core() -> ViaCore {
        let mut config = CoreConfig::default();
        config.embedding_dimension = 8;
        ViaCore::init(
            config,
            Collaborators {
                model: Arc::new(EchoChatModel),
                embedder: Arc::new(StubEmbedder),
                canvas: None,
                academic: None,
                graph_backend: None,
            },
        )
        .await
    }

    #[tokio::test]
    async fn init_wires_seed_category_profiles() {
        let core = test_core().await;
        assert_eq!(core.categories.store.all().await.len(), 3);
    }

    #[tokio::test]
    async fn self_correction_on_pristine_graph_applies_zero_corrections() {
        let core = test_core().await;
        let summary = core.run_self_correction_pass().await.unwrap();
        assert_eq!(summary.orphans_linked, 0);
        assert_eq!(summary.duplicates_found, 0);
    }

    #[tokio::test]
    async fn card_created_event_reaches_the_knowledge_graph_via_sync_handler() {
        let core = test_core().await;
        core.events
            .emit(via_event_bus::events::Event::CardCreated(via_event_bus::events::CardEventPayload {
                card_id: "c1".into(),
                canvas_id: "canvas-1".into(),
                content: Some("rust ownership and the borrow checker".into()),
                title: Some("Ownership".into()),
                metadata: None,
            }))
            .await;

        // The bus dispatches to the subscriber task asynchronously; yield
        // until it has had a chance to run.
        for _ in 0..50 {
            if core.kg.backend().get_node("c1").await.unwrap().is_some() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(core.kg.backend().get_node("c1").await.unwrap().is_some());
    }
}
