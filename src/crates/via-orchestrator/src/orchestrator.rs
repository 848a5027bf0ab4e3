//! Top-level chat-turn entry point (spec.md §4.10): applies the
//! deterministic URL shortcut first, persists its cards directly; otherwise
//! hands the turn to the LLM with the four specialists registered as its
//! only callable tools and lets it pick exactly one.

use crate::agent_loop::{run_tool_loop, DEFAULT_MAX_ITERATIONS};
use crate::error::{OrchestratorError, Result};
use crate::events::{emit, AgentEvent, AgentEventSink};
use crate::router;
use crate::specialists::all_specialists;
use std::sync::Arc;
use via_domain::card::Card;
use via_domain::ids::{OperationId, SessionId};
use via_domain::session::MessageRole;
use via_event_bus::events::{CardEventPayload, Event};
use via_event_bus::EventBus;
use via_graph_core::messages::Message;
use via_progress::ProgressTracker;
use via_session_store::SessionStore;
use via_tools::ToolKit;

const SYSTEM_PROMPT: &str = "You are the orchestrator for a mind-mapping canvas assistant. \
Exactly one of the four specialist tools handles this turn: content_extraction_agent for \
pulling in a URL, knowledge_graph_agent for organizing or connecting existing cards, \
learning_assistant_agent for research and learning help, and background_intelligence_agent \
for ad-hoc passive analysis of a specific card. Call exactly one specialist tool, then relay \
its result to the user in your own words.";

pub struct Orchestrator {
    kit: ToolKit,
    events: Arc<EventBus>,
    sessions: Arc<SessionStore>,
}

impl Orchestrator {
    pub fn new(kit: ToolKit, events: Arc<EventBus>, sessions: Arc<SessionStore>) -> Self {
        Self { kit, events, sessions }
    }

    pub async fn handle_turn(
        &self,
        requested_session_id: Option<&str>,
        canvas_id: Option<String>,
        message: String,
        sink: AgentEventSink,
    ) -> Result<()> {
        let session = self.sessions.resolve(requested_session_id, canvas_id.clone()).await;
        self.sessions.append_message(session.id, MessageRole::User, message.clone()).await;

        let result = if let Some(url) = router::url_shortcut(&message, canvas_id.as_deref()) {
            self.run_extraction_shortcut(canvas_id.clone().expect("url_shortcut requires canvas_id"), url, session.id, &sink).await
        } else {
            self.run_specialist_turn(&session, &message, &sink).await
        };

        match &result {
            Ok(summary) => {
                self.sessions.append_message(session.id, MessageRole::Assistant, summary.clone()).await;
                emit(&sink, AgentEvent::Complete(serde_json::json!({ "summary": summary })));
            }
            Err(err) => emit(&sink, AgentEvent::Error(err.to_string())),
        }

        result.map(|_| ())
    }

    async fn run_specialist_turn(
        &self,
        session: &via_domain::session::Session,
        message: &str,
        sink: &AgentEventSink,
    ) -> Result<String> {
        let mut transcript: Vec<Message> = session
            .messages
            .iter()
            .map(|m| match m.role {
                MessageRole::User => Message::human(m.content.clone()),
                MessageRole::Assistant => Message::ai(m.content.clone()),
                MessageRole::System => Message::system(m.content.clone()),
            })
            .collect();
        transcript.push(Message::human(message.to_string()));

        let tools = all_specialists(&self.kit);
        let outcome = run_tool_loop(
            &self.kit.model,
            tools,
            Some(SYSTEM_PROMPT),
            transcript,
            DEFAULT_MAX_ITERATIONS,
            Some(sink),
        )
        .await?;
        Ok(outcome.final_text)
    }

    async fn run_extraction_shortcut(
        &self,
        canvas_id: String,
        url: &str,
        session_id: SessionId,
        sink: &AgentEventSink,
    ) -> Result<String> {
        let operation_id = OperationId::new(uuid::Uuid::new_v4().to_string());
        let tracker = ProgressTracker::new(
            operation_id,
            "extraction",
            Some(3),
            Some(canvas_id.clone()),
            Some(session_id.to_string()),
            self.events.clone(),
        );

        tracker.update_progress("fetching", 0.1, "fetching and extracting content", &[]).await?;
        let built = self.kit.extraction.extract(&canvas_id, url).await?;

        tracker.update_progress("placing", 0.5, "embedding and placing cards", &[]).await?;
        let canvas = self.kit.canvas.clone().ok_or(OrchestratorError::NoCanvasClient)?;

        let parent = canvas.create_card(built.parent.clone()).await.map_err(OrchestratorError::Domain)?;
        self.index_and_announce(&parent, sink).await;

        let mut created_ids = vec![parent.id.clone()];
        let mut children_by_old_id = std::collections::HashMap::new();
        children_by_old_id.insert(built.parent.id.clone(), parent.id.clone());

        for child in &built.children {
            let mut child = child.clone();
            child.parent_id = Some(parent.id.clone());
            let created = canvas.create_card(child.clone()).await.map_err(OrchestratorError::Domain)?;
            children_by_old_id.insert(child.id.clone(), created.id.clone());
            created_ids.push(created.id.clone());
            self.index_and_announce(&created, sink).await;
        }

        for connection in &built.connections {
            let source = children_by_old_id.get(&connection.source_id).cloned().unwrap_or_else(|| connection.source_id.clone());
            let target = children_by_old_id.get(&connection.target_id).cloned().unwrap_or_else(|| connection.target_id.clone());
            canvas
                .create_connection(&canvas_id, &source, &target, connection.connection_type, connection.similarity_score)
                .await
                .map_err(OrchestratorError::Domain)?;
        }

        tracker.update_progress("done", 0.9, "finalizing", &created_ids).await?;
        tracker.complete("extraction finished").await?;

        Ok(format!(
            "Extracted \"{}\" from {url} into {} card(s).",
            parent.title,
            created_ids.len()
        ))
    }

    async fn index_and_announce(&self, card: &Card, sink: &AgentEventSink) {
        if let Ok(embedding) = self.kit.embedder.embed(&card.content).await {
            let _ = self.kit.kg.add_card(card.id.as_str(), &card.content, embedding).await;
        }
        self.events
            .emit(Event::CardCreated(CardEventPayload {
                card_id: card.id.to_string(),
                canvas_id: card.canvas_id.clone(),
                content: Some(card.content.clone()),
                title: Some(card.title.clone()),
                metadata: None,
            }))
            .await;
        emit(
            sink,
            AgentEvent::ToolResult {
                id: card.id.to_string(),
                name: "extract_url_content".to_string(),
                output: serde_json::json!({ "card_id": card.id.to_string(), "title": card.title }),
                is_error: false,
            },
        );
    }
}
