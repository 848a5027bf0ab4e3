//! Background-intelligence worker (spec.md §4.10): subscribes to
//! `card_created`/`card_updated`, picks a subset of the six enrichment
//! tools per card, and writes whatever it finds back as child cards
//! connected with an appropriately-typed edge. Duplicates are never
//! auto-merged; `suggest_duplicate_merge` only raises a flag by creating a
//! card that names the candidate, same "propose, don't apply" posture as
//! `via_self_correction::job`.
//!
//! Cards this worker creates are tagged [`BACKGROUND_TAG`] so a
//! subsequent update on them doesn't re-trigger analysis of its own output.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use via_domain::canvas::CanvasClient;
use via_domain::card::{Card, CardType};
use via_domain::connection::ConnectionType;
use via_domain::ids::CardId;
use via_event_bus::events::{CardEventPayload, Event};
use via_event_bus::EventHandler;
use via_tools::ToolKit;

pub const BACKGROUND_TAG: &str = "background-intelligence";

pub struct BackgroundIntelligenceWorker {
    kit: ToolKit,
}

impl BackgroundIntelligenceWorker {
    pub fn new(kit: ToolKit) -> Self {
        Self { kit }
    }

    async fn process(&self, payload: &CardEventPayload) -> Result<(), String> {
        let Some(canvas) = self.kit.canvas.clone() else {
            return Ok(());
        };
        let card_id = CardId::new(payload.card_id.clone());
        let Some(card) = canvas.get_card(&payload.canvas_id, &card_id).await.map_err(|e| e.to_string())? else {
            return Ok(());
        };
        if card.tags.contains(BACKGROUND_TAG) {
            return Ok(());
        }

        let tools = via_tools::background_tools::tools(&self.kit);
        let tool = |name: &str| tools.iter().find(|t| t.name == name).expect("background tool registered");

        let content_args = serde_json::json!({ "content": card.content });
        let mut artifacts: Vec<(&str, ConnectionType, Value)> = Vec::new();

        if let Ok(out) = tool("generate_learning_questions").execute(content_args.clone(), None).await {
            artifacts.push(("Learning questions", ConnectionType::Related, out));
        }
        if let Ok(out) = tool("extract_todos").execute(content_args.clone(), None).await {
            if non_empty_list(&out, "todos") {
                artifacts.push(("To-dos", ConnectionType::Related, out));
            }
        }
        if let Ok(out) = tool("detect_deadlines").execute(content_args.clone(), None).await {
            if non_empty_list(&out, "deadlines") {
                artifacts.push(("Deadlines", ConnectionType::Related, out));
            }
        }
        if let Ok(out) = tool("extract_named_entities").execute(content_args.clone(), None).await {
            if non_empty_list(&out, "entities") {
                artifacts.push(("Mentioned", ConnectionType::Mentions, out));
            }
        }

        let dup_args = serde_json::json!({ "card_id": card.id.as_str() });
        if let Ok(out) = tool("suggest_duplicate_merge").execute(dup_args, None).await {
            if non_empty_list(&out, "duplicate_candidates") {
                artifacts.push(("Possible duplicate", ConnectionType::Similar, out));
            }
        }

        let conflict_args = serde_json::json!({ "card_id": card.id.as_str(), "content": card.content });
        if let Ok(out) = tool("detect_contradictions").execute(conflict_args, None).await {
            if non_empty_list(&out, "conflicts") {
                artifacts.push(("Possible contradiction", ConnectionType::Challenges, out));
            }
        }

        for (title, connection_type, payload) in artifacts {
            let child = Card::new(CardId::new(uuid::Uuid::new_v4().to_string()), &card.canvas_id, title, payload.to_string())
                .with_parent(card.id.clone());
            let mut child = child;
            child.card_type = CardType::RichText;
            child.tags.insert(BACKGROUND_TAG.to_string());

            let created = canvas.create_card(child).await.map_err(|e| e.to_string())?;
            canvas
                .create_connection(&card.canvas_id, &card.id, &created.id, connection_type, None)
                .await
                .map_err(|e| e.to_string())?;
        }

        Ok(())
    }
}

fn non_empty_list(value: &Value, field: &str) -> bool {
    value.get(field).and_then(Value::as_array).map(|a| !a.is_empty()).unwrap_or(false)
}

#[async_trait]
impl EventHandler for BackgroundIntelligenceWorker {
    async fn handle(&self, event: Event) -> Result<(), String> {
        let payload = match &event {
            Event::CardCreated(p) | Event::CardUpdated(p) => p,
            _ => return Ok(()),
        };
        self.process(payload).await
    }
}

pub async fn register(kit: ToolKit, events: Arc<via_event_bus::EventBus>) {
    let worker = Arc::new(BackgroundIntelligenceWorker::new(kit));
    events.subscribe(via_event_bus::events::Topic::CardCreated, worker.clone()).await;
    events.subscribe(via_event_bus::events::Topic::CardUpdated, worker).await;
}
