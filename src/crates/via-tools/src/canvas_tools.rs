//! Canvas CRUD tools exposed to agents that need to read or write canvas
//! state directly rather than through the knowledge-graph/RAG mirrors.
//! Grounded on [`via_domain::canvas::CanvasClient`].

use crate::error::ToolsError;
use crate::kit::ToolKit;
use crate::support::{executor, optional_f64, required_str};
use serde_json::{json, Value};
use via_domain::connection::ConnectionType;
use via_domain::ids::CardId;
use via_graph_core::tool::Tool;

pub fn tools(kit: &ToolKit) -> Vec<Tool> {
    vec![
        get_card(kit.clone()),
        list_cards(kit.clone()),
        create_connection(kit.clone()),
        get_canvas_summary(kit.clone()),
    ]
}

fn parse_connection_type(name: &str) -> ConnectionType {
    match name {
        "parent-child" => ConnectionType::ParentChild,
        "reference" => ConnectionType::Reference,
        "similar" => ConnectionType::Similar,
        "mentions" => ConnectionType::Mentions,
        "challenges" => ConnectionType::Challenges,
        "related" => ConnectionType::Related,
        _ => ConnectionType::Default,
    }
}

fn get_card(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": {
            "canvas_id": {"type": "string"},
            "card_id": {"type": "string"}
        },
        "required": ["canvas_id", "card_id"]
    });

    Tool::new(
        "get_card",
        "Fetches a single card by id from the canvas.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let canvas_id = required_str(&args, "canvas_id")?;
                let card_id = CardId::new(required_str(&args, "card_id")?);
                let canvas = kit.canvas_or_err()?;
                let card = canvas.get_card(canvas_id, &card_id).await?;
                Ok(json!({ "card": card }))
            }
        }),
    )
}

fn list_cards(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": { "canvas_id": {"type": "string"} },
        "required": ["canvas_id"]
    });

    Tool::new(
        "list_cards",
        "Lists every card on a canvas.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let canvas_id = required_str(&args, "canvas_id")?;
                let canvas = kit.canvas_or_err()?;
                let cards = canvas.list_cards(canvas_id).await?;
                Ok(json!({ "cards": cards }))
            }
        }),
    )
}

fn create_connection(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": {
            "canvas_id": {"type": "string"},
            "source_card_id": {"type": "string"},
            "target_card_id": {"type": "string"},
            "connection_type": {"type": "string"},
            "similarity_score": {"type": "number"}
        },
        "required": ["canvas_id", "source_card_id", "target_card_id"]
    });

    Tool::new(
        "create_connection",
        "Creates a connection between two cards on the canvas.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let canvas_id = required_str(&args, "canvas_id")?;
                let source_id = CardId::new(required_str(&args, "source_card_id")?);
                let target_id = CardId::new(required_str(&args, "target_card_id")?);
                if source_id == target_id {
                    return Err(ToolsError::InvalidArgument {
                        name: "target_card_id",
                        reason: "source and target must differ".to_string(),
                    });
                }
                let connection_type = args
                    .get("connection_type")
                    .and_then(Value::as_str)
                    .map(parse_connection_type)
                    .unwrap_or(ConnectionType::Related);
                let similarity_score = optional_f64(&args, "similarity_score");

                let canvas = kit.canvas_or_err()?;
                let connection = canvas
                    .create_connection(canvas_id, &source_id, &target_id, connection_type, similarity_score)
                    .await?;
                Ok(json!({ "connection": connection }))
            }
        }),
    )
}

/// High-level orientation for the learning-assistant and background
/// specialists before they decide what to do next: card/connection counts,
/// the knowledge-graph's node/edge totals, and a capped sample of card
/// titles so a model doesn't have to `list_cards` and read every card body
/// just to answer "what's on this canvas?" (spec.md §8 scenario 2).
pub(crate) fn get_canvas_summary(kit: ToolKit) -> Tool {
    const TITLE_SAMPLE_LIMIT: usize = 20;

    let schema = json!({
        "type": "object",
        "properties": { "canvas_id": {"type": "string"} },
        "required": ["canvas_id"]
    });

    Tool::new(
        "get_canvas_summary",
        "Summarizes a canvas: card and connection counts, knowledge-graph totals, and a sample of card titles.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let canvas_id = required_str(&args, "canvas_id")?;
                let canvas = kit.canvas_or_err()?;
                let cards = canvas.list_cards(canvas_id).await?;
                let stats = kit.kg.backend().stats().await?;

                let titles: Vec<&str> =
                    cards.iter().take(TITLE_SAMPLE_LIMIT).map(|card| card.title.as_str()).collect();

                Ok(json!({
                    "canvas_id": canvas_id,
                    "card_count": cards.len(),
                    "graph_node_count": stats.node_count,
                    "graph_edge_count": stats.edge_count,
                    "edges_by_type": stats.edges_by_type,
                    "sample_titles": titles,
                    "sample_truncated": cards.len() > TITLE_SAMPLE_LIMIT,
                }))
            }
        }),
    )
}
