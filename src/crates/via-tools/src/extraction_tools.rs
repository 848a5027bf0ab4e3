//! Content-extraction agent tools (spec.md §4.10): `extract_url_content`,
//! `grow_card_content`. Grounded on [`via_extraction::ExtractionService`]
//! and [`via_kg_state::KnowledgeGraphState`].

use crate::error::ToolsError;
use crate::kit::ToolKit;
use crate::support::{ask_model, executor, optional_str, required_str};
use serde_json::{json, Value};
use via_graph_core::tool::Tool;

pub fn tools(kit: &ToolKit) -> Vec<Tool> {
    vec![extract_url_content(kit.clone()), grow_card_content(kit.clone())]
}

fn extract_url_content(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": {
            "url": {"type": "string", "description": "URL to fetch and extract"},
            "canvas_id": {"type": "string"}
        },
        "required": ["url", "canvas_id"]
    });

    Tool::new(
        "extract_url_content",
        "Fetches a URL, extracts its readable content, and builds a parent card \
         (plus any Examples/Patterns child cards) ready for the canvas.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let url = required_str(&args, "url")?;
                let canvas_id = required_str(&args, "canvas_id")?;
                let built = kit.extraction.extract(canvas_id, url).await?;
                Ok(json!({
                    "parent": built.parent,
                    "children": built.children,
                    "connections": built.connections,
                }))
            }
        }),
    )
}

pub(crate) fn grow_card_content(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": {
            "card_id": {"type": "string"},
            "current_content": {"type": "string"},
            "additional_content": {"type": "string", "description": "New material to integrate into the card"}
        },
        "required": ["card_id", "current_content", "additional_content"]
    });

    Tool::new(
        "grow_card_content",
        "Integrates additional material into an existing card's content via the \
         model, re-embeds the result, and refreshes the card's similarity edges.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let card_id = required_str(&args, "card_id")?.to_string();
                let current = required_str(&args, "current_content")?.to_string();
                let additional = required_str(&args, "additional_content")?.to_string();
                let extra_instruction = optional_str(&args, "instruction").unwrap_or("");

                let prompt = format!(
                    "Integrate the following new material into the existing card content. \
                     Keep the existing structure and voice; append or weave in new facts \
                     without duplicating what is already there. {extra_instruction}\n\n\
                     Existing content:\n{current}\n\nNew material:\n{additional}\n\n\
                     Return only the grown content."
                );
                let grown = ask_model(&kit.model, prompt).await?;
                if grown.trim().is_empty() {
                    return Err(ToolsError::InvalidArgument {
                        name: "additional_content",
                        reason: "model produced empty content".to_string(),
                    });
                }

                let embedding = kit.embedder.embed(&grown).await?;
                let mutation = kit.kg.update_card(&card_id, &grown, Some(embedding)).await?;

                Ok(json!({
                    "card_id": card_id,
                    "grown_content": grown,
                    "suggested_parent": mutation.suggested_parent,
                    "similar": mutation.similar,
                }))
            }
        }),
    )
}
