//! Background-intelligence agent tools (spec.md §4.10): passive
//! enrichment run against newly created or updated cards. The orchestrator
//! picks a subset of these per card rather than always running every one.

use crate::kit::ToolKit;
use crate::support::{ask_model, executor, required_str};
use serde_json::{json, Value};
use via_graph_core::tool::Tool;

pub fn tools(kit: &ToolKit) -> Vec<Tool> {
    vec![
        generate_learning_questions(kit.clone()),
        extract_todos(kit.clone()),
        detect_deadlines(kit.clone()),
        extract_named_entities(kit.clone()),
        suggest_duplicate_merge(kit.clone()),
        detect_contradictions(kit.clone()),
    ]
}

fn lines_from(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
}

fn generate_learning_questions(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": { "content": {"type": "string"} },
        "required": ["content"]
    });

    Tool::new(
        "generate_learning_questions",
        "Generates a few comprehension-check questions a learner should be \
         able to answer after reading this card.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let content = required_str(&args, "content")?;
                let prompt = format!(
                    "Write three short questions that test understanding of this content, \
                     one per line, no numbering.\n\n{content}"
                );
                let text = ask_model(&kit.model, prompt).await?;
                Ok(json!({ "questions": lines_from(&text) }))
            }
        }),
    )
}

fn extract_todos(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": { "content": {"type": "string"} },
        "required": ["content"]
    });

    Tool::new(
        "extract_todos",
        "Extracts any action items or to-dos implied by a card's content.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let content = required_str(&args, "content")?;
                let prompt = format!(
                    "List any concrete action items or to-dos implied by this content, one per \
                     line. If there are none, respond with an empty line.\n\n{content}"
                );
                let text = ask_model(&kit.model, prompt).await?;
                Ok(json!({ "todos": lines_from(&text) }))
            }
        }),
    )
}

fn detect_deadlines(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": { "content": {"type": "string"} },
        "required": ["content"]
    });

    Tool::new(
        "detect_deadlines",
        "Detects any dates or deadlines mentioned in a card's content.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let content = required_str(&args, "content")?;
                let prompt = format!(
                    "List any dates or deadlines mentioned in this content, one per line, as \
                     \"<date or deadline> -- <what it is for>\". If none, respond with an empty line.\n\n{content}"
                );
                let text = ask_model(&kit.model, prompt).await?;
                Ok(json!({ "deadlines": lines_from(&text) }))
            }
        }),
    )
}

fn extract_named_entities(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": { "content": {"type": "string"} },
        "required": ["content"]
    });

    Tool::new(
        "extract_named_entities",
        "Extracts named people, organizations, places, and products mentioned \
         in a card's content.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let content = required_str(&args, "content")?;
                let prompt = format!(
                    "List the named people, organizations, places, and products mentioned in \
                     this content, one per line as \"<name> -- <kind>\".\n\n{content}"
                );
                let text = ask_model(&kit.model, prompt).await?;
                Ok(json!({ "entities": lines_from(&text) }))
            }
        }),
    )
}

fn suggest_duplicate_merge(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": { "card_id": {"type": "string"} },
        "required": ["card_id"]
    });

    Tool::new(
        "suggest_duplicate_merge",
        "Checks whether a card has near-duplicate siblings above the \
         duplicate-similarity threshold and suggests a merge.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let card_id = required_str(&args, "card_id")?;
                let similar = kit.kg.backend().find_similar_nodes(card_id, 5, 0.9).await?;
                Ok(json!({ "duplicate_candidates": similar }))
            }
        }),
    )
}

fn detect_contradictions(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": { "card_id": {"type": "string"}, "content": {"type": "string"} },
        "required": ["card_id", "content"]
    });

    Tool::new(
        "detect_contradictions",
        "Checks a card's content against its closest neighbors for factual \
         contradictions and flags any it finds.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let card_id = required_str(&args, "card_id")?;
                let content = required_str(&args, "content")?;
                let neighbors = kit.kg.backend().find_similar_nodes(card_id, 5, 0.6).await?;

                let mut conflicts = Vec::new();
                for (other_id, _score) in &neighbors {
                    if let Some(node) = kit.kg.backend().get_node(other_id).await? {
                        let other_content = &node.content;
                        let prompt = format!(
                            "Do these two notes contradict each other on any factual point? \
                             Answer \"yes: <reason>\" or \"no\".\n\nA: {content}\n\nB: {other_content}"
                        );
                        let verdict = ask_model(&kit.model, prompt).await?;
                        if verdict.trim_start().to_lowercase().starts_with("yes") {
                            conflicts.push(json!({ "card_id": other_id, "reason": verdict.trim() }));
                        }
                    }
                }
                Ok(json!({ "conflicts": conflicts }))
            }
        }),
    )
}
