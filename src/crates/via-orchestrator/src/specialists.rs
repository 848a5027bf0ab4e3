//! The four specialists the orchestrator's system prompt registers as
//! callable tools (spec.md §4.10, "Agents as Tools" pattern): each is a
//! [`Tool`] whose executor runs a nested [`run_tool_loop`] over that
//! specialist's own tool set, so from the top-level model's point of view a
//! specialist looks exactly like any other tool call.

use crate::agent_loop::{run_tool_loop, DEFAULT_MAX_ITERATIONS};
use serde_json::{json, Value};
use std::sync::Arc;
use via_graph_core::messages::Message;
use via_graph_core::tool::{Tool, ToolError, ToolFuture};
use via_tools::ToolKit;

fn specialist_tool(
    name: &'static str,
    description: &'static str,
    system_prompt: &'static str,
    tools: impl Fn(&ToolKit) -> Vec<Tool> + Send + Sync + 'static,
    kit: ToolKit,
) -> Tool {
    let tools = Arc::new(tools);
    let schema = json!({
        "type": "object",
        "properties": { "instruction": {"type": "string", "description": "What the specialist should do"} },
        "required": ["instruction"]
    });

    Tool::new(
        name,
        description,
        schema,
        Arc::new(move |args: Value, _runtime| -> ToolFuture {
            let kit = kit.clone();
            let tools = tools.clone();
            Box::pin(async move {
                let instruction = args
                    .get("instruction")
                    .and_then(Value::as_str)
                    .ok_or_else(|| ToolError::InvalidArguments {
                        tool: name.to_string(),
                        error: "missing 'instruction'".to_string(),
                    })?
                    .to_string();

                let outcome = run_tool_loop(
                    &kit.model,
                    tools(&kit),
                    Some(system_prompt),
                    vec![Message::human(instruction)],
                    DEFAULT_MAX_ITERATIONS,
                    None,
                )
                .await
                .map_err(|err| ToolError::ExecutionFailed { tool: name.to_string(), error: err.to_string() })?;

                Ok(json!({ "result": outcome.final_text }))
            })
        }),
    )
}

pub fn content_extraction_specialist(kit: &ToolKit) -> Tool {
    specialist_tool(
        "content_extraction_agent",
        "Handles extracting content from a URL onto the canvas: fetching, \
         building cards, placing them, and connecting them to related cards. \
         Pick this when the user shares a link or asks to pull in a source.",
        "You are the content-extraction specialist for a mind-mapping canvas. \
         If the instruction contains a URL, call extract_url_content. Then use \
         find_similar_cards, suggest_card_placement, and \
         create_intelligent_connections to integrate the new cards into the \
         existing canvas. Report what you created.",
        via_tools::content_extraction_tools,
        kit.clone(),
    )
}

pub fn knowledge_graph_specialist(kit: &ToolKit) -> Tool {
    specialist_tool(
        "knowledge_graph_agent",
        "Handles operations on the knowledge graph itself: finding similar \
         cards, placing or connecting cards, categorizing content, merging \
         category profiles, and detecting duplicates or conflicts. Pick this \
         for maintenance and organization requests about the canvas structure.",
        "You are the knowledge-graph specialist for a mind-mapping canvas. Use \
         the tools available to satisfy the instruction: similarity search, \
         placement, connections, categorization, profile merging, and \
         duplicate/conflict detection. Report what changed.",
        via_tools::knowledge_graph_tools,
        kit.clone(),
    )
}

pub fn learning_assistant_specialist(kit: &ToolKit) -> Tool {
    specialist_tool(
        "learning_assistant_agent",
        "Handles learning and research requests: simplifying content, finding \
         examples, analyzing gaps, building action plans, answering questions \
         grounded in the canvas, academic search, counterpoints, information \
         refresh, surprising connections, learning clusters, and deep research. \
         Pick this for anything about helping the user learn or research a topic.",
        "You are the learning-assistant specialist for a mind-mapping canvas. \
         Choose whichever tool(s) best satisfy the instruction; for broad, \
         open-ended research questions prefer deep_research_pipeline. Ground \
         answers in canvas content via canvas_qa or retrieve_context when \
         available. Report your findings.",
        via_tools::learning_assistant_tools,
        kit.clone(),
    )
}

pub fn background_intelligence_specialist(kit: &ToolKit) -> Tool {
    specialist_tool(
        "background_intelligence_agent",
        "Runs passive analysis over a piece of content: generating learning \
         questions, extracting todos, detecting deadlines, extracting named \
         entities, suggesting duplicate merges, or detecting contradictions. \
         Normally runs automatically on new/updated cards, but can be invoked \
         directly to analyze a specific card or piece of text on request.",
        "You are the background-intelligence specialist for a mind-mapping \
         canvas. From the six available tools, call only the ones relevant to \
         the given content; do not call all of them reflexively. Report what \
         you found.",
        via_tools::background_intelligence_tools,
        kit.clone(),
    )
}

pub fn all_specialists(kit: &ToolKit) -> Vec<Tool> {
    vec![
        content_extraction_specialist(kit),
        knowledge_graph_specialist(kit),
        learning_assistant_specialist(kit),
        background_intelligence_specialist(kit),
    ]
}
