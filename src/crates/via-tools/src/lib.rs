//! Tool instances exposed to the agent orchestrator (spec.md §4.10). Each
//! module builds a fixed list of [`via_graph_core::tool::Tool`]s from a
//! shared [`ToolKit`]; this crate additionally groups those lists into the
//! four specialist tool sets the orchestrator registers one-per-agent, so
//! `via-orchestrator` only needs to build a [`ToolKit`] once and ask for
//! `content_extraction_tools`, `knowledge_graph_tools`,
//! `learning_assistant_tools`, or `background_intelligence_tools`.

pub mod academic;
pub mod background_tools;
pub mod canvas_tools;
pub mod error;
pub mod extraction_tools;
pub mod graph_tools;
pub mod kit;
pub mod knowledge_base_tools;
pub mod learning_tools;
pub mod research;
pub mod support;

pub use error::{Result, ToolsError};
pub use kit::ToolKit;

use via_graph_core::tool::Tool;

/// Content-extraction agent: pre-checks for URLs itself, then falls back to
/// these tools (spec.md §4.10, "Content-extraction agent").
pub fn content_extraction_tools(kit: &ToolKit) -> Vec<Tool> {
    let mut tools = extraction_tools::tools(kit);
    tools.push(graph_tools::find_similar_cards(kit.clone()));
    tools.push(graph_tools::suggest_card_placement(kit.clone()));
    tools.push(graph_tools::create_intelligent_connections(kit.clone()));
    tools
}

/// Knowledge-graph agent: similarity, placement, connection, categorization,
/// growth, merge, and conflict-detection tools (spec.md §4.10,
/// "Knowledge-graph agent").
pub fn knowledge_graph_tools(kit: &ToolKit) -> Vec<Tool> {
    let mut tools = graph_tools::tools(kit);
    tools.extend(canvas_tools::tools(kit));
    tools.push(extraction_tools::grow_card_content(kit.clone()));
    tools
}

/// Learning-assistant agent: every `learning_tools` helper plus canvas Q&A's
/// RAG dependency, academic search, and the deep-research pipeline
/// (spec.md §4.10, "Learning-assistant agent").
pub fn learning_assistant_tools(kit: &ToolKit) -> Vec<Tool> {
    let mut tools = learning_tools::tools(kit);
    tools.extend(knowledge_base_tools::tools(kit));
    tools.extend(research::tools(kit));
    tools.push(canvas_tools::get_canvas_summary(kit.clone()));
    tools
}

/// Background-intelligence agent: the six passive-analysis tools it picks a
/// subset of per `card_created`/`card_updated` event (spec.md §4.10,
/// "Background-intelligence agent").
pub fn background_intelligence_tools(kit: &ToolKit) -> Vec<Tool> {
    background_tools::tools(kit)
}
