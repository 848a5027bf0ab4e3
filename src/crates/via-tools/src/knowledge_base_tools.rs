//! RAG tools: `search_knowledge_base`, `retrieve_context`. Grounded on
//! [`via_rag_store::RagStore`].

use crate::kit::ToolKit;
use crate::support::{executor, optional_f64, optional_str, optional_u64, required_str};
use serde_json::{json, Value};
use via_graph_core::tool::Tool;

pub fn tools(kit: &ToolKit) -> Vec<Tool> {
    vec![search_knowledge_base(kit.clone()), retrieve_context(kit.clone())]
}

fn search_knowledge_base(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": {
            "query": {"type": "string"},
            "canvas_id": {"type": "string"},
            "top_k": {"type": "integer"},
            "score_threshold": {"type": "number"}
        },
        "required": ["query"]
    });

    Tool::new(
        "search_knowledge_base",
        "Searches indexed card content by semantic similarity to a query, \
         optionally scoped to one canvas.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let query = required_str(&args, "query")?;
                let canvas_id = optional_str(&args, "canvas_id");
                let top_k = optional_u64(&args, "top_k").unwrap_or(10) as usize;
                let score_threshold = optional_f64(&args, "score_threshold").unwrap_or(0.0);
                let hits = kit.rag.search_knowledge_base(query, canvas_id, top_k, score_threshold).await?;
                Ok(json!({ "hits": hits }))
            }
        }),
    )
}

fn retrieve_context(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": {
            "query": {"type": "string"},
            "canvas_id": {"type": "string"},
            "top_k": {"type": "integer"},
            "score_threshold": {"type": "number"}
        },
        "required": ["query", "canvas_id"]
    });

    Tool::new(
        "retrieve_context",
        "Retrieves and formats relevant indexed content for a query as \
         numbered, scored passages suitable for inclusion in a model prompt.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let query = required_str(&args, "query")?;
                let canvas_id = required_str(&args, "canvas_id")?;
                let top_k = optional_u64(&args, "top_k").unwrap_or(5) as usize;
                let score_threshold = optional_f64(&args, "score_threshold").unwrap_or(0.3);
                let context = kit.rag.retrieve_context(query, canvas_id, top_k, score_threshold).await?;
                Ok(json!({ "context": context }))
            }
        }),
    )
}
