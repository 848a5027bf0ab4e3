//! Learning-assistant agent tools (spec.md §4.10): simplification, real-world
//! examples, gap analysis, action plans, canvas Q&A over RAG context,
//! academic source search with LLM fallback, counterpoints, information
//! refresh, surprising connections, and learning-cluster card creation.
//! Grounded on [`via_rag_store::RagStore`] for retrieval and
//! [`via_graph_core::llm::ChatModel`] for every generative step, the same
//! split `via_categories::classifier` uses between retrieval and judgment.

use crate::error::ToolsError;
use crate::kit::ToolKit;
use crate::support::{ask_model, executor, optional_str, optional_u64, required_str};
use serde_json::{json, Value};
use via_domain::card::Card;
use via_domain::ids::CardId;
use via_graph_core::tool::Tool;

pub fn tools(kit: &ToolKit) -> Vec<Tool> {
    vec![
        simplify_content(kit.clone()),
        find_real_examples(kit.clone()),
        analyze_gaps(kit.clone()),
        create_action_plan(kit.clone()),
        canvas_qa(kit.clone()),
        academic_source_search(kit.clone()),
        counterpoints(kit.clone()),
        information_refresh(kit.clone()),
        surprising_connections(kit.clone()),
        create_learning_cluster(kit.clone()),
    ]
}

fn simplify_content(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": {
            "content": {"type": "string"},
            "target_level": {"type": "string", "description": "e.g. beginner, child, expert-summary"}
        },
        "required": ["content"]
    });

    Tool::new(
        "simplify_content",
        "Rewrites card content at a simpler level of explanation.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let content = required_str(&args, "content")?;
                let level = optional_str(&args, "target_level").unwrap_or("beginner");
                let prompt = format!(
                    "Rewrite the following content so it is clear to a {level} reader. \
                     Preserve every factual claim, drop jargon, use short sentences.\n\n{content}"
                );
                let simplified = ask_model(&kit.model, prompt).await?;
                Ok(json!({ "simplified_content": simplified }))
            }
        }),
    )
}

fn find_real_examples(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": { "content": {"type": "string"}, "count": {"type": "integer"} },
        "required": ["content"]
    });

    Tool::new(
        "find_real_examples",
        "Generates concrete real-world examples that illustrate a card's content.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let content = required_str(&args, "content")?;
                let count = optional_u64(&args, "count").unwrap_or(3);
                let prompt = format!(
                    "Give {count} concrete, real-world examples that illustrate the following \
                     idea. One example per line, no numbering.\n\n{content}"
                );
                let text = ask_model(&kit.model, prompt).await?;
                let examples: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
                Ok(json!({ "examples": examples }))
            }
        }),
    )
}

fn analyze_gaps(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": { "cards_summary": {"type": "string"}, "topic": {"type": "string"} },
        "required": ["cards_summary", "topic"]
    });

    Tool::new(
        "analyze_gaps",
        "Given a summary of a canvas's existing cards on a topic, identifies \
         missing subtopics or unanswered questions a learner would need next.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let summary = required_str(&args, "cards_summary")?;
                let topic = required_str(&args, "topic")?;
                let prompt = format!(
                    "A learner is studying \"{topic}\" and already has these notes:\n{summary}\n\n\
                     List the important subtopics or questions that are not yet covered, one per line."
                );
                let text = ask_model(&kit.model, prompt).await?;
                let gaps: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
                Ok(json!({ "gaps": gaps }))
            }
        }),
    )
}

fn create_action_plan(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": { "goal": {"type": "string"}, "context": {"type": "string"} },
        "required": ["goal"]
    });

    Tool::new(
        "create_action_plan",
        "Produces an ordered, numbered list of concrete steps toward a stated \
         learning goal.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let goal = required_str(&args, "goal")?;
                let context = optional_str(&args, "context").unwrap_or("");
                let prompt = format!(
                    "Produce a numbered, concrete action plan to achieve this goal: \"{goal}\".\n\
                     Context: {context}\n\nEach step should be a single actionable sentence."
                );
                let text = ask_model(&kit.model, prompt).await?;
                let steps: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
                Ok(json!({ "steps": steps }))
            }
        }),
    )
}

fn canvas_qa(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": {
            "question": {"type": "string"},
            "canvas_id": {"type": "string"},
            "top_k": {"type": "integer"}
        },
        "required": ["question", "canvas_id"]
    });

    Tool::new(
        "canvas_qa",
        "Answers a question grounded in the canvas's indexed content, \
         retrieving context before asking the model.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let question = required_str(&args, "question")?;
                let canvas_id = required_str(&args, "canvas_id")?;
                let top_k = optional_u64(&args, "top_k").unwrap_or(5) as usize;
                let context = kit.rag.retrieve_context(question, canvas_id, top_k, 0.3).await?;
                let prompt = if context.is_empty() {
                    format!(
                        "Answer the following question. No canvas context was found, so say so \
                         and answer from general knowledge.\n\nQuestion: {question}"
                    )
                } else {
                    format!(
                        "Using only the following canvas context, answer the question. If the \
                         context does not cover it, say so explicitly.\n\nContext:\n{context}\n\n\
                         Question: {question}"
                    )
                };
                let answer = ask_model(&kit.model, prompt).await?;
                Ok(json!({ "answer": answer, "grounded": !context.is_empty() }))
            }
        }),
    )
}

fn academic_source_search(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": { "query": {"type": "string"}, "max_results": {"type": "integer"} },
        "required": ["query"]
    });

    Tool::new(
        "academic_source_search",
        "Searches for academic or authoritative references on a topic, using \
         a real search client when configured and otherwise falling back to \
         the model's own recall.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let query = required_str(&args, "query")?;
                let max_results = optional_u64(&args, "max_results").unwrap_or(5) as usize;
                let client = match &kit.academic {
                    Some(client) => client.clone(),
                    None => return Err(ToolsError::NoAcademicClient),
                };
                let sources = client.search(query, max_results).await.map_err(|reason| ToolsError::InvalidArgument {
                    name: "query",
                    reason,
                })?;
                Ok(json!({ "sources": sources }))
            }
        }),
    )
}

fn counterpoints(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": { "claim": {"type": "string"} },
        "required": ["claim"]
    });

    Tool::new(
        "counterpoints",
        "Generates well-reasoned counterarguments or alternative perspectives to a claim.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let claim = required_str(&args, "claim")?;
                let prompt = format!(
                    "Give two or three substantive counterpoints or alternative perspectives \
                     to this claim, each with a one-sentence justification:\n\n{claim}"
                );
                let text = ask_model(&kit.model, prompt).await?;
                Ok(json!({ "counterpoints": text }))
            }
        }),
    )
}

fn information_refresh(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": { "content": {"type": "string"}, "as_of": {"type": "string"} },
        "required": ["content"]
    });

    Tool::new(
        "information_refresh",
        "Flags parts of a card's content that may be outdated and suggests \
         what to check or update, given the model's own knowledge cutoff.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let content = required_str(&args, "content")?;
                let as_of = optional_str(&args, "as_of").unwrap_or("today");
                let prompt = format!(
                    "As of {as_of}, review this content for claims that are likely outdated or \
                     superseded. List each one with what should be verified or updated.\n\n{content}"
                );
                let review = ask_model(&kit.model, prompt).await?;
                Ok(json!({ "review": review }))
            }
        }),
    )
}

fn surprising_connections(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": { "card_id": {"type": "string"}, "content": {"type": "string"} },
        "required": ["card_id", "content"]
    });

    Tool::new(
        "surprising_connections",
        "Finds cards elsewhere in the knowledge graph that relate to this \
         card in a non-obvious way, then asks the model to explain why.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let card_id = required_str(&args, "card_id")?;
                let content = required_str(&args, "content")?;
                let embedding = kit.embedder.embed(content).await?;

                let mut scored = Vec::new();
                for id in kit.kg.backend().list_node_ids().await? {
                    if id == card_id {
                        continue;
                    }
                    if let Some(node) = kit.kg.backend().get_node(&id).await? {
                        let score = crate::graph_tools::cosine_similarity(&embedding, &node.embedding);
                        // A "surprising" connection sits in the middle of the similarity
                        // range: related enough to matter, far enough not to be obvious.
                        if (0.25..0.55).contains(&score) {
                            scored.push((id, node.content, score));
                        }
                    }
                }
                scored.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));
                let top = scored.into_iter().take(3).collect::<Vec<_>>();

                if top.is_empty() {
                    return Ok(json!({ "connections": [] }));
                }

                let listing: String = top
                    .iter()
                    .map(|(id, content, score)| format!("- {id} (similarity {score:.2}): {content}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                let prompt = format!(
                    "The following cards are moderately related to this one but not an obvious \
                     match. For each, explain in one sentence the non-obvious connection.\n\n\
                     This card:\n{content}\n\nCandidates:\n{listing}"
                );
                let explanation = ask_model(&kit.model, prompt).await?;
                Ok(json!({
                    "candidates": top.iter().map(|(id, _, score)| json!({"card_id": id, "score": score})).collect::<Vec<_>>(),
                    "explanation": explanation,
                }))
            }
        }),
    )
}

fn create_learning_cluster(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": {
            "canvas_id": {"type": "string"},
            "topic": {"type": "string"},
            "parent_content": {"type": "string"},
            "subtopics": {"type": "array", "items": {"type": "string"}}
        },
        "required": ["canvas_id", "topic", "parent_content", "subtopics"]
    });

    Tool::new(
        "create_learning_cluster",
        "Builds a parent card for a topic plus one child card per subtopic, \
         each generated by the model, as a ready-to-materialize hierarchical \
         cluster (mirrors the parent/children shape extract_url_content builds).",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let canvas_id = required_str(&args, "canvas_id")?;
                let topic = required_str(&args, "topic")?;
                let parent_content = required_str(&args, "parent_content")?;
                let subtopics = args
                    .get("subtopics")
                    .and_then(Value::as_array)
                    .ok_or(ToolsError::MissingArgument("subtopics"))?;

                let parent = Card::new(CardId::new(uuid::Uuid::new_v4().to_string()), canvas_id, topic, parent_content);

                let mut children = Vec::new();
                for subtopic in subtopics {
                    let subtopic = subtopic.as_str().ok_or(ToolsError::InvalidArgument {
                        name: "subtopics",
                        reason: "must be an array of strings".to_string(),
                    })?;
                    let prompt = format!(
                        "Write a concise, self-contained note on \"{subtopic}\" as part of \
                         learning about \"{topic}\". Two to four sentences."
                    );
                    let content = ask_model(&kit.model, prompt).await?;
                    children.push(
                        Card::new(CardId::new(uuid::Uuid::new_v4().to_string()), canvas_id, subtopic, content)
                            .with_parent(parent.id.clone()),
                    );
                }

                Ok(json!({ "parent": parent, "children": children }))
            }
        }),
    )
}
