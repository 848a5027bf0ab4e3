//! The learning-assistant agent's deep-research pipeline (spec.md §4.10):
//! query analysis, decomposition into sub-questions, parallel search across
//! academic/canvas/LLM-insight sources per sub-question, a bounded critical
//! review loop that targets remaining gaps, synthesis, and a hierarchical
//! card cluster with citations. Each stage reuses the same building blocks
//! the other learning tools use (`ask_model`, `RagStore::retrieve_context`,
//! `AcademicSearchClient`) rather than introducing a new LLM-calling idiom.

use crate::error::ToolsError;
use crate::kit::ToolKit;
use crate::support::{ask_model, executor, optional_u64, required_str};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use via_domain::card::Card;
use via_domain::ids::CardId;
use via_graph_core::tool::Tool;

pub fn tools(kit: &ToolKit) -> Vec<Tool> {
    vec![deep_research_pipeline(kit.clone())]
}

const MAX_REVIEW_ITERATIONS: usize = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SourceNote {
    origin: String,
    content: String,
    citation: Option<String>,
}

async fn analyze_query(kit: &ToolKit, query: &str) -> crate::error::Result<String> {
    let prompt = format!(
        "A learner asked a research question. State, in one or two sentences, what they are \
         really trying to find out and any constraints implied by the question.\n\nQuestion: {query}"
    );
    ask_model(&kit.model, prompt).await
}

async fn decompose(kit: &ToolKit, query: &str, intent: &str) -> crate::error::Result<Vec<String>> {
    let prompt = format!(
        "Break this research question down into 3 to 5 focused sub-questions that together \
         cover it. One sub-question per line, no numbering.\n\nQuestion: {query}\nIntent: {intent}"
    );
    let text = ask_model(&kit.model, prompt).await?;
    Ok(text.lines().map(str::trim).filter(|l| !l.is_empty()).map(str::to_string).collect())
}

/// Runs the three source lanes for one sub-question concurrently: academic
/// search (if a client is configured), the canvas's own indexed content, and
/// the model's own insight as a last-resort lane that is always available.
async fn search_sub_question(kit: &ToolKit, canvas_id: &str, sub_question: &str) -> Vec<SourceNote> {
    let academic = async {
        let Some(client) = &kit.academic else { return Vec::new() };
        match client.search(sub_question, 3).await {
            Ok(sources) => sources
                .into_iter()
                .map(|s| SourceNote {
                    origin: "academic".to_string(),
                    content: format!("{}: {}", s.title, s.summary),
                    citation: s.url.or(Some(s.title)),
                })
                .collect(),
            Err(_) => Vec::new(),
        }
    };

    let canvas = async {
        match kit.rag.retrieve_context(sub_question, canvas_id, 5, 0.3).await {
            Ok(context) if !context.is_empty() => {
                vec![SourceNote { origin: "canvas".to_string(), content: context, citation: None }]
            }
            _ => Vec::new(),
        }
    };

    let insight = async {
        let prompt = format!(
            "Answer this sub-question with what you already know, in 2-4 sentences, noting any \
             uncertainty: {sub_question}"
        );
        match ask_model(&kit.model, prompt).await {
            Ok(text) => vec![SourceNote { origin: "llm-insight".to_string(), content: text, citation: None }],
            Err(_) => Vec::new(),
        }
    };

    let (academic, canvas, insight) = tokio::join!(academic, canvas, insight);
    academic.into_iter().chain(canvas).chain(insight).collect()
}

async fn critique(kit: &ToolKit, query: &str, notes: &[SourceNote]) -> crate::error::Result<Vec<String>> {
    let digest = notes
        .iter()
        .map(|n| format!("[{}] {}", n.origin, n.content))
        .collect::<Vec<_>>()
        .join("\n");
    let prompt = format!(
        "A research pass gathered the following notes toward answering: \"{query}\".\n\n{digest}\n\n\
         List any important gaps still unaddressed, one per line. If the notes are sufficient, \
         respond with the single word NONE."
    );
    let text = ask_model(&kit.model, prompt).await?;
    if text.trim().eq_ignore_ascii_case("none") {
        return Ok(Vec::new());
    }
    Ok(text.lines().map(str::trim).filter(|l| !l.is_empty()).map(str::to_string).collect())
}

async fn synthesize(kit: &ToolKit, query: &str, notes: &[SourceNote]) -> crate::error::Result<String> {
    let digest = notes
        .iter()
        .map(|n| format!("[{}] {}", n.origin, n.content))
        .collect::<Vec<_>>()
        .join("\n");
    let prompt = format!(
        "Synthesize a clear, well-organized answer to \"{query}\" from the following research \
         notes. Integrate overlapping points, note disagreements, and keep it readable.\n\n{digest}"
    );
    ask_model(&kit.model, prompt).await
}

fn deep_research_pipeline(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": {
            "canvas_id": {"type": "string"},
            "query": {"type": "string"},
            "max_sub_questions": {"type": "integer"}
        },
        "required": ["canvas_id", "query"]
    });

    Tool::new(
        "deep_research_pipeline",
        "Runs the multi-stage research workflow: analyzes the query, decomposes it into \
         sub-questions, searches academic/canvas/LLM-insight sources for each in parallel, \
         critically reviews the gathered notes for up to two correction passes, synthesizes \
         a final answer, and returns a hierarchical card cluster with citations.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let canvas_id = required_str(&args, "canvas_id")?.to_string();
                let query = required_str(&args, "query")?.to_string();
                let max_sub_questions = optional_u64(&args, "max_sub_questions").unwrap_or(5) as usize;

                let intent = analyze_query(&kit, &query).await?;
                let mut sub_questions = decompose(&kit, &query, &intent).await?;
                sub_questions.truncate(max_sub_questions);
                if sub_questions.is_empty() {
                    return Err(ToolsError::InvalidArgument {
                        name: "query",
                        reason: "could not decompose into sub-questions".to_string(),
                    });
                }

                let mut notes_per_question: Vec<Vec<SourceNote>> =
                    join_all(sub_questions.iter().map(|q| search_sub_question(&kit, &canvas_id, q))).await;

                for _ in 0..MAX_REVIEW_ITERATIONS {
                    let all_notes: Vec<SourceNote> = notes_per_question.iter().flatten().cloned().collect();
                    let gaps = critique(&kit, &query, &all_notes).await?;
                    if gaps.is_empty() {
                        break;
                    }
                    let follow_up = join_all(gaps.iter().map(|g| search_sub_question(&kit, &canvas_id, g))).await;
                    sub_questions.extend(gaps);
                    notes_per_question.extend(follow_up);
                }

                let all_notes: Vec<SourceNote> = notes_per_question.iter().flatten().cloned().collect();
                let synthesis = synthesize(&kit, &query, &all_notes).await?;

                let parent = Card::new(CardId::new(uuid::Uuid::new_v4().to_string()), &canvas_id, &query, synthesis);
                let mut children = Vec::new();
                for (sub_question, notes) in sub_questions.iter().zip(notes_per_question.iter()) {
                    if notes.is_empty() {
                        continue;
                    }
                    let content = notes.iter().map(|n| n.content.clone()).collect::<Vec<_>>().join("\n\n");
                    children.push(
                        Card::new(CardId::new(uuid::Uuid::new_v4().to_string()), &canvas_id, sub_question, content)
                            .with_parent(parent.id.clone()),
                    );
                }

                let citations: Vec<&str> =
                    all_notes.iter().filter_map(|n| n.citation.as_deref()).collect();

                Ok(json!({
                    "intent": intent,
                    "sub_questions": sub_questions,
                    "parent": parent,
                    "children": children,
                    "citations": citations,
                }))
            }
        }),
    )
}
