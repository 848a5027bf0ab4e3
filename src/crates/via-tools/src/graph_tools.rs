//! Knowledge-graph agent tools (spec.md §4.10): `find_similar_cards`,
//! `suggest_card_placement`, `create_intelligent_connections`,
//! `categorize_card`, `merge_category_profiles`, `detect_duplicates_and_conflicts`.
//! Grounded on [`via_kg_state::KnowledgeGraphState`] and
//! [`via_categories::CategorySystem`].

use crate::error::ToolsError;
use crate::kit::ToolKit;
use crate::support::{ask_model, executor, optional_f64, optional_str, optional_u64, required_str};
use serde_json::{json, Value};
use via_categories::AssignmentOutcome;
use via_domain::ids::ProfileId;
use via_graph_backend::{EdgeData, EdgeType};
use via_graph_core::tool::Tool;

pub fn tools(kit: &ToolKit) -> Vec<Tool> {
    vec![
        find_similar_cards(kit.clone()),
        suggest_card_placement(kit.clone()),
        create_intelligent_connections(kit.clone()),
        categorize_card(kit.clone()),
        merge_category_profiles(kit.clone()),
        detect_duplicates_and_conflicts(kit.clone()),
    ]
}

fn parse_edge_type(name: &str) -> EdgeType {
    match name {
        "parent-child" => EdgeType::ParentChild,
        "related" => EdgeType::Related,
        "reference" => EdgeType::Reference,
        "similar" => EdgeType::Similar,
        "mentions" => EdgeType::Mentions,
        "challenges" => EdgeType::Challenges,
        _ => EdgeType::Default,
    }
}

pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)) as f64
}

pub(crate) fn find_similar_cards(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": {
            "card_id": {"type": "string"},
            "limit": {"type": "integer"},
            "min_similarity": {"type": "number"}
        },
        "required": ["card_id"]
    });

    Tool::new(
        "find_similar_cards",
        "Finds cards already linked by similarity edges above a threshold.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let card_id = required_str(&args, "card_id")?;
                let limit = optional_u64(&args, "limit").unwrap_or(10) as usize;
                let min_similarity = optional_f64(&args, "min_similarity").unwrap_or(0.1);
                let hits = kit.kg.backend().find_similar_nodes(card_id, limit, min_similarity).await?;
                Ok(json!({ "similar": hits }))
            }
        }),
    )
}

pub(crate) fn suggest_card_placement(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": {
            "content": {"type": "string"},
            "exclude_card_id": {"type": "string"}
        },
        "required": ["content"]
    });

    Tool::new(
        "suggest_card_placement",
        "Given draft card content, embeds it and scores it against every \
         existing card without writing any edges, returning the best parent \
         candidate and nearby siblings.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let content = required_str(&args, "content")?;
                let exclude = optional_str(&args, "exclude_card_id");
                let embedding = kit.embedder.embed(content).await?;

                let mut candidates = Vec::new();
                for id in kit.kg.backend().list_node_ids().await? {
                    if Some(id.as_str()) == exclude {
                        continue;
                    }
                    if let Some(node) = kit.kg.backend().get_node(&id).await? {
                        let score = cosine_similarity(&embedding, &node.embedding);
                        if score >= 0.1 {
                            candidates.push((id, score));
                        }
                    }
                }
                candidates.sort_by(|a, b| {
                    b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.0.cmp(&b.0))
                });
                let top: Vec<_> = candidates.into_iter().take(10).collect();
                let suggested_parent = top.first().filter(|(_, score)| *score >= 0.5).map(|(id, _)| id.clone());

                Ok(json!({
                    "suggested_parent": suggested_parent,
                    "similar": top,
                }))
            }
        }),
    )
}

pub(crate) fn create_intelligent_connections(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": {
            "source_card_id": {"type": "string"},
            "target_card_ids": {"type": "array", "items": {"type": "string"}},
            "connection_type": {"type": "string", "description": "parent-child, related, reference, similar, mentions, challenges, or default"},
            "weight": {"type": "number"}
        },
        "required": ["source_card_id", "target_card_ids"]
    });

    Tool::new(
        "create_intelligent_connections",
        "Writes connection edges from a source card to one or more target cards.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let source = required_str(&args, "source_card_id")?.to_string();
                let targets = args
                    .get("target_card_ids")
                    .and_then(Value::as_array)
                    .ok_or(ToolsError::MissingArgument("target_card_ids"))?;
                let edge_type = parse_edge_type(optional_str(&args, "connection_type").unwrap_or("related"));
                let weight = optional_f64(&args, "weight");

                let mut created = Vec::new();
                for target in targets {
                    let target_id = target.as_str().ok_or(ToolsError::InvalidArgument {
                        name: "target_card_ids",
                        reason: "must be an array of strings".to_string(),
                    })?;
                    let ok = kit
                        .kg
                        .backend()
                        .add_edge(EdgeData {
                            source: source.clone(),
                            target: target_id.to_string(),
                            edge_type,
                            weight,
                        })
                        .await?;
                    if ok {
                        created.push(target_id.to_string());
                    }
                }
                Ok(json!({ "created": created }))
            }
        }),
    )
}

fn categorize_card(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": {
            "content": {"type": "string"}
        },
        "required": ["content"]
    });

    Tool::new(
        "categorize_card",
        "Runs a card's content through hybrid retrieval and LLM classification \
         against the dynamic category system, creating a new category profile \
         when nothing fits.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let content = required_str(&args, "content")?;
                let embedding = kit.embedder.embed(content).await?;
                let outcome = kit.categories.classify_and_assign(content, &embedding).await;
                Ok(match outcome {
                    AssignmentOutcome::AssignedExisting { profile_id, confidence } => {
                        json!({ "outcome": "assigned_existing", "profile_id": profile_id.as_str(), "confidence": confidence })
                    }
                    AssignmentOutcome::CreatedNew { profile_id, confidence } => {
                        json!({ "outcome": "created_new", "profile_id": profile_id.as_str(), "confidence": confidence })
                    }
                    AssignmentOutcome::Uncategorized => json!({ "outcome": "uncategorized" }),
                })
            }
        }),
    )
}

fn merge_category_profiles(kit: ToolKit) -> Tool {
    let schema = json!({
        "type": "object",
        "properties": {
            "target_profile_id": {"type": "string"},
            "source_profile_id": {"type": "string"}
        },
        "required": ["target_profile_id", "source_profile_id"]
    });

    Tool::new(
        "merge_category_profiles",
        "Merges a source category profile into a target, weighting the \
         combined centroid by each profile's card count.",
        schema,
        executor(move |args: Value| {
            let kit = kit.clone();
            async move {
                let target = ProfileId::new(required_str(&args, "target_profile_id")?);
                let source = ProfileId::new(required_str(&args, "source_profile_id")?);
                let merged = kit.categories.merge_profiles(&target, &source).await;
                if !merged {
                    return Err(ToolsError::InvalidArgument {
                        name: "source_profile_id",
                        reason: "target or source profile not found".to_string(),
                    });
                }
                Ok(json!({ "merged": true, "target_profile_id": target.as_str() }))
            }
        }),
    )
}

fn detect_duplicates_and_conflicts(kit: ToolKit) -> Tool {
    let schema = json!({ "type": "object", "properties": {} });

    Tool::new(
        "detect_duplicates_and_conflicts",
        "Scans the knowledge graph for orphaned cards, weak connections, and \
         potential duplicate pairs above the duplicate-similarity threshold.",
        schema,
        executor(move |_args: Value| {
            let kit = kit.clone();
            async move {
                let issues = kit.kg.detect_issues().await?;
                Ok(json!({
                    "orphaned_cards": issues.orphaned_cards,
                    "weak_connections": issues.weak_connections,
                    "potential_duplicates": issues.potential_duplicates,
                }))
            }
        }),
    )
}

/// Used by `learning_tools::counterpoints` to phrase a conflict explanation
/// without duplicating the prompt-construction logic here.
pub(crate) async fn explain_conflict(kit: &ToolKit, a: &str, b: &str) -> crate::error::Result<String> {
    let prompt = format!(
        "Two card contents were flagged as potentially conflicting. Briefly explain \
         the tension or disagreement between them in two sentences.\n\nA: {a}\n\nB: {b}"
    );
    ask_model(&kit.model, prompt).await
}
