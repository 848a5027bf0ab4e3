//! Knowledge-graph state (spec.md §4.3): the card lifecycle layered over a
//! [`via_graph_backend::GraphBackend`] — similarity linking, parent
//! suggestion, a change log persisted every 10 entries, and issue
//! detection. Ported from the original `knowledge_graph_state.py`.

mod config;
mod error;

pub use config::KgThresholds;
pub use error::{KgStateError, Result};

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use via_graph_backend::{EdgeData, EdgeType, GraphBackend, NodeData};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionSuggestion {
    pub target_id: String,
    pub connection_type: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardMutationResult {
    pub suggested_parent: Option<String>,
    pub similar: Vec<(String, f64)>,
    pub connection_suggestions: Vec<ConnectionSuggestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeLogEntry {
    pub node_id: String,
    pub action: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DetectedIssues {
    pub orphaned_cards: Vec<String>,
    pub weak_connections: Vec<(String, String, f64)>,
    pub potential_duplicates: Vec<(String, String, f64)>,
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
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

pub struct KnowledgeGraphState {
    backend: Arc<dyn GraphBackend>,
    thresholds: KgThresholds,
    change_log: Mutex<Vec<ChangeLogEntry>>,
}

impl KnowledgeGraphState {
    pub fn new(backend: Arc<dyn GraphBackend>, thresholds: KgThresholds) -> Self {
        Self {
            backend,
            thresholds,
            change_log: Mutex::new(Vec::new()),
        }
    }

    async fn record_change(&self, node_id: &str, action: &str) -> Result<()> {
        let mut log = self.change_log.lock().await;
        log.push(ChangeLogEntry {
            node_id: node_id.to_string(),
            action: action.to_string(),
        });
        if log.len() % 10 == 0 {
            self.backend.persist().await?;
        }
        Ok(())
    }

    /// Computes similarity against every existing node by brute-force cosine
    /// (suitable at the in-memory backend's documented ~10k-node scale),
    /// keeps candidates with score >= `min_parent` config threshold, writes
    /// up to 10 `Similar` edges, and — if the best candidate clears
    /// `prefer_parent` — also writes a `ParentChild` in-edge from it. Ties
    /// are broken by smallest node id.
    pub async fn add_card(
        &self,
        id: &str,
        content: &str,
        embedding: Vec<f32>,
    ) -> Result<CardMutationResult> {
        if self.backend.get_node(id).await?.is_some() {
            return Err(KgStateError::AlreadyExists(id.to_string()));
        }
        let mut candidates = self.compute_candidates(id, &embedding).await?;
        candidates.retain(|(_, score)| *score >= self.thresholds.min_parent);
        candidates.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        let mut node = NodeData::new(id, content);
        node.embedding = embedding;
        self.backend.add_node(node).await?;
        self.record_change(id, "add").await?;

        let top_similar: Vec<(String, f64)> = candidates.iter().take(10).cloned().collect();
        for (other_id, score) in &top_similar {
            self.backend
                .add_edge(EdgeData {
                    source: id.to_string(),
                    target: other_id.clone(),
                    edge_type: EdgeType::Similar,
                    weight: Some(*score),
                })
                .await?;
        }

        let suggested_parent = top_similar
            .first()
            .filter(|(_, score)| *score >= self.thresholds.prefer_parent)
            .map(|(other_id, _)| other_id.clone());

        if let Some(parent_id) = &suggested_parent {
            if parent_id != id {
                self.backend
                    .add_edge(EdgeData {
                        source: parent_id.clone(),
                        target: id.to_string(),
                        edge_type: EdgeType::ParentChild,
                        weight: None,
                    })
                    .await?;
            }
        }

        let connection_suggestions = top_similar
            .iter()
            .map(|(other_id, score)| ConnectionSuggestion {
                target_id: other_id.clone(),
                connection_type: "related".to_string(),
                score: *score,
            })
            .collect();

        Ok(CardMutationResult {
            suggested_parent,
            similar: top_similar.into_iter().take(5).collect(),
            connection_suggestions,
        })
    }

    async fn compute_candidates(&self, id: &str, embedding: &[f32]) -> Result<Vec<(String, f64)>> {
        let mut out = Vec::new();
        for other_id in self.backend.list_node_ids().await? {
            if other_id == id {
                continue;
            }
            if let Some(other) = self.backend.get_node(&other_id).await? {
                let score = cosine_similarity(embedding, &other.embedding);
                if score >= 0.1 {
                    out.push((other_id, score));
                }
            }
        }
        Ok(out)
    }

    /// If `content` changed, removes all prior `Similar` edges for this node
    /// and recomputes them against the new embedding.
    pub async fn update_card(
        &self,
        id: &str,
        content: &str,
        embedding: Option<Vec<f32>>,
    ) -> Result<CardMutationResult> {
        let mut node = self
            .backend
            .get_node(id)
            .await?
            .ok_or_else(|| KgStateError::NotFound(id.to_string()))?;

        let content_changed = node.content != content;
        node.content = content.to_string();
        if let Some(embedding) = &embedding {
            node.embedding = embedding.clone();
        }
        self.backend.update_node(node.clone()).await?;
        self.record_change(id, "update").await?;

        if !content_changed {
            return Ok(CardMutationResult {
                suggested_parent: None,
                similar: Vec::new(),
                connection_suggestions: Vec::new(),
            });
        }

        for e in self.backend.edges_from(id).await? {
            if e.edge_type == EdgeType::Similar {
                self.backend.remove_edge(id, &e.target, EdgeType::Similar).await?;
            }
        }
        for e in self.backend.edges_to(id).await? {
            if e.edge_type == EdgeType::Similar {
                self.backend.remove_edge(&e.source, id, EdgeType::Similar).await?;
            }
        }

        let embedding = node.embedding.clone();
        let mut candidates = self.compute_candidates(id, &embedding).await?;
        candidates.retain(|(_, score)| *score >= self.thresholds.min_parent);
        candidates.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        let top_similar: Vec<(String, f64)> = candidates.iter().take(10).cloned().collect();
        for (other_id, score) in &top_similar {
            self.backend
                .add_edge(EdgeData {
                    source: id.to_string(),
                    target: other_id.clone(),
                    edge_type: EdgeType::Similar,
                    weight: Some(*score),
                })
                .await?;
        }
        let suggested_parent = top_similar
            .first()
            .filter(|(_, score)| *score >= self.thresholds.prefer_parent)
            .map(|(other_id, _)| other_id.clone());

        Ok(CardMutationResult {
            suggested_parent,
            similar: top_similar.into_iter().take(5).collect(),
            connection_suggestions: Vec::new(),
        })
    }

    pub async fn remove_card(&self, id: &str) -> Result<()> {
        self.backend.remove_node(id).await?;
        self.record_change(id, "remove").await?;
        Ok(())
    }

    /// `{orphaned_cards, weak_connections (< weak_edge), potential_duplicates
    /// (> duplicate)}`.
    pub async fn detect_issues(&self) -> Result<DetectedIssues> {
        let mut issues = DetectedIssues::default();
        let mut seen_weak = std::collections::HashSet::new();
        let mut seen_dup = std::collections::HashSet::new();
        for id in self.backend.list_node_ids().await? {
            let out_edges = self.backend.edges_from(&id).await?;
            let in_edges = self.backend.edges_to(&id).await?;
            if out_edges.is_empty() && in_edges.is_empty() {
                issues.orphaned_cards.push(id.clone());
                continue;
            }
            for e in out_edges.iter().filter(|e| e.edge_type == EdgeType::Similar) {
                let weight = e.weight.unwrap_or(0.0);
                let mut pair = [id.clone(), e.target.clone()];
                pair.sort();
                if weight < self.thresholds.weak_edge && seen_weak.insert(pair.clone()) {
                    issues.weak_connections.push((id.clone(), e.target.clone(), weight));
                }
                if weight > self.thresholds.duplicate && seen_dup.insert(pair) {
                    issues.potential_duplicates.push((id.clone(), e.target.clone(), weight));
                }
            }
        }
        Ok(issues)
    }

    pub fn backend(&self) -> &Arc<dyn GraphBackend> {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use via_graph_backend::InMemoryGraphBackend;

    fn state() -> KnowledgeGraphState {
        KnowledgeGraphState::new(Arc::new(InMemoryGraphBackend::new()), KgThresholds::default())
    }

    #[tokio::test]
    async fn add_card_links_similar_nodes_above_min_parent() {
        let state = state();
        state.add_card("a", "rust ownership", vec![1.0, 0.0]).await.unwrap();
        let result = state
            .add_card("b", "rust borrow checker", vec![0.9, 0.1])
            .await
            .unwrap();
        assert!(!result.similar.is_empty());
        assert_eq!(result.similar[0].0, "a");
    }

    #[tokio::test]
    async fn add_card_assigns_parent_when_top_similar_crosses_prefer_parent() {
        let state = state();
        state.add_card("a", "x", vec![1.0, 0.0]).await.unwrap();
        let result = state.add_card("b", "y", vec![1.0, 0.0]).await.unwrap();
        assert_eq!(result.suggested_parent.as_deref(), Some("a"));
        let edges = state.backend().edges_to("b").await.unwrap();
        assert!(edges.iter().any(|e| e.edge_type == EdgeType::ParentChild && e.source == "a"));
    }

    #[tokio::test]
    async fn remove_card_leaves_no_dangling_edges() {
        let state = state();
        state.add_card("a", "x", vec![1.0, 0.0]).await.unwrap();
        state.add_card("b", "y", vec![1.0, 0.0]).await.unwrap();
        state.remove_card("a").await.unwrap();
        assert!(state.backend().edges_to("b").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_card_with_unchanged_content_keeps_similar_edges() {
        let state = state();
        state.add_card("a", "x", vec![1.0, 0.0]).await.unwrap();
        state.add_card("b", "x", vec![1.0, 0.0]).await.unwrap();
        state.update_card("b", "x", None).await.unwrap();
        assert!(!state.backend().edges_from("b").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn detect_issues_finds_orphans_on_a_pristine_two_node_graph() {
        let state = state();
        state.add_card("a", "alpha topic", vec![1.0, 0.0]).await.unwrap();
        state.add_card("b", "completely unrelated", vec![0.0, 1.0]).await.unwrap();
        let issues = state.detect_issues().await.unwrap();
        assert_eq!(issues.orphaned_cards.len(), 2);
        assert!(issues.weak_connections.is_empty());
        assert!(issues.potential_duplicates.is_empty());
    }
}
