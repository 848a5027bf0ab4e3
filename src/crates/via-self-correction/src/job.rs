//! Periodic detect-propose-apply pass (spec.md §4.9), ported from the
//! original `self_correction_job.py`: each pass detects four kinds of
//! knowledge-graph drift, caps how much of each it will touch, auto-applies
//! the fixes that are safe to apply unattended (link an orphan to its best
//! match, prune a weak edge), and surfaces the rest (uncategorized cards,
//! likely duplicates) as proposals for a human or an agent to confirm.

use crate::error::Result;
use crate::lookup::CategoryLookup;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use via_kg_state::KnowledgeGraphState;

/// Per-pass caps, matching the original job's 10/20/20/10 ordering.
#[derive(Debug, Clone, Copy)]
pub struct CorrectionCaps {
    pub orphans: usize,
    pub weak_connections: usize,
    pub uncategorized: usize,
    pub duplicates: usize,
}

impl Default for CorrectionCaps {
    fn default() -> Self {
        Self { orphans: 10, weak_connections: 20, uncategorized: 20, duplicates: 10 }
    }
}

/// Minimum similarity an orphan's best match must clear before it is
/// auto-linked; matches `via_kg_state::KgThresholds::min_parent`'s default.
const AUTO_LINK_MIN_SIMILARITY: f64 = 0.3;

/// Sentinel category name a card carries while no profile has claimed it
/// (matches `via_graph_sync`'s sentinel; spec.md §8.1).
const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, Default)]
pub struct CorrectionPassSummary {
    pub pass_number: u64,
    pub orphans_found: usize,
    pub orphans_linked: usize,
    pub weak_connections_found: usize,
    pub weak_connections_pruned: usize,
    pub uncategorized_found: usize,
    pub uncategorized_categorized: usize,
    pub duplicates_found: usize,
    pub duplicates_tagged: usize,
}

pub struct SelfCorrectionJob {
    kg: Arc<KnowledgeGraphState>,
    category_lookup: Arc<dyn CategoryLookup>,
    caps: CorrectionCaps,
    pass_counter: AtomicU64,
    history: Mutex<VecDeque<CorrectionPassSummary>>,
    history_capacity: usize,
}

impl SelfCorrectionJob {
    pub fn new(kg: Arc<KnowledgeGraphState>, category_lookup: Arc<dyn CategoryLookup>) -> Self {
        Self::with_caps(kg, category_lookup, CorrectionCaps::default())
    }

    pub fn with_caps(
        kg: Arc<KnowledgeGraphState>,
        category_lookup: Arc<dyn CategoryLookup>,
        caps: CorrectionCaps,
    ) -> Self {
        Self {
            kg,
            category_lookup,
            caps,
            pass_counter: AtomicU64::new(0),
            history: Mutex::new(VecDeque::new()),
            history_capacity: 50,
        }
    }

    /// Runs one detect -> propose -> apply cycle and records its summary.
    /// Every correction kind the pass touches is actually applied (spec.md
    /// §4.9 Apply): orphans get a parent-child edge, weak connections are
    /// pruned, uncategorized cards are assigned via the category system, and
    /// duplicate pairs are tagged `potential_duplicate_of` on both sides —
    /// never auto-merged. The graph is persisted once at the end.
    pub async fn run_pass(&self) -> Result<CorrectionPassSummary> {
        let pass_number = self.pass_counter.fetch_add(1, Ordering::SeqCst) + 1;
        let issues = self.kg.detect_issues().await?;

        let orphans: Vec<String> = issues.orphaned_cards.iter().take(self.caps.orphans).cloned().collect();
        let weak: Vec<(String, String, f64)> =
            issues.weak_connections.iter().take(self.caps.weak_connections).cloned().collect();
        let duplicates: Vec<(String, String, f64)> =
            issues.potential_duplicates.iter().take(self.caps.duplicates).cloned().collect();

        let uncategorized_ids = self.uncategorized_ids(self.caps.uncategorized).await?;

        let mut orphans_linked = 0;
        for card_id in &orphans {
            if self.try_link_orphan(card_id).await? {
                orphans_linked += 1;
            }
        }

        let mut weak_connections_pruned = 0;
        for (source, target, _weight) in &weak {
            if self
                .kg
                .backend()
                .remove_edge(source, target, via_graph_backend::EdgeType::Similar)
                .await?
            {
                weak_connections_pruned += 1;
                tracing::debug!(source, target, "pruned weak connection");
            }
        }

        let mut uncategorized_categorized = 0;
        for card_id in &uncategorized_ids {
            if self.try_categorize(card_id).await? {
                uncategorized_categorized += 1;
            }
        }

        let mut duplicates_tagged = 0;
        for (source, target, _weight) in &duplicates {
            if self.tag_potential_duplicate(source, target).await? {
                duplicates_tagged += 1;
            }
        }

        self.kg.backend().persist().await?;

        let summary = CorrectionPassSummary {
            pass_number,
            orphans_found: issues.orphaned_cards.len(),
            orphans_linked,
            weak_connections_found: issues.weak_connections.len(),
            weak_connections_pruned,
            uncategorized_found: uncategorized_ids.len(),
            uncategorized_categorized,
            duplicates_found: duplicates.len(),
            duplicates_tagged,
        };

        tracing::info!(
            pass = pass_number,
            orphans_linked,
            weak_connections_pruned,
            uncategorized_categorized,
            duplicates_tagged,
            "self-correction pass complete"
        );

        let mut history = self.history.lock().await;
        if history.len() >= self.history_capacity {
            history.pop_front();
        }
        history.push_back(summary.clone());

        Ok(summary)
    }

    /// Links an orphan to its single best match with a parent-child edge,
    /// provided one clears [`AUTO_LINK_MIN_SIMILARITY`] (spec.md §4.9
    /// Propose: "add parent-child from best similar candidate"). Cards with
    /// no qualifying match are left orphaned for the next pass.
    async fn try_link_orphan(&self, card_id: &str) -> Result<bool> {
        let candidates = self
            .kg
            .backend()
            .find_similar_nodes(card_id, 1, AUTO_LINK_MIN_SIMILARITY)
            .await?;
        let Some((other_id, score)) = candidates.into_iter().next() else {
            return Ok(false);
        };
        self.kg
            .backend()
            .add_edge(via_graph_backend::EdgeData {
                source: other_id.clone(),
                target: card_id.to_string(),
                edge_type: via_graph_backend::EdgeType::ParentChild,
                weight: Some(score),
            })
            .await?;
        tracing::debug!(card_id, other_id, score, "linked orphan to best match");
        Ok(true)
    }

    /// Node ids with no category assignment yet (the field is unset, or
    /// still carries the [`UNCATEGORIZED`] sentinel), capped at `cap`.
    async fn uncategorized_ids(&self, cap: usize) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for id in self.kg.backend().list_node_ids().await? {
            if ids.len() >= cap {
                break;
            }
            if let Some(node) = self.kg.backend().get_node(&id).await? {
                let uncategorized = match node.category.as_deref() {
                    None => true,
                    Some(category) => category == UNCATEGORIZED,
                };
                if uncategorized {
                    ids.push(id);
                }
            }
        }
        Ok(ids)
    }

    /// Assigns a category to `card_id` via the injected [`CategoryLookup`]
    /// and writes it onto the node with an `auto_corrected` marker. Leaves
    /// the card untouched if the lookup cannot place it.
    async fn try_categorize(&self, card_id: &str) -> Result<bool> {
        let Some(mut node) = self.kg.backend().get_node(card_id).await? else {
            return Ok(false);
        };
        let Some(category) = self.category_lookup.classify(&node.content, &node.embedding).await else {
            return Ok(false);
        };
        node.category = Some(category);
        node.attributes.insert("auto_corrected".to_string(), serde_json::Value::Bool(true));
        self.kg.backend().update_node(node).await?;
        Ok(true)
    }

    /// Tags both ends of a likely-duplicate pair with a mutual
    /// `potential_duplicate_of` attribute and an `auto_corrected` marker.
    /// Never merges the cards (spec.md §4.9 Apply).
    async fn tag_potential_duplicate(&self, source: &str, target: &str) -> Result<bool> {
        let (Some(mut source_node), Some(mut target_node)) = (
            self.kg.backend().get_node(source).await?,
            self.kg.backend().get_node(target).await?,
        ) else {
            return Ok(false);
        };
        source_node
            .attributes
            .insert("potential_duplicate_of".to_string(), serde_json::Value::String(target.to_string()));
        source_node.attributes.insert("auto_corrected".to_string(), serde_json::Value::Bool(true));
        target_node
            .attributes
            .insert("potential_duplicate_of".to_string(), serde_json::Value::String(source.to_string()));
        target_node.attributes.insert("auto_corrected".to_string(), serde_json::Value::Bool(true));
        self.kg.backend().update_node(source_node).await?;
        self.kg.backend().update_node(target_node).await?;
        Ok(true)
    }

    pub async fn history(&self) -> Vec<CorrectionPassSummary> {
        self.history.lock().await.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::NoCategorySystem;
    use std::sync::Arc;
    use via_graph_backend::InMemoryGraphBackend;
    use via_kg_state::KgThresholds;

    async fn seeded_kg() -> Arc<KnowledgeGraphState> {
        let kg = Arc::new(KnowledgeGraphState::new(
            Arc::new(InMemoryGraphBackend::new()),
            KgThresholds::default(),
        ));
        kg.add_card("orphan", "lonely card", vec![1.0, 0.0]).await.unwrap();
        kg
    }

    #[tokio::test]
    async fn a_pass_over_a_single_orphan_with_no_match_leaves_it_orphaned() {
        let kg = seeded_kg().await;
        let job = SelfCorrectionJob::new(kg, Arc::new(NoCategorySystem));
        let summary = job.run_pass().await.unwrap();
        assert_eq!(summary.orphans_found, 1);
        assert_eq!(summary.orphans_linked, 0);
    }

    #[tokio::test]
    async fn an_orphan_with_a_qualifying_match_gets_auto_linked_as_parent_child() {
        let kg = seeded_kg().await;
        kg.add_card("twin", "lonely card twin", vec![0.99, 0.01]).await.unwrap();
        let job = SelfCorrectionJob::new(kg.clone(), Arc::new(NoCategorySystem));
        let summary = job.run_pass().await.unwrap();
        assert!(summary.orphans_linked > 0);
        let edges = kg.backend().edges_from("twin").await.unwrap();
        assert!(edges
            .iter()
            .any(|e| e.target == "orphan" && e.edge_type == via_graph_backend::EdgeType::ParentChild));
    }

    #[tokio::test]
    async fn history_accumulates_across_passes() {
        let kg = seeded_kg().await;
        let job = SelfCorrectionJob::new(kg, Arc::new(NoCategorySystem));
        job.run_pass().await.unwrap();
        job.run_pass().await.unwrap();
        let history = job.history().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].pass_number, 1);
        assert_eq!(history[1].pass_number, 2);
    }

    #[tokio::test]
    async fn uncategorized_count_is_capped() {
        let backend = Arc::new(InMemoryGraphBackend::new());
        let kg = Arc::new(KnowledgeGraphState::new(backend, KgThresholds::default()));
        for i in 0..30 {
            kg.add_card(&format!("c{i}"), "content", vec![1.0, 0.0]).await.unwrap();
        }
        let job = SelfCorrectionJob::with_caps(
            kg,
            Arc::new(NoCategorySystem),
            CorrectionCaps { uncategorized: 20, ..CorrectionCaps::default() },
        );
        let summary = job.run_pass().await.unwrap();
        assert_eq!(summary.uncategorized_found, 20);
        assert_eq!(summary.uncategorized_categorized, 0);
    }

    struct StubCategorizer;

    #[async_trait::async_trait]
    impl CategoryLookup for StubCategorizer {
        async fn classify(&self, _content: &str, _embedding: &[f32]) -> Option<String> {
            Some("Programming".to_string())
        }
    }

    #[tokio::test]
    async fn uncategorized_cards_are_assigned_and_marked_auto_corrected() {
        let backend = Arc::new(InMemoryGraphBackend::new());
        let kg = Arc::new(KnowledgeGraphState::new(backend, KgThresholds::default()));
        kg.add_card("c1", "content", vec![1.0, 0.0]).await.unwrap();
        let job = SelfCorrectionJob::new(kg.clone(), Arc::new(StubCategorizer));
        let summary = job.run_pass().await.unwrap();
        assert_eq!(summary.uncategorized_categorized, 1);
        let node = kg.backend().get_node("c1").await.unwrap().unwrap();
        assert_eq!(node.category.as_deref(), Some("Programming"));
        assert_eq!(node.attributes.get("auto_corrected").and_then(|v| v.as_bool()), Some(true));
    }

    #[tokio::test]
    async fn duplicate_pairs_are_tagged_on_both_sides_without_merging() {
        let backend = Arc::new(InMemoryGraphBackend::new());
        let kg = Arc::new(KnowledgeGraphState::new(backend, KgThresholds::default()));
        kg.add_card("a", "near duplicate content one", vec![1.0, 0.0]).await.unwrap();
        kg.add_card("b", "near duplicate content one", vec![1.0, 0.0]).await.unwrap();
        let job = SelfCorrectionJob::new(kg.clone(), Arc::new(NoCategorySystem));
        let summary = job.run_pass().await.unwrap();
        assert_eq!(summary.duplicates_tagged, 1);
        let a = kg.backend().get_node("a").await.unwrap().unwrap();
        let b = kg.backend().get_node("b").await.unwrap().unwrap();
        assert_eq!(a.attributes.get("potential_duplicate_of").and_then(|v| v.as_str()), Some("b"));
        assert_eq!(b.attributes.get("potential_duplicate_of").and_then(|v| v.as_str()), Some("a"));
        assert!(kg.backend().get_node("a").await.unwrap().is_some());
        assert!(kg.backend().get_node("b").await.unwrap().is_some());
    }
}
