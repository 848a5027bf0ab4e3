//! In-memory backend: `HashMap<NodeId, NodeData>` plus per-node adjacency
//! lists guarded by `tokio::sync::RwLock`, matching
//! `via_checkpoint::memory::InMemoryCheckpointSaver`'s
//! `Arc<RwLock<HashMap<...>>>` shape. Suitable up to ~10k nodes per
//! spec.md §4.2. Persistence is a periodic/on-demand full-graph snapshot to
//! a single file, single-writer / last-write-wins.

use crate::error::{GraphBackendError, Result};
use crate::model::{EdgeData, EdgeType, GraphStats, NodeData};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default, Clone, serde::Serialize, serde::Deserialize)]
struct GraphSnapshot {
    nodes: HashMap<String, NodeData>,
    edges: Vec<EdgeData>,
}

struct Inner {
    nodes: HashMap<String, NodeData>,
    out_edges: HashMap<String, Vec<EdgeData>>,
    in_edges: HashMap<String, Vec<EdgeData>>,
}

impl Inner {
    fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            out_edges: HashMap::new(),
            in_edges: HashMap::new(),
        }
    }

    fn insert_edge(&mut self, edge: EdgeData) {
        let out = self.out_edges.entry(edge.source.clone()).or_default();
        if let Some(existing) = out
            .iter_mut()
            .find(|e| e.target == edge.target && e.edge_type == edge.edge_type)
        {
            *existing = edge.clone();
        } else {
            out.push(edge.clone());
        }
        let inn = self.in_edges.entry(edge.target.clone()).or_default();
        if let Some(existing) = inn
            .iter_mut()
            .find(|e| e.source == edge.source && e.edge_type == edge.edge_type)
        {
            *existing = edge;
        } else {
            inn.push(edge);
        }
    }

    fn remove_node_edges(&mut self, id: &str) {
        if let Some(outs) = self.out_edges.remove(id) {
            for e in outs {
                if let Some(inn) = self.in_edges.get_mut(&e.target) {
                    inn.retain(|x| x.source != id);
                }
            }
        }
        if let Some(ins) = self.in_edges.remove(id) {
            for e in ins {
                if let Some(out) = self.out_edges.get_mut(&e.source) {
                    out.retain(|x| x.target != id);
                }
            }
        }
    }
}

pub struct InMemoryGraphBackend {
    inner: Arc<RwLock<Inner>>,
    snapshot_path: Option<PathBuf>,
}

impl InMemoryGraphBackend {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::new())),
            snapshot_path: None,
        }
    }

    pub fn with_snapshot_path(path: impl AsRef<Path>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::new())),
            snapshot_path: Some(path.as_ref().to_path_buf()),
        }
    }
}

impl Default for InMemoryGraphBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl crate::backend::GraphBackend for InMemoryGraphBackend {
    async fn add_node(&self, node: NodeData) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    async fn get_node(&self, id: &str) -> Result<Option<NodeData>> {
        Ok(self.inner.read().await.nodes.get(id).cloned())
    }

    async fn update_node(&self, node: NodeData) -> Result<()> {
        let mut inner = self.inner.write().await;
        if !inner.nodes.contains_key(&node.id) {
            return Err(GraphBackendError::NodeNotFound(node.id));
        }
        inner.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    async fn remove_node(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.nodes.remove(id);
        inner.remove_node_edges(id);
        Ok(())
    }

    async fn add_edge(&self, edge: EdgeData) -> Result<bool> {
        let mut inner = self.inner.write().await;
        if !inner.nodes.contains_key(&edge.source) || !inner.nodes.contains_key(&edge.target) {
            tracing::warn!(source = %edge.source, target = %edge.target, "add_edge: missing endpoint, skipping");
            return Ok(false);
        }
        inner.insert_edge(edge);
        Ok(true)
    }

    async fn remove_edge(&self, source: &str, target: &str, edge_type: EdgeType) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let mut removed = false;
        if let Some(out) = inner.out_edges.get_mut(source) {
            let before = out.len();
            out.retain(|e| !(e.target == target && e.edge_type == edge_type));
            removed |= out.len() != before;
        }
        if let Some(inn) = inner.in_edges.get_mut(target) {
            inn.retain(|e| !(e.source == source && e.edge_type == edge_type));
        }
        Ok(removed)
    }

    async fn edges_from(&self, id: &str) -> Result<Vec<EdgeData>> {
        Ok(self.inner.read().await.out_edges.get(id).cloned().unwrap_or_default())
    }

    async fn edges_to(&self, id: &str) -> Result<Vec<EdgeData>> {
        Ok(self.inner.read().await.in_edges.get(id).cloned().unwrap_or_default())
    }

    async fn find_similar_nodes(
        &self,
        id: &str,
        limit: usize,
        min_similarity: f64,
    ) -> Result<Vec<(String, f64)>> {
        let inner = self.inner.read().await;
        let mut candidates: HashMap<String, f64> = HashMap::new();
        if let Some(out) = inner.out_edges.get(id) {
            for e in out.iter().filter(|e| e.edge_type == EdgeType::Similar) {
                candidates.insert(e.target.clone(), e.weight.unwrap_or(0.0));
            }
        }
        if let Some(inn) = inner.in_edges.get(id) {
            for e in inn.iter().filter(|e| e.edge_type == EdgeType::Similar) {
                candidates
                    .entry(e.source.clone())
                    .and_modify(|w| *w = w.max(e.weight.unwrap_or(0.0)))
                    .or_insert(e.weight.unwrap_or(0.0));
            }
        }
        let mut results: Vec<(String, f64)> = candidates
            .into_iter()
            .filter(|(_, score)| *score >= min_similarity)
            .collect();
        results.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        results.truncate(limit);
        Ok(results)
    }

    async fn neighbors(&self, id: &str) -> Result<Vec<String>> {
        let inner = self.inner.read().await;
        let mut set: HashSet<String> = HashSet::new();
        if let Some(out) = inner.out_edges.get(id) {
            set.extend(out.iter().map(|e| e.target.clone()));
        }
        if let Some(inn) = inner.in_edges.get(id) {
            set.extend(inn.iter().map(|e| e.source.clone()));
        }
        Ok(set.into_iter().collect())
    }

    async fn shortest_path(&self, source: &str, target: &str) -> Result<Option<Vec<String>>> {
        let inner = self.inner.read().await;
        if source == target {
            return Ok(Some(vec![source.to_string()]));
        }
        let mut visited: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<String> = VecDeque::new();
        let mut parent: HashMap<String, String> = HashMap::new();
        queue.push_back(source.to_string());
        visited.insert(source.to_string());
        while let Some(current) = queue.pop_front() {
            let mut next_nodes: Vec<String> = Vec::new();
            if let Some(out) = inner.out_edges.get(&current) {
                next_nodes.extend(out.iter().map(|e| e.target.clone()));
            }
            if let Some(inn) = inner.in_edges.get(&current) {
                next_nodes.extend(inn.iter().map(|e| e.source.clone()));
            }
            for next in next_nodes {
                if visited.insert(next.clone()) {
                    parent.insert(next.clone(), current.clone());
                    if next == target {
                        let mut path = vec![next.clone()];
                        let mut cursor = next;
                        while let Some(p) = parent.get(&cursor) {
                            path.push(p.clone());
                            cursor = p.clone();
                        }
                        path.reverse();
                        return Ok(Some(path));
                    }
                    queue.push_back(next);
                }
            }
        }
        Ok(None)
    }

    async fn subgraph(&self, ids: &[String]) -> Result<(Vec<NodeData>, Vec<EdgeData>)> {
        let inner = self.inner.read().await;
        let id_set: HashSet<&String> = ids.iter().collect();
        let nodes: Vec<NodeData> = ids.iter().filter_map(|id| inner.nodes.get(id).cloned()).collect();
        let mut edges = Vec::new();
        for id in ids {
            if let Some(out) = inner.out_edges.get(id) {
                for e in out {
                    if id_set.contains(&e.target) {
                        edges.push(e.clone());
                    }
                }
            }
        }
        Ok((nodes, edges))
    }

    async fn stats(&self) -> Result<GraphStats> {
        let inner = self.inner.read().await;
        let mut edges_by_type: HashMap<String, usize> = HashMap::new();
        let mut edge_count = 0;
        for edges in inner.out_edges.values() {
            for e in edges {
                edge_count += 1;
                *edges_by_type.entry(format!("{:?}", e.edge_type)).or_insert(0) += 1;
            }
        }
        Ok(GraphStats {
            node_count: inner.nodes.len(),
            edge_count,
            edges_by_type,
        })
    }

    async fn persist(&self) -> Result<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        let inner = self.inner.read().await;
        let mut edges = Vec::new();
        for e in inner.out_edges.values().flatten() {
            edges.push(e.clone());
        }
        let snapshot = GraphSnapshot {
            nodes: inner.nodes.clone(),
            edges,
        };
        let bytes = bincode::serialize(&snapshot)?;
        let tmp_path = path.with_extension("tmp");
        tokio::fs::write(&tmp_path, &bytes).await?;
        tokio::fs::rename(&tmp_path, path).await?;
        Ok(())
    }

    async fn load(&self) -> Result<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        if !path.exists() {
            return Ok(());
        }
        let bytes = tokio::fs::read(path).await?;
        let snapshot: GraphSnapshot = bincode::deserialize(&bytes)?;
        let mut inner = self.inner.write().await;
        inner.nodes = snapshot.nodes;
        inner.out_edges.clear();
        inner.in_edges.clear();
        for edge in snapshot.edges {
            inner.insert_edge(edge);
        }
        Ok(())
    }

    async fn node_count(&self) -> Result<usize> {
        Ok(self.inner.read().await.nodes.len())
    }

    async fn list_node_ids(&self) -> Result<Vec<String>> {
        Ok(self.inner.read().await.nodes.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::GraphBackend;

    fn node(id: &str) -> NodeData {
        NodeData::new(id, format!("content for {id}"))
    }

    #[tokio::test]
    async fn add_edge_fails_silently_when_endpoint_missing() {
        let backend = InMemoryGraphBackend::new();
        backend.add_node(node("a")).await.unwrap();
        let ok = backend
            .add_edge(EdgeData {
                source: "a".into(),
                target: "missing".into(),
                edge_type: EdgeType::Similar,
                weight: Some(0.9),
            })
            .await
            .unwrap();
        assert!(!ok);
    }

    #[tokio::test]
    async fn remove_node_removes_incident_edges() {
        let backend = InMemoryGraphBackend::new();
        backend.add_node(node("a")).await.unwrap();
        backend.add_node(node("b")).await.unwrap();
        backend
            .add_edge(EdgeData {
                source: "a".into(),
                target: "b".into(),
                edge_type: EdgeType::Similar,
                weight: Some(0.5),
            })
            .await
            .unwrap();
        backend.remove_node("a").await.unwrap();
        assert!(backend.edges_to("b").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_similar_nodes_combines_out_and_in_edges_sorted_desc() {
        let backend = InMemoryGraphBackend::new();
        for id in ["a", "b", "c"] {
            backend.add_node(node(id)).await.unwrap();
        }
        backend
            .add_edge(EdgeData { source: "a".into(), target: "b".into(), edge_type: EdgeType::Similar, weight: Some(0.4) })
            .await
            .unwrap();
        backend
            .add_edge(EdgeData { source: "c".into(), target: "a".into(), edge_type: EdgeType::Similar, weight: Some(0.8) })
            .await
            .unwrap();
        let similar = backend.find_similar_nodes("a", 10, 0.1).await.unwrap();
        assert_eq!(similar, vec![("c".to_string(), 0.8), ("b".to_string(), 0.4)]);
    }

    #[tokio::test]
    async fn find_similar_nodes_on_single_node_graph_is_empty() {
        let backend = InMemoryGraphBackend::new();
        backend.add_node(node("a")).await.unwrap();
        assert!(backend.find_similar_nodes("a", 10, 0.0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips_nodes_and_edges() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.bin");
        let backend = InMemoryGraphBackend::with_snapshot_path(&path);
        backend.add_node(node("a")).await.unwrap();
        backend.add_node(node("b")).await.unwrap();
        backend
            .add_edge(EdgeData { source: "a".into(), target: "b".into(), edge_type: EdgeType::Similar, weight: Some(0.6) })
            .await
            .unwrap();
        backend.persist().await.unwrap();

        let reloaded = InMemoryGraphBackend::with_snapshot_path(&path);
        reloaded.load().await.unwrap();
        assert_eq!(reloaded.node_count().await.unwrap(), 2);
        assert_eq!(reloaded.edges_from("a").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn shortest_path_finds_two_hop_route() {
        let backend = InMemoryGraphBackend::new();
        for id in ["a", "b", "c"] {
            backend.add_node(node(id)).await.unwrap();
        }
        backend
            .add_edge(EdgeData { source: "a".into(), target: "b".into(), edge_type: EdgeType::Related, weight: None })
            .await
            .unwrap();
        backend
            .add_edge(EdgeData { source: "b".into(), target: "c".into(), edge_type: EdgeType::Related, weight: None })
            .await
            .unwrap();
        let path = backend.shortest_path("a", "c").await.unwrap().unwrap();
        assert_eq!(path, vec!["a".to_string(), "b".to_string(), "c".to_string()]);
    }
}
