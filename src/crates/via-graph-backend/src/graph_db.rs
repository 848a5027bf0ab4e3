//! External graph-database backend. Same [`crate::backend::GraphBackend`]
//! interface, implemented against secondary indexes on the `category`
//! attribute and the `Similar`-edge weight — but the actual database client
//! is an externally-implemented trait object, the same posture the teacher
//! takes with `ChatModel`: this crate documents the contract, a downstream
//! crate supplies the client.

use crate::error::Result;
use crate::model::{EdgeData, EdgeType, GraphStats, NodeData};
use async_trait::async_trait;
use std::sync::Arc;

/// Minimal client surface a graph database (e.g. a property-graph store)
/// must expose for [`GraphDbBackend`] to implement [`crate::backend::GraphBackend`]
/// against secondary indexes on `category` and the similarity weight.
#[async_trait]
pub trait GraphDbClient: Send + Sync {
    async fn upsert_node(&self, node: NodeData) -> Result<()>;
    async fn fetch_node(&self, id: &str) -> Result<Option<NodeData>>;
    async fn delete_node(&self, id: &str) -> Result<()>;
    async fn upsert_edge(&self, edge: EdgeData) -> Result<bool>;
    async fn delete_edge(&self, source: &str, target: &str, edge_type: EdgeType) -> Result<bool>;
    async fn edges_from(&self, id: &str) -> Result<Vec<EdgeData>>;
    async fn edges_to(&self, id: &str) -> Result<Vec<EdgeData>>;
    /// Query the secondary index on `category` for node ids.
    async fn nodes_by_category(&self, category: &str) -> Result<Vec<String>>;
    async fn list_node_ids(&self) -> Result<Vec<String>>;
    async fn stats(&self) -> Result<GraphStats>;
}

pub struct GraphDbBackend {
    client: Arc<dyn GraphDbClient>,
}

impl GraphDbBackend {
    pub fn new(client: Arc<dyn GraphDbClient>) -> Self {
        Self { client }
    }

    /// Exposes the secondary index the in-memory backend has no equivalent
    /// for — querying nodes by category directly rather than scanning.
    pub async fn nodes_by_category(&self, category: &str) -> Result<Vec<String>> {
        self.client.nodes_by_category(category).await
    }
}

#[async_trait]
impl crate::backend::GraphBackend for GraphDbBackend {
    async fn add_node(&self, node: NodeData) -> Result<()> {
        self.client.upsert_node(node).await
    }

    async fn get_node(&self, id: &str) -> Result<Option<NodeData>> {
        self.client.fetch_node(id).await
    }

    async fn update_node(&self, node: NodeData) -> Result<()> {
        self.client.upsert_node(node).await
    }

    async fn remove_node(&self, id: &str) -> Result<()> {
        self.client.delete_node(id).await
    }

    async fn add_edge(&self, edge: EdgeData) -> Result<bool> {
        self.client.upsert_edge(edge).await
    }

    async fn remove_edge(&self, source: &str, target: &str, edge_type: EdgeType) -> Result<bool> {
        self.client.delete_edge(source, target, edge_type).await
    }

    async fn edges_from(&self, id: &str) -> Result<Vec<EdgeData>> {
        self.client.edges_from(id).await
    }

    async fn edges_to(&self, id: &str) -> Result<Vec<EdgeData>> {
        self.client.edges_to(id).await
    }

    async fn find_similar_nodes(
        &self,
        id: &str,
        limit: usize,
        min_similarity: f64,
    ) -> Result<Vec<(String, f64)>> {
        let mut candidates: std::collections::HashMap<String, f64> = std::collections::HashMap::new();
        for e in self.client.edges_from(id).await? {
            if e.edge_type == EdgeType::Similar {
                candidates.insert(e.target, e.weight.unwrap_or(0.0));
            }
        }
        for e in self.client.edges_to(id).await? {
            if e.edge_type == EdgeType::Similar {
                candidates
                    .entry(e.source)
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
        let mut set: std::collections::HashSet<String> = std::collections::HashSet::new();
        set.extend(self.client.edges_from(id).await?.into_iter().map(|e| e.target));
        set.extend(self.client.edges_to(id).await?.into_iter().map(|e| e.source));
        Ok(set.into_iter().collect())
    }

    async fn shortest_path(&self, _source: &str, _target: &str) -> Result<Option<Vec<String>>> {
        // Graph databases typically expose a native path-query operator;
        // deferred to the injected client in a future iteration.
        Ok(None)
    }

    async fn subgraph(&self, ids: &[String]) -> Result<(Vec<NodeData>, Vec<EdgeData>)> {
        let mut nodes = Vec::new();
        for id in ids {
            if let Some(n) = self.client.fetch_node(id).await? {
                nodes.push(n);
            }
        }
        let id_set: std::collections::HashSet<&String> = ids.iter().collect();
        let mut edges = Vec::new();
        for id in ids {
            for e in self.client.edges_from(id).await? {
                if id_set.contains(&e.target) {
                    edges.push(e);
                }
            }
        }
        Ok((nodes, edges))
    }

    async fn stats(&self) -> Result<GraphStats> {
        self.client.stats().await
    }

    async fn persist(&self) -> Result<()> {
        // The graph database is its own durable store; nothing to snapshot.
        Ok(())
    }

    async fn load(&self) -> Result<()> {
        Ok(())
    }

    async fn node_count(&self) -> Result<usize> {
        Ok(self.client.stats().await?.node_count)
    }

    async fn list_node_ids(&self) -> Result<Vec<String>> {
        self.client.list_node_ids().await
    }
}
