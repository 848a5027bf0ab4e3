//! `GraphBackend` — the capability set spec.md §4.2 requires: node CRUD,
//! edge CRUD, pre-computed similarity query, neighborhood query, path
//! query, subgraph extraction, bulk persist/load, stats. `async_trait`,
//! `Send + Sync`, analogous to `via_checkpoint::traits::CheckpointSaver`.

use crate::error::Result;
use crate::model::{EdgeData, EdgeType, GraphStats, NodeData};
use async_trait::async_trait;

#[async_trait]
pub trait GraphBackend: Send + Sync {
    async fn add_node(&self, node: NodeData) -> Result<()>;
    async fn get_node(&self, id: &str) -> Result<Option<NodeData>>;
    async fn update_node(&self, node: NodeData) -> Result<()>;
    /// Deletes the node and every edge incident to it (spec.md §3 invariant:
    /// "removing a node removes its incident edges").
    async fn remove_node(&self, id: &str) -> Result<()>;

    /// Fails silently (returns `Ok(false)`, logs) if either endpoint is
    /// missing. Duplicate `(source, target)` of the same `edge_type` upserts.
    async fn add_edge(&self, edge: EdgeData) -> Result<bool>;
    async fn remove_edge(&self, source: &str, target: &str, edge_type: EdgeType) -> Result<bool>;
    async fn edges_from(&self, id: &str) -> Result<Vec<EdgeData>>;
    async fn edges_to(&self, id: &str) -> Result<Vec<EdgeData>>;

    /// Combines both out- and in-neighbors across `Similar` edges, sorted by
    /// score descending, ties broken by smallest node id.
    async fn find_similar_nodes(
        &self,
        id: &str,
        limit: usize,
        min_similarity: f64,
    ) -> Result<Vec<(String, f64)>>;

    async fn neighbors(&self, id: &str) -> Result<Vec<String>>;

    /// Unweighted shortest path via BFS, `None` if unreachable.
    async fn shortest_path(&self, source: &str, target: &str) -> Result<Option<Vec<String>>>;

    /// Extracts the induced subgraph over `ids` (edges with both endpoints
    /// present).
    async fn subgraph(&self, ids: &[String]) -> Result<(Vec<NodeData>, Vec<EdgeData>)>;

    async fn stats(&self) -> Result<GraphStats>;

    /// All node ids currently stored. Used by higher layers (e.g. `kg-state`)
    /// that must brute-force compare a new embedding against the full node
    /// set before any `Similar` edges exist to read.
    async fn list_node_ids(&self) -> Result<Vec<String>>;

    /// Full-graph snapshot, atomically replaced (spec.md §6 persisted state
    /// layout).
    async fn persist(&self) -> Result<()>;
    async fn load(&self) -> Result<()>;
    async fn node_count(&self) -> Result<usize>;
}
