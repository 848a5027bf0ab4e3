//! Node/edge arena types. Higher layers refer to nodes only by id — the
//! "arena-plus-index" strategy from the specification's design notes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeType {
    ParentChild,
    Related,
    Reference,
    Similar,
    Mentions,
    Challenges,
    #[serde(rename = "default")]
    Default,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeData {
    pub id: String,
    pub content: String,
    pub embedding: Vec<f32>,
    pub category: Option<String>,
    pub attributes: HashMap<String, serde_json::Value>,
}

impl NodeData {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            embedding: Vec::new(),
            category: None,
            attributes: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeData {
    pub source: String,
    pub target: String,
    pub edge_type: EdgeType,
    /// Similarity weight in [0, 1], meaningful for `EdgeType::Similar` edges.
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub edges_by_type: HashMap<String, usize>,
}
