//! Connection entity (spec.md §3). Directed, typed edge between two cards
//! in a single canvas; self-loops are forbidden by [`Connection::new`].

use crate::error::{DomainError, Result};
use crate::ids::{CardId, ConnectionId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionType {
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
pub struct Connection {
    pub id: ConnectionId,
    pub canvas_id: String,
    pub source_id: CardId,
    pub target_id: CardId,
    pub connection_type: ConnectionType,
    pub similarity_score: Option<f64>,
}

impl Connection {
    pub fn new(
        id: impl Into<ConnectionId>,
        canvas_id: impl Into<String>,
        source_id: impl Into<CardId>,
        target_id: impl Into<CardId>,
        connection_type: ConnectionType,
    ) -> Result<Self> {
        let source_id = source_id.into();
        let target_id = target_id.into();
        if source_id == target_id {
            return Err(DomainError::Validation(format!(
                "self-loop connection rejected for card {source_id}"
            )));
        }
        Ok(Self {
            id: id.into(),
            canvas_id: canvas_id.into(),
            source_id,
            target_id,
            connection_type,
            similarity_score: None,
        })
    }

    pub fn with_similarity(mut self, score: f64) -> Self {
        self.similarity_score = Some(score.clamp(0.0, 1.0));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_loop_is_rejected() {
        let result = Connection::new("e1", "canvas-1", "c1", "c1", ConnectionType::Related);
        assert!(result.is_err());
    }

    #[test]
    fn similarity_score_is_clamped_to_unit_interval() {
        let conn = Connection::new("e1", "canvas-1", "c1", "c2", ConnectionType::Similar)
            .unwrap()
            .with_similarity(1.5);
        assert_eq!(conn.similarity_score, Some(1.0));
    }
}
