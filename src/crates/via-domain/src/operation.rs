//! Operation record (spec.md §3, §4.8). `OperationState` is the discrete
//! lifecycle distinct from the continuous `progress: f64`, confirmed from
//! the original `checkpoint_manager.py` (`CheckpointRecord` carries both).

use crate::ids::{CardId, OperationId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationState {
    InProgress,
    Completed,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRecord {
    pub operation_id: OperationId,
    pub operation_type: String,
    pub canvas_id: Option<String>,
    pub session_id: Option<String>,
    pub current_step: String,
    pub total_steps: Option<usize>,
    pub progress: f64,
    pub message: String,
    pub cards_created: Vec<CardId>,
    pub state: OperationState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_cancelled: bool,
    /// Opaque JSON blob, owned by whatever tool started the operation.
    pub checkpoint: Option<serde_json::Value>,
}

impl OperationRecord {
    pub fn new(operation_id: OperationId, operation_type: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            operation_id,
            operation_type: operation_type.into(),
            canvas_id: None,
            session_id: None,
            current_step: "started".to_string(),
            total_steps: None,
            progress: 0.0,
            message: String::new(),
            cards_created: Vec::new(),
            state: OperationState::InProgress,
            created_at: now,
            updated_at: now,
            is_cancelled: false,
            checkpoint: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self.state, OperationState::InProgress)
    }

    pub fn is_incomplete(&self) -> bool {
        self.progress < 1.0 && !self.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_operation_starts_in_progress_and_incomplete() {
        let op = OperationRecord::new(OperationId::from("op-1"), "url_extraction", Utc::now());
        assert_eq!(op.state, OperationState::InProgress);
        assert!(op.is_incomplete());
        assert!(!op.is_terminal());
    }
}
