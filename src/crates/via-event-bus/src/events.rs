//! The closed topic enum and payload shapes published on the bus
//! (spec.md §6 "Event bus topics").

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    CardCreated,
    CardUpdated,
    CardDeleted,
    ConnectionCreated,
    ProgressUpdate,
    OperationComplete,
    OperationFailed,
    OperationCancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardEventPayload {
    pub card_id: String,
    pub canvas_id: String,
    pub content: Option<String>,
    pub title: Option<String>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionEventPayload {
    pub source_id: String,
    pub target_id: String,
    pub connection_type: String,
    pub similarity_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEventPayload {
    pub operation_id: String,
    pub operation_type: String,
    pub step: String,
    pub progress: f64,
    pub message: String,
    pub cards_created: u64,
    pub estimated_remaining_secs: Option<f64>,
    pub can_cancel: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationEventPayload {
    pub operation_id: String,
    pub operation_type: String,
    pub cards_created: Vec<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    CardCreated(CardEventPayload),
    CardUpdated(CardEventPayload),
    CardDeleted(CardEventPayload),
    ConnectionCreated(ConnectionEventPayload),
    ProgressUpdate(ProgressEventPayload),
    OperationComplete(OperationEventPayload),
    OperationFailed(OperationEventPayload),
    OperationCancelled(OperationEventPayload),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::CardCreated(_) => Topic::CardCreated,
            Event::CardUpdated(_) => Topic::CardUpdated,
            Event::CardDeleted(_) => Topic::CardDeleted,
            Event::ConnectionCreated(_) => Topic::ConnectionCreated,
            Event::ProgressUpdate(_) => Topic::ProgressUpdate,
            Event::OperationComplete(_) => Topic::OperationComplete,
            Event::OperationFailed(_) => Topic::OperationFailed,
            Event::OperationCancelled(_) => Topic::OperationCancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_matches_variant() {
        let event = Event::CardDeleted(CardEventPayload {
            card_id: "c1".into(),
            canvas_id: "canvas-1".into(),
            content: None,
            title: None,
            metadata: None,
        });
        assert_eq!(event.topic(), Topic::CardDeleted);
    }
}
