//! The eight wire event kinds spec.md §4.11 names, and their payload
//! contracts.

use crate::wire::to_wire_value;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct ResponsePayload {
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReasoningPayload {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolUsePayload {
    #[serde(rename = "toolUseId")]
    pub tool_use_id: String,
    pub name: String,
    pub input: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolResultPayload {
    #[serde(rename = "toolUseId")]
    pub tool_use_id: String,
    pub result: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressPayload {
    pub operation_id: String,
    pub operation_type: String,
    pub step: String,
    pub progress: f64,
    pub message: String,
    pub cards_created: u64,
    pub estimated_time: Option<f64>,
    pub can_cancel: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletePayload {
    pub result: Value,
    pub images: Vec<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub message: String,
}

/// A single named event in the chat-streaming response: a `kind` plus a
/// JSON object, matching spec.md §4.11's event table exactly.
#[derive(Debug, Clone)]
pub enum WireEvent {
    Init,
    Response(ResponsePayload),
    Reasoning(ReasoningPayload),
    ToolUse(ToolUsePayload),
    ToolResult(ToolResultPayload),
    Progress(ProgressPayload),
    Complete(CompletePayload),
    Error(ErrorPayload),
}

impl WireEvent {
    /// Whether this kind terminates the stream grammar
    /// (`init (response|reasoning|tool_use|tool_result|progress)* (complete|error)`).
    pub fn is_terminal(&self) -> bool {
        matches!(self, WireEvent::Complete(_) | WireEvent::Error(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            WireEvent::Init => "init",
            WireEvent::Response(_) => "response",
            WireEvent::Reasoning(_) => "reasoning",
            WireEvent::ToolUse(_) => "tool_use",
            WireEvent::ToolResult(_) => "tool_result",
            WireEvent::Progress(_) => "progress",
            WireEvent::Complete(_) => "complete",
            WireEvent::Error(_) => "error",
        }
    }

    /// The event's JSON payload, `null` for `init` (it carries no data).
    pub fn payload(&self) -> Value {
        match self {
            WireEvent::Init => Value::Null,
            WireEvent::Response(p) => to_wire_value(p),
            WireEvent::Reasoning(p) => to_wire_value(p),
            WireEvent::ToolUse(p) => to_wire_value(p),
            WireEvent::ToolResult(p) => to_wire_value(p),
            WireEvent::Progress(p) => to_wire_value(p),
            WireEvent::Complete(p) => to_wire_value(p),
            WireEvent::Error(p) => to_wire_value(p),
        }
    }

    /// `{"kind": ..., "payload": ...}`, the shape a transport (SSE, a
    /// websocket frame, ...) serializes directly onto the wire.
    pub fn to_json(&self) -> Value {
        serde_json::json!({ "kind": self.kind(), "payload": self.payload() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_and_error_are_terminal() {
        assert!(WireEvent::Complete(CompletePayload { result: Value::Null, images: vec![] }).is_terminal());
        assert!(WireEvent::Error(ErrorPayload { message: "x".into() }).is_terminal());
        assert!(!WireEvent::Init.is_terminal());
    }

    #[test]
    fn tool_use_payload_uses_camel_case_id() {
        let event = WireEvent::ToolUse(ToolUsePayload {
            tool_use_id: "t1".into(),
            name: "extract_url_content".into(),
            input: serde_json::json!({ "url": "https://example.com" }),
        });
        assert_eq!(event.payload()["toolUseId"], "t1");
    }
}
