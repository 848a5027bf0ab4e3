//! Internal agent-turn events, consumed by `via-stream-processor` and
//! normalized into the wire event sequence (spec.md §4.11). Keeping this
//! enum separate from the wire format mirrors how
//! `via_graph_core::stream::StreamEvent` is generic over graph execution
//! while a caller decides how to render it.

use serde_json::Value;

#[derive(Debug, Clone)]
pub enum AgentEvent {
    /// A chunk (or, for non-streaming specialists, the whole) of the
    /// assistant's natural-language reply.
    Response(String),
    /// Extracted reasoning/thinking content, when the model separates it.
    Reasoning(String),
    /// The runtime is about to execute a tool call.
    ToolUse { id: String, name: String, args: Value },
    /// A tool call finished, successfully or not.
    ToolResult { id: String, name: String, output: Value, is_error: bool },
    /// Progress on a long-running operation nested inside this turn.
    Progress(via_event_bus::events::ProgressEventPayload),
    /// The turn finished successfully; `result` is the final payload.
    Complete(Value),
    /// The turn failed.
    Error(String),
}

/// Fire-and-forget sink the agent loop publishes [`AgentEvent`]s to. An
/// unbounded channel, same posture as `via_event_bus::EventBus::emit`: the
/// agent loop never blocks on a slow or absent consumer.
pub type AgentEventSink = tokio::sync::mpsc::UnboundedSender<AgentEvent>;

/// Sends `event`, swallowing a closed receiver (the stream consumer went
/// away, e.g. the client disconnected) rather than failing the turn over it.
pub fn emit(sink: &AgentEventSink, event: AgentEvent) {
    if sink.send(event).is_err() {
        tracing::debug!("agent event sink closed, dropping event");
    }
}
