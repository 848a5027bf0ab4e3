//! Drains a [`via_orchestrator::AgentEvent`] channel and republishes it as
//! the wire-format event sequence (spec.md §4.11): `init` first, zero or
//! more of `response`/`reasoning`/`tool_use`/`tool_result`/`progress`, then
//! exactly one of `complete`/`error`. A `tool_use` whose id was already seen
//! this stream is dropped rather than re-emitted (`toolUseId` uniqueness);
//! the model resending a call with the same id is treated as the model's
//! mistake, not a reason to confuse the client.
//!
//! A client disconnect is modeled the same way `via_event_bus::EventBus`
//! models a dead subscriber: the outbound `send` simply starts failing, and
//! this loop stops forwarding the moment it does — no separate cancellation
//! signal is needed.

use crate::events::{
    CompletePayload, ErrorPayload, ProgressPayload, ReasoningPayload, ResponsePayload, ToolResultPayload,
    ToolUsePayload, WireEvent,
};
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::mpsc;
use via_orchestrator::AgentEvent;

#[derive(Debug, Clone)]
pub struct StreamProcessorConfig {
    /// Cooperative yield after every `tool_use` emission, giving the client
    /// a chance to render before the next event. Zero disables the delay
    /// (tests should do this; production defaults it on).
    pub tool_use_emit_delay: Duration,
}

impl Default for StreamProcessorConfig {
    fn default() -> Self {
        Self { tool_use_emit_delay: Duration::from_millis(100) }
    }
}

/// Runs the normalization loop to completion. Returns once a terminal event
/// has been forwarded, the source channel closed without one (the agent
/// loop task died without reporting), or the sink's receiver was dropped
/// (client disconnected).
pub async fn process_stream(
    mut agent_events: mpsc::UnboundedReceiver<AgentEvent>,
    wire_events: mpsc::UnboundedSender<WireEvent>,
    config: StreamProcessorConfig,
) {
    if wire_events.send(WireEvent::Init).is_err() {
        return;
    }

    let mut seen_tool_uses: HashSet<String> = HashSet::new();

    while let Some(event) = agent_events.recv().await {
        let wire_event = match event {
            AgentEvent::Response(text) => WireEvent::Response(ResponsePayload { data: text }),
            AgentEvent::Reasoning(text) => WireEvent::Reasoning(ReasoningPayload { text }),
            AgentEvent::ToolUse { id, name, args } => {
                if !seen_tool_uses.insert(id.clone()) {
                    tracing::warn!(tool_use_id = %id, "duplicate tool_use id suppressed");
                    continue;
                }
                if wire_events.send(WireEvent::ToolUse(ToolUsePayload { tool_use_id: id, name, input: args })).is_err() {
                    return;
                }
                if !config.tool_use_emit_delay.is_zero() {
                    tokio::time::sleep(config.tool_use_emit_delay).await;
                }
                continue;
            }
            AgentEvent::ToolResult { id, output, .. } => {
                WireEvent::ToolResult(ToolResultPayload { tool_use_id: id, result: output })
            }
            AgentEvent::Progress(p) => WireEvent::Progress(ProgressPayload {
                operation_id: p.operation_id,
                operation_type: p.operation_type,
                step: p.step,
                progress: p.progress,
                message: p.message,
                cards_created: p.cards_created,
                estimated_time: p.estimated_remaining_secs,
                can_cancel: p.can_cancel,
            }),
            AgentEvent::Complete(result) => {
                let _ = wire_events.send(WireEvent::Complete(CompletePayload { result, images: Vec::new() }));
                return;
            }
            AgentEvent::Error(message) => {
                let _ = wire_events.send(WireEvent::Error(ErrorPayload { message }));
                return;
            }
        };

        if wire_events.send(wire_event).is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use via_event_bus::events::ProgressEventPayload;

    async fn drain(rx: &mut mpsc::UnboundedReceiver<WireEvent>) -> Vec<WireEvent> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            out.push(event);
        }
        out
    }

    #[tokio::test]
    async fn emits_init_first_and_exactly_one_terminal_event() {
        let (agent_tx, agent_rx) = mpsc::unbounded_channel();
        let (wire_tx, mut wire_rx) = mpsc::unbounded_channel();

        agent_tx.send(AgentEvent::Response("hello".into())).unwrap();
        agent_tx.send(AgentEvent::Complete(serde_json::json!({"ok": true}))).unwrap();
        drop(agent_tx);

        process_stream(agent_rx, wire_tx, StreamProcessorConfig { tool_use_emit_delay: Duration::ZERO }).await;

        let events = drain(&mut wire_rx).await;
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].kind(), "init");
        assert_eq!(events[1].kind(), "response");
        assert!(events.last().unwrap().is_terminal());
    }

    #[tokio::test]
    async fn duplicate_tool_use_ids_are_suppressed() {
        let (agent_tx, agent_rx) = mpsc::unbounded_channel();
        let (wire_tx, mut wire_rx) = mpsc::unbounded_channel();

        let make_call = || AgentEvent::ToolUse { id: "t1".into(), name: "extract_url_content".into(), args: serde_json::json!({}) };
        agent_tx.send(make_call()).unwrap();
        agent_tx.send(make_call()).unwrap();
        agent_tx.send(AgentEvent::Complete(serde_json::json!({}))).unwrap();
        drop(agent_tx);

        process_stream(agent_rx, wire_tx, StreamProcessorConfig { tool_use_emit_delay: Duration::ZERO }).await;

        let events = drain(&mut wire_rx).await;
        let tool_use_count = events.iter().filter(|e| e.kind() == "tool_use").count();
        assert_eq!(tool_use_count, 1);
    }

    #[tokio::test]
    async fn progress_event_fields_carry_through() {
        let (agent_tx, agent_rx) = mpsc::unbounded_channel();
        let (wire_tx, mut wire_rx) = mpsc::unbounded_channel();

        agent_tx
            .send(AgentEvent::Progress(ProgressEventPayload {
                operation_id: "op1".into(),
                operation_type: "extraction".into(),
                step: "fetching".into(),
                progress: 0.5,
                message: "halfway".into(),
                cards_created: 2,
                estimated_remaining_secs: Some(3.0),
                can_cancel: true,
            }))
            .unwrap();
        agent_tx.send(AgentEvent::Complete(serde_json::json!({}))).unwrap();
        drop(agent_tx);

        process_stream(agent_rx, wire_tx, StreamProcessorConfig { tool_use_emit_delay: Duration::ZERO }).await;

        let events = drain(&mut wire_rx).await;
        let progress = events.iter().find(|e| e.kind() == "progress").unwrap();
        assert_eq!(progress.payload()["operation_id"], "op1");
        assert_eq!(progress.payload()["estimated_time"], 3.0);
    }
}
