//! The tool-call loop spec.md §4.10 describes: the LLM is given a tool
//! list, and whenever it emits tool calls the runtime executes them,
//! appends the results to the transcript, and resumes the LLM — bounded at
//! a maximum number of iterations (default 10) to prevent infinite loops.
//! Used both for the top-level orchestrator (tools = the four specialists)
//! and, nested, inside each specialist (tools = that specialist's own
//! tool set) — the same primitive at two levels of composition, grounded
//! on `via_graph_core::tool::ToolRegistry::execute_tool_calls` rather than
//! the heavier `via_agents_prebuilt::agents::react` `StateGraph` machinery.

use crate::error::{OrchestratorError, Result};
use crate::events::{emit, AgentEvent, AgentEventSink};
use serde_json::{json, Value};
use std::sync::Arc;
use via_graph_core::llm::{ChatModel, ChatRequest};
use via_graph_core::messages::Message;
use via_graph_core::tool::{Tool, ToolCall as AgentToolCall, ToolOutput, ToolRegistry};

pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Final outcome of a completed loop: the model's last natural-language
/// reply plus the full transcript (system/human/assistant/tool messages),
/// so a caller can fold it back into session history.
pub struct LoopOutcome {
    pub final_text: String,
    pub transcript: Vec<Message>,
}

pub async fn run_tool_loop(
    model: &Arc<dyn ChatModel>,
    tools: Vec<Tool>,
    system_prompt: Option<&str>,
    mut transcript: Vec<Message>,
    max_iterations: usize,
    sink: Option<&AgentEventSink>,
) -> Result<LoopOutcome> {
    if let Some(prompt) = system_prompt {
        transcript.insert(0, Message::system(prompt));
    }

    let tool_defs: Vec<_> = tools
        .iter()
        .map(|t| via_graph_core::llm::ToolDefinition::new(t.name.clone(), t.description.clone()).with_parameters(t.input_schema.clone()))
        .collect();

    let mut registry = ToolRegistry::new();
    for tool in tools {
        registry.register(tool);
    }

    for _ in 0..max_iterations {
        let request = ChatRequest::new(transcript.clone()).with_tools(tool_defs.clone());
        let response = model.chat(request).await.map_err(|err| OrchestratorError::Model(err.to_string()))?;

        if let Some(reasoning) = &response.reasoning {
            if let Some(sink) = sink {
                emit(sink, AgentEvent::Reasoning(reasoning.content.clone()));
            }
        }

        let assistant_message = response.message.clone();
        let tool_calls = assistant_message.tool_calls.clone().unwrap_or_default();
        transcript.push(assistant_message.clone());

        if tool_calls.is_empty() {
            let text = assistant_message.text().unwrap_or_default().to_string();
            if let Some(sink) = sink {
                emit(sink, AgentEvent::Response(text.clone()));
            }
            return Ok(LoopOutcome { final_text: text, transcript });
        }

        if let Some(sink) = sink {
            for call in &tool_calls {
                emit(
                    sink,
                    AgentEvent::ToolUse { id: call.id.clone(), name: call.name.clone(), args: call.arguments.clone() },
                );
            }
        }

        let agent_calls: Vec<AgentToolCall> =
            tool_calls.iter().map(|c| AgentToolCall { id: c.id.clone(), name: c.name.clone(), args: c.arguments.clone() }).collect();
        let results = registry.execute_tool_calls(&agent_calls, None).await;

        for result in results {
            let (output, is_error): (Value, bool) = match result.output {
                ToolOutput::Success { content } => (content, false),
                ToolOutput::Error { error } => (json!({ "error": error }), true),
            };
            if let Some(sink) = sink {
                emit(
                    sink,
                    AgentEvent::ToolResult { id: result.id.clone(), name: result.name.clone(), output: output.clone(), is_error },
                );
            }
            transcript.push(Message::tool(output.to_string(), result.id));
        }
    }

    Err(OrchestratorError::MaxIterationsExceeded(max_iterations))
}
