//! Small helpers shared by every tool module: wrapping a plain async
//! closure as a [`ToolExecutor`] and pulling typed fields out of the
//! JSON `args` object a tool call carries (spec.md §4.10/§4.11).

use crate::error::{Result, ToolsError};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use via_graph_core::tool::{ToolExecutor, ToolFuture, ToolResult};

/// Adapts `Fn(Value) -> impl Future<Output = Result<Value>>` into the
/// `Arc<dyn Fn(Value, Option<ToolRuntime>) -> ToolFuture>` shape
/// `via_graph_core::tool::Tool` requires. None of the tools in this crate
/// need `ToolRuntime` (no tool streams its own progress events), so the
/// runtime parameter is simply dropped.
pub fn executor<F, Fut>(f: F) -> ToolExecutor
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    Arc::new(move |args, _runtime| -> ToolFuture {
        let fut = f(args);
        Box::pin(async move { fut.await.map_err(Into::into) as ToolResult })
    })
}

pub fn required_str<'a>(args: &'a Value, name: &'static str) -> Result<&'a str> {
    args.get(name).and_then(Value::as_str).ok_or(ToolsError::MissingArgument(name))
}

pub fn optional_str<'a>(args: &'a Value, name: &str) -> Option<&'a str> {
    args.get(name).and_then(Value::as_str)
}

pub fn optional_u64(args: &Value, name: &str) -> Option<u64> {
    args.get(name).and_then(Value::as_u64)
}

pub fn optional_f64(args: &Value, name: &str) -> Option<f64> {
    args.get(name).and_then(Value::as_f64)
}

pub fn optional_bool(args: &Value, name: &str) -> Option<bool> {
    args.get(name).and_then(Value::as_bool)
}

/// Convenience for tools that just need the model's plain text reply to a
/// single user-role prompt (every learning-assistant helper in
/// `learning.rs` follows this shape).
pub async fn ask_model(model: &Arc<dyn via_graph_core::llm::ChatModel>, prompt: String) -> Result<String> {
    use via_graph_core::llm::ChatRequest;
    use via_graph_core::Message;

    let request = ChatRequest::new(vec![Message::human(prompt)]);
    let response = model.chat(request).await.map_err(|err| ToolsError::InvalidArgument {
        name: "prompt",
        reason: err.to_string(),
    })?;
    Ok(response.message.text().unwrap_or_default().to_string())
}
