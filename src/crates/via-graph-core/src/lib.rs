//! # langgraph-core - agent runtime primitives
//!
//! `langgraph-core` is the foundation crate for building tool-calling agent
//! workflows in Rust. It does not implement a compute graph; instead it
//! provides the primitives a bounded agent loop needs:
//!
//! - **Provider-agnostic LLM traits** ([`llm`]) - implement [`llm::ChatModel`]
//!   once per provider (local or remote) and swap providers freely
//! - **Messages** ([`messages`]) - chat history types shared by every agent
//! - **Tool calling** ([`tool`]) - define tools, validate arguments against a
//!   JSON schema, execute tool calls (including in parallel)
//! - **Streaming** ([`stream`], [`llm_stream`]) - typed events for observing
//!   execution (message chunks, custom application data) plus adapters from
//!   raw token streams
//! - **Runtime context** ([`runtime`]) - step budget, store access, and a
//!   [`runtime::StreamWriter`] available from inside a running node
//! - **Retry policies** ([`retry`]) - exponential backoff for flaky calls
//!   (provider requests, embedding calls, network-bound tool execution)
//! - **Store** ([`store`]) - a minimal async key-value [`store::Store`] trait
//!   plus an in-memory reference implementation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use via_graph_core::llm::{ChatModel, ChatRequest};
//! use via_graph_core::Message;
//! use std::sync::Arc;
//!
//! async fn ask(model: Arc<dyn ChatModel>) -> via_graph_core::error::Result<()> {
//!     let request = ChatRequest::new(vec![Message::human("Hello!")])
//!         .with_temperature(0.7);
//!
//!     let response = model.chat(request).await?;
//!     println!("{}", response.message.text().unwrap_or_default());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`error`] - [`GraphError`] and the crate-wide [`error::Result`] alias
//! - [`llm`] - [`llm::ChatModel`] trait, request/response types, tool definitions
//! - [`messages`] - [`Message`], [`MessageRole`], history utilities (trim, merge, filter)
//! - [`tool`] - [`tool::Tool`], [`tool::ToolRegistry`], tool call execution
//! - [`runtime`] - [`Runtime`] execution context and [`StreamWriter`]
//! - [`stream`] - [`StreamEvent`], [`StreamMode`], buffering/filtering
//! - [`llm_stream`] - token-stream to message-chunk adapters
//! - [`retry`] - [`RetryPolicy`] with exponential backoff and jitter
//! - [`store`] - [`Store`] / [`Cache`] traits plus in-memory implementations

pub mod error;
pub mod llm;
pub mod llm_stream;
pub mod messages;
pub mod retry;
pub mod runtime;
pub mod store;
pub mod stream;
pub mod tool;

// Re-export main types
pub use error::{GraphError, Result};
pub use messages::{
    add_message_likes, add_messages, convert_to_messages, filter_by_role, get_last_message,
    get_messages_by_id, merge_consecutive_messages, push_message, push_messages, truncate_messages,
    trim_messages, ContentPart, Message, MessageContent, MessageLike, MessageRole, RemoveMessage,
    TrimOptions, TrimStrategy,
};
pub use retry::{RetryPolicy, RetryState};
pub use runtime::{get_runtime, get_store, get_stream_writer, Runtime, StepContext, StreamWriter};
pub use store::{Cache, InMemoryCache, InMemoryStore, Store, StoreError};
pub use stream::{Namespace, NodeId, StreamChunk, StreamConfig, StreamEvent, StreamMode};
pub use llm_stream::{MessageChunk, MessageChunkStream, TokenBuffer, TokenStream, TokenStreamAdapter};
pub use tool::{Tool, ToolCall, ToolCallResult, ToolError, ToolOutput, ToolRegistry, ToolResult, ToolRuntime};
