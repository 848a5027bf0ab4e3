//! Response types returned by [`crate::llm::ChatModel`] implementations.
//!
//! A `ChatModel` implementation converts its provider's native response into
//! these types so that callers never have to special-case a particular
//! provider's wire format.

use crate::llm::MessageChunkStream;
use crate::Message;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A complete, non-streamed response from a chat model.
///
/// # Example
///
/// ```rust
/// use via_graph_core::llm::response::{ChatResponse, UsageMetadata};
/// use via_graph_core::Message;
/// use std::collections::HashMap;
///
/// let response = ChatResponse {
///     message: Message::assistant("Paris is the capital of France."),
///     usage: Some(UsageMetadata {
///         input_tokens: 12,
///         output_tokens: 8,
///         reasoning_tokens: None,
///         total_tokens: 20,
///     }),
///     reasoning: None,
///     metadata: HashMap::new(),
/// };
///
/// assert_eq!(response.message.text(), Some("Paris is the capital of France."));
/// ```
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// The assistant's response message (text and/or tool calls).
    pub message: Message,

    /// Token usage for this request, if the provider reports it.
    pub usage: Option<UsageMetadata>,

    /// Extracted reasoning/thinking content, present when the request used
    /// [`crate::llm::ReasoningMode::Separated`] or `Extended` and the model
    /// supports it.
    pub reasoning: Option<ReasoningContent>,

    /// Provider-specific metadata that doesn't fit the common fields
    /// (e.g. `finish_reason`, provider request id).
    pub metadata: HashMap<String, Value>,
}

/// A streamed response from a chat model.
///
/// The `stream` field yields [`crate::llm::MessageChunk`]s as they arrive;
/// `usage` is populated once the stream has been fully drained (providers
/// that report usage typically do so in a final frame).
pub struct ChatStreamResponse {
    /// Stream of incremental message chunks.
    pub stream: MessageChunkStream,

    /// Optional reasoning stream, for thinking models in `Separated` mode.
    pub reasoning_stream: Option<MessageChunkStream>,

    /// Final usage statistics, populated once known (often only after the
    /// stream completes, so this may start as `None`).
    pub usage: Option<UsageMetadata>,
}

impl std::fmt::Debug for ChatStreamResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatStreamResponse")
            .field("has_reasoning_stream", &self.reasoning_stream.is_some())
            .field("usage", &self.usage)
            .finish()
    }
}

/// Extracted reasoning/thinking content from a thinking model.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReasoningContent {
    /// The reasoning/thinking text itself.
    pub content: String,

    /// Number of tokens the reasoning consumed, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<usize>,
}

impl ReasoningContent {
    /// Create reasoning content from plain text.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tokens: None,
        }
    }

    /// Attach a token count to this reasoning content.
    pub fn with_tokens(mut self, tokens: usize) -> Self {
        self.tokens = Some(tokens);
        self
    }
}

/// Token usage statistics for a chat completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UsageMetadata {
    /// Tokens consumed by the prompt/input.
    pub input_tokens: usize,

    /// Tokens generated in the response (excluding reasoning tokens).
    pub output_tokens: usize,

    /// Tokens consumed by reasoning/thinking, if the provider bills for it
    /// separately (e.g. OpenAI o1).
    pub reasoning_tokens: Option<usize>,

    /// Total tokens billed for this request.
    pub total_tokens: usize,
}

impl UsageMetadata {
    /// Create usage metadata from input/output token counts, computing the total.
    pub fn new(input_tokens: usize, output_tokens: usize) -> Self {
        Self {
            input_tokens,
            output_tokens,
            reasoning_tokens: None,
            total_tokens: input_tokens + output_tokens,
        }
    }

    /// Add a separate reasoning token count, folding it into the total.
    pub fn with_reasoning_tokens(mut self, reasoning_tokens: usize) -> Self {
        self.total_tokens += reasoning_tokens;
        self.reasoning_tokens = Some(reasoning_tokens);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_metadata_new() {
        let usage = UsageMetadata::new(100, 50);
        assert_eq!(usage.total_tokens, 150);
        assert_eq!(usage.reasoning_tokens, None);
    }

    #[test]
    fn test_usage_metadata_with_reasoning() {
        let usage = UsageMetadata::new(100, 50).with_reasoning_tokens(200);
        assert_eq!(usage.total_tokens, 350);
        assert_eq!(usage.reasoning_tokens, Some(200));
    }

    #[test]
    fn test_reasoning_content_builder() {
        let reasoning = ReasoningContent::new("Let me think...").with_tokens(42);
        assert_eq!(reasoning.content, "Let me think...");
        assert_eq!(reasoning.tokens, Some(42));
    }
}
