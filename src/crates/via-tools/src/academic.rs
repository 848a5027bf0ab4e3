//! Academic-source search (spec.md §4.10, learning-assistant agent):
//! "external API with LLM fallback". The external API is an
//! externally-implemented trait, same posture as
//! [`via_domain::canvas::CanvasClient`]; [`LlmFallbackAcademicClient`]
//! provides the fallback the spec requires when no real API is wired in.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use via_graph_core::llm::ChatModel;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcademicSource {
    pub title: String,
    pub summary: String,
    pub url: Option<String>,
}

#[async_trait]
pub trait AcademicSearchClient: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<AcademicSource>, String>;
}

/// Asks the chat model to recall relevant sources from its training data
/// instead of querying a live academic API. Results are best-effort and
/// carry no `url` (the model cannot vouch for a live link), matching the
/// original service's documented degraded-mode behavior.
pub struct LlmFallbackAcademicClient {
    model: Arc<dyn ChatModel>,
}

impl LlmFallbackAcademicClient {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl AcademicSearchClient for LlmFallbackAcademicClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<AcademicSource>, String> {
        let prompt = format!(
            "List up to {max_results} academic papers or authoritative references relevant to: \"{query}\". \
             Respond with one paper per line as \"Title -- one sentence summary\"."
        );
        let text = crate::support::ask_model(&self.model, prompt).await.map_err(|e| e.to_string())?;
        let sources = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .take(max_results)
            .map(|line| match line.split_once("--") {
                Some((title, summary)) => {
                    AcademicSource { title: title.trim().to_string(), summary: summary.trim().to_string(), url: None }
                }
                None => AcademicSource { title: line.trim().to_string(), summary: String::new(), url: None },
            })
            .collect();
        Ok(sources)
    }
}
