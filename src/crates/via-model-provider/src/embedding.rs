//! Text-embedding provider (spec.md §6): `embed(text)` / `embed_batch(texts)`
//! returning fixed-dimension vectors. On failure the provider returns a
//! deterministic fallback vector and the operation continues — mirrors
//! `ChatModel`'s externally-implemented-trait posture, sibling to the chat
//! providers in [`crate::remote`]/[`crate::local`].

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::time::Duration;

pub const DEFAULT_EMBEDDING_DIMENSION: usize = 768;

#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {0}")]
    Request(String),
    #[error("embedding provider returned an unexpected response: {0}")]
    UnexpectedResponse(String),
}

pub type Result<T> = std::result::Result<T, EmbeddingError>;

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    fn dimension(&self) -> usize;
}

/// Deterministic, hash-based fallback vector used whenever a real provider
/// call fails. Not a semantic embedding — a reproducible placeholder that
/// lets callers (the category system, RAG store) keep operating instead of
/// erroring out, per spec.md §7 "External service unavailable ... embedding
/// fallback".
pub fn deterministic_fallback_vector(text: &str, dimension: usize) -> Vec<f32> {
    let mut out = Vec::with_capacity(dimension);
    let mut counter: u32 = 0;
    while out.len() < dimension {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        hasher.update(counter.to_le_bytes());
        let digest = hasher.finalize();
        for chunk in digest.chunks(4) {
            if out.len() >= dimension {
                break;
            }
            let mut bytes = [0u8; 4];
            bytes[..chunk.len()].copy_from_slice(chunk);
            let value = u32::from_le_bytes(bytes);
            // Map into [-1, 1] so cosine similarity behaves sensibly.
            out.push((value as f32 / u32::MAX as f32) * 2.0 - 1.0);
        }
        counter += 1;
    }
    out
}

#[derive(Debug, Clone)]
pub struct OpenAiEmbeddingConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub dimension: usize,
    pub timeout: Duration,
}

impl OpenAiEmbeddingConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: model.into(),
            dimension: DEFAULT_EMBEDDING_DIMENSION,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(serde::Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(serde::Deserialize)]
struct EmbeddingResponseItem {
    embedding: Vec<f32>,
}

#[derive(serde::Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingResponseItem>,
}

/// OpenAI-compatible embedding client (also fits Ollama/LM Studio's
/// `/v1/embeddings`-shaped endpoints, same convention as `crate::remote`'s
/// OpenAI-compatible chat clients).
pub struct OpenAiEmbeddingClient {
    config: OpenAiEmbeddingConfig,
    http: reqwest::Client,
}

impl OpenAiEmbeddingClient {
    pub fn new(config: OpenAiEmbeddingConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();
        Self { config, http }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let vectors = self.embed_batch(std::slice::from_ref(&text.to_string())).await?;
        vectors
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::UnexpectedResponse("empty embedding response".into()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&EmbeddingRequest {
                model: &self.config.model,
                input: texts,
            })
            .send()
            .await
            .map_err(|e| EmbeddingError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EmbeddingError::Request(format!(
                "embedding endpoint returned status {}",
                response.status()
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::UnexpectedResponse(e.to_string()))?;
        Ok(parsed.data.into_iter().map(|item| item.embedding).collect())
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }
}

/// Wraps any [`EmbeddingProvider`] so a transport failure returns the
/// deterministic fallback instead of propagating, matching spec.md §7's
/// "embedding fallback" degrade-gracefully policy.
pub struct FallbackEmbeddingProvider<P: EmbeddingProvider> {
    inner: P,
}

impl<P: EmbeddingProvider> FallbackEmbeddingProvider<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<P: EmbeddingProvider> EmbeddingProvider for FallbackEmbeddingProvider<P> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        match self.inner.embed(text).await {
            Ok(vector) => Ok(vector),
            Err(err) => {
                tracing::warn!(error = %err, "embedding provider failed, using deterministic fallback");
                Ok(deterministic_fallback_vector(text, self.inner.dimension()))
            }
        }
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }
}
