//! Error type for the extraction pipeline.

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("fetch failed for {url}: {source}")]
    Fetch { url: String, source: reqwest::Error },

    #[error("rate limited for host {0}")]
    RateLimited(String),

    #[error("no extraction method produced usable content for {0}")]
    NoContent(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Domain(#[from] via_domain::error::DomainError),
}

pub type Result<T> = std::result::Result<T, ExtractionError>;
