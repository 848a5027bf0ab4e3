//! Rate-gated HTTP fetch (spec.md §4.1/§5), one token-bucket
//! [`RateLimiter`](via_tooling::rate_limit::RateLimiter) per host so a single
//! slow or chatty source cannot starve extraction for the rest of a canvas.

use crate::error::{ExtractionError, Result};
use crate::url_type::host_of;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use via_tooling::rate_limit::RateLimiter;

/// Default per-host ceiling: the original `url_extractors.py` throttles
/// outbound fetches to 5 requests per host per 10 seconds.
pub const DEFAULT_HOST_RATE: usize = 5;
pub const DEFAULT_HOST_PERIOD: Duration = Duration::from_secs(10);

pub struct Fetcher {
    client: reqwest::Client,
    limiters: Mutex<HashMap<String, RateLimiter>>,
    rate: usize,
    period: Duration,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher {
    pub fn new() -> Self {
        Self::with_rate(DEFAULT_HOST_RATE, DEFAULT_HOST_PERIOD)
    }

    pub fn with_rate(rate: usize, period: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            limiters: Mutex::new(HashMap::new()),
            rate,
            period,
        }
    }

    async fn limiter_for(&self, host: &str) -> RateLimiter {
        let mut limiters = self.limiters.lock().await;
        limiters
            .entry(host.to_string())
            .or_insert_with(|| RateLimiter::new(self.rate, self.period))
            .clone()
    }

    /// Returns [`ExtractionError::RateLimited`] immediately rather than
    /// queuing — callers (the orchestrator's content-extraction tool) decide
    /// whether to retry later.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let host = host_of(url);
        let limiter = self.limiter_for(&host).await;
        if !limiter.check().await {
            return Err(ExtractionError::RateLimited(host));
        }

        let response = self
            .client
            .get(url)
            .header("User-Agent", "via-extraction/0.1")
            .send()
            .await
            .map_err(|source| ExtractionError::Fetch { url: url.to_string(), source })?;
        let body = response
            .text()
            .await
            .map_err(|source| ExtractionError::Fetch { url: url.to_string(), source })?;
        Ok(body)
    }
}
