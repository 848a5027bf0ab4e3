//! JS-rendered page fetching (spec.md §4.1 fallback chain step 2, §5
//! concurrency). The real implementation shells out to a headless browser
//! and is necessarily outside this workspace, so — same posture as
//! [`via_domain::canvas::CanvasClient`] — the contract is a trait plus a
//! null stub. Implementations that do block (driving a browser process)
//! are expected to run the blocking work on `tokio::task::spawn_blocking`
//! themselves, per `extractors/headless_browser.py`'s original placement.

use async_trait::async_trait;

#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Returns fully rendered HTML, or `None` if rendering is unavailable
    /// or the page failed to settle.
    async fn render(&self, url: &str) -> crate::error::Result<Option<String>>;
}

/// Used when no headless-browser collaborator is wired in; the fallback
/// chain simply skips past this stage.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

#[async_trait]
impl PageRenderer for NullRenderer {
    async fn render(&self, _url: &str) -> crate::error::Result<Option<String>> {
        Ok(None)
    }
}
