//! External collaborator the apply step uses to resolve a category name for
//! an uncategorized card (spec.md §4.9 Apply: "assign category via the
//! category system"). The profile/assignment machinery lives in
//! `via-categories`, which this crate does not depend on directly — same
//! posture as [`via_domain::canvas::CanvasClient`]: a trait at the seam,
//! implemented by whichever layer owns the category subsystem.

use async_trait::async_trait;

#[async_trait]
pub trait CategoryLookup: Send + Sync {
    /// Classifies already-embedded card content, returning the category
    /// name to write onto the node, or `None` if it should stay
    /// uncategorized.
    async fn classify(&self, content: &str, embedding: &[f32]) -> Option<String>;
}

/// Never categorizes anything; useful when a deployment runs without the
/// category subsystem wired in, so the uncategorized-card apply step simply
/// never fires instead of erroring.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCategorySystem;

#[async_trait]
impl CategoryLookup for NoCategorySystem {
    async fn classify(&self, _content: &str, _embedding: &[f32]) -> Option<String> {
        None
    }
}
