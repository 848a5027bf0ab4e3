//! Category profile entity (spec.md §3, §4.4).

use crate::ids::ProfileId;
use serde::{Deserialize, Serialize};

pub const MAX_KEYWORDS: usize = 20;
pub const MAX_SNIPPETS: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredKeyword {
    pub term: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryProfile {
    pub id: ProfileId,
    pub name: String,
    pub description: String,
    pub centroid: Vec<f32>,
    pub keywords: Vec<ScoredKeyword>,
    pub snippets: Vec<String>,
    pub parent_id: Option<ProfileId>,
    pub sibling_ids: Vec<ProfileId>,
    pub child_ids: Vec<ProfileId>,
    pub card_count: u64,
    pub auto_assignments: u64,
    pub user_corrections: u64,
    /// Stored rather than derived: a freshly created profile reports 0.5
    /// before any post-creation assignment exists to take a ratio of
    /// (spec.md §8 scenario 5), which `auto_assignments / (auto_assignments
    /// + user_corrections)` cannot express at `0/0`. [`Self::update_confidence`]
    /// recomputes it from the ratio once real assignments accrue.
    pub confidence: f64,
}

impl CategoryProfile {
    /// A taxonomy seed with no members yet; confidence defaults to 0.3
    /// per spec.md §4.4 until its first real member assignment.
    pub fn seed(id: ProfileId, name: impl Into<String>, description: impl Into<String>, dimension: usize) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            centroid: vec![0.0; dimension],
            keywords: Vec::new(),
            snippets: Vec::new(),
            parent_id: None,
            sibling_ids: Vec::new(),
            child_ids: Vec::new(),
            card_count: 0,
            auto_assignments: 0,
            user_corrections: 0,
            confidence: 0.3,
        }
    }

    /// Recomputes `confidence` as `auto_assignments / (auto_assignments +
    /// user_corrections)`. No-op while both counters are still zero, so a
    /// newly created profile keeps its 0.5 starting confidence until the
    /// first assignment past creation.
    pub fn update_confidence(&mut self) {
        let denom = self.auto_assignments + self.user_corrections;
        if denom > 0 {
            self.confidence = self.auto_assignments as f64 / denom as f64;
        }
    }

    pub fn push_keyword(&mut self, term: String, score: f64) {
        self.keywords.push(ScoredKeyword { term, score });
        self.keywords
            .sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        self.keywords.truncate(MAX_KEYWORDS);
    }

    pub fn push_snippet(&mut self, snippet: String) {
        if self.snippets.len() >= MAX_SNIPPETS {
            return;
        }
        self.snippets.push(snippet);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_profile_has_zero_vector_centroid_and_default_confidence() {
        let profile = CategoryProfile::seed(ProfileId::from("p1"), "Programming", "code topics", 768);
        assert_eq!(profile.centroid.len(), 768);
        assert!(profile.centroid.iter().all(|&x| x == 0.0));
        assert_eq!(profile.confidence, 0.3);
        assert_eq!(profile.card_count, 0);
    }

    #[test]
    fn confidence_reflects_auto_vs_user_corrected_ratio_after_update() {
        let mut profile = CategoryProfile::seed(ProfileId::from("p1"), "x", "y", 4);
        profile.auto_assignments = 9;
        profile.user_corrections = 1;
        profile.update_confidence();
        assert!((profile.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn update_confidence_is_a_no_op_while_both_counters_are_zero() {
        let mut profile = CategoryProfile::seed(ProfileId::from("p1"), "x", "y", 4);
        profile.confidence = 0.5;
        profile.update_confidence();
        assert_eq!(profile.confidence, 0.5);
    }

    #[test]
    fn keywords_are_capped_at_twenty_sorted_by_score() {
        let mut profile = CategoryProfile::seed(ProfileId::from("p1"), "x", "y", 4);
        for i in 0..30 {
            profile.push_keyword(format!("term{i}"), i as f64);
        }
        assert_eq!(profile.keywords.len(), MAX_KEYWORDS);
        assert_eq!(profile.keywords[0].term, "term29");
    }

    #[test]
    fn snippets_capped_at_three() {
        let mut profile = CategoryProfile::seed(ProfileId::from("p1"), "x", "y", 4);
        for i in 0..5 {
            profile.push_snippet(format!("snippet {i}"));
        }
        assert_eq!(profile.snippets.len(), MAX_SNIPPETS);
    }
}
