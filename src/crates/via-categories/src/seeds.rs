//! The three bootstrap category profiles a fresh canvas starts with
//! (spec.md §4.4: "the dynamic profile system ships with no static taxonomy
//! beyond a small seed set"). Each seed has an empty centroid until its
//! first member assignment establishes one.

use via_domain::{CategoryProfile, ProfileId};

pub fn seed_profiles(embedding_dim: usize) -> Vec<CategoryProfile> {
    vec![
        CategoryProfile::seed(
            ProfileId::new("seed-programming"),
            "Programming",
            "Source code, APIs, algorithms, and software engineering practice",
            embedding_dim,
        ),
        CategoryProfile::seed(
            ProfileId::new("seed-documentation"),
            "Documentation",
            "Reference material, guides, specifications, and how-to content",
            embedding_dim,
        ),
        CategoryProfile::seed(
            ProfileId::new("seed-research"),
            "Research",
            "Papers, experiments, findings, and open questions under investigation",
            embedding_dim,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_profiles_start_unconfident_with_zero_vector_centroids() {
        let seeds = seed_profiles(8);
        assert_eq!(seeds.len(), 3);
        for profile in &seeds {
            assert_eq!(profile.card_count, 0);
            assert!(profile.centroid.iter().all(|&x| x == 0.0));
            assert!((profile.confidence - 0.3).abs() < 1e-9);
        }
    }
}
