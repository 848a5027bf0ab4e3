//! Profile manager (spec.md §4.4): first-assignment profile creation,
//! running-mean centroid updates, periodic keyword/snippet refresh, and
//! profile merge.

use crate::keywords::fallback_extract;
use crate::store::ProfileStore;
use via_domain::category::MAX_SNIPPETS;
use via_domain::ids::ProfileId;
use via_domain::CategoryProfile;

const REFRESH_INTERVAL: u64 = 10;
const SNIPPET_LEN: usize = 150;

pub struct ProfileManager<'a> {
    store: &'a ProfileStore,
}

impl<'a> ProfileManager<'a> {
    pub fn new(store: &'a ProfileStore) -> Self {
        Self { store }
    }

    /// First assignment to a brand-new category: profile built from the
    /// member card. The founding card is not counted against either
    /// assignment-kind counter (spec.md §8 scenario 5: a new profile starts
    /// at confidence 0.5, not a 1/1 ratio) — `auto_assignments` and
    /// `user_corrections` both start at zero and only move on the next,
    /// genuinely subsequent, assignment.
    pub async fn create_from_member(
        &self,
        id: ProfileId,
        name: String,
        description: String,
        member_content: &str,
        member_embedding: Vec<f32>,
    ) -> CategoryProfile {
        let mut profile = CategoryProfile::seed(id, name, description, member_embedding.len());
        profile.centroid = member_embedding;
        profile.card_count = 1;
        profile.confidence = 0.5;
        for keyword in fallback_extract(member_content) {
            profile.push_keyword(keyword, 1.0);
        }
        profile.push_snippet(leading_snippet(member_content));
        self.store.insert(profile.clone()).await;
        profile
    }

    /// Every subsequent assignment: running-mean centroid update, counters,
    /// and — every 10 cards — a keyword/snippet refresh from `members`.
    pub async fn assign(
        &self,
        profile_id: &ProfileId,
        member_content: &str,
        member_embedding: &[f32],
        is_user_corrected: bool,
        members_for_refresh: Option<&[(String, String)]>,
    ) -> Option<CategoryProfile> {
        let mut profile = self.store.get(profile_id).await?;
        let n = profile.card_count as f64;
        profile.centroid = profile
            .centroid
            .iter()
            .zip(member_embedding.iter())
            .map(|(mu, x)| (((*mu as f64) * n + *x as f64) / (n + 1.0)) as f32)
            .collect();
        profile.card_count += 1;
        if is_user_corrected {
            profile.user_corrections += 1;
        } else {
            profile.auto_assignments += 1;
        }
        profile.update_confidence();

        if profile.card_count % REFRESH_INTERVAL == 0 {
            if let Some(members) = members_for_refresh {
                refresh_keywords_and_snippets(&mut profile, members);
            } else {
                for keyword in fallback_extract(member_content) {
                    profile.push_keyword(keyword, 1.0);
                }
            }
        }

        self.store.update(profile.clone()).await;
        Some(profile)
    }

    /// Merge `source` into `target`: card-count-weighted centroid mean,
    /// unioned/truncated keywords and snippets, summed counters. `source`
    /// is unregistered from the store.
    pub async fn merge(&self, target_id: &ProfileId, source_id: &ProfileId) -> Option<CategoryProfile> {
        let mut target = self.store.get(target_id).await?;
        let source = self.store.remove(source_id).await?;

        let total = (target.card_count + source.card_count).max(1) as f64;
        let weight_t = target.card_count as f64 / total;
        let weight_s = source.card_count as f64 / total;
        target.centroid = target
            .centroid
            .iter()
            .zip(source.centroid.iter())
            .map(|(t, s)| (*t as f64 * weight_t + *s as f64 * weight_s) as f32)
            .collect();
        target.card_count += source.card_count;
        target.auto_assignments += source.auto_assignments;
        target.user_corrections += source.user_corrections;

        for kw in source.keywords {
            target.push_keyword(kw.term, kw.score);
        }
        for snippet in source.snippets {
            target.push_snippet(snippet);
        }
        target.snippets.truncate(MAX_SNIPPETS);

        self.store.update(target.clone()).await;
        Some(target)
    }
}

fn leading_snippet(content: &str) -> String {
    content.chars().take(SNIPPET_LEN).collect()
}

fn refresh_keywords_and_snippets(profile: &mut CategoryProfile, members: &[(String, String)]) {
    let mut frequency: std::collections::HashMap<String, f64> = std::collections::HashMap::new();
    for (_, content) in members {
        for keyword in fallback_extract(content) {
            *frequency.entry(keyword).or_insert(0.0) += 1.0;
        }
    }
    profile.keywords.clear();
    for (term, score) in frequency {
        profile.push_keyword(term, score);
    }
    profile.snippets.clear();
    for (_, content) in members.iter().take(MAX_SNIPPETS) {
        profile.push_snippet(leading_snippet(content));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_from_member_seeds_centroid_and_keywords() {
        let store = ProfileStore::new();
        let manager = ProfileManager::new(&store);
        let profile = manager
            .create_from_member(
                ProfileId::from("p1"),
                "Rust".to_string(),
                "Rust topics".to_string(),
                "rust borrow checker ownership lifetime",
                vec![1.0, 0.0],
            )
            .await;
        assert_eq!(profile.card_count, 1);
        assert_eq!(profile.auto_assignments, 0);
        assert_eq!(profile.confidence, 0.5);
        assert!(profile.keywords.iter().any(|k| k.term == "rust"));
    }

    #[tokio::test]
    async fn assign_updates_centroid_by_running_mean() {
        let store = ProfileStore::new();
        let manager = ProfileManager::new(&store);
        manager
            .create_from_member(ProfileId::from("p1"), "x".into(), "y".into(), "alpha beta", vec![0.0, 0.0])
            .await;
        manager
            .assign(&ProfileId::from("p1"), "alpha beta", &[2.0, 2.0], false, None)
            .await
            .unwrap();
        let profile = store.get(&ProfileId::from("p1")).await.unwrap();
        assert_eq!(profile.card_count, 2);
        assert!((profile.centroid[0] as f64 - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn merge_sums_counters_and_weighted_means_centroid() {
        let store = ProfileStore::new();
        let manager = ProfileManager::new(&store);
        let mut a = CategoryProfile::seed(ProfileId::from("a"), "A", "d", 2);
        a.centroid = vec![0.0, 0.0];
        a.card_count = 1;
        let mut b = CategoryProfile::seed(ProfileId::from("b"), "B", "d", 2);
        b.centroid = vec![4.0, 0.0];
        b.card_count = 3;
        store.insert(a).await;
        store.insert(b).await;

        let merged = manager.merge(&ProfileId::from("a"), &ProfileId::from("b")).await.unwrap();
        assert_eq!(merged.card_count, 4);
        assert!((merged.centroid[0] as f64 - 3.0).abs() < 1e-6);
        assert!(store.get(&ProfileId::from("b")).await.is_none());
    }
}
