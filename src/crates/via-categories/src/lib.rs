//! Dynamic category system (spec.md §4.4): hybrid retrieval over profile
//! centroids and keywords, LLM-backed classification over the retrieved
//! candidates, and profile evolution (creation, running-mean update, merge).
//!
//! No static taxonomy ships beyond the three seed profiles in [`seeds`];
//! everything else is learned from card content as cards are assigned.

pub mod classifier;
pub mod keywords;
pub mod manager;
pub mod retriever;
pub mod seeds;
pub mod store;

use std::sync::Arc;
use via_domain::ids::ProfileId;
use via_graph_core::llm::ChatModel;

pub use classifier::ClassificationDecision;
pub use manager::ProfileManager;
pub use retriever::RetrieverConfig;
pub use store::ProfileStore;

/// Outcome of running a card through the full retrieve -> classify -> assign
/// pipeline.
#[derive(Debug, Clone)]
pub enum AssignmentOutcome {
    AssignedExisting { profile_id: ProfileId, confidence: f64 },
    CreatedNew { profile_id: ProfileId, confidence: f64 },
    Uncategorized,
}

pub struct CategorySystem {
    pub store: ProfileStore,
    pub retriever_config: RetrieverConfig,
    model: Arc<dyn ChatModel>,
}

impl CategorySystem {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            store: ProfileStore::new(),
            retriever_config: RetrieverConfig::default(),
            model,
        }
    }

    pub async fn bootstrap_with_seeds(&self, embedding_dim: usize) {
        for profile in seeds::seed_profiles(embedding_dim) {
            self.store.insert(profile).await;
        }
    }

    /// Runs the full Stage A/B pipeline for one card and mutates the
    /// affected profile(s) accordingly.
    pub async fn classify_and_assign(&self, content: &str, embedding: &[f32]) -> AssignmentOutcome {
        let profiles = self.store.all().await;
        let query_terms = keywords::fallback_extract(content);
        let candidates = retriever::combine(&profiles, embedding, &query_terms, &self.retriever_config);

        let decision = classifier::classify(&self.model, content, &candidates).await;
        let manager = ProfileManager::new(&self.store);

        match decision {
            ClassificationDecision::Match { category_id, confidence } => {
                let profile_id = ProfileId::new(category_id);
                match manager.assign(&profile_id, content, embedding, false, None).await {
                    Some(_) => AssignmentOutcome::AssignedExisting { profile_id, confidence },
                    None => AssignmentOutcome::Uncategorized,
                }
            }
            ClassificationDecision::CreateNew { spec, confidence } => {
                let profile_id = ProfileId::new(format!("profile-{}", uuid::Uuid::new_v4()));
                let mut profile = manager
                    .create_from_member(profile_id.clone(), spec.name, spec.description, content, embedding.to_vec())
                    .await;
                for keyword in spec.keywords {
                    profile.push_keyword(keyword, 1.0);
                }
                self.store.update(profile).await;
                AssignmentOutcome::CreatedNew { profile_id, confidence }
            }
            ClassificationDecision::Uncategorized => AssignmentOutcome::Uncategorized,
        }
    }

    /// Records a user correction: reassigns `content`/`embedding`'s card to
    /// `profile_id`, counted against `user_corrections` rather than
    /// `auto_assignments`.
    pub async fn record_user_correction(&self, profile_id: &ProfileId, content: &str, embedding: &[f32]) -> bool {
        let manager = ProfileManager::new(&self.store);
        manager.assign(profile_id, content, embedding, true, None).await.is_some()
    }

    pub async fn merge_profiles(&self, target_id: &ProfileId, source_id: &ProfileId) -> bool {
        let manager = ProfileManager::new(&self.store);
        manager.merge(target_id, source_id).await.is_some()
    }
}
