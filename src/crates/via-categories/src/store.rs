//! Process-wide category profile store — single-writer discipline enforced
//! via `tokio::sync::RwLock`, matching the rest of the workspace's shared
//! services (spec.md §5 "Shared resources").

use std::collections::HashMap;
use tokio::sync::RwLock;
use via_domain::{CategoryProfile, ProfileId};

#[derive(Default)]
pub struct ProfileStore {
    profiles: RwLock<HashMap<ProfileId, CategoryProfile>>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, profile: CategoryProfile) {
        self.profiles.write().await.insert(profile.id.clone(), profile);
    }

    pub async fn get(&self, id: &ProfileId) -> Option<CategoryProfile> {
        self.profiles.read().await.get(id).cloned()
    }

    pub async fn get_by_name(&self, name: &str) -> Option<CategoryProfile> {
        self.profiles.read().await.values().find(|p| p.name == name).cloned()
    }

    pub async fn remove(&self, id: &ProfileId) -> Option<CategoryProfile> {
        self.profiles.write().await.remove(id)
    }

    pub async fn all(&self) -> Vec<CategoryProfile> {
        self.profiles.read().await.values().cloned().collect()
    }

    pub async fn update(&self, profile: CategoryProfile) {
        self.profiles.write().await.insert(profile.id.clone(), profile);
    }

    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
