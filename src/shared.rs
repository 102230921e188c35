// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Async handle for sharing one index store between tasks
//!
//! Writers take the lock exclusively, so each mutation runs against a
//! consistent snapshot; readers share it. Results are returned owned.
//!
//! File-backed stores write synchronously, so mutations run on the blocking
//! pool while holding an owned write guard.

use crate::combine::IntegrationOpportunity;
use crate::error::Result;
use crate::graph::RelationshipGraph;
use crate::insights::RelationshipInsights;
use crate::search::{SearchQuery, SearchResult};
use crate::store::{IndexStore, SimilarRepository};
use crate::types::{IndexedRepository, RepositoryAnalysis, RepositoryIndex, Tag};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::task;

/// Cloneable, lock-protected [`IndexStore`]
#[derive(Debug, Clone)]
pub struct SharedIndexStore {
    inner: Arc<RwLock<IndexStore>>,
}

impl SharedIndexStore {
    /// Wrap a store
    #[must_use]
    pub fn new(store: IndexStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Shared access for several reads against one snapshot
    pub async fn read(&self) -> RwLockReadGuard<'_, IndexStore> {
        self.inner.read().await
    }

    /// Exclusive access for several mutations in one critical section.
    ///
    /// Mutations through the guard persist with blocking file I/O.
    pub async fn write(&self) -> RwLockWriteGuard<'_, IndexStore> {
        self.inner.write().await
    }

    /// Copy of the current index
    pub async fn snapshot(&self) -> RepositoryIndex {
        self.inner.read().await.get_index().clone()
    }

    /// Run `op` under the write lock on the blocking pool
    async fn mutate<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut IndexStore) -> Result<T> + Send + 'static,
    {
        let mut guard = Arc::clone(&self.inner).write_owned().await;
        task::spawn_blocking(move || op(&mut guard)).await?
    }

    /// See [`IndexStore::add_repository`]
    pub async fn add_repository(&self, analysis: &RepositoryAnalysis) -> Result<IndexedRepository> {
        let analysis = analysis.clone();
        self.mutate(move |store| store.add_repository(&analysis)).await
    }

    /// See [`IndexStore::update_repository`]
    pub async fn update_repository(&self, id: &str, analysis: &RepositoryAnalysis) -> Result<IndexedRepository> {
        let (id, analysis) = (id.to_string(), analysis.clone());
        self.mutate(move |store| store.update_repository(&id, &analysis)).await
    }

    /// See [`IndexStore::remove_repository`]
    pub async fn remove_repository(&self, id: &str) -> Result<IndexedRepository> {
        let id = id.to_string();
        self.mutate(move |store| store.remove_repository(&id)).await
    }

    /// See [`IndexStore::set_index`]
    pub async fn set_index(&self, index: RepositoryIndex) -> Result<()> {
        self.mutate(move |store| store.set_index(index)).await
    }

    /// See [`IndexStore::get_repository`]
    pub async fn get_repository(&self, id: &str) -> Option<IndexedRepository> {
        self.inner.read().await.get_repository(id).cloned()
    }

    /// See [`IndexStore::get_tags`]
    pub async fn get_tags(&self) -> Vec<Tag> {
        self.inner.read().await.get_tags().to_vec()
    }

    /// See [`IndexStore::add_tag`]
    pub async fn add_tag(&self, name: &str, category: Option<&str>, color: Option<&str>) -> Result<Tag> {
        let name = name.to_string();
        let category = category.map(str::to_string);
        let color = color.map(str::to_string);
        self.mutate(move |store| store.add_tag(&name, category.as_deref(), color.as_deref()))
            .await
    }

    /// See [`IndexStore::remove_tag`]
    pub async fn remove_tag(&self, tag_id: &str) -> Result<Tag> {
        let tag_id = tag_id.to_string();
        self.mutate(move |store| store.remove_tag(&tag_id)).await
    }

    /// See [`IndexStore::add_repository_tag`]
    pub async fn add_repository_tag(&self, repo_id: &str, tag: &str) -> Result<()> {
        let (repo_id, tag) = (repo_id.to_string(), tag.to_string());
        self.mutate(move |store| store.add_repository_tag(&repo_id, &tag)).await
    }

    /// See [`IndexStore::remove_repository_tag`]
    pub async fn remove_repository_tag(&self, repo_id: &str, tag: &str) -> Result<()> {
        let (repo_id, tag) = (repo_id.to_string(), tag.to_string());
        self.mutate(move |store| store.remove_repository_tag(&repo_id, &tag)).await
    }

    /// See [`IndexStore::search_repositories`]
    pub async fn search_repositories(&self, query: &SearchQuery) -> Vec<SearchResult> {
        self.inner.read().await.search_repositories(query)
    }

    /// See [`IndexStore::find_similar_repositories`]
    pub async fn find_similar_repositories(&self, id: &str, limit: usize) -> Result<Vec<SimilarRepository>> {
        self.inner.read().await.find_similar_repositories(id, limit)
    }

    /// See [`IndexStore::suggest_combinations`]
    pub async fn suggest_combinations(&self, ids: &[String]) -> Result<Vec<IntegrationOpportunity>> {
        self.inner.read().await.suggest_combinations(ids)
    }

    /// See [`IndexStore::generate_relationship_graph`]
    pub async fn generate_relationship_graph(&self, ids: Option<&[String]>) -> RelationshipGraph {
        self.inner.read().await.generate_relationship_graph(ids)
    }

    /// See [`IndexStore::analyze_integration_opportunities`]
    pub async fn analyze_integration_opportunities(
        &self,
        ids: Option<&[String]>,
    ) -> Result<Vec<IntegrationOpportunity>> {
        self.inner.read().await.analyze_integration_opportunities(ids)
    }

    /// See [`IndexStore::generate_relationship_insights`]
    pub async fn generate_relationship_insights(&self) -> RelationshipInsights {
        self.inner.read().await.generate_relationship_insights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_concurrent_adds_are_all_kept() {
        let shared = SharedIndexStore::new(IndexStore::in_memory());

        let mut handles = Vec::new();
        for i in 0..8 {
            let shared = shared.clone();
            handles.push(tokio::spawn(async move {
                let analysis = RepositoryAnalysis::new(format!("service-{i}"), format!("/src/service-{i}"))
                    .with_languages(&["Go"]);
                shared.add_repository(&analysis).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let index = shared.snapshot().await;
        assert_eq!(index.repositories.len(), 8);
        // Every unordered pair is stored at most once
        assert!(index.relationships.len() <= 8 * 7 / 2);
    }

    #[tokio::test]
    async fn test_reads_see_completed_writes() {
        let shared = SharedIndexStore::new(IndexStore::in_memory());
        let repo = shared
            .add_repository(&RepositoryAnalysis::new("docs-site", "/src/docs"))
            .await
            .unwrap();

        assert!(shared.get_repository(&repo.id).await.is_some());
        shared.add_repository_tag(&repo.id, "docs").await.unwrap();
        assert!(shared.get_repository(&repo.id).await.unwrap().tags.contains("docs"));
        assert!(shared.find_similar_repositories(&repo.id, 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_backed_writes_persist() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("index.json");
        let shared = SharedIndexStore::new(IndexStore::open(path.clone()));

        let repo = shared
            .add_repository(&RepositoryAnalysis::new("billing-api", "/src/billing-api"))
            .await
            .unwrap();
        shared.add_repository_tag(&repo.id, "team:payments").await.unwrap();
        let err = shared.remove_repository("repo:missing").await.unwrap_err();
        assert!(err.is_not_found());

        let reloaded = IndexStore::load(&path).unwrap();
        let stored = reloaded.repository(&repo.id).unwrap();
        assert!(stored.tags.contains("team:payments"));
    }
}
