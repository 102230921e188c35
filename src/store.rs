// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! The repository index store
//!
//! [`IndexStore`] owns the index aggregate. Every mutation is applied to a
//! copy, written to disk, and only then swapped in, so a failed write leaves
//! the in-memory index untouched.

use crate::combine::{self, IntegrationOpportunity, DEFAULT_LIMIT};
use crate::config::Config;
use crate::error::{IndexError, Result};
use crate::extract::extract;
use crate::graph::{build_graph, RelationshipGraph};
use crate::insights::{self, RelationshipInsights};
use crate::layout::{LayoutConfig, LayoutEngine, RandomSource, SeededRandom};
use crate::search::{search, SearchQuery, SearchResult};
use crate::similarity::similarity;
use crate::types::{IndexedRepository, RepositoryAnalysis, RepositoryIndex, RepositoryRelationship, Tag};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Tag prefixes owned by metadata extraction
const DERIVED_TAG_PREFIXES: [&str; 3] = ["lang:", "framework:", "complexity:"];

/// A stored relationship paired with the repository at its other end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarRepository {
    /// The related repository
    pub repository: IndexedRepository,
    /// The stored relationship
    pub relationship: RepositoryRelationship,
}

/// Persistent repository index
#[derive(Debug, Clone)]
pub struct IndexStore {
    index: RepositoryIndex,
    path: Option<PathBuf>,
    layout: LayoutConfig,
}

impl IndexStore {
    /// Store without a backing file
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            index: RepositoryIndex::default(),
            path: None,
            layout: LayoutConfig::default(),
        }
    }

    /// Open the index file at `path`.
    ///
    /// A missing, unreadable or malformed file yields an empty index; the
    /// file is only overwritten by the next mutation.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let index = match Self::load(&path) {
            Ok(index) => sanitize(index),
            Err(e) => {
                warn!("Starting with an empty index: {}", e);
                RepositoryIndex::default()
            }
        };
        info!(
            "Opened index {} ({} repositories, {} relationships)",
            path.display(),
            index.repositories.len(),
            index.relationships.len()
        );

        Self {
            index,
            path: Some(path),
            layout: LayoutConfig::default(),
        }
    }

    /// Open the index file named by the configuration
    pub fn from_config(config: &Config) -> Self {
        Self::open(config.index_path()).with_layout(config.layout)
    }

    /// Read an index file strictly. A missing file is an empty index.
    pub fn load(path: &Path) -> Result<RepositoryIndex> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(RepositoryIndex::default()),
            Err(source) => {
                return Err(IndexError::Persistence {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&content).map_err(|source| IndexError::MalformedIndex {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Use a different layout configuration for generated graphs
    #[must_use]
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Backing file, if any
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write the current index to the backing file
    pub fn persist(&self) -> Result<()> {
        self.write(&self.index)
    }

    fn write(&self, index: &RepositoryIndex) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_err = |source: std::io::Error| IndexError::Persistence {
            path: path.clone(),
            source,
        };

        let json = serde_json::to_string_pretty(index)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)?;

        debug!("Persisted index to {}", path.display());
        Ok(())
    }

    /// Persist `next` and make it the current index
    fn commit(&mut self, mut next: RepositoryIndex) -> Result<()> {
        next.last_updated = Utc::now();
        self.write(&next)?;
        self.index = next;
        Ok(())
    }

    // =========================================================================
    // Repositories
    // =========================================================================

    /// Add an analyzed repository, or refresh the entry already holding its path
    pub fn add_repository(&mut self, analysis: &RepositoryAnalysis) -> Result<IndexedRepository> {
        let mut repo = extract(analysis);
        let mut next = self.index.clone();

        match next.repositories.iter().position(|r| r.path == repo.path) {
            Some(pos) => {
                let existing = &next.repositories[pos];
                repo.id = existing.id.clone();
                keep_user_tags(&mut repo, existing);
                next.repositories[pos] = repo.clone();
            }
            None => {
                repo.id = assign_id(&next, &repo);
                next.repositories.push(repo.clone());
            }
        }

        recompute_relationships(&mut next, &repo.id);
        self.commit(next)?;

        info!("Indexed repository {} ({})", repo.name, repo.id);
        Ok(repo)
    }

    /// Replace a repository's metadata with a new analysis, keeping its ID
    pub fn update_repository(&mut self, id: &str, analysis: &RepositoryAnalysis) -> Result<IndexedRepository> {
        let pos = self
            .index
            .repositories
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| IndexError::repository(id))?;

        let mut repo = extract(analysis);
        if self.index.repositories.iter().any(|r| r.id != id && r.path == repo.path) {
            return Err(IndexError::DuplicatePath(repo.path));
        }

        let mut next = self.index.clone();
        repo.id = id.to_string();
        keep_user_tags(&mut repo, &next.repositories[pos]);
        next.repositories[pos] = repo.clone();

        recompute_relationships(&mut next, id);
        self.commit(next)?;

        info!("Updated repository {} ({})", repo.name, repo.id);
        Ok(repo)
    }

    /// Remove a repository and every relationship touching it
    pub fn remove_repository(&mut self, id: &str) -> Result<IndexedRepository> {
        let pos = self
            .index
            .repositories
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| IndexError::repository(id))?;

        let mut next = self.index.clone();
        let removed = next.repositories.remove(pos);
        next.relationships.retain(|r| !r.involves(id));
        self.commit(next)?;

        info!("Removed repository {} ({})", removed.name, removed.id);
        Ok(removed)
    }

    /// Get a repository by ID
    #[must_use]
    pub fn get_repository(&self, id: &str) -> Option<&IndexedRepository> {
        self.index.repository(id)
    }

    /// The current index
    #[must_use]
    pub fn get_index(&self) -> &RepositoryIndex {
        &self.index
    }

    /// Replace the whole index.
    ///
    /// Dangling relationships, duplicate relationship pairs and duplicate
    /// paths are dropped before the index is stored.
    pub fn set_index(&mut self, index: RepositoryIndex) -> Result<()> {
        let next = sanitize(index);
        self.commit(next)?;
        info!("Replaced index ({} repositories)", self.index.repositories.len());
        Ok(())
    }

    // =========================================================================
    // Tags
    // =========================================================================

    /// All defined tags
    #[must_use]
    pub fn get_tags(&self) -> &[Tag] {
        &self.index.tags
    }

    /// Define a tag. An existing tag with the same name and category is returned as is.
    pub fn add_tag(&mut self, name: &str, category: Option<&str>, color: Option<&str>) -> Result<Tag> {
        let id = Tag::generate_id(name, category);
        if let Some(existing) = self.index.tags.iter().find(|t| t.id == id) {
            return Ok(existing.clone());
        }

        let tag = Tag {
            id,
            name: name.to_string(),
            category: category.map(str::to_string),
            color: color.map(str::to_string),
        };
        let mut next = self.index.clone();
        next.tags.push(tag.clone());
        self.commit(next)?;

        info!("Added tag {} ({})", tag.name, tag.id);
        Ok(tag)
    }

    /// Delete a tag definition and strip its name from every repository
    pub fn remove_tag(&mut self, tag_id: &str) -> Result<Tag> {
        let pos = self
            .index
            .tags
            .iter()
            .position(|t| t.id == tag_id)
            .ok_or_else(|| IndexError::tag(tag_id))?;

        let mut next = self.index.clone();
        let tag = next.tags.remove(pos);
        for repo in &mut next.repositories {
            repo.tags.remove(&tag.name);
        }
        self.commit(next)?;

        info!("Removed tag {} ({})", tag.name, tag.id);
        Ok(tag)
    }

    /// Attach a tag name to a repository
    pub fn add_repository_tag(&mut self, repo_id: &str, tag: &str) -> Result<()> {
        let repo = self.index.repository(repo_id).ok_or_else(|| IndexError::repository(repo_id))?;
        if repo.tags.contains(tag) {
            return Ok(());
        }

        let mut next = self.index.clone();
        if let Some(repo) = next.repositories.iter_mut().find(|r| r.id == repo_id) {
            repo.tags.insert(tag.to_string());
        }
        self.commit(next)?;

        debug!("Tagged {} with {}", repo_id, tag);
        Ok(())
    }

    /// Detach a tag name from a repository
    pub fn remove_repository_tag(&mut self, repo_id: &str, tag: &str) -> Result<()> {
        let repo = self.index.repository(repo_id).ok_or_else(|| IndexError::repository(repo_id))?;
        if !repo.tags.contains(tag) {
            return Err(IndexError::repository_tag(repo_id, tag));
        }

        let mut next = self.index.clone();
        if let Some(repo) = next.repositories.iter_mut().find(|r| r.id == repo_id) {
            repo.tags.remove(tag);
        }
        self.commit(next)?;

        debug!("Untagged {} from {}", tag, repo_id);
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Search the index
    #[must_use]
    pub fn search_repositories(&self, query: &SearchQuery) -> Vec<SearchResult> {
        search(&self.index, query)
    }

    /// Stored relationships of a repository, strongest first
    pub fn find_similar_repositories(&self, id: &str, limit: usize) -> Result<Vec<SimilarRepository>> {
        if self.index.repository(id).is_none() {
            return Err(IndexError::repository(id));
        }

        let mut similar: Vec<SimilarRepository> = self
            .index
            .relationships_of(id)
            .into_iter()
            .filter_map(|rel| {
                let other = rel.other_end(id)?;
                Some(SimilarRepository {
                    repository: self.index.repository(other)?.clone(),
                    relationship: rel.clone(),
                })
            })
            .collect();
        similar.sort_by(|a, b| b.relationship.strength.total_cmp(&a.relationship.strength));
        similar.truncate(limit);
        Ok(similar)
    }

    /// Rank combinations of the given repositories
    pub fn suggest_combinations(&self, ids: &[String]) -> Result<Vec<IntegrationOpportunity>> {
        combine::suggest_combinations(&self.index, ids, DEFAULT_LIMIT)
    }

    /// Relationship graph with a clock-seeded layout
    #[must_use]
    pub fn generate_relationship_graph(&self, ids: Option<&[String]>) -> RelationshipGraph {
        self.generate_relationship_graph_seeded(ids, &mut SeededRandom::from_entropy())
    }

    /// Relationship graph laid out from the given random source
    pub fn generate_relationship_graph_seeded(
        &self,
        ids: Option<&[String]>,
        rng: &mut dyn RandomSource,
    ) -> RelationshipGraph {
        let mut graph = build_graph(&self.index, ids);
        LayoutEngine::new(self.layout).apply(&mut graph, rng);
        debug!(
            "Generated graph with {} nodes, {} edges, {} clusters",
            graph.nodes.len(),
            graph.edges.len(),
            graph.clusters.len()
        );
        graph
    }

    /// Integration opportunities over `ids`, or the whole index
    pub fn analyze_integration_opportunities(&self, ids: Option<&[String]>) -> Result<Vec<IntegrationOpportunity>> {
        insights::analyze_integration_opportunities(&self.index, ids)
    }

    /// Index-wide relationship statistics
    #[must_use]
    pub fn generate_relationship_insights(&self) -> RelationshipInsights {
        insights::generate_relationship_insights(&self.index)
    }
}

/// The analysis ID when free, otherwise one derived from the path.
///
/// A derived ID already claimed by another entry gets a numeric suffix.
fn assign_id(index: &RepositoryIndex, repo: &IndexedRepository) -> String {
    if !repo.id.is_empty() && index.repository(&repo.id).is_none() {
        return repo.id.clone();
    }
    let base = IndexedRepository::path_id(&repo.path);
    let mut candidate = base.clone();
    let mut suffix = 1;
    while index.repository(&candidate).is_some() {
        candidate = format!("{base}-{suffix}");
        suffix += 1;
    }
    candidate
}

fn is_derived_tag(tag: &str) -> bool {
    DERIVED_TAG_PREFIXES.iter().any(|p| tag.starts_with(p))
}

fn keep_user_tags(repo: &mut IndexedRepository, previous: &IndexedRepository) {
    repo.tags
        .extend(previous.tags.iter().filter(|t| !is_derived_tag(t)).cloned());
}

/// Replace every relationship of `id` with freshly scored ones
fn recompute_relationships(index: &mut RepositoryIndex, id: &str) {
    index.relationships.retain(|r| !r.involves(id));

    let Some(repo) = index.repository(id) else {
        return;
    };
    let fresh: Vec<RepositoryRelationship> = index
        .repositories
        .iter()
        .filter(|other| other.id != id)
        .filter_map(|other| {
            let sim = similarity(repo, other);
            sim.is_significant().then(|| RepositoryRelationship {
                source_id: id.to_string(),
                target_id: other.id.clone(),
                relationship_type: sim.relationship_type,
                strength: sim.score,
                reason: sim.reason,
            })
        })
        .collect();

    debug!("Computed {} relationships for {}", fresh.len(), id);
    index.relationships.extend(fresh);
}

/// Drop duplicate repositories, dangling relationships and repeated pairs
fn sanitize(mut index: RepositoryIndex) -> RepositoryIndex {
    let mut ids = HashSet::new();
    let mut paths = HashSet::new();
    index.repositories.retain(|r| {
        let keep = ids.insert(r.id.clone()) && paths.insert(r.path.clone());
        if !keep {
            warn!("Dropping duplicate repository {} at {}", r.id, r.path);
        }
        keep
    });

    let mut pairs = BTreeSet::new();
    index.relationships.retain(|r| {
        let key = if r.source_id <= r.target_id {
            (r.source_id.clone(), r.target_id.clone())
        } else {
            (r.target_id.clone(), r.source_id.clone())
        };
        let keep = r.source_id != r.target_id
            && ids.contains(&r.source_id)
            && ids.contains(&r.target_id)
            && pairs.insert(key);
        if !keep {
            warn!("Dropping relationship {} -> {}", r.source_id, r.target_id);
        }
        keep
    });

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RelationshipType;
    use tempfile::TempDir;

    fn web(name: &str, path: &str) -> RepositoryAnalysis {
        RepositoryAnalysis::new(name, path)
            .with_languages(&["TypeScript"])
            .with_frameworks(&["react"])
            .with_size(120_000)
            .with_maintainability(20.0)
    }

    fn api(name: &str, path: &str) -> RepositoryAnalysis {
        RepositoryAnalysis::new(name, path)
            .with_languages(&["JavaScript"])
            .with_frameworks(&["express"])
            .with_size(120_000)
            .with_maintainability(20.0)
    }

    #[test]
    fn test_readd_same_path_keeps_one_entry() {
        let mut store = IndexStore::in_memory();
        let first = store.add_repository(&web("shop-ui", "/src/shop")).unwrap();
        let second = store.add_repository(&web("storefront", "/src/shop")).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.get_index().repositories.len(), 1);
        assert_eq!(store.get_index().repositories[0].name, "storefront");
    }

    #[test]
    fn test_relationships_follow_adds_and_removes() {
        let mut store = IndexStore::in_memory();
        let ui = store.add_repository(&web("shop-ui", "/src/ui")).unwrap();
        let api_repo = store.add_repository(&api("shop-api", "/src/api")).unwrap();
        store.add_repository(&web("admin-ui", "/src/admin")).unwrap();

        assert_eq!(store.get_index().relationships_of(&api_repo.id).len(), 2);
        let ui_rels = store.get_index().relationships_of(&ui.id);
        assert!(ui_rels.iter().all(|r| r.strength > 0.3));

        store.remove_repository(&api_repo.id).unwrap();
        assert_eq!(store.get_index().repositories.len(), 2);
        assert!(store.get_index().relationships_of(&api_repo.id).is_empty());
    }

    #[test]
    fn test_readd_is_idempotent() {
        let mut store = IndexStore::in_memory();
        store.add_repository(&web("shop-ui", "/src/ui")).unwrap();
        store.add_repository(&api("shop-api", "/src/api")).unwrap();
        let before = store.get_index().clone();

        store.add_repository(&web("shop-ui", "/src/ui")).unwrap();
        let after = store.get_index();

        assert_eq!(before.repositories.len(), after.repositories.len());
        assert_eq!(before.relationships.len(), after.relationships.len());
        let strength = |i: &RepositoryIndex| i.relationships[0].strength;
        assert!((strength(&before) - strength(after)).abs() < 1e-12);
    }

    #[test]
    fn test_analysis_id_is_used_when_free() {
        let mut store = IndexStore::in_memory();
        let mut analysis = web("shop-ui", "/src/ui");
        analysis.id = "shop".into();
        assert_eq!(store.add_repository(&analysis).unwrap().id, "shop");

        let mut clash = web("other", "/src/other");
        clash.id = "shop".into();
        let repo = store.add_repository(&clash).unwrap();
        assert_eq!(repo.id, IndexedRepository::path_id("/src/other"));
    }

    #[test]
    fn test_derived_id_never_collides_with_claimed_id() {
        let mut store = IndexStore::in_memory();
        let mut squatter = web("shop-ui", "/src/ui");
        squatter.id = IndexedRepository::path_id("/src/other");
        store.add_repository(&squatter).unwrap();

        let mut clash = api("other", "/src/other");
        clash.id = squatter.id.clone();
        let repo = store.add_repository(&clash).unwrap();
        assert_eq!(repo.id, format!("{}-1", squatter.id));

        let ids: HashSet<&str> = store.get_index().repositories.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_update_repository() {
        let mut store = IndexStore::in_memory();
        let ui = store.add_repository(&web("shop-ui", "/src/ui")).unwrap();
        store.add_repository(&api("shop-api", "/src/api")).unwrap();
        store.add_repository_tag(&ui.id, "team:web").unwrap();

        let updated = store
            .update_repository(&ui.id, &web("shop-ui", "/src/ui").with_languages(&["Rust"]))
            .unwrap();
        assert_eq!(updated.id, ui.id);
        assert!(updated.tags.contains("lang:rust"));
        assert!(!updated.tags.contains("lang:typescript"));
        assert!(updated.tags.contains("team:web"));

        let err = store.update_repository(&ui.id, &web("x", "/src/api")).unwrap_err();
        assert!(matches!(err, IndexError::DuplicatePath(_)));
        assert_eq!(store.get_repository(&ui.id).map(|r| r.path.as_str()), Some("/src/ui"));

        assert!(store.update_repository("repo:missing", &web("x", "/x")).unwrap_err().is_not_found());
    }

    #[test]
    fn test_remove_unknown_repository() {
        let mut store = IndexStore::in_memory();
        assert!(store.remove_repository("repo:nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_tag_lifecycle() {
        let mut store = IndexStore::in_memory();
        let repo = store.add_repository(&web("shop-ui", "/src/ui")).unwrap();

        let tag = store.add_tag("payments", Some("domain"), Some("#ff0000")).unwrap();
        let again = store.add_tag("payments", Some("domain"), None).unwrap();
        assert_eq!(tag, again);
        assert_eq!(store.get_tags().len(), 1);

        store.add_repository_tag(&repo.id, "payments").unwrap();
        assert!(store.get_repository(&repo.id).unwrap().tags.contains("payments"));

        store.remove_tag(&tag.id).unwrap();
        assert!(store.get_tags().is_empty());
        assert!(!store.get_repository(&repo.id).unwrap().tags.contains("payments"));

        assert!(store.remove_tag(&tag.id).unwrap_err().is_not_found());
        assert!(store.remove_repository_tag(&repo.id, "payments").unwrap_err().is_not_found());
        assert!(store.add_repository_tag("repo:nope", "x").unwrap_err().is_not_found());
    }

    #[test]
    fn test_find_similar_orders_by_strength() {
        let mut store = IndexStore::in_memory();
        let ui = store.add_repository(&web("shop-ui", "/src/ui")).unwrap();
        store.add_repository(&api("shop-api", "/src/api")).unwrap();
        store.add_repository(&web("shop-ui-v2", "/src/ui2")).unwrap();

        let similar = store.find_similar_repositories(&ui.id, 10).unwrap();
        assert_eq!(similar.len(), 2);
        assert!(similar[0].relationship.strength >= similar[1].relationship.strength);
        assert_eq!(similar[0].repository.name, "shop-ui-v2");
        assert_eq!(similar[0].relationship.relationship_type, RelationshipType::Fork);

        assert_eq!(store.find_similar_repositories(&ui.id, 1).unwrap().len(), 1);
        assert!(store.find_similar_repositories("repo:nope", 5).is_err());
    }

    #[test]
    fn test_persist_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data").join("index.json");

        let mut store = IndexStore::open(&path);
        store.add_repository(&web("shop-ui", "/src/ui")).unwrap();
        store.add_repository(&api("shop-api", "/src/api")).unwrap();
        assert!(path.exists());
        assert!(!path.with_file_name("index.json.tmp").exists());

        let reopened = IndexStore::open(&path);
        assert_eq!(reopened.get_index(), store.get_index());
    }

    #[test]
    fn test_corrupt_file_falls_back_to_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(IndexStore::load(&path), Err(IndexError::MalformedIndex { .. })));
        let store = IndexStore::open(&path);
        assert!(store.get_index().repositories.is_empty());
    }

    #[test]
    fn test_failed_write_leaves_index_unchanged() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();

        let mut store = IndexStore::open(blocker.join("index.json"));
        let err = store.add_repository(&web("shop-ui", "/src/ui")).unwrap_err();

        assert!(matches!(err, IndexError::Persistence { .. }));
        assert!(store.get_index().repositories.is_empty());
    }

    #[test]
    fn test_set_index_drops_dangling_relationships() {
        let mut source = IndexStore::in_memory();
        let ui = source.add_repository(&web("shop-ui", "/src/ui")).unwrap();
        let api_repo = source.add_repository(&api("shop-api", "/src/api")).unwrap();

        let mut index = source.get_index().clone();
        let mut reversed = index.relationships[0].clone();
        std::mem::swap(&mut reversed.source_id, &mut reversed.target_id);
        index.relationships.push(reversed);
        index.repositories.retain(|r| r.id == ui.id || r.id == api_repo.id);
        let mut ghost = index.relationships[0].clone();
        ghost.target_id = "repo:ghost".into();
        index.relationships.push(ghost);

        let mut store = IndexStore::in_memory();
        store.set_index(index).unwrap();
        assert_eq!(store.get_index().relationships.len(), 1);
    }

    #[test]
    fn test_graph_layout_is_seeded() {
        let mut store = IndexStore::in_memory();
        store.add_repository(&web("shop-ui", "/src/ui")).unwrap();
        store.add_repository(&api("shop-api", "/src/api")).unwrap();

        let a = store.generate_relationship_graph_seeded(None, &mut SeededRandom::new(42));
        let b = store.generate_relationship_graph_seeded(None, &mut SeededRandom::new(42));
        assert_eq!(a, b);
        assert!(a.nodes.iter().all(|n| n.position.is_some()));
        assert_eq!(a.edges.len(), 1);
    }
}
