// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Repolink library - index analyzed repositories and discover how they relate
//!
//! This crate keeps a persistent index of analyzed repositories, scores and
//! classifies pairwise relationships between them, and projects the result
//! into search results, relationship graphs, clusters, layouts and ranked
//! integration suggestions.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod classify;
pub mod cluster;
pub mod combine;
pub mod config;
pub mod error;
pub mod extract;
pub mod graph;
pub mod insights;
pub mod layout;
pub mod search;
pub mod shared;
pub mod similarity;
pub mod store;
pub mod telemetry;

/// Core data types for the repository index
pub mod types {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use sha2::{Digest, Sha256};
    use std::collections::BTreeSet;
    use std::fmt;

    // =========================================================================
    // Analysis Input
    // =========================================================================

    /// Executive insights produced by the upstream analysis pipeline
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AnalysisInsights {
        /// Narrative summary of the repository
        #[serde(default)]
        pub executive_summary: Option<String>,
    }

    /// Complexity metrics of a completed code analysis
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ComplexityMetrics {
        /// Maintainability index, when the analyzer computed one
        #[serde(default)]
        pub maintainability_index: Option<f64>,
    }

    /// Code-level counters of a completed analysis
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CodeAnalysis {
        /// Number of functions found
        #[serde(default)]
        pub function_count: u64,
        /// Number of classes found
        #[serde(default)]
        pub class_count: u64,
        /// Complexity metrics
        #[serde(default)]
        pub complexity: Option<ComplexityMetrics>,
    }

    /// A completed repository analysis, as produced by the analysis pipeline
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RepositoryAnalysis {
        /// Identifier assigned by the pipeline (may be empty)
        #[serde(default)]
        pub id: String,
        /// Repository name
        pub name: String,
        /// Filesystem path of the analyzed checkout
        pub path: String,
        /// Detected languages
        #[serde(default)]
        pub languages: Vec<String>,
        /// Detected frameworks
        #[serde(default)]
        pub frameworks: Vec<String>,
        /// Number of analyzed files
        #[serde(default)]
        pub file_count: u64,
        /// Total size in bytes
        #[serde(default)]
        pub total_size: u64,
        /// When the analysis finished
        #[serde(default)]
        pub updated_at: DateTime<Utc>,
        /// Short description
        #[serde(default)]
        pub description: Option<String>,
        /// Narrative insights
        #[serde(default)]
        pub insights: Option<AnalysisInsights>,
        /// Code counters
        #[serde(default)]
        pub code_analysis: Option<CodeAnalysis>,
    }

    impl RepositoryAnalysis {
        /// Start an analysis record for the given name and path
        #[must_use]
        pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                path: path.into(),
                updated_at: Utc::now(),
                ..Self::default()
            }
        }

        /// Set the detected languages
        #[must_use]
        pub fn with_languages(mut self, languages: &[&str]) -> Self {
            self.languages = languages.iter().map(|l| (*l).to_string()).collect();
            self
        }

        /// Set the detected frameworks
        #[must_use]
        pub fn with_frameworks(mut self, frameworks: &[&str]) -> Self {
            self.frameworks = frameworks.iter().map(|f| (*f).to_string()).collect();
            self
        }

        /// Set the total size in bytes
        #[must_use]
        pub fn with_size(mut self, total_size: u64) -> Self {
            self.total_size = total_size;
            self
        }

        /// Set the description
        #[must_use]
        pub fn with_description(mut self, description: impl Into<String>) -> Self {
            self.description = Some(description.into());
            self
        }

        /// Set the maintainability index used as complexity score
        #[must_use]
        pub fn with_maintainability(mut self, index: f64) -> Self {
            let analysis = self.code_analysis.get_or_insert_with(CodeAnalysis::default);
            analysis.complexity = Some(ComplexityMetrics {
                maintainability_index: Some(index),
            });
            self
        }
    }

    // =========================================================================
    // Indexed Repository
    // =========================================================================

    /// A repository entry in the index
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct IndexedRepository {
        /// Stable unique identifier
        pub id: String,
        /// Display name
        pub name: String,
        /// Filesystem path, unique across the index
        pub path: String,
        /// Languages in first-seen order
        #[serde(default)]
        pub languages: Vec<String>,
        /// Frameworks in first-seen order
        #[serde(default)]
        pub frameworks: Vec<String>,
        /// Derived and user tags
        #[serde(default)]
        pub tags: BTreeSet<String>,
        /// Short summary text
        #[serde(default)]
        pub summary: String,
        /// Size in bytes
        #[serde(default)]
        pub size: u64,
        /// Complexity score
        #[serde(default)]
        pub complexity: f64,
        /// When the repository was last analyzed
        pub last_analyzed: DateTime<Utc>,
    }

    impl IndexedRepository {
        /// Generate a deterministic ID from a filesystem path
        #[must_use]
        pub fn path_id(path: &str) -> String {
            let mut hasher = Sha256::new();
            hasher.update(path.as_bytes());
            let hash = hex::encode(hasher.finalize());
            format!("repo:{}", &hash[..12])
        }

        /// Case-insensitive language membership
        #[must_use]
        pub fn has_language(&self, language: &str) -> bool {
            self.languages.iter().any(|l| l.eq_ignore_ascii_case(language))
        }

        /// Case-insensitive framework membership
        #[must_use]
        pub fn has_framework(&self, framework: &str) -> bool {
            self.frameworks.iter().any(|f| f.eq_ignore_ascii_case(framework))
        }
    }

    // =========================================================================
    // Relationships
    // =========================================================================

    /// Kind of relationship between two repositories
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum RelationshipType {
        /// Repositories solve similar problems with similar stacks
        Similar,
        /// Repositories play roles that fit together
        Complementary,
        /// One repository is likely consumed by the other
        Dependency,
        /// One repository is likely a fork of the other
        Fork,
    }

    impl RelationshipType {
        /// All relationship types
        pub const ALL: [Self; 4] = [Self::Similar, Self::Complementary, Self::Dependency, Self::Fork];

        /// Lowercase name
        #[must_use]
        pub fn as_str(&self) -> &'static str {
            match self {
                Self::Similar => "similar",
                Self::Complementary => "complementary",
                Self::Dependency => "dependency",
                Self::Fork => "fork",
            }
        }
    }

    impl fmt::Display for RelationshipType {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    /// Stored relationship between two indexed repositories
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RepositoryRelationship {
        /// Repository the relationship was computed for
        pub source_id: String,
        /// The other repository
        pub target_id: String,
        /// Relationship classification
        #[serde(rename = "type")]
        pub relationship_type: RelationshipType,
        /// Similarity score in [0, 1]
        pub strength: f64,
        /// Human-readable explanation
        pub reason: String,
    }

    impl RepositoryRelationship {
        /// Whether either endpoint is `id`
        #[must_use]
        pub fn involves(&self, id: &str) -> bool {
            self.source_id == id || self.target_id == id
        }

        /// The endpoint opposite to `id`
        #[must_use]
        pub fn other_end(&self, id: &str) -> Option<&str> {
            if self.source_id == id {
                Some(self.target_id.as_str())
            } else if self.target_id == id {
                Some(self.source_id.as_str())
            } else {
                None
            }
        }
    }

    // =========================================================================
    // Tags
    // =========================================================================

    /// A user-defined tag
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Tag {
        /// Unique identifier: tag:<hash of name and category>
        pub id: String,
        /// Tag name (not unique across categories)
        pub name: String,
        /// Optional category
        #[serde(default)]
        pub category: Option<String>,
        /// Optional display color
        #[serde(default)]
        pub color: Option<String>,
    }

    impl Tag {
        /// Generate a deterministic ID for a tag
        #[must_use]
        pub fn generate_id(name: &str, category: Option<&str>) -> String {
            let mut hasher = Sha256::new();
            hasher.update(name.as_bytes());
            if let Some(c) = category {
                hasher.update([0u8]);
                hasher.update(c.as_bytes());
            }
            let hash = hex::encode(hasher.finalize());
            format!("tag:{}", &hash[..8])
        }
    }

    // =========================================================================
    // Index Aggregate
    // =========================================================================

    /// The complete persisted index
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RepositoryIndex {
        /// All repositories
        #[serde(default)]
        pub repositories: Vec<IndexedRepository>,
        /// All relationships
        #[serde(default)]
        pub relationships: Vec<RepositoryRelationship>,
        /// All tags
        #[serde(default)]
        pub tags: Vec<Tag>,
        /// Last mutation time
        pub last_updated: DateTime<Utc>,
    }

    impl Default for RepositoryIndex {
        fn default() -> Self {
            Self {
                repositories: Vec::new(),
                relationships: Vec::new(),
                tags: Vec::new(),
                last_updated: Utc::now(),
            }
        }
    }

    impl RepositoryIndex {
        /// Get a repository by ID
        #[must_use]
        pub fn repository(&self, id: &str) -> Option<&IndexedRepository> {
            self.repositories.iter().find(|r| r.id == id)
        }

        /// Get a repository by path
        #[must_use]
        pub fn repository_by_path(&self, path: &str) -> Option<&IndexedRepository> {
            self.repositories.iter().find(|r| r.path == path)
        }

        /// Relationships touching a repository
        #[must_use]
        pub fn relationships_of(&self, id: &str) -> Vec<&RepositoryRelationship> {
            self.relationships.iter().filter(|r| r.involves(id)).collect()
        }
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Position in 2D space
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Position {
        /// X coordinate
        pub x: f64,
        /// Y coordinate
        pub y: f64,
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::error::{IndexError, Result};
    pub use crate::store::IndexStore;
    pub use crate::types::*;
}
