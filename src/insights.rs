// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Index-wide relationship statistics

use crate::cluster::generate_clusters;
use crate::combine::{self, IntegrationOpportunity, DEFAULT_LIMIT, INSIGHTS_LIMIT};
use crate::error::Result;
use crate::types::{IndexedRepository, RelationshipType, RepositoryIndex, RepositoryRelationship};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Entries kept in the top-N lists
pub const TOP_N: usize = 5;
/// Most connected repositories considered for opportunities
pub const OPPORTUNITY_CANDIDATES: usize = 12;

/// A repository ranked by relationship count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedRepository {
    /// Repository ID
    pub id: String,
    /// Repository name
    pub name: String,
    /// Number of relationships
    pub connections: usize,
    /// Mean strength of those relationships
    pub average_strength: f64,
}

/// Summary statistics over the whole index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipInsights {
    /// Number of repositories
    pub total_repositories: usize,
    /// Number of relationships
    pub total_relationships: usize,
    /// Relationship count per type, every type present
    pub relationships_by_type: BTreeMap<RelationshipType, usize>,
    /// Mean relationship strength (0 when there are none)
    pub average_strength: f64,
    /// Strongest relationships first
    pub strongest_relationships: Vec<RepositoryRelationship>,
    /// Repositories with the most relationships
    pub most_connected: Vec<ConnectedRepository>,
    /// Repositories per language, keyed lowercase
    pub language_distribution: BTreeMap<String, usize>,
    /// Repositories per framework, keyed lowercase
    pub framework_distribution: BTreeMap<String, usize>,
    /// IDs of repositories without relationships
    pub isolated_repositories: Vec<String>,
    /// Number of clusters over the whole index
    pub cluster_count: usize,
    /// Best integration opportunities among the most connected repositories
    pub top_opportunities: Vec<IntegrationOpportunity>,
}

/// Compute insights for the whole index
#[must_use]
pub fn generate_relationship_insights(index: &RepositoryIndex) -> RelationshipInsights {
    let relationships = &index.relationships;

    let mut by_type: BTreeMap<RelationshipType, usize> =
        RelationshipType::ALL.iter().map(|t| (*t, 0)).collect();
    for rel in relationships {
        *by_type.entry(rel.relationship_type).or_default() += 1;
    }

    let average_strength = if relationships.is_empty() {
        0.0
    } else {
        relationships.iter().map(|r| r.strength).sum::<f64>() / relationships.len() as f64
    };

    let mut strongest = relationships.clone();
    strongest.sort_by(|a, b| b.strength.total_cmp(&a.strength));
    strongest.truncate(TOP_N);

    let ranked = rank_by_connections(index);
    let most_connected: Vec<ConnectedRepository> = ranked
        .iter()
        .filter(|c| c.connections > 0)
        .take(TOP_N)
        .cloned()
        .collect();
    let isolated_repositories = ranked
        .iter()
        .filter(|c| c.connections == 0)
        .map(|c| c.id.clone())
        .collect::<Vec<_>>();

    let repos: Vec<&IndexedRepository> = index.repositories.iter().collect();
    let rels: Vec<&RepositoryRelationship> = relationships.iter().collect();
    let cluster_count = generate_clusters(&repos, &rels).len();

    let candidates: Vec<&IndexedRepository> = ranked
        .iter()
        .take(OPPORTUNITY_CANDIDATES)
        .filter_map(|c| index.repository(&c.id))
        .collect();

    RelationshipInsights {
        total_repositories: index.repositories.len(),
        total_relationships: relationships.len(),
        relationships_by_type: by_type,
        average_strength,
        strongest_relationships: strongest,
        most_connected,
        language_distribution: distribution(index.repositories.iter().flat_map(|r| &r.languages)),
        framework_distribution: distribution(index.repositories.iter().flat_map(|r| &r.frameworks)),
        isolated_repositories,
        cluster_count,
        top_opportunities: combine::rank(&candidates, INSIGHTS_LIMIT),
    }
}

/// Integration opportunities over `ids`, or over the whole index when `None`
pub fn analyze_integration_opportunities(
    index: &RepositoryIndex,
    ids: Option<&[String]>,
) -> Result<Vec<IntegrationOpportunity>> {
    match ids {
        Some(ids) => combine::suggest_combinations(index, ids, DEFAULT_LIMIT),
        None => {
            let all: Vec<&IndexedRepository> = index.repositories.iter().collect();
            Ok(combine::rank(&all, DEFAULT_LIMIT))
        }
    }
}

/// Every repository with its relationship count, most connected first, ties in index order
fn rank_by_connections(index: &RepositoryIndex) -> Vec<ConnectedRepository> {
    let mut stats: HashMap<&str, (usize, f64)> = HashMap::new();
    for rel in &index.relationships {
        for id in [rel.source_id.as_str(), rel.target_id.as_str()] {
            let entry = stats.entry(id).or_default();
            entry.0 += 1;
            entry.1 += rel.strength;
        }
    }

    let mut ranked: Vec<ConnectedRepository> = index
        .repositories
        .iter()
        .map(|repo| {
            let (connections, total) = stats.get(repo.id.as_str()).copied().unwrap_or_default();
            ConnectedRepository {
                id: repo.id.clone(),
                name: repo.name.clone(),
                connections,
                average_strength: if connections == 0 { 0.0 } else { total / connections as f64 },
            }
        })
        .collect();
    ranked.sort_by(|a, b| b.connections.cmp(&a.connections));
    ranked
}

fn distribution<'a>(values: impl Iterator<Item = &'a String>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for value in values {
        *counts.entry(value.to_lowercase()).or_default() += 1;
    }
    counts
}
