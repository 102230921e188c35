// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Cluster analysis over indexed repositories
//!
//! Three greedy passes run in order: shared language, shared framework, then
//! connected components over strong relationships. A repository claimed by an
//! earlier cluster is never placed in a later one, so clusters are disjoint.

use crate::types::{IndexedRepository, RepositoryRelationship};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::Dfs;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Relationships must be stronger than this to connect a component
pub const CONNECTIVITY_THRESHOLD: f64 = 0.5;

/// Minimum cluster size
const MIN_CLUSTER_SIZE: usize = 2;

/// Fallback palette, cycled by cluster ordinal
pub const PALETTE: [&str; 16] = [
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
    "#9c755f", "#bab0ac", "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b",
];

const LANGUAGE_COLORS: &[(&str, &str)] = &[
    ("javascript", "#f1e05a"),
    ("typescript", "#3178c6"),
    ("python", "#3572a5"),
    ("java", "#b07219"),
    ("go", "#00add8"),
    ("rust", "#dea584"),
    ("ruby", "#701516"),
    ("php", "#4f5d95"),
    ("c#", "#178600"),
    ("c++", "#f34b7d"),
    ("c", "#555555"),
    ("swift", "#f05138"),
    ("kotlin", "#a97bff"),
];

const FRAMEWORK_COLORS: &[(&str, &str)] = &[
    ("react", "#61dafb"),
    ("vue", "#42b883"),
    ("angular", "#dd0031"),
    ("svelte", "#ff3e00"),
    ("next.js", "#111111"),
    ("nuxt", "#00dc82"),
    ("express", "#68a063"),
    ("django", "#092e20"),
    ("flask", "#3bacb6"),
    ("fastapi", "#009688"),
    ("spring", "#6db33f"),
    ("rails", "#cc0000"),
    ("laravel", "#ff2d20"),
];

/// Basis a cluster was formed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterKind {
    /// Shared language
    Language,
    /// Shared framework
    Framework,
    /// Connected through strong relationships
    Connected,
}

/// A group of related repositories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    /// Identifier: cluster:<kind>:<key>
    pub id: String,
    /// Display name
    pub name: String,
    /// What the members share
    pub kind: ClusterKind,
    /// Member repository IDs in index order
    pub repository_ids: Vec<String>,
    /// Display color
    pub color: String,
}

fn table_color(table: &[(&str, &str)], key: &str, ordinal: usize) -> String {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map_or(PALETTE[ordinal % PALETTE.len()], |(_, c)| *c)
        .to_string()
}

/// Group values to member positions, keyed case-insensitively in first-seen order
fn group_by<'a, F>(repos: &[&'a IndexedRepository], values: F) -> Vec<(String, String, Vec<usize>)>
where
    F: Fn(&'a IndexedRepository) -> &'a [String],
{
    let mut groups: Vec<(String, String, Vec<usize>)> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for (pos, repo) in repos.iter().enumerate() {
        for value in values(*repo) {
            let key = value.to_lowercase();
            let slot = *slots.entry(key.clone()).or_insert_with(|| {
                groups.push((key, value.clone(), Vec::new()));
                groups.len() - 1
            });
            let members = &mut groups[slot].2;
            if members.last() != Some(&pos) {
                members.push(pos);
            }
        }
    }

    groups
}

/// Generate disjoint clusters for a set of repositories.
///
/// `relationships` may reference repositories outside `repos`; those are ignored.
#[must_use]
pub fn generate_clusters(
    repos: &[&IndexedRepository],
    relationships: &[&RepositoryRelationship],
) -> Vec<Cluster> {
    let mut clusters = Vec::new();
    let mut claimed = vec![false; repos.len()];

    let passes: [(ClusterKind, &[(&str, &str)]); 2] = [
        (ClusterKind::Language, LANGUAGE_COLORS),
        (ClusterKind::Framework, FRAMEWORK_COLORS),
    ];
    for (kind, colors) in passes {
        let groups = match kind {
            ClusterKind::Language => group_by(repos, |r| r.languages.as_slice()),
            _ => group_by(repos, |r| r.frameworks.as_slice()),
        };

        for (key, label, members) in groups {
            let members: Vec<usize> = members.into_iter().filter(|&m| !claimed[m]).collect();
            if members.len() < MIN_CLUSTER_SIZE {
                continue;
            }
            for &m in &members {
                claimed[m] = true;
            }
            let (prefix, noun) = match kind {
                ClusterKind::Language => ("lang", "repositories"),
                _ => ("framework", "projects"),
            };
            clusters.push(Cluster {
                id: format!("cluster:{prefix}:{key}"),
                name: format!("{label} {noun}"),
                kind,
                repository_ids: members.iter().map(|&m| repos[m].id.clone()).collect(),
                color: table_color(colors, &key, clusters.len()),
            });
        }
    }

    for component in connected_components(repos, relationships, &claimed) {
        let ordinal = clusters.len();
        clusters.push(Cluster {
            id: format!("cluster:connected:{ordinal}"),
            name: format!("Connected group {}", ordinal + 1),
            kind: ClusterKind::Connected,
            repository_ids: component.iter().map(|&m| repos[m].id.clone()).collect(),
            color: PALETTE[ordinal % PALETTE.len()].to_string(),
        });
    }

    clusters
}

/// Components of size >= 2 among unclaimed repositories, via depth-first search
fn connected_components(
    repos: &[&IndexedRepository],
    relationships: &[&RepositoryRelationship],
    claimed: &[bool],
) -> Vec<Vec<usize>> {
    let mut graph: UnGraph<usize, f64> = UnGraph::new_undirected();
    let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();
    for (pos, repo) in repos.iter().enumerate() {
        if !claimed[pos] {
            nodes.insert(repo.id.as_str(), graph.add_node(pos));
        }
    }

    for rel in relationships.iter().filter(|r| r.strength > CONNECTIVITY_THRESHOLD) {
        if let (Some(&a), Some(&b)) = (nodes.get(rel.source_id.as_str()), nodes.get(rel.target_id.as_str())) {
            graph.add_edge(a, b, rel.strength);
        }
    }

    let mut visited: HashSet<NodeIndex> = HashSet::new();
    let mut components = Vec::new();
    for start in graph.node_indices() {
        if visited.contains(&start) {
            continue;
        }
        let mut dfs = Dfs::new(&graph, start);
        let mut component = Vec::new();
        while let Some(node) = dfs.next(&graph) {
            visited.insert(node);
            component.push(graph[node]);
        }
        if component.len() >= MIN_CLUSTER_SIZE {
            component.sort_unstable();
            components.push(component);
        }
    }

    components
}
