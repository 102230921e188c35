// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Relationship graph projected from the repository index

use crate::classify::{capabilities, NodeType};
use crate::cluster::{generate_clusters, Cluster};
use crate::error::Result;
use crate::types::{IndexedRepository, Position, RelationshipType, RepositoryIndex, RepositoryRelationship};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt::Write as _;

/// A repository node in the relationship graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Repository ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Inferred role
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Languages
    pub languages: Vec<String>,
    /// Frameworks
    pub frameworks: Vec<String>,
    /// Size in bytes
    pub size: u64,
    /// Complexity score
    pub complexity: f64,
    /// Tags
    pub tags: BTreeSet<String>,
    /// Layout position, once a layout has run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl GraphNode {
    fn from_repository(repo: &IndexedRepository) -> Self {
        Self {
            id: repo.id.clone(),
            name: repo.name.clone(),
            node_type: capabilities(repo).node_type(),
            languages: repo.languages.clone(),
            frameworks: repo.frameworks.clone(),
            size: repo.size,
            complexity: repo.complexity,
            tags: repo.tags.clone(),
            position: None,
        }
    }
}

/// A relationship edge in the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    /// Source repository ID
    pub source: String,
    /// Target repository ID
    pub target: String,
    /// Relationship classification
    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,
    /// Strength in [0, 1]
    pub strength: f64,
    /// Explanation
    pub reason: String,
}

impl From<&RepositoryRelationship> for GraphEdge {
    fn from(rel: &RepositoryRelationship) -> Self {
        Self {
            source: rel.source_id.clone(),
            target: rel.target_id.clone(),
            relationship_type: rel.relationship_type,
            strength: rel.strength,
            reason: rel.reason.clone(),
        }
    }
}

/// Nodes, edges and clusters for a selection of the index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipGraph {
    /// Selected repositories
    pub nodes: Vec<GraphNode>,
    /// Relationships with both endpoints selected
    pub edges: Vec<GraphEdge>,
    /// Disjoint clusters over the selection
    pub clusters: Vec<Cluster>,
}

impl RelationshipGraph {
    /// Position of a node in `nodes`
    #[must_use]
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    /// Get a node by repository ID
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Get node count
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get edge count
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Check if the graph is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Export to DOT format for Graphviz
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("graph repositories {\n");
        dot.push_str("  layout=neato;\n");
        dot.push_str("  node [shape=box, style=rounded];\n\n");

        for node in &self.nodes {
            let _ = write!(dot, "  \"{}\" [label=\"{}\\n{}\"", node.id, escape(&node.name), node.node_type);
            if let Some(p) = node.position {
                let _ = write!(dot, ", pos=\"{:.1},{:.1}!\"", p.x, p.y);
            }
            dot.push_str("];\n");
        }

        dot.push('\n');

        for edge in &self.edges {
            let _ = writeln!(
                dot,
                "  \"{}\" -- \"{}\" [label=\"{} {:.2}\"];",
                edge.source, edge.target, edge.relationship_type, edge.strength
            );
        }

        for cluster in &self.clusters {
            let _ = writeln!(dot, "\n  subgraph cluster_{} {{", cluster.id.replace([':', '.', '-', '#', '+'], "_"));
            let _ = writeln!(dot, "    label=\"{}\";", escape(&cluster.name));
            let _ = writeln!(dot, "    color=\"{}\";", cluster.color);
            dot.push_str("    style=dashed;\n");
            for member in &cluster.repository_ids {
                let _ = writeln!(dot, "    \"{member}\";");
            }
            dot.push_str("  }\n");
        }

        dot.push_str("}\n");
        dot
    }

    /// Export to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Build the relationship graph for `ids`, or for the whole index when `None`.
///
/// Unknown IDs are ignored. Nodes keep index order.
#[must_use]
pub fn build_graph(index: &RepositoryIndex, ids: Option<&[String]>) -> RelationshipGraph {
    let wanted: Option<HashSet<&str>> = ids.map(|ids| ids.iter().map(String::as_str).collect());
    let selected: Vec<&IndexedRepository> = index
        .repositories
        .iter()
        .filter(|r| wanted.as_ref().map_or(true, |w| w.contains(r.id.as_str())))
        .collect();

    let selected_ids: HashSet<&str> = selected.iter().map(|r| r.id.as_str()).collect();
    let relationships: Vec<&RepositoryRelationship> = index
        .relationships
        .iter()
        .filter(|r| selected_ids.contains(r.source_id.as_str()) && selected_ids.contains(r.target_id.as_str()))
        .collect();

    RelationshipGraph {
        nodes: selected.iter().map(|r| GraphNode::from_repository(r)).collect(),
        edges: relationships.iter().map(|r| GraphEdge::from(*r)).collect(),
        clusters: generate_clusters(&selected, &relationships),
    }
}
