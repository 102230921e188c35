// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Integration opportunity suggestions
//!
//! Every subset of 2 to 4 candidate repositories is scored on average pairwise
//! similarity plus four synergy factors:
//!
//! | Factor                       | Weight |
//! |------------------------------|--------|
//! | architecture fit             | 0.3    |
//! | technology synergy           | 0.2    |
//! | functional complementarity   | 0.3    |
//! | workflow compatibility       | 0.2    |

use crate::classify::{
    capabilities, ecosystems, pair_listed, patterns, purposes, Capabilities, Ecosystem, Pattern,
    COMPLEMENTARY_LANGUAGES, COMPLEMENTARY_PURPOSES, FRAMEWORK_COMPATIBILITY,
};
use crate::error::{IndexError, Result};
use crate::similarity::similarity;
use crate::types::{IndexedRepository, RepositoryIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;

/// Largest combination considered
pub const MAX_COMBINATION_SIZE: usize = 4;
/// Suggestions returned by default
pub const DEFAULT_LIMIT: usize = 10;
/// Suggestions included in relationship insights
pub const INSIGHTS_LIMIT: usize = 5;
/// Opportunities at or below this score are discarded
pub const OPPORTUNITY_THRESHOLD: f64 = 0.3;

const ARCHITECTURE_WEIGHT: f64 = 0.3;
const TECH_WEIGHT: f64 = 0.2;
const FUNCTIONAL_WEIGHT: f64 = 0.3;
const WORKFLOW_WEIGHT: f64 = 0.2;

const FULL_STACK_BONUS: f64 = 0.4;
const MOBILE_BACKEND_BONUS: f64 = 0.3;
const MICROSERVICES_BONUS: f64 = 0.2;
const LIBRARY_ECOSYSTEM_BONUS: f64 = 0.3;

const DOMINANT_ECOSYSTEM_WEIGHT: f64 = 0.5;
const COMPLEMENTARY_PAIR_BONUS: f64 = 0.1;
const COMPLEMENTARY_PURPOSE_BONUS: f64 = 0.3;
const PURPOSE_DIVERSITY_STEP: f64 = 0.1;
const PURPOSE_DIVERSITY_MAX: f64 = 0.3;

/// Architectural shape of a suggested combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpportunityKind {
    /// Frontend plus backend
    FullStack,
    /// Mobile app plus backend
    MobileBackend,
    /// Several services
    Microservices,
    /// Library plus consumers
    LibraryEcosystem,
    /// No recognised shape
    General,
}

impl OpportunityKind {
    /// Human-readable label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::FullStack => "full-stack application",
            Self::MobileBackend => "mobile app with backend",
            Self::Microservices => "microservice platform",
            Self::LibraryEcosystem => "library ecosystem",
            Self::General => "general integration",
        }
    }
}

/// Individual factor values behind an opportunity score
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    /// Average pairwise similarity
    pub similarity: f64,
    /// Architecture fit
    pub architecture: f64,
    /// Technology synergy
    pub tech_synergy: f64,
    /// Functional complementarity
    pub functional: f64,
    /// Workflow compatibility
    pub workflow: f64,
}

impl ScoreBreakdown {
    /// Combined score, clamped to `[0, 1]`
    #[must_use]
    pub fn total(&self) -> f64 {
        (self.similarity
            + ARCHITECTURE_WEIGHT * self.architecture
            + TECH_WEIGHT * self.tech_synergy
            + FUNCTIONAL_WEIGHT * self.functional
            + WORKFLOW_WEIGHT * self.workflow)
            .clamp(0.0, 1.0)
    }
}

/// A suggested combination of repositories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationOpportunity {
    /// Member repository IDs
    pub repository_ids: Vec<String>,
    /// Member names, same order as the IDs
    pub repository_names: Vec<String>,
    /// Overall score in `(0.3, 1]`
    pub score: f64,
    /// Architectural shape
    pub kind: OpportunityKind,
    /// Factor values
    pub breakdown: ScoreBreakdown,
    /// Why the combination fits
    pub rationale: Vec<String>,
    /// Where the members would connect
    pub integration_points: Vec<String>,
}

/// All `k`-element index combinations of `0..n` in lexicographic order
#[must_use]
pub fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    if k == 0 || k > n {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut current: Vec<usize> = (0..k).collect();
    loop {
        out.push(current.clone());

        // Rightmost slot that can still advance
        let Some(slot) = (0..k).rev().find(|&i| current[i] < n - k + i) else {
            break;
        };
        current[slot] += 1;
        for i in slot + 1..k {
            current[i] = current[i - 1] + 1;
        }
    }
    out
}

/// Rank combinations of the given repositories.
///
/// Duplicate IDs are collapsed; an unknown ID fails with `NotFound`.
pub fn suggest_combinations(
    index: &RepositoryIndex,
    ids: &[String],
    limit: usize,
) -> Result<Vec<IntegrationOpportunity>> {
    let mut seen = HashSet::new();
    let mut members: Vec<&IndexedRepository> = Vec::new();
    for id in ids {
        if !seen.insert(id.as_str()) {
            continue;
        }
        members.push(index.repository(id).ok_or_else(|| IndexError::repository(id.clone()))?);
    }
    Ok(rank(&members, limit))
}

/// Rank combinations of already resolved repositories
#[must_use]
pub fn rank(members: &[&IndexedRepository], limit: usize) -> Vec<IntegrationOpportunity> {
    let n = members.len();
    let profiles: Vec<Profile> = members.iter().map(|r| Profile::new(r)).collect();

    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in i + 1..n {
            let score = similarity(members[i], members[j]).score;
            matrix[i][j] = score;
            matrix[j][i] = score;
        }
    }

    let mut opportunities = Vec::new();
    for size in 2..=MAX_COMBINATION_SIZE.min(n) {
        for combo in combinations(n, size) {
            let opportunity = evaluate(&combo, members, &profiles, &matrix);
            if opportunity.score > OPPORTUNITY_THRESHOLD {
                opportunities.push(opportunity);
            }
        }
    }
    debug!(candidates = n, kept = opportunities.len(), "Scored combinations");

    opportunities.sort_by(|a, b| b.score.total_cmp(&a.score));
    opportunities.truncate(limit);
    opportunities
}

/// Classifier output computed once per repository
struct Profile {
    caps: Capabilities,
    patterns: BTreeSet<Pattern>,
    ecosystems: BTreeSet<Ecosystem>,
    purposes: BTreeSet<&'static str>,
}

impl Profile {
    fn new(repo: &IndexedRepository) -> Self {
        Self {
            caps: capabilities(repo),
            patterns: patterns(repo),
            ecosystems: ecosystems(repo),
            purposes: purposes(repo),
        }
    }
}

fn evaluate(
    combo: &[usize],
    repos: &[&IndexedRepository],
    profiles: &[Profile],
    matrix: &[Vec<f64>],
) -> IntegrationOpportunity {
    let members: Vec<&IndexedRepository> = combo.iter().map(|&i| repos[i]).collect();
    let profs: Vec<&Profile> = combo.iter().map(|&i| &profiles[i]).collect();

    let mut pair_sum = 0.0;
    let mut pairs = 0usize;
    for (x, &i) in combo.iter().enumerate() {
        for &j in &combo[x + 1..] {
            pair_sum += matrix[i][j];
            pairs += 1;
        }
    }

    let (kind, architecture) = architecture_fit(&profs);
    let (tech_synergy, dominant) = tech_synergy(&members, &profs);
    let (functional, purpose_pairs) = functional_fit(&profs);

    let breakdown = ScoreBreakdown {
        similarity: if pairs == 0 { 0.0 } else { pair_sum / pairs as f64 },
        architecture,
        tech_synergy,
        functional,
        workflow: workflow_fit(&members),
    };

    let mut rationale = vec![format!(
        "Forms a {} ({} repositories)",
        kind.label(),
        members.len()
    )];
    rationale.push(format!("Average pairwise similarity {:.2}", breakdown.similarity));
    if let Some(eco) = dominant {
        rationale.push(format!("Shares the {} ecosystem", eco.as_str()));
    }
    for (a, b) in &purpose_pairs {
        rationale.push(format!("Covers complementary concerns: {a} and {b}"));
    }
    if breakdown.workflow > 0.7 {
        rationale.push("Comparable size and complexity".to_string());
    }

    IntegrationOpportunity {
        repository_ids: members.iter().map(|r| r.id.clone()).collect(),
        repository_names: members.iter().map(|r| r.name.clone()).collect(),
        score: breakdown.total(),
        kind,
        breakdown,
        rationale,
        integration_points: integration_points(&members, &profs, dominant),
    }
}

fn architecture_fit(profs: &[&Profile]) -> (OpportunityKind, f64) {
    let any = |f: fn(&Capabilities) -> bool| profs.iter().any(|p| f(&p.caps));
    let backends = profs.iter().filter(|p| p.caps.backend).count();
    let microservice = profs.iter().any(|p| p.patterns.contains(&Pattern::Microservices));
    let library = any(|c| c.library);
    let consumer = profs.iter().any(|p| !p.caps.library && p.caps.application);

    let mut score = 0.0;
    let mut kind = None;
    let mut take = |applies: bool, k: OpportunityKind, bonus: f64| {
        if applies {
            score += bonus;
            kind.get_or_insert(k);
        }
    };
    take(any(|c| c.frontend) && backends > 0, OpportunityKind::FullStack, FULL_STACK_BONUS);
    take(any(|c| c.mobile) && backends > 0, OpportunityKind::MobileBackend, MOBILE_BACKEND_BONUS);
    take(backends >= 2 || microservice, OpportunityKind::Microservices, MICROSERVICES_BONUS);
    take(library && consumer, OpportunityKind::LibraryEcosystem, LIBRARY_ECOSYSTEM_BONUS);

    (kind.unwrap_or(OpportunityKind::General), f64::min(score, 1.0))
}

fn tech_synergy(members: &[&IndexedRepository], profs: &[&Profile]) -> (f64, Option<Ecosystem>) {
    let mut counts: BTreeMap<Ecosystem, usize> = BTreeMap::new();
    for prof in profs {
        for eco in &prof.ecosystems {
            *counts.entry(*eco).or_default() += 1;
        }
    }
    // Ties resolve to the first ecosystem in declaration order
    let dominant = counts
        .iter()
        .fold(None, |best: Option<(Ecosystem, usize)>, (&eco, &count)| match best {
            Some((_, c)) if c >= count => best,
            _ => Some((eco, count)),
        });

    let mut score = dominant.map_or(0.0, |(_, count)| {
        DOMINANT_ECOSYSTEM_WEIGHT * count as f64 / members.len() as f64
    });

    for (x, a) in members.iter().enumerate() {
        for b in &members[x + 1..] {
            for la in &a.languages {
                for lb in &b.languages {
                    if pair_listed(COMPLEMENTARY_LANGUAGES, la, lb) {
                        score += COMPLEMENTARY_PAIR_BONUS;
                    }
                }
            }
            for fa in &a.frameworks {
                for fb in &b.frameworks {
                    if pair_listed(FRAMEWORK_COMPATIBILITY, fa, fb) {
                        score += COMPLEMENTARY_PAIR_BONUS;
                    }
                }
            }
        }
    }

    let shared = dominant.filter(|&(_, count)| count >= 2).map(|(eco, _)| eco);
    (score.min(1.0), shared)
}

fn functional_fit(profs: &[&Profile]) -> (f64, Vec<(&'static str, &'static str)>) {
    let mut found = Vec::new();
    for &(a, b) in COMPLEMENTARY_PURPOSES {
        let covered = profs.iter().enumerate().any(|(x, p)| {
            p.purposes.contains(a)
                && profs.iter().enumerate().any(|(y, q)| x != y && q.purposes.contains(b))
        });
        if covered {
            found.push((a, b));
        }
    }

    if found.is_empty() {
        let distinct: BTreeSet<&str> = profs.iter().flat_map(|p| p.purposes.iter().copied()).collect();
        let diversity = (PURPOSE_DIVERSITY_STEP * distinct.len() as f64).min(PURPOSE_DIVERSITY_MAX);
        (diversity, found)
    } else {
        ((COMPLEMENTARY_PURPOSE_BONUS * found.len() as f64).min(1.0), found)
    }
}

/// `1 - coefficient of variation`, floored at zero; identical values score 1
fn uniformity(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean <= 0.0 {
        return 1.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (1.0 - variance.sqrt() / mean).max(0.0)
}

fn workflow_fit(members: &[&IndexedRepository]) -> f64 {
    let complexity: Vec<f64> = members.iter().map(|r| r.complexity).collect();
    let size: Vec<f64> = members.iter().map(|r| r.size as f64).collect();
    (uniformity(&complexity) + uniformity(&size)) / 2.0
}

fn integration_points(
    members: &[&IndexedRepository],
    profs: &[&Profile],
    dominant: Option<Ecosystem>,
) -> Vec<String> {
    let mut points = Vec::new();
    let with = |f: fn(&Capabilities) -> bool| {
        members
            .iter()
            .zip(profs)
            .filter(|(_, p)| f(&p.caps))
            .map(|(r, _)| r.name.as_str())
            .collect::<Vec<_>>()
    };

    let frontends = with(|c| c.frontend);
    let mobiles = with(|c| c.mobile);
    let backends = with(|c| c.backend);
    let libraries = with(|c| c.library);

    for api in &backends {
        for client in frontends.iter().chain(&mobiles) {
            if client != api {
                points.push(format!("{client} consumes the HTTP API of {api}"));
            }
        }
    }
    for lib in &libraries {
        for repo in members.iter().map(|r| r.name.as_str()) {
            if repo != *lib && !libraries.contains(&repo) {
                points.push(format!("{repo} depends on {lib}"));
            }
        }
    }
    if backends.len() >= 2 {
        points.push(format!("Service contracts between {}", backends.join(", ")));
    }
    if let Some(eco) = dominant {
        points.push(format!("Shared {} build tooling and package registry", eco.as_str()));
    }
    if points.is_empty() {
        points.push("Shared configuration and deployment pipeline".to_string());
    }
    points
}
