// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Pairwise similarity scoring and relationship classification
//!
//! The score is a weighted sum of six independent factors, each normalized to
//! `[0, 1]`, plus a bonus for pairs whose roles complete each other
//! (frontend/backend, mobile/backend). The sum is clamped to `1.0`, and such
//! role pairs never score below `0.6`.
//!
//! | Factor       | Weight |
//! |--------------|--------|
//! | language     | 0.25   |
//! | framework    | 0.25   |
//! | pattern      | 0.15   |
//! | ecosystem    | 0.15   |
//! | structural   | 0.10   |
//! | semantic     | 0.10   |

use crate::classify::{
    self, Capabilities, Pattern, COMPLEMENTARY_LANGUAGES, FRAMEWORK_COMPATIBILITY,
};
use crate::types::{IndexedRepository, RelationshipType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Relationships at or below this score are not stored
pub const RELATIONSHIP_THRESHOLD: f64 = 0.3;

const LANGUAGE_WEIGHT: f64 = 0.25;
const FRAMEWORK_WEIGHT: f64 = 0.25;
const PATTERN_WEIGHT: f64 = 0.15;
const ECOSYSTEM_WEIGHT: f64 = 0.15;
const STRUCTURAL_WEIGHT: f64 = 0.10;
const SEMANTIC_WEIGHT: f64 = 0.10;

const JS_TS_BONUS: f64 = 0.1;
const COMPLEMENTARY_LANGUAGE_BONUS: f64 = 0.2;
const COMPATIBLE_FRAMEWORK_BONUS: f64 = 0.3;
const CLIENT_API_PATTERN_BONUS: f64 = 0.5;
const ROLE_BONUS: f64 = 0.2;
const ROLE_PAIR_FLOOR: f64 = 0.6;
const RATIO_THRESHOLD: f64 = 0.5;
const NAME_CONTAINMENT_SCORE: f64 = 0.6;
const SHARED_STEM_SCORE: f64 = 0.2;
const SUMMARY_OVERLAP_MAX: f64 = 0.4;
const FORK_THRESHOLD: f64 = 0.8;
const SIMILAR_THRESHOLD: f64 = 0.6;

const STOPWORDS: &[&str] = &[
    "this", "that", "with", "from", "into", "your", "their", "which", "where", "when", "have",
    "been", "will", "using", "used", "uses", "also", "based", "provides", "written", "repository",
    "project", "code",
];

/// Per-factor sub-scores, each in `[0, 1]` before weighting
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorScores {
    /// Language overlap
    pub language: f64,
    /// Framework compatibility
    pub framework: f64,
    /// Architectural pattern overlap
    pub pattern: f64,
    /// Ecosystem alignment
    pub ecosystem: f64,
    /// Size and complexity similarity
    pub structural: f64,
    /// Name and summary similarity
    pub semantic: f64,
    /// Complementary-role bonus added on top of the weighted sum
    pub role_bonus: f64,
}

impl FactorScores {
    /// Weighted sum plus role bonus, clamped to `[0, 1]`; role pairs keep a floor
    #[must_use]
    pub fn total(&self) -> f64 {
        let weighted = self.language * LANGUAGE_WEIGHT
            + self.framework * FRAMEWORK_WEIGHT
            + self.pattern * PATTERN_WEIGHT
            + self.ecosystem * ECOSYSTEM_WEIGHT
            + self.structural * STRUCTURAL_WEIGHT
            + self.semantic * SEMANTIC_WEIGHT;
        let total = (weighted + self.role_bonus).clamp(0.0, 1.0);
        if self.role_bonus > 0.0 {
            total.max(ROLE_PAIR_FLOOR)
        } else {
            total
        }
    }

    /// Weighted contributions, labelled, strongest first
    fn ranked(&self) -> Vec<(&'static str, f64)> {
        let mut factors = vec![
            ("language overlap", self.language * LANGUAGE_WEIGHT),
            ("framework compatibility", self.framework * FRAMEWORK_WEIGHT),
            ("architectural patterns", self.pattern * PATTERN_WEIGHT),
            ("ecosystem alignment", self.ecosystem * ECOSYSTEM_WEIGHT),
            ("similar size and complexity", self.structural * STRUCTURAL_WEIGHT),
            ("related naming", self.semantic * SEMANTIC_WEIGHT),
        ];
        factors.sort_by(|a, b| b.1.total_cmp(&a.1));
        factors
    }
}

/// Result of comparing two repositories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Similarity {
    /// Overall score in `[0, 1]`
    pub score: f64,
    /// Relationship classification
    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,
    /// Human-readable explanation
    pub reason: String,
    /// Individual factor scores
    pub factors: FactorScores,
}

impl Similarity {
    /// Whether the relationship is strong enough to store
    #[must_use]
    pub fn is_significant(&self) -> bool {
        self.score > RELATIONSHIP_THRESHOLD
    }
}

/// Compare two repositories
#[must_use]
pub fn similarity(a: &IndexedRepository, b: &IndexedRepository) -> Similarity {
    let caps_a = classify::capabilities(a);
    let caps_b = classify::capabilities(b);

    let factors = FactorScores {
        language: language_score(a, b),
        framework: framework_score(a, b),
        pattern: pattern_score(a, b),
        ecosystem: ecosystem_score(a, b),
        structural: structural_score(a, b),
        semantic: semantic_score(a, b),
        role_bonus: if complementary_roles(&caps_a, &caps_b) { ROLE_BONUS } else { 0.0 },
    };
    let score = factors.total();
    let (relationship_type, lead) = classify_relationship(a, b, &caps_a, &caps_b, score);

    let mut reasons = vec![lead];
    reasons.extend(
        factors
            .ranked()
            .into_iter()
            .filter(|(_, contribution)| *contribution > 0.0)
            .take(2)
            .map(|(label, contribution)| format!("{label} ({contribution:.2})")),
    );

    Similarity {
        score,
        relationship_type,
        reason: reasons.join("; "),
        factors,
    }
}

/// Frontend/backend or mobile/backend in either direction
fn complementary_roles(a: &Capabilities, b: &Capabilities) -> bool {
    (a.frontend && b.backend)
        || (b.frontend && a.backend)
        || (a.mobile && b.backend)
        || (b.mobile && a.backend)
}

fn names_contain_each_other(a: &IndexedRepository, b: &IndexedRepository) -> bool {
    let na = a.name.to_lowercase();
    let nb = b.name.to_lowercase();
    !na.is_empty() && !nb.is_empty() && (na.contains(&nb) || nb.contains(&na))
}

fn classify_relationship(
    a: &IndexedRepository,
    b: &IndexedRepository,
    caps_a: &Capabilities,
    caps_b: &Capabilities,
    score: f64,
) -> (RelationshipType, String) {
    if score > FORK_THRESHOLD && names_contain_each_other(a, b) {
        return (
            RelationshipType::Fork,
            format!("{} and {} share a name and a near-identical profile", a.name, b.name),
        );
    }

    if caps_a.library != caps_b.library {
        let (lib, user) = if caps_a.library { (a, b) } else { (b, a) };
        return (
            RelationshipType::Dependency,
            format!("{} looks like a library {} could depend on", lib.name, user.name),
        );
    }
    if caps_a.tool != caps_b.tool {
        let (tool, user) = if caps_a.tool { (a, b) } else { (b, a) };
        return (
            RelationshipType::Dependency,
            format!("{} looks like tooling used by {}", tool.name, user.name),
        );
    }

    if (caps_a.frontend && caps_b.backend) || (caps_b.frontend && caps_a.backend) {
        return (RelationshipType::Complementary, "frontend/backend pairing".to_string());
    }
    if (caps_a.library && caps_b.application) || (caps_b.library && caps_a.application) {
        return (RelationshipType::Complementary, "library/application pairing".to_string());
    }
    if (caps_a.mobile && caps_b.backend) || (caps_b.mobile && caps_a.backend) {
        return (RelationshipType::Complementary, "mobile/backend pairing".to_string());
    }

    if score > SIMILAR_THRESHOLD {
        (RelationshipType::Similar, "closely matching stacks".to_string())
    } else if score > RELATIONSHIP_THRESHOLD {
        (RelationshipType::Complementary, "partially overlapping stacks".to_string())
    } else {
        (RelationshipType::Similar, "little in common".to_string())
    }
}

// =============================================================================
// Factors
// =============================================================================

fn lowercase_set(values: &[String]) -> BTreeSet<String> {
    values.iter().map(|v| v.to_lowercase()).collect()
}

fn jaccard<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Count of unordered cross pairs `(x in a, y in b)` listed in `table`
fn listed_cross_pairs(table: &[(&str, &str)], a: &BTreeSet<String>, b: &BTreeSet<String>) -> usize {
    a.iter()
        .flat_map(|x| b.iter().map(move |y| (x, y)))
        .filter(|(x, y)| x != y && classify::pair_listed(table, x, y))
        .count()
}

fn language_score(a: &IndexedRepository, b: &IndexedRepository) -> f64 {
    if a.languages.is_empty() || b.languages.is_empty() {
        return 0.0;
    }
    let la = lowercase_set(&a.languages);
    let lb = lowercase_set(&b.languages);

    let shared: f64 = la.intersection(&lb).map(|l| classify::language_popularity(l)).sum();
    let total: f64 = la.union(&lb).map(|l| classify::language_popularity(l)).sum();
    let mut score = if total > 0.0 { shared / total } else { 0.0 };

    let js_ts = (la.contains("javascript") && lb.contains("typescript"))
        || (la.contains("typescript") && lb.contains("javascript"));
    if js_ts {
        score += JS_TS_BONUS;
    }

    score += COMPLEMENTARY_LANGUAGE_BONUS * listed_cross_pairs(COMPLEMENTARY_LANGUAGES, &la, &lb) as f64;
    score.min(1.0)
}

fn framework_score(a: &IndexedRepository, b: &IndexedRepository) -> f64 {
    if a.frameworks.is_empty() || b.frameworks.is_empty() {
        return 0.0;
    }
    let fa = lowercase_set(&a.frameworks);
    let fb = lowercase_set(&b.frameworks);

    let compatible = listed_cross_pairs(FRAMEWORK_COMPATIBILITY, &fa, &fb) as f64;
    (jaccard(&fa, &fb) + COMPATIBLE_FRAMEWORK_BONUS * compatible).min(1.0)
}

fn pattern_score(a: &IndexedRepository, b: &IndexedRepository) -> f64 {
    let pa = classify::patterns(a);
    let pb = classify::patterns(b);
    if pa.is_empty() || pb.is_empty() {
        return 0.0;
    }

    let serves = |client: &BTreeSet<Pattern>, api: &BTreeSet<Pattern>| {
        client.iter().any(Pattern::is_client) && api.contains(&Pattern::RestApi)
    };
    let mut score = jaccard(&pa, &pb);
    if serves(&pa, &pb) || serves(&pb, &pa) {
        score += CLIENT_API_PATTERN_BONUS;
    }
    score.min(1.0)
}

fn ecosystem_score(a: &IndexedRepository, b: &IndexedRepository) -> f64 {
    let ea = classify::ecosystems(a);
    let eb = classify::ecosystems(b);
    if ea.is_empty() || eb.is_empty() {
        return 0.0;
    }
    jaccard(&ea, &eb)
}

/// `min / max`; equal values (including two zeros) are a perfect match
fn ratio(x: f64, y: f64) -> f64 {
    let (lo, hi) = if x < y { (x, y) } else { (y, x) };
    if (hi - lo).abs() < f64::EPSILON {
        1.0
    } else if hi <= 0.0 || lo < 0.0 {
        0.0
    } else {
        lo / hi
    }
}

fn structural_score(a: &IndexedRepository, b: &IndexedRepository) -> f64 {
    let above = |r: f64| if r > RATIO_THRESHOLD { r } else { 0.0 };
    let size = above(ratio(a.size as f64, b.size as f64));
    let complexity = above(ratio(a.complexity, b.complexity));
    (size + complexity) / 2.0
}

/// Crude suffix-stripping stem
fn stem(token: &str) -> &str {
    for suffix in ["ing", "ers", "er", "es", "s"] {
        if let Some(root) = token.strip_suffix(suffix) {
            if root.len() >= 3 {
                return root;
            }
        }
    }
    token
}

fn summary_keywords(summary: &str) -> BTreeSet<String> {
    summary
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() >= 4 && !STOPWORDS.contains(w))
        .map(str::to_string)
        .collect()
}

fn semantic_score(a: &IndexedRepository, b: &IndexedRepository) -> f64 {
    let name = if names_contain_each_other(a, b) {
        NAME_CONTAINMENT_SCORE
    } else {
        let ta = classify::name_tokens(&a.name);
        let tb = classify::name_tokens(&b.name);
        let sa: BTreeSet<&str> = ta.iter().map(|t| stem(t)).collect();
        let sb: BTreeSet<&str> = tb.iter().map(|t| stem(t)).collect();
        (sa.intersection(&sb).count() as f64 * SHARED_STEM_SCORE).min(NAME_CONTAINMENT_SCORE)
    };

    let ka = summary_keywords(&a.summary);
    let kb = summary_keywords(&b.summary);
    let larger = ka.len().max(kb.len());
    let summary = if ka.is_empty() || kb.is_empty() {
        0.0
    } else {
        ka.intersection(&kb).count() as f64 / larger as f64 * SUMMARY_OVERLAP_MAX
    };

    (name + summary).min(1.0)
}
