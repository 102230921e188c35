// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Property-based tests for the scoring engines
//!
//! Verifies invariants that must hold for all inputs:
//! - Similarity is symmetric and bounded
//! - Clusters never share a member
//! - Combination suggestions stay within their input and limits
//! - Adding a search filter never widens the result set
//! - Adding a keyword never lowers an existing hit's match count
//! - Paths, IDs and relationship pairs stay unique under any edit sequence
//! - Layouts stay on the canvas

use chrono::Utc;
use proptest::prelude::*;
use repolink::cluster::generate_clusters;
use repolink::combine::{suggest_combinations, DEFAULT_LIMIT, MAX_COMBINATION_SIZE};
use repolink::layout::{LayoutConfig, LayoutEngine, SeededRandom};
use repolink::prelude::*;
use repolink::error::IndexError;
use repolink::search::{search, SearchQuery};
use repolink::similarity::similarity;
use std::collections::{BTreeSet, HashMap, HashSet};

// =============================================================================
// Strategies
// =============================================================================

const LANGUAGES: &[&str] = &["JavaScript", "TypeScript", "Python", "Go", "Java", "Rust", "Ruby"];
const FRAMEWORKS: &[&str] = &["react", "vue", "express", "django", "flask", "spring", "flutter", "next.js"];
const NAME_PARTS: &[&str] = &["shop", "ui", "api", "lib", "cli", "mobile", "core", "admin", "web", "service"];

fn arb_subset(pool: &'static [&'static str], max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::sample::subsequence(pool, 0..=max).prop_map(|v| v.into_iter().map(str::to_string).collect())
}

fn arb_name() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(NAME_PARTS), 1..=3).prop_map(|parts| parts.join("-"))
}

fn arb_repo() -> impl Strategy<Value = IndexedRepository> {
    (
        arb_name(),
        arb_subset(LANGUAGES, 3),
        arb_subset(FRAMEWORKS, 2),
        0u64..3_000_000,
        0.0f64..100.0,
    )
        .prop_map(|(name, languages, frameworks, size, complexity)| IndexedRepository {
            id: String::new(),
            path: String::new(),
            name,
            languages,
            frameworks,
            tags: BTreeSet::new(),
            summary: String::new(),
            size,
            complexity,
            last_analyzed: Utc::now(),
        })
}

/// Repositories with unique IDs and paths, plus every significant relationship
fn arb_index() -> impl Strategy<Value = RepositoryIndex> {
    prop::collection::vec(arb_repo(), 0..7).prop_map(|mut repos| {
        for (i, repo) in repos.iter_mut().enumerate() {
            repo.id = format!("repo:{i}");
            repo.path = format!("/work/{i}");
        }

        let mut relationships = Vec::new();
        for (i, a) in repos.iter().enumerate() {
            for b in &repos[i + 1..] {
                let sim = similarity(a, b);
                if sim.is_significant() {
                    relationships.push(RepositoryRelationship {
                        source_id: a.id.clone(),
                        target_id: b.id.clone(),
                        relationship_type: sim.relationship_type,
                        strength: sim.score,
                        reason: sim.reason,
                    });
                }
            }
        }

        RepositoryIndex {
            repositories: repos,
            relationships,
            ..RepositoryIndex::default()
        }
    })
}

/// Analyses with an optional, frequently clashing analysis ID
fn arb_analysis() -> impl Strategy<Value = RepositoryAnalysis> {
    (
        arb_name(),
        arb_subset(LANGUAGES, 3),
        arb_subset(FRAMEWORKS, 2),
        0u64..3_000_000,
        0.0f64..100.0,
        prop::option::of(0usize..3),
        0usize..5,
    )
        .prop_map(|(name, languages, frameworks, size, maintainability, id, slot)| {
            let languages: Vec<&str> = languages.iter().map(String::as_str).collect();
            let frameworks: Vec<&str> = frameworks.iter().map(String::as_str).collect();
            let mut analysis = RepositoryAnalysis::new(name, format!("/work/{slot}"))
                .with_languages(&languages)
                .with_frameworks(&frameworks)
                .with_size(size)
                .with_maintainability(maintainability);
            analysis.id = id.map(|k| format!("analysis-{k}")).unwrap_or_default();
            analysis
        })
}

#[derive(Debug, Clone)]
enum StoreOp {
    /// Add, or re-add when the slot path is already indexed
    Add(RepositoryAnalysis),
    Update(usize, RepositoryAnalysis),
    Remove(usize),
}

fn arb_op() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        3 => arb_analysis().prop_map(StoreOp::Add),
        2 => (any::<usize>(), arb_analysis()).prop_map(|(pick, a)| StoreOp::Update(pick, a)),
        1 => any::<usize>().prop_map(StoreOp::Remove),
    ]
}

fn apply(store: &mut IndexStore, op: &StoreOp) {
    let ids: Vec<String> = store.get_index().repositories.iter().map(|r| r.id.clone()).collect();
    match op {
        StoreOp::Add(analysis) => {
            store.add_repository(analysis).unwrap();
        }
        StoreOp::Update(pick, analysis) if !ids.is_empty() => {
            match store.update_repository(&ids[pick % ids.len()], analysis) {
                Ok(_) | Err(IndexError::DuplicatePath(_)) => {}
                Err(e) => panic!("unexpected update failure: {e}"),
            }
        }
        StoreOp::Remove(pick) if !ids.is_empty() => {
            store.remove_repository(&ids[pick % ids.len()]).unwrap();
        }
        _ => {}
    }
}

fn check_integrity(index: &RepositoryIndex) -> std::result::Result<(), TestCaseError> {
    let paths: HashSet<&str> = index.repositories.iter().map(|r| r.path.as_str()).collect();
    prop_assert_eq!(paths.len(), index.repositories.len(), "paths must be unique");

    let ids: HashSet<&str> = index.repositories.iter().map(|r| r.id.as_str()).collect();
    prop_assert_eq!(ids.len(), index.repositories.len(), "ids must be unique");

    let mut pairs = HashSet::new();
    for rel in &index.relationships {
        prop_assert!(ids.contains(rel.source_id.as_str()));
        prop_assert!(ids.contains(rel.target_id.as_str()));
        prop_assert_ne!(&rel.source_id, &rel.target_id);
        prop_assert!(rel.strength > 0.3 && rel.strength <= 1.0);

        let mut pair = [rel.source_id.as_str(), rel.target_id.as_str()];
        pair.sort_unstable();
        prop_assert!(pairs.insert(pair), "duplicate relationship pair");
    }
    Ok(())
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn similarity_is_symmetric_and_bounded(a in arb_repo(), b in arb_repo()) {
        let ab = similarity(&a, &b);
        let ba = similarity(&b, &a);

        prop_assert_eq!(ab.score.to_bits(), ba.score.to_bits());
        prop_assert_eq!(ab.relationship_type, ba.relationship_type);
        prop_assert!((0.0..=1.0).contains(&ab.score));
    }

    #[test]
    fn clusters_are_disjoint(index in arb_index()) {
        let repos: Vec<&IndexedRepository> = index.repositories.iter().collect();
        let rels: Vec<&RepositoryRelationship> = index.relationships.iter().collect();

        let mut seen = HashSet::new();
        for cluster in generate_clusters(&repos, &rels) {
            prop_assert!(cluster.repository_ids.len() >= 2);
            for id in cluster.repository_ids {
                prop_assert!(seen.insert(id));
            }
        }
    }

    #[test]
    fn combinations_stay_within_input(index in arb_index()) {
        let ids: Vec<String> = index.repositories.iter().map(|r| r.id.clone()).collect();
        let suggestions = suggest_combinations(&index, &ids, DEFAULT_LIMIT).unwrap();

        prop_assert!(suggestions.len() <= DEFAULT_LIMIT);
        for window in suggestions.windows(2) {
            prop_assert!(window[0].score >= window[1].score);
        }
        for s in &suggestions {
            prop_assert!(s.score > 0.3 && s.score <= 1.0);
            prop_assert!((2..=MAX_COMBINATION_SIZE).contains(&s.repository_ids.len()));
            let unique: HashSet<&String> = s.repository_ids.iter().collect();
            prop_assert_eq!(unique.len(), s.repository_ids.len());
            prop_assert!(s.repository_ids.iter().all(|id| ids.contains(id)));
        }
    }

    #[test]
    fn extra_filters_only_narrow(
        index in arb_index(),
        languages in arb_subset(LANGUAGES, 2),
        frameworks in arb_subset(FRAMEWORKS, 2),
    ) {
        let languages: Vec<&str> = languages.iter().map(String::as_str).collect();
        let frameworks: Vec<&str> = frameworks.iter().map(String::as_str).collect();

        let broad = SearchQuery::default().with_languages(&languages);
        let narrow = broad.clone().with_frameworks(&frameworks);

        let broad_ids: HashSet<String> = search(&index, &broad).into_iter().map(|r| r.repository.id).collect();
        for hit in search(&index, &narrow) {
            prop_assert!(broad_ids.contains(&hit.repository.id));
        }
    }

    #[test]
    fn any_edit_sequence_keeps_index_integrity(ops in prop::collection::vec(arb_op(), 1..24)) {
        let mut store = IndexStore::in_memory();
        for op in &ops {
            apply(&mut store, op);
            check_integrity(store.get_index())?;
        }
    }

    #[test]
    fn extra_keywords_never_lower_match_counts(
        index in arb_index(),
        base in prop::sample::subsequence(NAME_PARTS, 1..=2),
        extra in prop::sample::subsequence(NAME_PARTS, 1..=2),
    ) {
        let widened: Vec<&str> = base.iter().chain(extra.iter()).copied().collect();
        let narrow = SearchQuery::default().with_keywords(&base);
        let wide = SearchQuery::default().with_keywords(&widened);

        let wide_counts: HashMap<String, usize> = search(&index, &wide)
            .into_iter()
            .map(|hit| (hit.repository.id, hit.matches.len()))
            .collect();
        for hit in search(&index, &narrow) {
            let count = wide_counts.get(&hit.repository.id).copied();
            prop_assert!(count.is_some_and(|c| c >= hit.matches.len()));
        }
    }

    #[test]
    fn layout_stays_on_canvas(count in 0usize..12, seed in any::<u64>(), iterations in 0usize..20) {
        let config = LayoutConfig { iterations, ..LayoutConfig::default() };
        let engine = LayoutEngine::new(config);
        let initial = engine.initial_positions(count, &mut SeededRandom::new(seed));
        let links: Vec<(usize, usize, f64)> = (1..count).map(|i| (i - 1, i, 0.8)).collect();

        let positions = engine.simulate(initial, &links);
        prop_assert_eq!(positions.len(), count);
        for p in positions {
            prop_assert!((50.0..=750.0).contains(&p.x));
            prop_assert!((50.0..=550.0).contains(&p.y));
        }
    }
}
