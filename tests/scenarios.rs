// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! End-to-end scenarios against the public store API

use repolink::prelude::*;
use repolink::search::{MatchField, SearchQuery};
use repolink::similarity::similarity;

fn index_one(store: &mut IndexStore, analysis: RepositoryAnalysis) -> IndexedRepository {
    store.add_repository(&analysis).unwrap()
}

#[test]
fn frontend_and_backend_without_shared_languages_are_complementary() {
    let mut store = IndexStore::in_memory();
    let ui = index_one(
        &mut store,
        RepositoryAnalysis::new("shop-ui", "/src/shop-ui")
            .with_frameworks(&["react"])
            .with_size(150_000)
            .with_maintainability(30.0),
    );
    let api = index_one(
        &mut store,
        RepositoryAnalysis::new("shop-api", "/src/shop-api")
            .with_frameworks(&["express"])
            .with_size(900_000)
            .with_maintainability(12.0),
    );

    let sim = similarity(&ui, &api);
    assert_eq!(sim.relationship_type, RelationshipType::Complementary);
    assert!(sim.score >= 0.6, "score was {}", sim.score);

    let stored = store.get_index().relationships_of(&ui.id);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].relationship_type, RelationshipType::Complementary);
}

#[test]
fn small_complex_repository_is_a_dependency_of_an_app() {
    let mut store = IndexStore::in_memory();
    let lib = index_one(
        &mut store,
        RepositoryAnalysis::new("acme-lib", "/src/acme-lib")
            .with_size(500_000)
            .with_maintainability(60.0),
    );
    let app = index_one(
        &mut store,
        RepositoryAnalysis::new("acme-app", "/src/acme-app")
            .with_size(2_000_000)
            .with_maintainability(40.0)
            .with_frameworks(&["express"]),
    );

    assert_eq!(similarity(&lib, &app).relationship_type, RelationshipType::Dependency);
}

#[test]
fn adding_the_same_path_twice_keeps_the_latest_name() {
    let mut store = IndexStore::in_memory();
    index_one(&mut store, RepositoryAnalysis::new("first-name", "/src/project"));
    index_one(&mut store, RepositoryAnalysis::new("second-name", "/src/project"));

    let repos = &store.get_index().repositories;
    assert_eq!(repos.len(), 1);
    assert_eq!(repos[0].name, "second-name");
}

#[test]
fn language_search_returns_only_matching_repositories() {
    let mut store = IndexStore::in_memory();
    index_one(
        &mut store,
        RepositoryAnalysis::new("pipeline", "/src/pipeline").with_languages(&["Python"]),
    );
    index_one(
        &mut store,
        RepositoryAnalysis::new("widget", "/src/widget").with_languages(&["JavaScript"]),
    );

    let results = store.search_repositories(&SearchQuery::default().with_languages(&["python"]));
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].repository.name, "pipeline");
    assert_eq!(results[0].score, 10);
    assert!(results[0]
        .matches
        .iter()
        .any(|m| m.field == MatchField::Languages && m.score == 10));
}

#[test]
fn removing_a_repository_drops_its_relationships() {
    let mut store = IndexStore::in_memory();
    let api = index_one(
        &mut store,
        RepositoryAnalysis::new("shop-api", "/src/shop-api").with_frameworks(&["express"]),
    );
    index_one(
        &mut store,
        RepositoryAnalysis::new("shop-ui", "/src/shop-ui").with_frameworks(&["react"]),
    );
    index_one(
        &mut store,
        RepositoryAnalysis::new("admin-ui", "/src/admin-ui").with_frameworks(&["vue"]),
    );
    assert_eq!(store.get_index().relationships_of(&api.id).len(), 2);

    let before = store.get_index().repositories.len();
    let remaining_rels = store.get_index().relationships.len() - 2;
    store.remove_repository(&api.id).unwrap();

    assert_eq!(store.get_index().repositories.len(), before - 1);
    assert_eq!(store.get_index().relationships.len(), remaining_rels);
    assert!(store.get_index().relationships_of(&api.id).is_empty());
}

#[test]
fn unknown_ids_are_not_found() {
    let mut store = IndexStore::in_memory();
    let missing = "repo:000000000000".to_string();

    assert!(store.remove_repository(&missing).unwrap_err().is_not_found());
    assert!(store.find_similar_repositories(&missing, 5).unwrap_err().is_not_found());
    assert!(store.suggest_combinations(&[missing.clone()]).unwrap_err().is_not_found());
    assert!(store.remove_tag("tag:00000000").unwrap_err().is_not_found());
    assert!(store.generate_relationship_graph(Some(&[missing][..])).is_empty());
}

#[test]
fn insights_cover_the_whole_index() {
    let mut store = IndexStore::in_memory();
    index_one(
        &mut store,
        RepositoryAnalysis::new("shop-ui", "/src/shop-ui")
            .with_languages(&["TypeScript"])
            .with_frameworks(&["react"]),
    );
    index_one(
        &mut store,
        RepositoryAnalysis::new("shop-api", "/src/shop-api")
            .with_languages(&["JavaScript"])
            .with_frameworks(&["express"]),
    );
    index_one(&mut store, RepositoryAnalysis::new("notes", "/src/notes").with_languages(&["Haskell"]));

    let insights = store.generate_relationship_insights();
    assert_eq!(insights.total_repositories, 3);
    assert_eq!(insights.total_relationships, store.get_index().relationships.len());
    assert!(insights.isolated_repositories.iter().any(|id| {
        store.get_repository(id).map(|r| r.name.as_str()) == Some("notes")
    }));
    assert!(insights.top_opportunities.len() <= 5);

    let all = store.analyze_integration_opportunities(None).unwrap();
    assert!(all.len() <= 10);
    assert!(all.iter().all(|o| o.score > 0.3));
}
