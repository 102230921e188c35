// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Fuzz target for index and analysis JSON parsing.
//!
//! Anything that parses as an index must survive being installed in a store
//! and driven through the read-side engines without panicking.

#![no_main]
use libfuzzer_sys::fuzz_target;
use repolink::layout::SeededRandom;
use repolink::prelude::*;
use repolink::search::SearchQuery;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let _ = serde_json::from_str::<SearchQuery>(s);

    if let Ok(analysis) = serde_json::from_str::<RepositoryAnalysis>(s) {
        let mut store = IndexStore::in_memory();
        let _ = store.add_repository(&analysis);
        let _ = store.add_repository(&analysis);
    }

    let Ok(index) = serde_json::from_str::<RepositoryIndex>(s) else {
        return;
    };
    let mut store = IndexStore::in_memory();
    if store.set_index(index).is_err() {
        return;
    }

    let ids: Vec<String> = store
        .get_index()
        .repositories
        .iter()
        .take(6)
        .map(|r| r.id.clone())
        .collect();
    let _ = store.suggest_combinations(&ids);
    let _ = store.generate_relationship_insights();
    let graph = store.generate_relationship_graph_seeded(Some(ids.as_slice()), &mut SeededRandom::new(0));
    let _ = graph.to_dot();
    let _ = graph.to_json();
});
