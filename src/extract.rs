// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Metadata extraction - turns a completed analysis into an index entry

use crate::types::{IndexedRepository, RepositoryAnalysis};
use std::collections::BTreeSet;

/// Maximum summary length taken from an executive summary, in characters
pub const SUMMARY_MAX_CHARS: usize = 200;

/// Complexity bucket boundaries
const COMPLEXITY_LOW_BELOW: f64 = 30.0;
const COMPLEXITY_MEDIUM_BELOW: f64 = 70.0;

/// Extract an index entry from an analysis.
///
/// The returned repository carries the analysis ID (possibly empty); the
/// store decides the final ID.
#[must_use]
pub fn extract(analysis: &RepositoryAnalysis) -> IndexedRepository {
    let languages = ordered_set(&analysis.languages);
    let frameworks = ordered_set(&analysis.frameworks);
    let complexity = complexity_score(analysis);

    let mut tags = BTreeSet::new();
    for language in &languages {
        tags.insert(format!("lang:{}", language.to_lowercase()));
    }
    for framework in &frameworks {
        tags.insert(format!("framework:{}", framework.to_lowercase()));
    }
    tags.insert(complexity_tag(complexity).to_string());

    IndexedRepository {
        id: analysis.id.clone(),
        name: analysis.name.clone(),
        path: analysis.path.clone(),
        languages,
        frameworks,
        tags,
        summary: summary(analysis),
        size: analysis.total_size,
        complexity,
        last_analyzed: analysis.updated_at,
    }
}

/// Maintainability index if present, else `(functions + classes) / files`
#[must_use]
pub fn complexity_score(analysis: &RepositoryAnalysis) -> f64 {
    let Some(code) = &analysis.code_analysis else {
        return 0.0;
    };

    if let Some(index) = code.complexity.as_ref().and_then(|c| c.maintainability_index) {
        return index;
    }

    if analysis.file_count == 0 {
        return 0.0;
    }

    (code.function_count + code.class_count) as f64 / analysis.file_count as f64
}

/// The single `complexity:*` tag for a score
#[must_use]
pub fn complexity_tag(complexity: f64) -> &'static str {
    if complexity < COMPLEXITY_LOW_BELOW {
        "complexity:low"
    } else if complexity < COMPLEXITY_MEDIUM_BELOW {
        "complexity:medium"
    } else {
        "complexity:high"
    }
}

fn summary(analysis: &RepositoryAnalysis) -> String {
    if let Some(description) = analysis.description.as_deref().map(str::trim) {
        if !description.is_empty() {
            return description.to_string();
        }
    }

    analysis
        .insights
        .as_ref()
        .and_then(|i| i.executive_summary.as_deref())
        .map(|s| s.chars().take(SUMMARY_MAX_CHARS).collect())
        .unwrap_or_default()
}

/// Trim, drop empties and case-insensitive duplicates, keep first-seen order
fn ordered_set(values: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty() && seen.insert(v.to_lowercase()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnalysisInsights, CodeAnalysis};

    #[test]
    fn test_complexity_from_maintainability_index() {
        let analysis = RepositoryAnalysis::new("svc", "/src/svc").with_maintainability(82.5);
        let repo = extract(&analysis);

        assert!((repo.complexity - 82.5).abs() < f64::EPSILON);
        assert!(repo.tags.contains("complexity:high"));
    }

    #[test]
    fn test_complexity_from_counts() {
        let mut analysis = RepositoryAnalysis::new("svc", "/src/svc");
        analysis.file_count = 4;
        analysis.code_analysis = Some(CodeAnalysis {
            function_count: 150,
            class_count: 10,
            complexity: None,
        });

        let repo = extract(&analysis);
        assert!((repo.complexity - 40.0).abs() < f64::EPSILON);
        assert!(repo.tags.contains("complexity:medium"));
    }

    #[test]
    fn test_complexity_zero_files() {
        let mut analysis = RepositoryAnalysis::new("svc", "/src/svc");
        analysis.code_analysis = Some(CodeAnalysis {
            function_count: 10,
            class_count: 3,
            complexity: None,
        });

        assert_eq!(complexity_score(&analysis), 0.0);
        assert!(extract(&analysis).tags.contains("complexity:low"));
    }

    #[test]
    fn test_complexity_bucket_edges() {
        assert_eq!(complexity_tag(29.9), "complexity:low");
        assert_eq!(complexity_tag(30.0), "complexity:medium");
        assert_eq!(complexity_tag(69.9), "complexity:medium");
        assert_eq!(complexity_tag(70.0), "complexity:high");
    }

    #[test]
    fn test_derived_tags() {
        let analysis = RepositoryAnalysis::new("web", "/src/web")
            .with_languages(&["TypeScript", "typescript", "CSS"])
            .with_frameworks(&["React"]);
        let repo = extract(&analysis);

        assert_eq!(repo.languages, vec!["TypeScript", "CSS"]);
        assert!(repo.tags.contains("lang:typescript"));
        assert!(repo.tags.contains("lang:css"));
        assert!(repo.tags.contains("framework:react"));
        assert_eq!(repo.tags.iter().filter(|t| t.starts_with("complexity:")).count(), 1);
        assert_eq!(repo.tags.len(), 4);
    }

    #[test]
    fn test_summary_prefers_description() {
        let mut analysis = RepositoryAnalysis::new("web", "/src/web").with_description("A storefront");
        analysis.insights = Some(AnalysisInsights {
            executive_summary: Some("Long narrative".into()),
        });

        assert_eq!(extract(&analysis).summary, "A storefront");
    }

    #[test]
    fn test_summary_truncates_executive_summary() {
        let mut analysis = RepositoryAnalysis::new("web", "/src/web");
        analysis.insights = Some(AnalysisInsights {
            executive_summary: Some("é".repeat(300)),
        });

        let summary = extract(&analysis).summary;
        assert_eq!(summary.chars().count(), SUMMARY_MAX_CHARS);
    }
}
