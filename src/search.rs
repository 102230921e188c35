// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Multi-field repository search
//!
//! Every specified query field is both a filter and a scorer. Fields combine
//! with AND; values inside one field combine with OR. Matching is
//! case-insensitive.

use crate::types::{IndexedRepository, RepositoryIndex};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Points per matched language
pub const LANGUAGE_POINTS: u32 = 10;
/// Points per matched framework
pub const FRAMEWORK_POINTS: u32 = 15;
/// Points for a keyword found in the name
pub const NAME_POINTS: u32 = 20;
/// Points for a keyword found in the summary
pub const SUMMARY_POINTS: u32 = 15;
/// Points per tag containing a keyword
pub const TAG_POINTS: u32 = 10;
/// Points per matched file type
pub const FILE_TYPE_POINTS: u32 = 5;

/// Characters kept on each side of a summary hit
const EXCERPT_RADIUS: usize = 20;

/// File extension to language table
const FILE_TYPE_LANGUAGES: &[(&str, &str)] = &[
    (".js", "javascript"),
    (".jsx", "javascript"),
    (".mjs", "javascript"),
    (".cjs", "javascript"),
    (".ts", "typescript"),
    (".tsx", "typescript"),
    (".py", "python"),
    (".java", "java"),
    (".kt", "kotlin"),
    (".go", "go"),
    (".rs", "rust"),
    (".rb", "ruby"),
    (".php", "php"),
    (".cs", "c#"),
    (".cpp", "c++"),
    (".cc", "c++"),
    (".c", "c"),
    (".h", "c"),
    (".swift", "swift"),
    (".scala", "scala"),
    (".dart", "dart"),
];

/// Language for a file type such as `.ts` or `ts`
#[must_use]
pub fn language_for_file_type(file_type: &str) -> Option<&'static str> {
    let normalized = fold(file_type.trim());
    let dotted = if normalized.starts_with('.') {
        normalized
    } else {
        format!(".{normalized}")
    };
    FILE_TYPE_LANGUAGES
        .iter()
        .find(|(ext, _)| *ext == dotted)
        .map(|(_, lang)| *lang)
}

/// Inclusive bounds on `lastAnalyzed`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Earliest accepted timestamp
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    /// Latest accepted timestamp
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Whether `at` lies within the bounds
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| at >= s) && self.end.map_or(true, |e| at <= e)
    }
}

/// A search query; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Any of these languages
    #[serde(default)]
    pub languages: Option<Vec<String>>,
    /// Any of these frameworks
    #[serde(default)]
    pub frameworks: Option<Vec<String>>,
    /// Any of these keywords in name, summary or tags
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    /// Any of these file extensions
    #[serde(default)]
    pub file_types: Option<Vec<String>>,
    /// Analysis time window
    #[serde(default)]
    pub date_range: Option<DateRange>,
}

fn owned(values: &[&str]) -> Option<Vec<String>> {
    Some(values.iter().map(|v| (*v).to_string()).collect())
}

impl SearchQuery {
    /// Restrict to languages
    #[must_use]
    pub fn with_languages(mut self, languages: &[&str]) -> Self {
        self.languages = owned(languages);
        self
    }

    /// Restrict to frameworks
    #[must_use]
    pub fn with_frameworks(mut self, frameworks: &[&str]) -> Self {
        self.frameworks = owned(frameworks);
        self
    }

    /// Restrict to keywords
    #[must_use]
    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = owned(keywords);
        self
    }

    /// Restrict to file types
    #[must_use]
    pub fn with_file_types(mut self, file_types: &[&str]) -> Self {
        self.file_types = owned(file_types);
        self
    }

    /// Restrict to an analysis window
    #[must_use]
    pub fn with_date_range(mut self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        self.date_range = Some(DateRange { start, end });
        self
    }
}

/// Query field a match came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchField {
    /// Language filter
    Languages,
    /// Framework filter
    Frameworks,
    /// Keyword in the name
    Name,
    /// Keyword in the summary
    Summary,
    /// Keyword in a tag
    Tags,
    /// File type filter
    FileTypes,
}

/// One scoring match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    /// Field that matched
    pub field: MatchField,
    /// Matched value (language, framework, keyword, tag or file type)
    pub value: String,
    /// Points awarded
    pub score: u32,
    /// Summary text around the hit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

impl SearchMatch {
    fn new(field: MatchField, value: impl Into<String>, score: u32) -> Self {
        Self {
            field,
            value: value.into(),
            score,
            excerpt: None,
        }
    }
}

/// A scored search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The matching repository
    pub repository: IndexedRepository,
    /// Total points
    pub score: u32,
    /// Individual matches
    pub matches: Vec<SearchMatch>,
}

/// Single-char lowercase fold, so byte and char positions stay aligned
fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn fold(s: &str) -> String {
    s.chars().map(fold_char).collect()
}

/// Non-empty folded values, or `None` when the field is effectively unspecified
fn normalized(values: Option<&Vec<String>>) -> Option<Vec<String>> {
    let values: Vec<String> = values?
        .iter()
        .map(|v| fold(v.trim()))
        .filter(|v| !v.is_empty())
        .collect();
    (!values.is_empty()).then_some(values)
}

/// Text around the first case-insensitive occurrence of `keyword`
#[must_use]
pub fn excerpt(text: &str, keyword: &str) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();
    let haystack: Vec<char> = chars.iter().copied().map(fold_char).collect();
    let needle: Vec<char> = keyword.chars().map(fold_char).collect();
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }

    let pos = haystack.windows(needle.len()).position(|w| w == needle.as_slice())?;
    let start = pos.saturating_sub(EXCERPT_RADIUS);
    let end = (pos + needle.len() + EXCERPT_RADIUS).min(chars.len());
    Some(chars[start..end].iter().collect())
}

/// Search the index
#[must_use]
pub fn search(index: &RepositoryIndex, query: &SearchQuery) -> Vec<SearchResult> {
    let languages = normalized(query.languages.as_ref());
    let frameworks = normalized(query.frameworks.as_ref());
    let keywords = normalized(query.keywords.as_ref());
    let file_types = normalized(query.file_types.as_ref());

    let mut results: Vec<SearchResult> = index
        .repositories
        .iter()
        .filter(|repo| query.date_range.map_or(true, |r| r.contains(repo.last_analyzed)))
        .filter_map(|repo| {
            let mut matches = Vec::new();

            if let Some(languages) = &languages {
                let hits = match_languages(repo, languages);
                if hits.is_empty() {
                    return None;
                }
                matches.extend(hits);
            }

            if let Some(frameworks) = &frameworks {
                let hits: Vec<SearchMatch> = frameworks
                    .iter()
                    .filter(|f| repo.has_framework(f))
                    .map(|f| SearchMatch::new(MatchField::Frameworks, f.as_str(), FRAMEWORK_POINTS))
                    .collect();
                if hits.is_empty() {
                    return None;
                }
                matches.extend(hits);
            }

            if let Some(keywords) = &keywords {
                let hits = match_keywords(repo, keywords);
                if hits.is_empty() {
                    return None;
                }
                matches.extend(hits);
            }

            if let Some(file_types) = &file_types {
                let hits: Vec<SearchMatch> = file_types
                    .iter()
                    .filter(|ft| language_for_file_type(ft).is_some_and(|lang| repo.has_language(lang)))
                    .map(|ft| SearchMatch::new(MatchField::FileTypes, ft.as_str(), FILE_TYPE_POINTS))
                    .collect();
                if hits.is_empty() {
                    return None;
                }
                matches.extend(hits);
            }

            Some(SearchResult {
                repository: repo.clone(),
                score: matches.iter().map(|m| m.score).sum(),
                matches,
            })
        })
        .collect();

    // Stable: ties keep index order
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results
}

fn match_languages(repo: &IndexedRepository, languages: &[String]) -> Vec<SearchMatch> {
    languages
        .iter()
        .filter(|l| repo.languages.iter().any(|rl| fold(rl) == **l))
        .map(|l| SearchMatch::new(MatchField::Languages, l.as_str(), LANGUAGE_POINTS))
        .collect()
}

fn match_keywords(repo: &IndexedRepository, keywords: &[String]) -> Vec<SearchMatch> {
    let name = fold(&repo.name);
    let mut hits = Vec::new();

    for keyword in keywords {
        if name.contains(keyword.as_str()) {
            hits.push(SearchMatch::new(MatchField::Name, keyword.as_str(), NAME_POINTS));
        }

        if let Some(text) = excerpt(&repo.summary, keyword) {
            let mut hit = SearchMatch::new(MatchField::Summary, keyword.as_str(), SUMMARY_POINTS);
            hit.excerpt = Some(text);
            hits.push(hit);
        }

        hits.extend(
            repo.tags
                .iter()
                .filter(|t| fold(t).contains(keyword.as_str()))
                .map(|t| SearchMatch::new(MatchField::Tags, t.as_str(), TAG_POINTS)),
        );
    }

    hits
}
