// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Static capability tables and keyword classifiers
//!
//! Every classifier here is a plain lookup against fixed lists so results are
//! reproducible. Name keywords are matched against the lowercase name tokens
//! (split on non-alphanumerics) and against the repository tags.

use crate::types::IndexedRepository;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// =============================================================================
// Keyword Tables
// =============================================================================

/// Frameworks that mark a repository as a frontend
pub const FRONTEND_FRAMEWORKS: &[&str] = &["react", "vue", "angular", "svelte", "next.js", "nuxt"];
/// Name keywords that mark a frontend
pub const FRONTEND_KEYWORDS: &[&str] = &["frontend", "ui", "web", "client", "dashboard", "site"];

/// Frameworks that mark a repository as a backend
pub const BACKEND_FRAMEWORKS: &[&str] = &[
    "express", "fastify", "koa", "nestjs", "django", "flask", "fastapi", "spring", "rails",
    "laravel", "gin", "asp.net",
];
/// Name keywords that mark a backend
pub const BACKEND_KEYWORDS: &[&str] = &["api", "backend", "server", "service", "gateway"];

/// Frameworks that mark a mobile app
pub const MOBILE_FRAMEWORKS: &[&str] = &["react-native", "flutter", "ionic", "xamarin", "expo"];
/// Name keywords that mark a mobile app
pub const MOBILE_KEYWORDS: &[&str] = &["mobile", "ios", "android"];

/// Name keywords that mark a library
pub const LIBRARY_KEYWORDS: &[&str] = &[
    "lib", "library", "sdk", "utils", "util", "package", "core", "common", "shared", "toolkit",
];
/// Name keywords that mark a developer tool
pub const TOOL_KEYWORDS: &[&str] = &[
    "cli", "tool", "tools", "script", "scripts", "plugin", "extension", "generator", "linter",
    "formatter",
];
/// Name keywords that mark an end-user application
pub const APPLICATION_KEYWORDS: &[&str] = &["app", "application", "platform", "portal"];

/// Below this size (bytes) a highly complex repository reads as a library
pub const LIBRARY_MAX_SIZE: u64 = 1_000_000;
/// Above this complexity a small repository reads as a library
pub const LIBRARY_MIN_COMPLEXITY: f64 = 50.0;

/// Language pairs that commonly integrate across a service boundary
pub const COMPLEMENTARY_LANGUAGES: &[(&str, &str)] = &[
    ("javascript", "python"),
    ("typescript", "python"),
    ("javascript", "go"),
    ("typescript", "go"),
    ("javascript", "java"),
    ("typescript", "java"),
    ("javascript", "ruby"),
    ("typescript", "rust"),
];

/// Framework pairs known to work well together
pub const FRAMEWORK_COMPATIBILITY: &[(&str, &str)] = &[
    ("react", "express"),
    ("react", "fastapi"),
    ("react", "django"),
    ("react", "flask"),
    ("react", "nestjs"),
    ("vue", "express"),
    ("vue", "django"),
    ("vue", "laravel"),
    ("angular", "express"),
    ("angular", "spring"),
    ("angular", "nestjs"),
    ("svelte", "express"),
    ("next.js", "express"),
    ("nuxt", "express"),
    ("react-native", "express"),
    ("react-native", "firebase"),
    ("flutter", "firebase"),
    ("flutter", "django"),
];

/// Relative language popularity used to weight overlaps
const LANGUAGE_POPULARITY: &[(&str, f64)] = &[
    ("javascript", 1.0),
    ("python", 1.0),
    ("typescript", 0.95),
    ("java", 0.9),
    ("c#", 0.85),
    ("c++", 0.8),
    ("go", 0.8),
    ("c", 0.75),
    ("rust", 0.75),
    ("php", 0.75),
    ("ruby", 0.7),
    ("kotlin", 0.7),
    ("swift", 0.7),
];
const DEFAULT_POPULARITY: f64 = 0.5;

/// Popularity weight of a language
#[must_use]
pub fn language_popularity(language: &str) -> f64 {
    let language = language.to_lowercase();
    LANGUAGE_POPULARITY
        .iter()
        .find(|(l, _)| *l == language)
        .map_or(DEFAULT_POPULARITY, |(_, w)| *w)
}

/// Whether an unordered pair appears in a pair table
#[must_use]
pub fn pair_listed(table: &[(&str, &str)], a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    table
        .iter()
        .any(|(x, y)| (*x == a && *y == b) || (*x == b && *y == a))
}

// =============================================================================
// Name Tokens
// =============================================================================

/// Lowercase alphanumeric tokens of a name
#[must_use]
pub fn name_tokens(name: &str) -> Vec<String> {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn has_keyword(repo: &IndexedRepository, keywords: &[&str]) -> bool {
    name_tokens(&repo.name).iter().any(|t| keywords.contains(&t.as_str()))
        || repo
            .tags
            .iter()
            .any(|t| keywords.contains(&t.to_lowercase().as_str()))
}

fn has_any_framework(repo: &IndexedRepository, frameworks: &[&str]) -> bool {
    frameworks.iter().any(|f| repo.has_framework(f))
}

// =============================================================================
// Capability Classification
// =============================================================================

/// Role flags inferred for one repository
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Serves a user interface in the browser
    pub frontend: bool,
    /// Serves an API
    pub backend: bool,
    /// Ships a mobile app
    pub mobile: bool,
    /// Is consumed as a library
    pub library: bool,
    /// Is a developer tool
    pub tool: bool,
    /// Is an end-user application
    pub application: bool,
}

/// Classify a repository's roles
#[must_use]
pub fn capabilities(repo: &IndexedRepository) -> Capabilities {
    let frontend = has_any_framework(repo, FRONTEND_FRAMEWORKS) || has_keyword(repo, FRONTEND_KEYWORDS);
    let backend = has_any_framework(repo, BACKEND_FRAMEWORKS) || has_keyword(repo, BACKEND_KEYWORDS);
    let mobile = has_any_framework(repo, MOBILE_FRAMEWORKS) || has_keyword(repo, MOBILE_KEYWORDS);
    let library = has_keyword(repo, LIBRARY_KEYWORDS)
        || (repo.size > 0 && repo.size < LIBRARY_MAX_SIZE && repo.complexity > LIBRARY_MIN_COMPLEXITY);
    let tool = has_keyword(repo, TOOL_KEYWORDS);
    let application = has_keyword(repo, APPLICATION_KEYWORDS) || frontend || backend || mobile;

    Capabilities {
        frontend,
        backend,
        mobile,
        library,
        tool,
        application,
    }
}

/// Node classification used by the relationship graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Browser user interface
    Frontend,
    /// API server
    Backend,
    /// Mobile app
    Mobile,
    /// Reusable library
    Library,
    /// Developer tool
    Tool,
    /// Anything else
    Application,
}

impl NodeType {
    /// Lowercase name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Frontend => "frontend",
            Self::Backend => "backend",
            Self::Mobile => "mobile",
            Self::Library => "library",
            Self::Tool => "tool",
            Self::Application => "application",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Capabilities {
    /// First matching role in priority order frontend, backend, mobile, library, tool
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        if self.frontend {
            NodeType::Frontend
        } else if self.backend {
            NodeType::Backend
        } else if self.mobile {
            NodeType::Mobile
        } else if self.library {
            NodeType::Library
        } else if self.tool {
            NodeType::Tool
        } else {
            NodeType::Application
        }
    }
}

// =============================================================================
// Architectural Patterns
// =============================================================================

/// Architectural pattern inferred from frameworks and tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Pattern {
    /// Single-page application
    Spa,
    /// Server-side rendering
    Ssr,
    /// REST API
    RestApi,
    /// Microservice deployment
    Microservices,
}

impl Pattern {
    /// Tag-style name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spa => "spa",
            Self::Ssr => "ssr",
            Self::RestApi => "rest-api",
            Self::Microservices => "microservices",
        }
    }

    /// Whether the pattern serves end users directly
    #[must_use]
    pub fn is_client(&self) -> bool {
        matches!(self, Self::Spa | Self::Ssr)
    }
}

const SPA_FRAMEWORKS: &[&str] = &["react", "vue", "angular", "svelte"];
const SSR_FRAMEWORKS: &[&str] = &["next.js", "nuxt", "sveltekit", "remix", "gatsby"];
const MICROSERVICE_MARKERS: &[&str] = &["microservices", "microservice", "docker", "kubernetes", "k8s"];

/// Patterns inferred for a repository
#[must_use]
pub fn patterns(repo: &IndexedRepository) -> BTreeSet<Pattern> {
    let mut found = BTreeSet::new();
    if has_any_framework(repo, SPA_FRAMEWORKS) || repo.tags.contains("spa") {
        found.insert(Pattern::Spa);
    }
    if has_any_framework(repo, SSR_FRAMEWORKS) || repo.tags.contains("ssr") {
        found.insert(Pattern::Ssr);
    }
    if has_any_framework(repo, BACKEND_FRAMEWORKS) || repo.tags.contains("rest-api") {
        found.insert(Pattern::RestApi);
    }
    if has_keyword(repo, MICROSERVICE_MARKERS) {
        found.insert(Pattern::Microservices);
    }
    found
}

// =============================================================================
// Ecosystems
// =============================================================================

/// Technology ecosystem bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Ecosystem {
    /// JavaScript / TypeScript / Node
    Js,
    /// Python
    Python,
    /// JVM languages
    Java,
    /// .NET
    Dotnet,
}

impl Ecosystem {
    /// Short name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Js => "js",
            Self::Python => "python",
            Self::Java => "java",
            Self::Dotnet => "dotnet",
        }
    }
}

const ECOSYSTEM_MEMBERS: &[(Ecosystem, &[&str])] = &[
    (
        Ecosystem::Js,
        &[
            "javascript", "typescript", "node", "react", "vue", "angular", "svelte", "next.js",
            "nuxt", "express", "fastify", "koa", "nestjs", "react-native", "ionic", "electron",
        ],
    ),
    (Ecosystem::Python, &["python", "django", "flask", "fastapi"]),
    (Ecosystem::Java, &["java", "kotlin", "scala", "spring"]),
    (Ecosystem::Dotnet, &["c#", "csharp", "f#", ".net", "asp.net", "blazor", "xamarin"]),
];

/// Ecosystems a repository's languages and frameworks fall into
#[must_use]
pub fn ecosystems(repo: &IndexedRepository) -> BTreeSet<Ecosystem> {
    repo.languages
        .iter()
        .chain(repo.frameworks.iter())
        .filter_map(|item| {
            let item = item.to_lowercase();
            ECOSYSTEM_MEMBERS
                .iter()
                .find(|(_, members)| members.contains(&item.as_str()))
                .map(|(eco, _)| *eco)
        })
        .collect()
}

// =============================================================================
// Functional Purposes
// =============================================================================

const PURPOSE_KEYWORDS: &[(&str, &[&str])] = &[
    ("ui", &["ui", "frontend", "web", "client", "dashboard"]),
    ("api", &["api", "backend", "server", "gateway"]),
    ("auth", &["auth", "login", "identity", "oauth", "sso"]),
    ("payment", &["payment", "payments", "billing", "checkout", "stripe"]),
    ("data", &["db", "database", "data", "storage", "etl", "warehouse"]),
    ("analytics", &["analytics", "metrics", "tracking", "stats"]),
    ("notification", &["notify", "notification", "notifications", "email", "sms", "push"]),
    ("search", &["search", "index", "indexer"]),
    ("monitoring", &["monitor", "monitoring", "logging", "logs", "observability"]),
    ("mobile", &["mobile", "ios", "android"]),
];

/// Purpose pairs that complete each other in one system
pub const COMPLEMENTARY_PURPOSES: &[(&str, &str)] = &[
    ("ui", "api"),
    ("api", "data"),
    ("auth", "api"),
    ("auth", "ui"),
    ("payment", "api"),
    ("analytics", "data"),
    ("notification", "api"),
    ("search", "data"),
    ("monitoring", "api"),
    ("mobile", "api"),
];

/// Functional purposes inferred from name tokens, tags and frameworks
#[must_use]
pub fn purposes(repo: &IndexedRepository) -> BTreeSet<&'static str> {
    let mut found: BTreeSet<&'static str> = PURPOSE_KEYWORDS
        .iter()
        .filter(|(_, keywords)| has_keyword(repo, keywords))
        .map(|(purpose, _)| *purpose)
        .collect();

    if has_any_framework(repo, FRONTEND_FRAMEWORKS) {
        found.insert("ui");
    }
    if has_any_framework(repo, BACKEND_FRAMEWORKS) {
        found.insert("api");
    }
    if has_any_framework(repo, MOBILE_FRAMEWORKS) {
        found.insert("mobile");
    }
    found
}
