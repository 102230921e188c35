// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error taxonomy for index operations

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for index operations
pub type Result<T> = std::result::Result<T, IndexError>;

/// Errors raised by the index and the engines reading it
#[derive(Error, Debug)]
pub enum IndexError {
    /// A referenced repository, tag or tag assignment does not exist
    #[error("{kind} not found: {id}")]
    NotFound {
        /// What was looked up (repository, tag, repository tag)
        kind: &'static str,
        /// The missing identifier
        id: String,
    },

    /// Reading or writing the index file failed
    #[error("failed to persist index at {}: {source}", path.display())]
    Persistence {
        /// Index file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The index could not be encoded as JSON
    #[error("failed to serialize index: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The index file exists but is not a valid index document
    #[error("malformed index at {}: {source}", path.display())]
    MalformedIndex {
        /// Index file
        path: PathBuf,
        /// Parse error
        #[source]
        source: serde_json::Error,
    },

    /// Another repository already owns this path
    #[error("path already indexed by another repository: {0}")]
    DuplicatePath(String),

    /// A mutation running on the blocking pool panicked or was cancelled
    #[error("index write task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IndexError {
    /// Unknown repository ID
    pub fn repository(id: impl Into<String>) -> Self {
        Self::NotFound { kind: "repository", id: id.into() }
    }

    /// Unknown tag ID
    pub fn tag(id: impl Into<String>) -> Self {
        Self::NotFound { kind: "tag", id: id.into() }
    }

    /// Tag missing from a repository's tag set
    pub fn repository_tag(repo_id: &str, tag: &str) -> Self {
        Self::NotFound {
            kind: "repository tag",
            id: format!("{repo_id}#{tag}"),
        }
    }

    /// Whether this is a `NotFound` error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
