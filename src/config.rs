// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `REPOLINK_*` environment variables (`REPOLINK_DATA_DIR`,
//! `REPOLINK_LAYOUT__WIDTH`, ...).

use crate::layout::LayoutConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "REPOLINK";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory for persistent data
    pub data_dir: PathBuf,
    /// Index file name inside `data_dir`
    pub index_file: String,
    /// Log level or filter directive (trace, debug, info, warn, error)
    pub log_level: String,
    /// Graph layout settings
    pub layout: LayoutConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: directories::ProjectDirs::from("org", "hyperpolymath", "repolink")
                .map_or_else(|| PathBuf::from(".repolink"), |d| d.data_dir().to_path_buf()),
            index_file: "index.json".to_string(),
            log_level: "info".to_string(),
            layout: LayoutConfig::default(),
        }
    }
}

impl Config {
    /// Full path of the index file
    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        self.data_dir.join(&self.index_file)
    }

    /// Write the configuration as TOML
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// Load configuration from defaults, an optional file and the environment
pub fn load(path: Option<&Path>) -> Result<Config> {
    let defaults = config::Config::try_from(&Config::default()).context("Failed to build default config")?;
    let mut builder = config::Config::builder().add_source(defaults);

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path).required(false));
    }

    builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to load config")?
        .try_deserialize()
        .context("Failed to parse config")
}
