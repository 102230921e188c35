// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Logging setup

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Log level for a verbosity count, as the usual `-q` / `-v` flags would set it
#[must_use]
pub fn level_for_verbosity(verbose: u8, quiet: bool) -> tracing::Level {
    match verbose {
        0 if quiet => tracing::Level::ERROR,
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

/// Install the global fmt subscriber.
///
/// `RUST_LOG` takes precedence over `level`. Fails if a subscriber is already set.
pub fn init(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("Invalid log filter: {level}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install subscriber: {e}"))
}

/// Install the subscriber at the configured level
pub fn init_from_config(config: &crate::config::Config) -> Result<()> {
    init(&config.log_level)
}
