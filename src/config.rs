//! Blog configuration module.
//!
//! Handles loading and validating `config.json`. There are two configuration
//! shapes, one per deployment mode, and they are deliberately distinct types:
//!
//! ## Build Mode (`quillpress build`)
//!
//! ```json
//! {
//!   "owner": {
//!     "name": "Ada Lovelace",
//!     "picture": "images/ada.jpg"
//!   }
//! }
//! ```
//!
//! The owner name and picture are substituted into both templates. The file is
//! required: a build without it aborts.
//!
//! ## Runtime Mode (client-rendered site)
//!
//! ```json
//! {
//!   "ownerName": "Ada Lovelace",
//!   "ownerImage": "images/ada.jpg",
//!   "tagline": "Notes on the Analytical Engine"
//! }
//! ```
//!
//! This file is fetched by the browser next to `entries.json`. The crate never
//! reads it; `quillpress gen-config --runtime` prints a stock copy.
//!
//! Unknown top-level keys are tolerated in both shapes so a single site
//! directory can carry extra settings for other tools.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Build-mode configuration loaded from `config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogConfig {
    /// The blog owner shown in the header of every page.
    pub owner: OwnerConfig,
}

/// The `owner` section of [`BlogConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerConfig {
    /// Display name. Must not be blank.
    pub name: String,
    /// Image reference (URL or path relative to the output directory).
    #[serde(default)]
    pub picture: String,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            owner: OwnerConfig {
                name: "Blog Owner".to_string(),
                picture: "images/owner.jpg".to_string(),
            },
        }
    }
}

impl BlogConfig {
    /// Validate values the templates depend on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.owner.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "owner.name must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Runtime-mode configuration, read by the browser scripts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
    pub owner_name: String,
    pub owner_image: String,
    #[serde(default)]
    pub tagline: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            owner_name: "Blog Owner".to_string(),
            owner_image: "images/owner.jpg".to_string(),
            tagline: String::new(),
        }
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Load and validate the build-mode config at `path`.
///
/// A missing file is reported as [`ConfigError::Missing`] rather than a bare
/// I/O error so the CLI can say which file it looked for.
pub fn load_config(path: &Path) -> Result<BlogConfig, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::Missing(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let config: BlogConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Pretty-printed stock `config.json` for build mode.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_json() -> String {
    // Serializing plain string fields cannot fail.
    serde_json::to_string_pretty(&BlogConfig::default()).unwrap_or_default()
}

/// Pretty-printed stock `config.json` for runtime mode.
pub fn stock_runtime_config_json() -> String {
    serde_json::to_string_pretty(&RuntimeConfig::default()).unwrap_or_default()
}
