//! Settings file discovery and loading
//!
//! Settings live in a YAML file, by default
//! `<platform config dir>/scriptcat/config.yaml`:
//!
//! ```yaml
//! sources:
//!   lines:
//!     kind: lines
//!     output: $HOME/dust/data/catalogs/lines.json
//!   community:
//!     kind: download
//!     output: $HOME/dust/data/catalogs/community.json
//!     url: https://example.org/community.json
//! lines:
//!   base_url: https://llllllll.co
//!   category: library
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_yaml_ng::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::lines::LinesConfig;
use crate::sources::{self, ParsedSources};

/// Settings file name inside the config directory
pub const SETTINGS_FILE_NAME: &str = "config.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Raw source definitions keyed by name
    #[serde(default)]
    pub sources: BTreeMap<String, Value>,

    /// Options for the lines gatherer
    #[serde(default)]
    pub lines: LinesConfig,
}

impl Settings {
    /// Load settings from an explicit path, or from the default location.
    ///
    /// An explicit path must exist. A missing file at the default location
    /// yields empty settings.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => {
                let default_path = Self::default_path()?;
                if !default_path.exists() {
                    info!(
                        "No settings file at {}, no sources configured",
                        default_path.display()
                    );
                    return Ok(Self::default());
                }
                Self::load_from_path(&default_path)
            }
        }
    }

    /// Load settings from a specific file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        let settings = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;

        debug!(
            "Loaded settings from {} ({} sources)",
            path.display(),
            settings.sources.len()
        );
        Ok(settings)
    }

    /// Parse settings from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty file parses as null
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(content).context("Invalid settings YAML")
    }

    /// Get the default settings file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = directories::ProjectDirs::from("", "", "scriptcat")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .context("Could not determine config directory")?;

        Ok(config_dir.join(SETTINGS_FILE_NAME))
    }

    /// Typed view of the configured sources
    pub fn parsed_sources(&self) -> ParsedSources {
        sources::parse_sources(&self.sources)
    }
}
