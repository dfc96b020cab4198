//! Project configuration.
//!
//! An optional `.reckon.toml` in the working directory overrides the export
//! document headings:
//!
//! ```toml
//! [document]
//! list_heading = "Backlog"
//! total_heading = "Sum"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::render::DocumentOptions;

pub const CONFIG_FILE: &str = ".reckon.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub document: DocumentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    #[serde(default = "default_list_heading")]
    pub list_heading: String,
    #[serde(default = "default_total_heading")]
    pub total_heading: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            list_heading: default_list_heading(),
            total_heading: default_total_heading(),
        }
    }
}

impl DocumentConfig {
    #[must_use]
    pub fn options(&self) -> DocumentOptions {
        DocumentOptions {
            list_heading: self.list_heading.clone(),
            total_heading: self.total_heading.clone(),
        }
    }
}

fn default_list_heading() -> String {
    DocumentOptions::default().list_heading
}

fn default_total_heading() -> String {
    DocumentOptions::default().total_heading
}

/// Load configuration from `dir`, falling back to defaults when the file is
/// absent.
pub fn load_config(dir: &Path) -> Result<Config> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        tracing::debug!("no {} found, using default headings", CONFIG_FILE);
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<Config>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}
