//! Configuration Settings
//!
//! Optional TOML settings file for the command-line tool. Every section
//! falls back to its defaults, so partial files are valid.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// JSON output settings
    pub output: OutputSettings,
    /// DocBook rendering settings
    pub render: RenderSettings,
    /// Document attributes applied when loading
    pub attributes: BTreeMap<String, String>,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Read settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Reject option combinations that cannot produce output.
    ///
    /// Analysis needs a single root element, which body-only documents
    /// do not have.
    pub fn validate(&self) -> Result<()> {
        if self.output.analyze && !self.render.standalone {
            anyhow::bail!("analyze requires standalone rendering; remove body-only or analyze");
        }
        Ok(())
    }
}

/// JSON output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Pretty-print the JSON
    pub pretty: bool,
    /// Add the analyzed DocBook tree to each node
    pub analyze: bool,
    /// Expand nested nodes instead of writing references
    pub deep: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            pretty: true,
            analyze: false,
            deep: false,
        }
    }
}

/// DocBook rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Wrap the document in an `<article>` root
    pub standalone: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self { standalone: true }
    }
}
