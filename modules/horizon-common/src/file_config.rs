use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::rules::{KeywordEntry, RiskRule};

/// TOML-backed overrides loaded from disk. Every table is optional; anything
/// left out keeps the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub clustering: Option<ClusteringConfig>,
    #[serde(default)]
    pub locale: Option<LocaleConfig>,
    #[serde(default)]
    pub sections: BTreeMap<String, SectionConfig>,
    /// Replaces the default risk table when non-empty. Order is significant.
    #[serde(default)]
    pub risk_rules: Vec<RiskRule>,
    #[serde(default)]
    pub rmf: Vec<KeywordEntry>,
    #[serde(default)]
    pub atlas: Vec<KeywordEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusteringConfig {
    pub similarity_threshold: f64,
}

/// Google News locale parameters. Only the fetcher reads these.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocaleConfig {
    pub hl: String,
    pub gl: String,
    pub ceid: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            hl: "en-GB".to_string(),
            gl: "GB".to_string(),
            ceid: "GB:en".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionConfig {
    pub max_items: usize,
}

/// Load and parse a TOML config file.
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

pub fn parse_config(content: &str) -> Result<FileConfig> {
    let config: FileConfig = toml::from_str(content)?;
    Ok(config)
}
