use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

use crate::error::HorizonError;
use crate::file_config::{FileConfig, LocaleConfig};
use crate::rules::{KeywordMap, RuleTable};

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.86;
pub const DEFAULT_USER_AGENT: &str = "HO-AIHM-HorizonScan/2.2 (+contact)";
pub const DEFAULT_OUT_DIR: &str = "public";

/// Process configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub user_agent: String,
    pub out_dir: PathBuf,
    /// Optional TOML file with rule and section overrides.
    pub config_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let config = Self {
            user_agent: env::var("HS_USER_AGENT")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            out_dir: env::var("HS_OUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUT_DIR)),
            config_path: env::var("HS_CONFIG").ok().map(PathBuf::from),
        };

        config.log_summary();
        config
    }

    fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  HS_USER_AGENT: {}", self.user_agent);
        tracing::info!("  HS_OUT_DIR: {}", self.out_dir.display());
        tracing::info!(
            "  HS_CONFIG: {}",
            self.config_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<not set>".to_string())
        );
    }
}

/// Resolved per-run configuration handed to the pipeline and the fetcher.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub rules: RuleTable,
    pub rmf: KeywordMap,
    pub atlas: KeywordMap,
    pub similarity_threshold: f64,
    /// Maximum records kept per section, by section key.
    pub section_caps: BTreeMap<String, usize>,
    pub locale: LocaleConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            rules: RuleTable::default(),
            rmf: KeywordMap::rmf_functions(),
            atlas: KeywordMap::atlas_themes(),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            section_caps: default_section_caps(),
            locale: LocaleConfig::default(),
        }
    }
}

fn default_section_caps() -> BTreeMap<String, usize> {
    [
        ("aiid", 25),
        ("forums", 75),
        ("harms", 80),
        ("models", 80),
        ("watchdogs", 80),
        ("uk_regulators", 120),
        ("uk_research_policy", 280),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

impl ScanConfig {
    /// Overlay a TOML file on top of the defaults and validate the result.
    pub fn from_file_config(file: FileConfig) -> Result<Self, HorizonError> {
        let mut config = Self::default();

        if let Some(clustering) = file.clustering {
            config.similarity_threshold = clustering.similarity_threshold;
        }
        if let Some(locale) = file.locale {
            config.locale = locale;
        }
        for (key, section) in file.sections {
            config.section_caps.insert(key, section.max_items);
        }
        if !file.risk_rules.is_empty() {
            config.rules = RuleTable::new(file.risk_rules)?;
        }
        if !file.rmf.is_empty() {
            config.rmf = KeywordMap::new(file.rmf)?;
        }
        if !file.atlas.is_empty() {
            config.atlas = KeywordMap::new(file.atlas)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), HorizonError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(HorizonError::Config(format!(
                "similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }
        if self.rules.is_empty() {
            return Err(HorizonError::Config("risk rule table is empty".into()));
        }
        Ok(())
    }

    pub fn section_cap(&self, key: &str) -> Option<usize> {
        self.section_caps.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ScanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.similarity_threshold, 0.86);
        assert_eq!(config.section_cap("aiid"), Some(25));
        assert_eq!(config.section_cap("unknown"), None);
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let mut config = ScanConfig::default();
        config.similarity_threshold = 1.5;
        assert!(matches!(config.validate(), Err(HorizonError::Config(_))));
    }
}
