pub mod config;
pub mod error;
pub mod file_config;
pub mod rules;
pub mod types;

pub use config::{Config, ScanConfig};
pub use error::HorizonError;
pub use file_config::{FileConfig, LocaleConfig};
pub use rules::{KeywordEntry, KeywordMap, RiskRule, RuleTable};
pub use types::*;
