//! TOML override tests: what a deployment can change without a rebuild.

use std::io::Write;

use horizon_common::file_config::{load_config, parse_config};
use horizon_common::{HorizonError, Priority, ScanConfig, TimeHorizon};

#[test]
fn empty_file_keeps_every_default() {
    let file = parse_config("").unwrap();
    let config = ScanConfig::from_file_config(file).unwrap();
    let defaults = ScanConfig::default();
    assert_eq!(config.rules, defaults.rules);
    assert_eq!(config.rmf, defaults.rmf);
    assert_eq!(config.similarity_threshold, defaults.similarity_threshold);
    assert_eq!(config.locale, defaults.locale);
}

#[test]
fn risk_rules_replace_default_table_in_order() {
    let file = parse_config(
        r#"
        [[risk_rules]]
        tag = "ELECTIONS"
        priority = "High"
        time_horizon = "Short-term emerging"
        workstreams = ["HSG"]
        terms = ["election", "Ballot"]

        [[risk_rules]]
        tag = "ROBOTICS"
        priority = "Low"
        time_horizon = "Longer-term uncertain"
        terms = ["robot"]
        "#,
    )
    .unwrap();
    let config = ScanConfig::from_file_config(file).unwrap();

    let rules = config.rules.rules();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].tag, "ELECTIONS");
    assert_eq!(rules[0].priority, Priority::High);
    assert_eq!(rules[0].time_horizon, TimeHorizon::ShortTermEmerging);
    assert_eq!(rules[0].terms, vec!["election", "ballot"]);
    assert!(rules[1].workstreams.is_empty());
}

#[test]
fn clustering_locale_and_section_caps_override() {
    let file = parse_config(
        r#"
        [clustering]
        similarity_threshold = 0.9

        [locale]
        hl = "en-US"
        gl = "US"
        ceid = "US:en"

        [sections.harms]
        max_items = 10
        "#,
    )
    .unwrap();
    let config = ScanConfig::from_file_config(file).unwrap();
    assert_eq!(config.similarity_threshold, 0.9);
    assert_eq!(config.locale.gl, "US");
    assert_eq!(config.section_cap("harms"), Some(10));
    assert_eq!(config.section_cap("models"), Some(80));
}

#[test]
fn taxonomy_maps_can_be_replaced() {
    let file = parse_config(
        r#"
        [[rmf]]
        label = "GOVERN"
        keywords = ["statute"]
        "#,
    )
    .unwrap();
    let config = ScanConfig::from_file_config(file).unwrap();
    assert_eq!(config.rmf.entries().len(), 1);
    assert_eq!(config.atlas.entries().len(), 5);
}

#[test]
fn invalid_threshold_is_a_config_error() {
    let file = parse_config("[clustering]\nsimilarity_threshold = 2.0\n").unwrap();
    let err = ScanConfig::from_file_config(file).unwrap_err();
    assert!(matches!(err, HorizonError::Config(_)));
}

#[test]
fn unknown_keys_are_rejected() {
    assert!(parse_config("[clustering]\nthreshold = 0.5\n").is_err());
    assert!(parse_config("[mystery]\nvalue = 1\n").is_err());
}

#[test]
fn load_config_reads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[clustering]\nsimilarity_threshold = 0.75").unwrap();
    let loaded = load_config(file.path()).unwrap();
    assert_eq!(loaded.clustering.unwrap().similarity_threshold, 0.75);
}

#[test]
fn load_config_missing_file_mentions_path() {
    let err = load_config(std::path::Path::new("/nonexistent/horizon.toml")).unwrap_err();
    assert!(format!("{err:#}").contains("/nonexistent/horizon.toml"));
}
