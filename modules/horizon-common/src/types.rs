use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Version stamped into every snapshot document.
pub const SCHEMA_VERSION: &str = "2.2";

/// Section key of the flat roll-up that aggregates every other section.
pub const TRIAGE_SECTION: &str = "triage";

/// Tag assigned when no risk rule matches.
pub const GENERAL_TAG: &str = "GENERAL";

/// Tag the digest pulls into its own capability/milestone list.
pub const CAPABILITY_TAG: &str = "CAPABILITY/MILESTONE";

/// Format an instant as ISO-8601 UTC with second precision and a `Z` suffix.
pub fn iso_utc(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

// --- Input records ---

/// A record exactly as delivered by a feed source, before any normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RawRecord {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub source: String,
    /// Loosely formatted timestamp text (RFC 2822, RFC 3339, bare date, or empty).
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub section_key: String,
}

/// One logical section of raw records, in delivery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SectionBatch {
    pub key: String,
    #[serde(default)]
    pub records: Vec<RawRecord>,
}

impl SectionBatch {
    pub fn new(key: impl Into<String>, records: Vec<RawRecord>) -> Self {
        Self {
            key: key.into(),
            records,
        }
    }

    pub fn empty(key: impl Into<String>) -> Self {
        Self::new(key, Vec::new())
    }
}

// --- Labels ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Digest sort rank: High first.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse urgency attached by the risk rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum TimeHorizon {
    #[serde(rename = "Now")]
    Now,
    #[serde(rename = "Short-term emerging")]
    ShortTermEmerging,
    #[serde(rename = "Longer-term uncertain")]
    LongerTermUncertain,
}

impl TimeHorizon {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeHorizon::Now => "Now",
            TimeHorizon::ShortTermEmerging => "Short-term emerging",
            TimeHorizon::LongerTermUncertain => "Longer-term uncertain",
        }
    }
}

impl std::fmt::Display for TimeHorizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much weight a record's source deserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
            Confidence::Low => "Low",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of scoring a title against the risk rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RiskLabel {
    pub priority: Priority,
    pub tag: String,
    pub time_horizon: TimeHorizon,
    pub workstreams: Vec<String>,
    /// Terms matched across every rule that scored, capped at ten.
    pub matched_terms: Vec<String>,
    pub score: u32,
}

impl RiskLabel {
    /// Fallback label for titles no rule matches.
    pub fn general() -> Self {
        Self {
            priority: Priority::Low,
            tag: GENERAL_TAG.to_string(),
            time_horizon: TimeHorizon::Now,
            workstreams: Vec::new(),
            matched_terms: Vec::new(),
            score: 0,
        }
    }
}

// --- Normalized records ---

/// A raw record after canonicalization, identity hashing and tagging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NormalizedRecord {
    /// 16 hex chars derived from the canonical title and URL.
    pub id: String,
    pub title: String,
    pub link: String,
    pub canonical_title: String,
    pub canonical_url: String,
    pub source: String,
    /// Timestamp text as delivered.
    #[serde(default)]
    pub published_at: String,
    pub date: DateTime<Utc>,
    /// Set when `published_at` could not be parsed and the run instant was used.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub date_fallback: bool,
    pub section: String,
    pub risk: RiskLabel,
    pub rmf: Vec<String>,
    pub atlas: Vec<String>,
    pub confidence: Confidence,
    /// Position in the run's ingestion order.
    #[serde(skip)]
    pub seq: usize,
}

impl NormalizedRecord {
    pub fn date_iso(&self) -> String {
        iso_utc(&self.date)
    }

    /// Risk tag followed by taxonomy labels.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.risk.tag.as_str())
            .chain(self.rmf.iter().map(String::as_str))
            .chain(self.atlas.iter().map(String::as_str))
    }
}

// --- Signals ---

/// Where a signal member came from, inferred from its link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MemberSourceType {
    News,
    Reddit,
    Incident,
}

impl std::fmt::Display for MemberSourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberSourceType::News => write!(f, "news"),
            MemberSourceType::Reddit => write!(f, "reddit"),
            MemberSourceType::Incident => write!(f, "incident"),
        }
    }
}

impl MemberSourceType {
    pub fn from_url(url: &str) -> Self {
        if url.contains("reddit.com") {
            Self::Reddit
        } else if url.contains("incidentdatabase.ai") {
            Self::Incident
        } else {
            Self::News
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SignalMember {
    pub title: String,
    pub link: String,
    pub source: String,
    pub date: DateTime<Utc>,
    pub source_type: MemberSourceType,
}

/// An aggregate of near-duplicate records describing one story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Signal {
    pub signal_id: String,
    pub representative_title: String,
    pub tags: BTreeSet<String>,
    /// Unique non-empty sources across all members, a confidence proxy.
    pub source_count: usize,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    /// Up to eight most recent members, newest first.
    pub members: Vec<SignalMember>,
}

// --- Aggregates ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Summary {
    pub by_priority: BTreeMap<String, u32>,
    pub by_tag: BTreeMap<String, u32>,
    pub by_workstream: BTreeMap<String, u32>,
    pub by_horizon: BTreeMap<String, u32>,
}

/// The machine-readable artifact written at the end of every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Snapshot {
    pub schema_version: String,
    pub last_updated: String,
    pub sections: BTreeMap<String, Vec<NormalizedRecord>>,
    pub summary: Summary,
    #[serde(default)]
    pub signals: Vec<Signal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn iso_utc_uses_z_suffix_and_seconds() {
        let at = Utc.with_ymd_and_hms(2026, 1, 5, 9, 30, 0).unwrap();
        assert_eq!(iso_utc(&at), "2026-01-05T09:30:00Z");
    }

    #[test]
    fn confidence_display_matches_serialized_form() {
        for confidence in [Confidence::High, Confidence::Medium, Confidence::Low] {
            let json = serde_json::to_string(&confidence).unwrap();
            assert_eq!(json, format!("\"{confidence}\""));
        }
        assert_eq!(Confidence::Medium.as_str(), "Medium");
    }

    #[test]
    fn priority_rank_orders_high_first() {
        assert!(Priority::High.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
    }

    #[test]
    fn time_horizon_serializes_as_label() {
        let json = serde_json::to_string(&TimeHorizon::ShortTermEmerging).unwrap();
        assert_eq!(json, "\"Short-term emerging\"");
        let back: TimeHorizon = serde_json::from_str("\"Longer-term uncertain\"").unwrap();
        assert_eq!(back, TimeHorizon::LongerTermUncertain);
    }

    #[test]
    fn general_label_is_low_with_no_workstreams() {
        let label = RiskLabel::general();
        assert_eq!(label.priority, Priority::Low);
        assert_eq!(label.tag, "GENERAL");
        assert!(label.workstreams.is_empty());
        assert_eq!(label.score, 0);
    }

    #[test]
    fn member_source_type_from_url() {
        assert_eq!(
            MemberSourceType::from_url("https://www.reddit.com/r/netsec/comments/x"),
            MemberSourceType::Reddit
        );
        assert_eq!(
            MemberSourceType::from_url("https://incidentdatabase.ai/cite/42"),
            MemberSourceType::Incident
        );
        assert_eq!(
            MemberSourceType::from_url("https://www.bbc.co.uk/news/1"),
            MemberSourceType::News
        );
    }

    #[test]
    fn raw_record_tolerates_missing_optional_fields() {
        let raw: RawRecord =
            serde_json::from_str(r#"{"title": "Hello", "link": "https://example.com"}"#).unwrap();
        assert_eq!(raw.source, "");
        assert_eq!(raw.published_at, "");
    }
}
