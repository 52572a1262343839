//! One synchronous scan run: raw section batches in, snapshot and digest out.
//!
//! Per section: cap, normalize, classify, tag, dedup. Then the sections roll up
//! into `triage`, which feeds the summary, the clusterer and the digest.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use horizon_common::{
    iso_utc, NormalizedRecord, RawRecord, ScanConfig, SectionBatch, Snapshot, SCHEMA_VERSION,
    TRIAGE_SECTION,
};

use super::classify::RiskClassifier;
use super::cluster::{ClusterStrategy, GreedyExemplarClusterer};
use super::confidence::source_confidence;
use super::dedup::dedup;
use super::digest::build_digest;
use super::identity::identity_hash;
use super::normalize::{canonicalize_url_checked, normalize_title};
use super::stats::ScanStats;
use super::summary::summarize;
use super::taxonomy::KeywordTagger;
use super::timestamp::parse_timestamp;

/// Everything a run hands to persistence.
#[derive(Debug)]
pub struct ScanOutput {
    pub snapshot: Snapshot,
    pub digest: String,
    pub stats: ScanStats,
}

pub struct ScanPipeline<'c> {
    config: &'c ScanConfig,
    clusterer: Box<dyn ClusterStrategy>,
}

impl<'c> ScanPipeline<'c> {
    pub fn new(config: &'c ScanConfig) -> Self {
        Self {
            config,
            clusterer: Box::new(GreedyExemplarClusterer::new(config.similarity_threshold)),
        }
    }

    pub fn with_clusterer(mut self, clusterer: Box<dyn ClusterStrategy>) -> Self {
        self.clusterer = clusterer;
        self
    }

    /// Canonicalize, hash, classify and tag a single raw record.
    pub fn normalize(
        &self,
        raw: &RawRecord,
        section: &str,
        seq: usize,
        now: DateTime<Utc>,
    ) -> NormalizedRecord {
        self.normalize_checked(raw, section, seq, now).0
    }

    /// As `normalize`, also reporting whether the URL was kept unparsed.
    fn normalize_checked(
        &self,
        raw: &RawRecord,
        section: &str,
        seq: usize,
        now: DateTime<Utc>,
    ) -> (NormalizedRecord, bool) {
        let canonical_title = normalize_title(&raw.title);
        let url = canonicalize_url_checked(raw.link.trim());
        if url.fallback {
            debug!(section, link = raw.link.as_str(), "URL is not absolute, canonicalized best-effort");
        }

        let parsed = parse_timestamp(&raw.published_at, now);
        if parsed.fallback {
            debug!(
                section,
                published_at = raw.published_at.as_str(),
                "Unparseable timestamp, using run time"
            );
        }

        let record = NormalizedRecord {
            id: identity_hash(&canonical_title, &url.url),
            title: raw.title.trim().to_string(),
            link: raw.link.clone(),
            risk: RiskClassifier::new(&self.config.rules).classify(&canonical_title),
            rmf: KeywordTagger::new(&self.config.rmf).tag(&canonical_title),
            atlas: KeywordTagger::new(&self.config.atlas).tag(&canonical_title),
            confidence: source_confidence(&raw.source, section),
            canonical_title,
            canonical_url: url.url.clone(),
            source: raw.source.trim().to_string(),
            published_at: raw.published_at.clone(),
            date: parsed.at,
            date_fallback: parsed.fallback,
            section: section.to_string(),
            seq,
        };
        (record, url.fallback)
    }

    pub fn run(&self, batches: Vec<SectionBatch>, now: DateTime<Utc>) -> ScanOutput {
        let mut stats = ScanStats::default();
        let mut sections: BTreeMap<String, Vec<NormalizedRecord>> = BTreeMap::new();
        // Batch order, not key order: triage concatenation follows delivery.
        let mut rolled_up: Vec<NormalizedRecord> = Vec::new();
        let mut seq = 0usize;

        for batch in batches {
            let SectionBatch { key, mut records } = batch;
            if key == TRIAGE_SECTION {
                warn!(records = records.len(), "Ignoring input section named triage");
                continue;
            }

            stats.records_received += records.len() as u32;
            if let Some(cap) = self.config.section_cap(&key) {
                if records.len() > cap {
                    stats.records_capped += (records.len() - cap) as u32;
                    records.truncate(cap);
                }
            }

            let mut normalized = Vec::with_capacity(records.len());
            for raw in &records {
                let (record, url_fallback) = self.normalize_checked(raw, &key, seq, now);
                seq += 1;
                stats.date_fallbacks += record.date_fallback as u32;
                stats.url_fallbacks += url_fallback as u32;
                normalized.push(record);
            }

            let mut section_records = sections.remove(&key).unwrap_or_default();
            let before = section_records.len() + normalized.len();
            section_records.extend(normalized);
            let kept = dedup(section_records);
            stats.records_deduplicated += (before - kept.len()) as u32;

            info!(
                section = key.as_str(),
                received = records.len(),
                kept = kept.len(),
                "Section normalized"
            );
            stats.by_section.insert(key.clone(), kept.len() as u32);

            rolled_up.retain(|r| r.section != key);
            rolled_up.extend(kept.iter().cloned());
            sections.insert(key, kept);
        }

        let before = rolled_up.len();
        let triage = dedup(rolled_up);
        stats.records_deduplicated += (before - triage.len()) as u32;
        stats.triage = triage.len() as u32;

        let summary = summarize(&triage);

        let mut ingestion_order: Vec<NormalizedRecord> = triage.clone();
        ingestion_order.sort_by_key(|r| r.seq);
        let signals = self.clusterer.cluster(&ingestion_order);
        stats.signals = signals.len() as u32;
        stats.multi_source_signals = signals.iter().filter(|s| s.source_count > 1).count() as u32;

        let digest = build_digest(&triage, now);

        info!(
            triage = triage.len(),
            signals = signals.len(),
            strategy = self.clusterer.name(),
            "Scan complete"
        );

        sections.insert(TRIAGE_SECTION.to_string(), triage);

        ScanOutput {
            snapshot: Snapshot {
                schema_version: SCHEMA_VERSION.to_string(),
                last_updated: iso_utc(&now),
                sections,
                summary,
                signals,
            },
            digest,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{at, raw};
    use horizon_common::{Confidence, Priority};

    const NOW: &str = "2026-01-10T12:00:00Z";

    #[test]
    fn normalize_canonicalizes_and_classifies() {
        let config = ScanConfig::default();
        let pipeline = ScanPipeline::new(&config);
        let record = pipeline.normalize(
            &raw(
                "  New  scam targets pensioners - BBC News ",
                "https://bbc.example/a?utm_source=x&id=7",
                "BBC News",
                "Fri, 09 Jan 2026 08:00:00 GMT",
            ),
            "harms",
            3,
            at(NOW),
        );

        assert_eq!(record.canonical_title, "New scam targets pensioners");
        assert_eq!(record.canonical_url, "https://bbc.example/a?id=7");
        assert_eq!(record.id, identity_hash("New scam targets pensioners", "https://bbc.example/a?id=7"));
        assert_eq!(record.risk.tag, "FRAUD/FIN");
        assert_eq!(record.risk.priority, Priority::High);
        assert_eq!(record.date, at("2026-01-09T08:00:00Z"));
        assert!(!record.date_fallback);
        assert_eq!(record.confidence, Confidence::Medium);
        assert_eq!(record.section, "harms");
        assert_eq!(record.seq, 3);
    }

    #[test]
    fn bad_timestamp_falls_back_to_now() {
        let config = ScanConfig::default();
        let record = ScanPipeline::new(&config).normalize(
            &raw("Quiet item", "https://a.example/1", "", "sometime last week"),
            "models",
            0,
            at(NOW),
        );
        assert!(record.date_fallback);
        assert_eq!(record.date, at(NOW));
    }

    #[test]
    fn section_cap_is_enforced_on_intake() {
        let mut config = ScanConfig::default();
        config.section_caps.insert("harms".to_string(), 2);
        let records = (0..5)
            .map(|i| raw(&format!("Story {i}"), &format!("https://a.example/{i}"), "Src", NOW))
            .collect();

        let output = ScanPipeline::new(&config).run(vec![SectionBatch::new("harms", records)], at(NOW));
        assert_eq!(output.snapshot.sections["harms"].len(), 2);
        assert_eq!(output.stats.records_capped, 3);
    }

    #[test]
    fn stats_count_records_kept_per_section() {
        let config = ScanConfig::default();
        let batches = vec![
            SectionBatch::new(
                "harms",
                vec![
                    raw("Voice cloning scam hits families", "https://a.example/1", "BBC", NOW),
                    raw("Voice cloning scam hits families", "https://a.example/1", "BBC", NOW),
                    raw("Phishing kit sold online", "https://a.example/2", "BBC", NOW),
                ],
            ),
            SectionBatch::new("models", vec![raw("Model card published", "https://a.example/3", "Lab", NOW)]),
            SectionBatch::empty("aiid"),
        ];

        let stats = ScanPipeline::new(&config).run(batches, at(NOW)).stats;
        assert_eq!(stats.by_section["harms"], 2);
        assert_eq!(stats.by_section["models"], 1);
        assert_eq!(stats.by_section["aiid"], 0);
        assert!(!stats.by_section.contains_key(TRIAGE_SECTION));
        assert!(stats.to_string().contains("  harms                2\n"));
    }

    #[test]
    fn input_triage_section_is_ignored() {
        let config = ScanConfig::default();
        let batches = vec![SectionBatch::new(
            TRIAGE_SECTION,
            vec![raw("Injected", "https://a.example/1", "Src", NOW)],
        )];
        let output = ScanPipeline::new(&config).run(batches, at(NOW));
        assert!(output.snapshot.sections[TRIAGE_SECTION].is_empty());
        assert_eq!(output.snapshot.sections.len(), 1);
    }

    #[test]
    fn empty_sections_are_kept() {
        let config = ScanConfig::default();
        let output = ScanPipeline::new(&config).run(vec![SectionBatch::empty("aiid")], at(NOW));
        assert!(output.snapshot.sections["aiid"].is_empty());
        assert!(output.snapshot.signals.is_empty());
        assert_eq!(output.snapshot.last_updated, "2026-01-10T12:00:00Z");
        assert_eq!(output.snapshot.schema_version, SCHEMA_VERSION);
    }
}
