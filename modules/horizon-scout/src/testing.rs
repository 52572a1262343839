// Test doubles and fixture builders for the scan pipeline.
//
// - StaticSource (FeedSource) returns fixed section batches
// - MemorySink (ArtifactSink) keeps the last snapshot and digest in memory
//
// Plus builders for raw and normalized records.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use horizon_archive::FeedSource;
use horizon_common::{
    Confidence, HorizonError, NormalizedRecord, Priority, RawRecord, RiskLabel, SectionBatch,
    Snapshot, TimeHorizon,
};

use crate::pipeline::identity::identity_hash;
use crate::store::ArtifactSink;

// ---------------------------------------------------------------------------
// StaticSource
// ---------------------------------------------------------------------------

pub struct StaticSource {
    batches: Vec<SectionBatch>,
}

impl StaticSource {
    pub fn new(batches: Vec<SectionBatch>) -> Self {
        Self { batches }
    }
}

#[async_trait]
impl FeedSource for StaticSource {
    async fn gather(&self) -> Vec<SectionBatch> {
        self.batches.clone()
    }
}

// ---------------------------------------------------------------------------
// MemorySink
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemorySink {
    snapshot: Mutex<Option<Snapshot>>,
    digest: Mutex<Option<String>>,
    fail: bool,
}

impl MemorySink {
    /// A sink whose every write fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.snapshot.lock().unwrap().clone()
    }

    pub fn digest(&self) -> Option<String> {
        self.digest.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), HorizonError> {
        if self.fail {
            return Err(HorizonError::Persistence("sink unavailable".to_string()));
        }
        Ok(())
    }
}

impl ArtifactSink for MemorySink {
    fn write_snapshot(&self, snapshot: &Snapshot) -> Result<(), HorizonError> {
        self.check()?;
        *self.snapshot.lock().unwrap() = Some(snapshot.clone());
        Ok(())
    }

    fn write_digest(&self, digest: &str) -> Result<(), HorizonError> {
        self.check()?;
        *self.digest.lock().unwrap() = Some(digest.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Record builders
// ---------------------------------------------------------------------------

/// Parse an RFC 3339 fixture instant.
pub fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .expect("fixture timestamp must be RFC 3339")
        .with_timezone(&Utc)
}

pub fn raw(title: &str, link: &str, source: &str, published_at: &str) -> RawRecord {
    RawRecord {
        title: title.to_string(),
        link: link.to_string(),
        source: source.to_string(),
        published_at: published_at.to_string(),
        section_key: String::new(),
    }
}

/// A GENERAL/Low record whose title and URL are already canonical.
pub fn record(title: &str, url: &str, date: &str) -> NormalizedRecord {
    NormalizedRecord {
        id: identity_hash(title, url),
        title: title.to_string(),
        link: url.to_string(),
        canonical_title: title.to_string(),
        canonical_url: url.to_string(),
        source: "Test Source".to_string(),
        published_at: date.to_string(),
        date: at(date),
        date_fallback: false,
        section: "harms".to_string(),
        risk: RiskLabel::general(),
        rmf: Vec::new(),
        atlas: Vec::new(),
        confidence: Confidence::Medium,
        seq: 0,
    }
}

pub fn with_risk(mut record: NormalizedRecord, priority: Priority, tag: &str) -> NormalizedRecord {
    record.risk = RiskLabel {
        priority,
        tag: tag.to_string(),
        time_horizon: TimeHorizon::Now,
        workstreams: Vec::new(),
        matched_terms: Vec::new(),
        score: 1,
    };
    record
}

pub fn with_workstreams(mut record: NormalizedRecord, workstreams: &[&str]) -> NormalizedRecord {
    record.risk.workstreams = workstreams.iter().map(|w| w.to_string()).collect();
    record
}

pub fn with_source(mut record: NormalizedRecord, source: &str) -> NormalizedRecord {
    record.source = source.to_string();
    record
}
