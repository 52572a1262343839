//! Near-duplicate grouping of records into signals.
//!
//! The default strategy is greedy, single-pass and single-link against a fixed
//! exemplar: each record joins the first cluster whose exemplar key is similar
//! enough, otherwise it seeds a new cluster. Exemplar keys never change after
//! creation, so grouping is order-dependent and non-transitive. Callers must feed
//! records in one stable ingestion order to get reproducible clusters.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use tracing::debug;

use horizon_common::{MemberSourceType, NormalizedRecord, Signal, SignalMember};

use super::identity::short_digest;
use super::normalize::cluster_key;

/// Members kept per signal, newest first.
pub const MAX_SIGNAL_MEMBERS: usize = 8;

/// Similarity in `[0, 1]` between two cluster keys.
pub type SimilarityFn = fn(&str, &str) -> f64;

/// Swappable clustering algorithm. Implementations receive records in ingestion
/// order and return signals sorted by `(last_seen desc, source_count desc)`.
pub trait ClusterStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn cluster(&self, records: &[NormalizedRecord]) -> Vec<Signal>;
}

pub struct GreedyExemplarClusterer {
    threshold: f64,
    similarity: SimilarityFn,
}

impl GreedyExemplarClusterer {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            similarity: strsim::jaro_winkler,
        }
    }

    pub fn with_similarity(mut self, similarity: SimilarityFn) -> Self {
        self.similarity = similarity;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

struct Cluster<'r> {
    exemplar_key: String,
    members: Vec<&'r NormalizedRecord>,
    sources: BTreeSet<String>,
    tags: BTreeSet<String>,
    first_seen: DateTime<Utc>,
    last_seen: DateTime<Utc>,
}

impl<'r> Cluster<'r> {
    fn seed(exemplar_key: String, record: &'r NormalizedRecord) -> Self {
        let mut cluster = Self {
            exemplar_key,
            members: Vec::new(),
            sources: BTreeSet::new(),
            tags: BTreeSet::new(),
            first_seen: record.date,
            last_seen: record.date,
        };
        cluster.attach(record);
        cluster
    }

    fn attach(&mut self, record: &'r NormalizedRecord) {
        let source = record.source.trim();
        if !source.is_empty() {
            self.sources.insert(source.to_string());
        }
        self.tags.extend(record.tags().map(str::to_string));
        self.first_seen = self.first_seen.min(record.date);
        self.last_seen = self.last_seen.max(record.date);
        self.members.push(record);
    }

    fn into_signal(self) -> Signal {
        let representative_title = self
            .members
            .first()
            .map(|r| r.canonical_title.clone())
            .unwrap_or_default();

        let mut members = self.members;
        members.sort_by(|a, b| b.date.cmp(&a.date));

        Signal {
            signal_id: short_digest(&self.exemplar_key),
            representative_title,
            tags: self.tags,
            source_count: self.sources.len(),
            first_seen: self.first_seen,
            last_seen: self.last_seen,
            members: members
                .into_iter()
                .take(MAX_SIGNAL_MEMBERS)
                .map(|r| SignalMember {
                    title: r.canonical_title.clone(),
                    link: r.canonical_url.clone(),
                    source: r.source.clone(),
                    date: r.date,
                    source_type: MemberSourceType::from_url(&r.canonical_url),
                })
                .collect(),
        }
    }
}

impl ClusterStrategy for GreedyExemplarClusterer {
    fn name(&self) -> &'static str {
        "greedy_exemplar"
    }

    fn cluster(&self, records: &[NormalizedRecord]) -> Vec<Signal> {
        let mut clusters: Vec<Cluster<'_>> = Vec::new();

        for record in records {
            let key = cluster_key(&record.canonical_title);
            if key.is_empty() {
                debug!(id = record.id.as_str(), "Skipping record with empty cluster key");
                continue;
            }

            let matched = clusters
                .iter_mut()
                .find(|c| (self.similarity)(&key, &c.exemplar_key) >= self.threshold);

            match matched {
                Some(cluster) => cluster.attach(record),
                None => clusters.push(Cluster::seed(key, record)),
            }
        }

        let mut signals: Vec<Signal> = clusters.into_iter().map(Cluster::into_signal).collect();
        sort_signals(&mut signals);
        signals
    }
}

/// Most recent first; among equally recent, better corroborated first.
pub fn sort_signals(signals: &mut [Signal]) {
    signals.sort_by(|a, b| {
        b.last_seen
            .cmp(&a.last_seen)
            .then_with(|| b.source_count.cmp(&a.source_count))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{record, with_risk, with_source};
    use horizon_common::Priority;

    fn clusterer() -> GreedyExemplarClusterer {
        GreedyExemplarClusterer::new(0.86)
    }

    #[test]
    fn near_duplicate_titles_share_a_signal() {
        let records = vec![
            with_source(
                record("OpenAI releases GPT-5 model", "https://a.example/1", "2026-01-05T10:00:00Z"),
                "Outlet A",
            ),
            with_source(
                record("OpenAI launches GPT-5", "https://b.example/2", "2026-01-05T11:00:00Z"),
                "Outlet B",
            ),
            record(
                "Ofcom publishes online safety report",
                "https://c.example/3",
                "2026-01-05T09:00:00Z",
            ),
        ];

        let signals = clusterer().cluster(&records);
        assert_eq!(signals.len(), 2);

        let gpt = signals
            .iter()
            .find(|s| s.members.len() == 2)
            .expect("GPT-5 stories should cluster");
        assert_eq!(gpt.source_count, 2);
        assert_eq!(gpt.representative_title, "OpenAI releases GPT-5 model");
        assert_eq!(gpt.members[0].title, "OpenAI launches GPT-5");
        assert_eq!(gpt.first_seen, records[0].date);
        assert_eq!(gpt.last_seen, records[1].date);
    }

    #[test]
    fn signal_id_is_digest_of_exemplar_key() {
        let records = vec![record("OpenAI launches GPT-5", "https://a.example/1", "2026-01-05T10:00:00Z")];
        let signals = clusterer().cluster(&records);
        assert_eq!(signals[0].signal_id, short_digest("open launches gpt 5"));
    }

    #[test]
    fn empty_keys_are_skipped() {
        let records = vec![
            record("AI model release", "https://a.example/1", "2026-01-05T10:00:00Z"),
            record("???", "https://a.example/2", "2026-01-05T10:00:00Z"),
        ];
        assert!(clusterer().cluster(&records).is_empty());
    }

    #[test]
    fn first_matching_cluster_wins_not_best() {
        // Always-similar metric: everything joins the first cluster.
        let always = GreedyExemplarClusterer::new(0.5).with_similarity(|_, _| 0.9);
        let records = vec![
            record("first story", "https://a.example/1", "2026-01-05T10:00:00Z"),
            record("second story", "https://a.example/2", "2026-01-05T10:00:00Z"),
        ];
        let signals = always.cluster(&records);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].representative_title, "first story");
    }

    #[test]
    fn matching_is_against_fixed_exemplar() {
        // Similar when key lengths differ by at most one: xx ~ xxx ~ xxxx, but xx !~ xxxx.
        fn near_length(a: &str, b: &str) -> f64 {
            if a.len().abs_diff(b.len()) <= 1 { 1.0 } else { 0.0 }
        }
        let strategy = GreedyExemplarClusterer::new(0.5).with_similarity(near_length);
        let records = vec![
            record("xx", "https://a.example/1", "2026-01-05T10:00:00Z"),
            record("xxx", "https://a.example/2", "2026-01-05T10:00:00Z"),
            record("xxxx", "https://a.example/3", "2026-01-05T10:00:00Z"),
        ];
        let signals = strategy.cluster(&records);
        assert_eq!(signals.len(), 2);
        let sizes: Vec<usize> = signals.iter().map(|s| s.members.len()).collect();
        assert!(sizes.contains(&2) && sizes.contains(&1));
    }

    #[test]
    fn tags_and_sources_union() {
        let records = vec![
            with_source(
                with_risk(record("OpenAI launches GPT-5", "https://a.example/1", "2026-01-05T10:00:00Z"), Priority::Medium, "CAPABILITY/MILESTONE"),
                "Outlet A",
            ),
            with_source(
                with_risk(record("OpenAI launches GPT-5!", "https://a.example/2", "2026-01-04T10:00:00Z"), Priority::High, "CYBER/EXPLOIT"),
                " ",
            ),
        ];
        let signals = clusterer().cluster(&records);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].source_count, 1);
        assert!(signals[0].tags.contains("CAPABILITY/MILESTONE"));
        assert!(signals[0].tags.contains("CYBER/EXPLOIT"));
    }

    #[test]
    fn members_capped_and_newest_first() {
        let records: Vec<_> = (1..=10)
            .map(|day| {
                record(
                    "Deepfake fraud wave hits banks",
                    &format!("https://a.example/{day}"),
                    &format!("2026-01-{day:02}T00:00:00Z"),
                )
            })
            .collect();
        let signals = clusterer().cluster(&records);
        assert_eq!(signals.len(), 1);
        let members = &signals[0].members;
        assert_eq!(members.len(), MAX_SIGNAL_MEMBERS);
        assert_eq!(members[0].link, "https://a.example/10");
        assert_eq!(members[7].link, "https://a.example/3");
    }

    #[test]
    fn signals_sorted_by_last_seen_then_source_count() {
        let records = vec![
            with_source(record("Old quiet story", "https://a.example/1", "2026-01-01T00:00:00Z"), "One"),
            with_source(record("Fresh single story", "https://a.example/2", "2026-01-05T00:00:00Z"), "One"),
            with_source(record("Zebra crossing update", "https://a.example/3", "2026-01-05T00:00:00Z"), "One"),
            with_source(record("Zebra crossing update", "https://b.example/3", "2026-01-05T00:00:00Z"), "Two"),
        ];
        let signals = clusterer().cluster(&records);
        let titles: Vec<&str> = signals.iter().map(|s| s.representative_title.as_str()).collect();
        assert_eq!(titles, vec!["Zebra crossing update", "Fresh single story", "Old quiet story"]);
    }
}
