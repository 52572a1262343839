//! Weekly digest: a 7-day window over the roll-up, ranked and rendered as Markdown.

use chrono::{DateTime, Duration, Utc};

use horizon_common::{iso_utc, NormalizedRecord, Priority, CAPABILITY_TAG};

pub const DIGEST_WINDOW_DAYS: i64 = 7;

/// Entries listed per digest section.
pub const DIGEST_LIST_LIMIT: usize = 10;

const NO_HIGH_PRIORITY: &str = "_No high-priority items in the last 7 days._";
const NO_CAPABILITY: &str = "_No capability/milestone items in the last 7 days._";

/// Records chosen for the two digest lists, in ranked order.
#[derive(Debug, Default)]
pub struct DigestSelection<'a> {
    pub high_priority: Vec<&'a NormalizedRecord>,
    pub capability: Vec<&'a NormalizedRecord>,
}

fn is_capability(record: &NormalizedRecord) -> bool {
    record.risk.tag == CAPABILITY_TAG
}

/// Records dated within `[now - 7d, now]`, ranked by priority, then
/// capability/milestone first, then ISO date ascending.
pub fn rank(records: &[NormalizedRecord], now: DateTime<Utc>) -> Vec<&NormalizedRecord> {
    let cutoff = now - Duration::days(DIGEST_WINDOW_DAYS);

    let mut recent: Vec<&NormalizedRecord> = records
        .iter()
        .filter(|r| r.date >= cutoff && r.date <= now)
        .collect();

    recent.sort_by_cached_key(|r| (r.risk.priority.rank(), !is_capability(r), r.date_iso()));
    recent
}

/// The first ten high-priority and the first ten capability records of `rank`.
pub fn select(records: &[NormalizedRecord], now: DateTime<Utc>) -> DigestSelection<'_> {
    let recent = rank(records, now);

    DigestSelection {
        high_priority: recent
            .iter()
            .copied()
            .filter(|r| r.risk.priority == Priority::High)
            .take(DIGEST_LIST_LIMIT)
            .collect(),
        capability: recent
            .iter()
            .copied()
            .filter(|r| is_capability(r))
            .take(DIGEST_LIST_LIMIT)
            .collect(),
    }
}

fn line(record: &NormalizedRecord) -> String {
    let day = record.date.format("%Y-%m-%d");
    let risk = &record.risk;
    format!(
        "- **{}** ({day}) — *{} / {} / {}*  \n  {}",
        record.canonical_title.trim(),
        risk.tag,
        risk.time_horizon,
        risk.workstreams.join(","),
        record.canonical_url,
    )
}

fn list_or(records: &[&NormalizedRecord], placeholder: &str) -> String {
    if records.is_empty() {
        placeholder.to_string()
    } else {
        records.iter().map(|r| line(r)).collect::<Vec<_>>().join("\n")
    }
}

pub fn render(selection: &DigestSelection<'_>, now: DateTime<Utc>) -> String {
    let parts = [
        format!("# Weekly Horizon Scan Digest\n\nGenerated: **{}**\n", iso_utc(&now)),
        "## Top High-Priority Signals (last 7 days)\n".to_string(),
        list_or(&selection.high_priority, NO_HIGH_PRIORITY),
        "\n\n## Capability / Milestone Signals (last 7 days)\n".to_string(),
        list_or(&selection.capability, NO_CAPABILITY),
        "\n\n## Notes\n- `rmf` labels are heuristic tags aligned to NIST AI RMF functions (Govern/Map/Measure/Manage).".to_string(),
        "- `atlas` labels are heuristic themes inspired by MITRE ATLAS; they are not authoritative technique IDs.\n".to_string(),
    ];
    parts.join("\n")
}

pub fn build_digest(records: &[NormalizedRecord], now: DateTime<Utc>) -> String {
    render(&select(records, now), now)
}
