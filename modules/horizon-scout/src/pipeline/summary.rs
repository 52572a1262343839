use std::collections::BTreeMap;

use horizon_common::{NormalizedRecord, Summary};

fn bump(counts: &mut BTreeMap<String, u32>, key: &str) {
    *counts.entry(key.to_string()).or_insert(0) += 1;
}

/// Count records by priority, tag and horizon, and each workstream a record
/// carries. Callers pass the deduplicated roll-up so nothing is counted twice.
pub fn summarize(records: &[NormalizedRecord]) -> Summary {
    let mut summary = Summary::default();
    for record in records {
        let risk = &record.risk;
        bump(&mut summary.by_priority, risk.priority.as_str());
        bump(&mut summary.by_tag, &risk.tag);
        bump(&mut summary.by_horizon, risk.time_horizon.as_str());
        for workstream in &risk.workstreams {
            bump(&mut summary.by_workstream, workstream);
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{record, with_risk, with_workstreams};
    use horizon_common::Priority;

    #[test]
    fn workstreams_fan_out() {
        let cyber = with_workstreams(
            with_risk(record("Phishing kit", "https://a.example/1", "2026-01-05T00:00:00Z"), Priority::High, "CYBER/EXPLOIT"),
            &["HSG", "PSG"],
        );
        let summary = summarize(&[cyber]);
        assert_eq!(summary.by_workstream.get("HSG"), Some(&1));
        assert_eq!(summary.by_workstream.get("PSG"), Some(&1));
        assert_eq!(summary.by_priority.get("High"), Some(&1));
        assert_eq!(summary.by_tag.get("CYBER/EXPLOIT"), Some(&1));
        assert_eq!(summary.by_horizon.get("Now"), Some(&1));
    }

    #[test]
    fn general_records_have_no_workstreams() {
        let records = vec![
            record("Quiet news one", "https://a.example/1", "2026-01-05T00:00:00Z"),
            record("Quiet news two", "https://a.example/2", "2026-01-05T00:00:00Z"),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.by_priority.get("Low"), Some(&2));
        assert_eq!(summary.by_tag.get("GENERAL"), Some(&2));
        assert!(summary.by_workstream.is_empty());
    }

    #[test]
    fn empty_input_is_empty_summary() {
        assert_eq!(summarize(&[]), Summary::default());
    }
}
