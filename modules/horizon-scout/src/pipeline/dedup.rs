use std::collections::HashSet;

use horizon_common::NormalizedRecord;

/// Exact dedup by identity hash. Sorts newest-first itself (stable), then keeps
/// the first occurrence of each hash, so the most recently dated copy survives.
/// Idempotent.
pub fn dedup(mut records: Vec<NormalizedRecord>) -> Vec<NormalizedRecord> {
    records.sort_by(|a, b| b.date.cmp(&a.date));
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(r.id.clone()))
        .collect()
}
