//! Rule-based risk classification.
//!
//! Each rule scores the number of its distinct terms found as substrings of the
//! lowercase title. The single best rule wins on strict greater-than, so on a tie
//! the rule listed earlier in the table keeps the lead. Table order encodes
//! severity, which makes ties resolve toward the more severe category.

use std::collections::HashSet;

use horizon_common::{RiskLabel, RiskRule, RuleTable};

/// Upper bound on `matched_terms` reported for diagnostics.
pub const MAX_MATCHED_TERMS: usize = 10;

pub struct RiskClassifier<'a> {
    table: &'a RuleTable,
}

impl<'a> RiskClassifier<'a> {
    pub fn new(table: &'a RuleTable) -> Self {
        Self { table }
    }

    pub fn classify(&self, title: &str) -> RiskLabel {
        let title = title.to_lowercase();
        let mut best: Option<(&RiskRule, u32)> = None;
        let mut matched_terms: Vec<String> = Vec::new();

        for rule in self.table.rules() {
            let hits = matching_terms(&rule.terms, &title);
            if hits.is_empty() {
                continue;
            }
            let score = hits.len() as u32;
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((rule, score));
            }
            matched_terms.extend(hits.into_iter().map(str::to_string));
        }

        let Some((rule, score)) = best else {
            return RiskLabel::general();
        };

        matched_terms.truncate(MAX_MATCHED_TERMS);
        RiskLabel {
            priority: rule.priority,
            tag: rule.tag.clone(),
            time_horizon: rule.time_horizon,
            workstreams: rule.workstreams.clone(),
            matched_terms,
            score,
        }
    }
}

/// Distinct terms that occur in `title`, in table order.
fn matching_terms<'t>(terms: &'t [String], title: &str) -> Vec<&'t str> {
    let mut seen = HashSet::new();
    terms
        .iter()
        .map(String::as_str)
        .filter(|term| title.contains(term) && seen.insert(*term))
        .collect()
}
