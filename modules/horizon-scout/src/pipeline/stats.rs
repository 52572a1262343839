use std::collections::BTreeMap;

/// Counters from one scan run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanStats {
    pub records_received: u32,
    /// Records dropped because their section was over its configured cap.
    pub records_capped: u32,
    pub records_deduplicated: u32,
    pub date_fallbacks: u32,
    pub url_fallbacks: u32,
    /// Records kept per section after in-section dedup.
    pub by_section: BTreeMap<String, u32>,
    pub triage: u32,
    pub signals: u32,
    pub multi_source_signals: u32,
}

impl std::fmt::Display for ScanStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Horizon Scan Complete ===")?;
        writeln!(f, "Records received:   {}", self.records_received)?;
        writeln!(f, "Over section cap:   {}", self.records_capped)?;
        writeln!(f, "Exact duplicates:   {}", self.records_deduplicated)?;
        writeln!(f, "Date fallbacks:     {}", self.date_fallbacks)?;
        writeln!(f, "URL fallbacks:      {}", self.url_fallbacks)?;
        writeln!(f, "\nBy section:")?;
        for (section, count) in &self.by_section {
            writeln!(f, "  {section:<20} {count}")?;
        }
        writeln!(f, "\nTriage records:     {}", self.triage)?;
        writeln!(f, "Signals:            {}", self.signals)?;
        writeln!(f, "  multi-source:     {}", self.multi_source_signals)?;
        Ok(())
    }
}
