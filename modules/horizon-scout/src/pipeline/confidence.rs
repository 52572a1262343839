use horizon_common::Confidence;

/// Section whose records are forum posts regardless of the source label.
const FORUM_SECTION: &str = "forums";

/// Grade a record's source: incident databases and UK regulators high, forums low.
pub fn source_confidence(source: &str, section: &str) -> Confidence {
    if section == FORUM_SECTION {
        return Confidence::Low;
    }
    let s = source.to_lowercase();
    if s.contains("incident database")
        || s.contains("ofcom")
        || s.contains("ico")
        || s.contains("gov.uk")
    {
        Confidence::High
    } else if s.contains("reddit") {
        Confidence::Low
    } else {
        Confidence::Medium
    }
}
