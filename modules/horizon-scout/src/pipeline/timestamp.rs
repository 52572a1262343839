use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Naive layouts tried after RFC 3339 and RFC 2822. Interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A parsed instant plus whether the run instant was substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedTimestamp {
    pub at: DateTime<Utc>,
    pub fallback: bool,
}

/// Parse a loosely formatted feed timestamp. Never fails: anything
/// unrecognized resolves to `now` with `fallback` set.
pub fn parse_timestamp(raw: &str, now: DateTime<Utc>) -> ParsedTimestamp {
    match try_parse(raw.trim()) {
        Some(at) => ParsedTimestamp {
            at,
            fallback: false,
        },
        None => ParsedTimestamp {
            at: now,
            fallback: true,
        },
    }
}

fn try_parse(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
