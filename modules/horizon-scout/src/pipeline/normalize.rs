//! Title and URL canonicalization.
//!
//! Three distinct canonical forms live here:
//! - `normalize_title` — the display/identity title (whitespace + outlet suffix).
//! - `cluster_key` — an aggressive lowercase key used only for similarity clustering.
//! - `canonicalize_url` — the identity URL with tracking parameters removed.

use std::borrow::Cow;

use url::{form_urlencoded, ParseError, Url};

/// Separator Google News and most aggregators put before the outlet name.
const OUTLET_SEPARATOR: &str = " - ";

/// Query parameters that carry campaign/click tracking rather than content.
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
];

/// Substrings dropped from cluster keys. Plain substring removal: "ai" also
/// disappears from inside words like "openai" or "chain".
const CLUSTER_STOPWORDS: &[&str] = &["ai", "artificial intelligence", "model", "release"];

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapse whitespace and strip a trailing " - Outlet" suffix (the text after
/// the last separator).
pub fn normalize_title(raw: &str) -> String {
    let collapsed = collapse_whitespace(raw);
    match collapsed.rfind(OUTLET_SEPARATOR) {
        Some(idx) if idx > 0 => collapsed[..idx].trim_end().to_string(),
        _ => collapsed,
    }
}

fn fold_punctuation(ch: char) -> char {
    match ch {
        '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}' => '\'',
        '\u{2013}' | '\u{2014}' | '-' => ' ',
        c if c.is_whitespace() => ' ',
        c => c,
    }
}

/// Similarity key for clustering. Distinct from the canonical title.
pub fn cluster_key(title: &str) -> String {
    let cleaned: String = title
        .to_lowercase()
        .chars()
        .map(fold_punctuation)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .collect();

    let mut key = collapse_whitespace(&cleaned);
    for stopword in CLUSTER_STOPWORDS {
        key = key.replace(stopword, "");
    }
    collapse_whitespace(&key)
}

/// A canonicalized URL plus whether it failed to parse as an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalUrl {
    pub url: String,
    pub fallback: bool,
}

fn is_tracking(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key.to_lowercase().as_str())
}

/// Query pairs minus tracking parameters, in their original order.
fn kept_pairs<'a>(pairs: impl Iterator<Item = (Cow<'a, str>, Cow<'a, str>)>) -> Vec<(String, String)> {
    pairs
        .filter(|(key, _)| !is_tracking(key))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Scheme-less and relative links (`www.x.com/a?...`, `/path?...`) have no
/// base to parse against, so their query is split off and filtered by hand.
fn strip_relative(raw: &str) -> String {
    let (head, fragment) = match raw.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (raw, None),
    };
    let Some((path, query)) = head.split_once('?') else {
        return raw.to_string();
    };

    let kept = kept_pairs(form_urlencoded::parse(query.as_bytes()));
    let mut out = path.to_string();
    if !kept.is_empty() {
        out.push('?');
        out.push_str(&form_urlencoded::Serializer::new(String::new()).extend_pairs(kept).finish());
    }
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

/// Strip tracking parameters, preserving the relative order of the rest.
/// Relative references get the same stripping on a best-effort basis; they and
/// anything else `Url::parse` rejects come back with `fallback` set.
pub fn canonicalize_url_checked(raw: &str) -> CanonicalUrl {
    let mut parsed = match Url::parse(raw) {
        Ok(parsed) => parsed,
        Err(ParseError::RelativeUrlWithoutBase) => {
            return CanonicalUrl {
                url: strip_relative(raw),
                fallback: true,
            };
        }
        Err(_) => {
            return CanonicalUrl {
                url: raw.to_string(),
                fallback: true,
            };
        }
    };

    if parsed.query().is_some() {
        let kept = kept_pairs(parsed.query_pairs());
        if kept.is_empty() {
            parsed.set_query(None);
        } else {
            parsed.query_pairs_mut().clear().extend_pairs(kept);
        }
    }

    CanonicalUrl {
        url: parsed.to_string(),
        fallback: false,
    }
}

pub fn canonicalize_url(raw: &str) -> String {
    canonicalize_url_checked(raw).url
}
