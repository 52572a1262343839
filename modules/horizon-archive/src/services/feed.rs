// RSS/Atom feed service.

use chrono::SecondsFormat;
use tracing::info;

use horizon_common::RawRecord;

use crate::client::HttpClient;
use crate::error::{ArchiveError, Result};

/// Source label when a feed entry names no outlet.
pub const DEFAULT_FEED_SOURCE: &str = "News";

const OUTLET_SEPARATOR: &str = " - ";

/// Outlet from an aggregator-style "Headline - Outlet" title.
fn outlet_from_title(title: &str) -> Option<&str> {
    let (head, outlet) = title.rsplit_once(OUTLET_SEPARATOR)?;
    let outlet = outlet.trim();
    (!head.trim().is_empty() && !outlet.is_empty()).then_some(outlet)
}

/// Parse an RSS/Atom document into at most `max_items` raw records, in feed
/// order. Titles and links are kept as delivered; canonicalization happens in
/// the scan pipeline.
pub fn parse_feed(bytes: &[u8], max_items: usize) -> Result<Vec<RawRecord>> {
    let feed = feed_rs::parser::parse(bytes).map_err(|e| ArchiveError::FeedParse(e.to_string()))?;

    let records = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let title = entry.title.map(|t| t.content).unwrap_or_default();
            let link = entry
                .links
                .first()
                .map(|l| l.href.clone())
                .or_else(|| entry.id.starts_with("http").then(|| entry.id.clone()))
                .unwrap_or_default();
            if title.trim().is_empty() && link.is_empty() {
                return None;
            }

            let published_at = entry
                .published
                .or(entry.updated)
                .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
                .unwrap_or_default();
            let source = outlet_from_title(&title)
                .unwrap_or(DEFAULT_FEED_SOURCE)
                .to_string();

            Some(RawRecord {
                title,
                link,
                source,
                published_at,
                section_key: String::new(),
            })
        })
        .take(max_items)
        .collect();

    Ok(records)
}

pub async fn fetch_feed(client: &HttpClient, url: &str, max_items: usize) -> Result<Vec<RawRecord>> {
    let bytes = client.get_bytes(url).await?;
    let records = parse_feed(&bytes, max_items)?;
    info!(feed_url = url, items = records.len(), "feed: parsed successfully");
    Ok(records)
}
