// AI Incident Database GraphQL service.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use horizon_common::RawRecord;

use crate::client::HttpClient;
use crate::error::Result;

pub const AIID_GRAPHQL_URL: &str = "https://incidentdatabase.ai/api/graphql";
pub const AIID_CITE_BASE: &str = "https://incidentdatabase.ai/cite/";
pub const AIID_SOURCE: &str = "AI Incident Database";

#[derive(Debug, Deserialize)]
pub struct IncidentsResponse {
    #[serde(default)]
    data: Option<IncidentsData>,
}

#[derive(Debug, Deserialize)]
struct IncidentsData {
    #[serde(default)]
    incidents: Option<Vec<Incident>>,
}

#[derive(Debug, Deserialize)]
struct Incident {
    incident_id: Value,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

pub fn incidents_query(limit: usize) -> String {
    format!("{{ incidents(limit: {limit}, order: {{date: DESC}}) {{ incident_id title date }} }}")
}

fn incident_id(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Map a GraphQL response to raw records. A `YYYY-MM-DD` incident date becomes
/// midnight UTC; a missing date is left empty for the pipeline to fill in.
pub fn incidents_to_records(response: IncidentsResponse) -> Vec<RawRecord> {
    let incidents = response
        .data
        .and_then(|d| d.incidents)
        .unwrap_or_default();

    incidents
        .into_iter()
        .map(|incident| {
            let date = incident.date.unwrap_or_default();
            let date = date.trim();
            RawRecord {
                title: incident.title.unwrap_or_default(),
                link: format!("{AIID_CITE_BASE}{}", incident_id(&incident.incident_id)),
                source: AIID_SOURCE.to_string(),
                published_at: if date.is_empty() {
                    String::new()
                } else {
                    format!("{date}T00:00:00Z")
                },
                section_key: String::new(),
            }
        })
        .collect()
}

pub async fn fetch_incidents(client: &HttpClient, limit: usize) -> Result<Vec<RawRecord>> {
    let body = json!({ "query": incidents_query(limit) });
    let response: IncidentsResponse = client.post_json(AIID_GRAPHQL_URL, &body).await?;
    let records = incidents_to_records(response);
    info!(items = records.len(), "aiid: fetched incidents");
    Ok(records)
}
