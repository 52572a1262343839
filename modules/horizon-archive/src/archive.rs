// Archive: the network-backed FeedSource. Walks a SourcePlan section by
// section; a failing upstream is logged and contributes nothing.

use async_trait::async_trait;
use tracing::{info, warn};

use horizon_common::{RawRecord, SectionBatch};

use crate::client::HttpClient;
use crate::plan::{FeedRequest, SectionPlan, SectionRequest, SourcePlan};
use crate::services::{aiid, feed};
use crate::source::FeedSource;

pub struct Archive {
    client: HttpClient,
    plan: SourcePlan,
}

impl Archive {
    pub fn new(client: HttpClient, plan: SourcePlan) -> Self {
        Self { client, plan }
    }

    pub fn plan(&self) -> &SourcePlan {
        &self.plan
    }

    async fn read_feed(&self, section: &str, request: &FeedRequest) -> Vec<RawRecord> {
        match feed::fetch_feed(&self.client, &request.url, request.max_items).await {
            Ok(mut records) => {
                if let Some(label) = &request.source_label {
                    for record in &mut records {
                        record.source = label.clone();
                    }
                }
                records
            }
            Err(e) => {
                warn!(section, url = request.url.as_str(), error = %e, "Feed fetch failed, skipping");
                Vec::new()
            }
        }
    }

    async fn gather_section(&self, section: &SectionPlan) -> SectionBatch {
        let mut records = match &section.request {
            SectionRequest::Aiid { limit } => {
                match aiid::fetch_incidents(&self.client, *limit).await {
                    Ok(records) => records,
                    Err(e) => {
                        warn!(section = section.key.as_str(), error = %e, "AIID fetch failed, section empty");
                        Vec::new()
                    }
                }
            }
            SectionRequest::Feeds(feeds) => {
                let mut records = Vec::new();
                for request in feeds {
                    records.extend(self.read_feed(&section.key, request).await);
                }
                records
            }
        };

        if let Some(cap) = section.max_items {
            records.truncate(cap);
        }
        for record in &mut records {
            record.section_key = section.key.clone();
        }

        info!(section = section.key.as_str(), items = records.len(), "Section gathered");
        SectionBatch::new(section.key.clone(), records)
    }
}

#[async_trait]
impl FeedSource for Archive {
    async fn gather(&self) -> Vec<SectionBatch> {
        let mut batches = Vec::with_capacity(self.plan.sections.len());
        for section in &self.plan.sections {
            batches.push(self.gather_section(section).await);
        }
        batches
    }
}
