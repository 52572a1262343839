use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use horizon_common::SectionBatch;

use crate::error::{ArchiveError, Result};
use crate::source::FeedSource;

#[derive(Debug, Deserialize)]
struct FixtureFile {
    sections: Vec<SectionBatch>,
}

/// Offline FeedSource backed by a JSON file of the form
/// `{"sections": [{"key": "...", "records": [...]}]}`.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    batches: Vec<SectionBatch>,
}

impl FixtureSource {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ArchiveError::Fixture(format!("cannot read {}: {e}", path.display())))?;
        let source = Self::from_json(&content)?;
        info!(path = %path.display(), sections = source.batches.len(), "Loaded fixture");
        Ok(source)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: FixtureFile = serde_json::from_str(content)?;
        let batches = file
            .sections
            .into_iter()
            .map(|mut batch| {
                for record in &mut batch.records {
                    record.section_key = batch.key.clone();
                }
                batch
            })
            .collect();
        Ok(Self { batches })
    }
}

#[async_trait]
impl FeedSource for FixtureSource {
    async fn gather(&self) -> Vec<SectionBatch> {
        self.batches.clone()
    }
}
