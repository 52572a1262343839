use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::info;

use horizon_archive::FeedSource;
use horizon_common::ScanConfig;

use crate::pipeline::{ScanPipeline, ScanStats};
use crate::store::ArtifactSink;

/// Gather → scan → persist, once.
pub struct Scout<'a> {
    source: &'a dyn FeedSource,
    sink: &'a dyn ArtifactSink,
    config: &'a ScanConfig,
}

impl<'a> Scout<'a> {
    pub fn new(source: &'a dyn FeedSource, sink: &'a dyn ArtifactSink, config: &'a ScanConfig) -> Self {
        Self { source, sink, config }
    }

    pub async fn run(&self, now: DateTime<Utc>) -> Result<ScanStats> {
        info!(now = %now, "Horizon scan starting");

        let batches = self.source.gather().await;
        info!(sections = batches.len(), "Sources gathered");

        let output = ScanPipeline::new(self.config).run(batches, now);

        self.sink
            .write_snapshot(&output.snapshot)
            .context("Failed to write snapshot")?;
        self.sink
            .write_digest(&output.digest)
            .context("Failed to write digest")?;

        Ok(output.stats)
    }
}
