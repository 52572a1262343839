use async_trait::async_trait;

use horizon_common::SectionBatch;

/// Anything that can deliver the ordered section batches a scan consumes.
/// Sources never fail outright: a section that cannot be fetched comes back
/// empty and the failure is logged.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn gather(&self) -> Vec<SectionBatch>;
}
