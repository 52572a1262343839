pub mod classify;
pub mod cluster;
pub mod confidence;
pub mod dedup;
pub mod digest;
pub mod identity;
pub mod normalize;
pub mod scan_pipeline;
pub mod stats;
pub mod summary;
pub mod taxonomy;
pub mod timestamp;

pub use cluster::{ClusterStrategy, GreedyExemplarClusterer};
pub use scan_pipeline::{ScanOutput, ScanPipeline};
pub use stats::ScanStats;
