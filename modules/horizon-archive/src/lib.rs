pub mod archive;
pub mod client;
pub mod error;
pub mod fixture;
pub mod plan;
pub mod services;
pub mod source;

pub use archive::Archive;
pub use client::HttpClient;
pub use error::{ArchiveError, Result};
pub use fixture::FixtureSource;
pub use plan::{FeedRequest, SectionPlan, SectionRequest, SourcePlan};
pub use source::FeedSource;
