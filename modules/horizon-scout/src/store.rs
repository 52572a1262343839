//! Persistence for run artifacts.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use horizon_common::{HorizonError, Snapshot};

pub const SNAPSHOT_FILE: &str = "news_data.json";
pub const DIGEST_FILE: &str = "weekly_digest.md";

/// Destination for the two artifacts a scan produces.
pub trait ArtifactSink {
    fn write_snapshot(&self, snapshot: &Snapshot) -> Result<(), HorizonError>;
    fn write_digest(&self, digest: &str) -> Result<(), HorizonError>;
}

/// Writes `news_data.json` and `weekly_digest.md` into a directory, creating it
/// if needed. Each write replaces the previous file.
pub struct FileSink {
    out_dir: PathBuf,
}

impl FileSink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    fn write(&self, name: &str, contents: &[u8]) -> Result<(), HorizonError> {
        fs::create_dir_all(&self.out_dir).map_err(|e| {
            HorizonError::Persistence(format!(
                "cannot create {}: {e}",
                self.out_dir.display()
            ))
        })?;
        let path = self.out_dir.join(name);
        fs::write(&path, contents)
            .map_err(|e| HorizonError::Persistence(format!("cannot write {}: {e}", path.display())))?;
        info!(path = %path.display(), bytes = contents.len(), "Wrote artifact");
        Ok(())
    }
}

impl ArtifactSink for FileSink {
    fn write_snapshot(&self, snapshot: &Snapshot) -> Result<(), HorizonError> {
        let json = serde_json::to_vec_pretty(snapshot)?;
        self.write(SNAPSHOT_FILE, &json)
    }

    fn write_digest(&self, digest: &str) -> Result<(), HorizonError> {
        self.write(DIGEST_FILE, digest.as_bytes())
    }
}
