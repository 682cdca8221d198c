//! Local directory source
//!
//! Reads the published file names from a directory, e.g. a manual download
//! of the Economic Index release.

use super::{SourceKind, TabularSource};
use async_trait::async_trait;
use eidx_common::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path the table for `kind` is read from
    pub fn path_for(&self, kind: SourceKind) -> PathBuf {
        self.root.join(kind.file_name())
    }
}

#[async_trait]
impl TabularSource for DirectorySource {
    fn name(&self) -> &'static str {
        "directory"
    }

    async fn fetch(&self, kind: SourceKind) -> Result<Arc<str>> {
        let path = self.path_for(kind);
        debug!(path = %path.display(), "Reading source file");

        let text = tokio::fs::read_to_string(&path).await.map_err(|e| {
            Error::source_unavailable(kind.file_name(), format!("{}: {}", path.display(), e))
        })?;

        Ok(Arc::from(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_published_file_name() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("task_thinking_fractions.csv"),
            "task_name,thinking_fraction\n",
        )
        .unwrap();

        let source = DirectorySource::new(dir.path());
        let text = source.fetch(SourceKind::TaskThinking).await.unwrap();

        assert_eq!(&*text, "task_name,thinking_fraction\n");
    }

    #[tokio::test]
    async fn test_missing_file_is_source_unavailable() {
        let dir = TempDir::new().unwrap();
        let source = DirectorySource::new(dir.path());

        let err = source.fetch(SourceKind::SocStructure).await.unwrap_err();
        match err {
            Error::SourceUnavailable { source_name, .. } => {
                assert_eq!(source_name, "SOC_Structure.csv");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
