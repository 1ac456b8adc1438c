//! Raw upload persistence on local disk

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::DocKind;

/// Writes uploaded files under a root directory, one subdirectory per kind
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write bytes to `{root}/{kind}/{filename}`, creating directories as
    /// needed. The filename is used verbatim; an existing file with the same
    /// name is silently overwritten.
    pub async fn store(&self, kind: DocKind, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let dir = self.root.join(kind.subdir());
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(filename);
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!("Stored {} upload at {}", kind, path.display());
        Ok(path)
    }

    /// Root directory uploads are written under
    pub fn root(&self) -> &Path {
        &self.root
    }
}
