//! A [`FileSystem`] over a directory on the local disk.

use std::io::SeekFrom;
use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncSeekExt, BufReader};
use tracing::trace;

use super::{framing_offset, FileSystem, LineRecords, RecordReader};

/// Serves resources as files under `root`. The node list is fixed at
/// construction; a single node makes every calculation run in-process.
#[derive(Clone, Debug)]
pub struct LocalFileSystem {
    root: PathBuf,
    nodes: Vec<String>,
}

impl LocalFileSystem {
    pub fn new(root: impl Into<PathBuf>, nodes: Vec<String>) -> Self {
        Self {
            root: root.into(),
            nodes,
        }
    }

    /// Resolves `name` under the root, refusing names that would escape it.
    fn resolve(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            bail!("Resource name `{}` must be relative to the storage root", name);
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn nodes(&self) -> Result<Vec<String>> {
        Ok(self.nodes.clone())
    }

    async fn length(&self, name: &str) -> Result<u64> {
        let path = self.resolve(name)?;
        let metadata = tokio::fs::metadata(&path)
            .await
            .with_context(|| format!("Failed to stat {}", path.display()))?;
        Ok(metadata.len())
    }

    async fn read_file(&self, name: &str, start: u64, end: u64) -> Result<Box<dyn RecordReader>> {
        let path = self.resolve(name)?;
        let mut file = File::open(&path)
            .await
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let offset = framing_offset(start);
        file.seek(SeekFrom::Start(offset)).await?;
        trace!(path = %path.display(), start, end, "opened local record stream");
        Ok(Box::new(LineRecords::new(BufReader::new(file), start, end)))
    }
}
