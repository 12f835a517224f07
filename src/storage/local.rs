//! Directory backed object store used by the manual trigger.
//!
//! Keys are file names directly under the root directory; the bucket argument is only a label.

use async_stream::try_stream;
use async_trait::async_trait;
use futures_core::Stream;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{KeyStream, ObjectStore, StorageError};

/// Serves files from a local directory as if they were bucket objects.
#[derive(Debug, Clone)]
pub struct LocalDirStore {
    root: PathBuf,
}

impl LocalDirStore {
    /// Serve files found directly under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory being served.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn list_file_names(root: &Path) -> Result<Vec<String>, StorageError> {
    let mut names = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            StorageError::Io(
                err.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed")),
            )
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        } else {
            tracing::warn!(path = %entry.path().display(), "Skipping non UTF-8 file name");
        }
    }
    Ok(names)
}

#[async_trait]
impl ObjectStore for LocalDirStore {
    async fn get_object(&self, _bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.root.join(key);
        let bytes = tokio::fs::read(&path).await?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Read local file");
        Ok(bytes)
    }

    fn list_keys<'a>(&'a self, _bucket: &'a str) -> KeyStream<'a> {
        Box::pin(stream_file_names(self.root.clone()))
    }
}

fn stream_file_names(
    root: PathBuf,
) -> impl Stream<Item = Result<String, StorageError>> + Send + 'static {
    try_stream! {
        let listing = tokio::task::spawn_blocking(move || list_file_names(&root))
            .await
            .map_err(|err| StorageError::Io(std::io::Error::other(err)))?;
        let names = listing?;
        for name in names {
            yield name;
        }
    }
}
