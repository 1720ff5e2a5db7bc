//! Filesystem-backed storage for local development.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::store::BlobStore;
use crate::types::PublishedAsset;

/// Blob store writing under a local directory.
///
/// Written objects are served back by the application's `/local-dump/`
/// route, so returned URLs join the public base URL with that mount point.
/// Upload timestamps come from file modification times.
pub struct LocalFileStore {
    root: PathBuf,
    base_url: String,
}

impl LocalFileStore {
    /// Create a store rooted at `root`, forming URLs against `base_url`.
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    /// Directory the store writes into.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn asset_url(&self, key: &str) -> String {
        format!("{}/local-dump/{}", self.base_url.trim_end_matches('/'), key)
    }
}

#[async_trait]
impl BlobStore for LocalFileStore {
    async fn put(&self, path: &str, bytes: Vec<u8>, _public: bool) -> Result<String> {
        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::Storage(Box::new(e)))?;
        }
        tokio::fs::write(&target, bytes)
            .await
            .map_err(|e| Error::Storage(Box::new(e)))?;
        debug!(path = %target.display(), "wrote local asset");
        Ok(self.asset_url(path))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<PublishedAsset>> {
        let mut assets = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(Error::Storage(Box::new(e))),
            };
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| Error::Storage(Box::new(e)))?
            {
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| Error::Storage(Box::new(e)))?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                    continue;
                }

                let Some(key) = relative_key(&self.root, &entry.path()) else {
                    continue;
                };
                if !key.starts_with(prefix) {
                    continue;
                }

                let metadata = entry
                    .metadata()
                    .await
                    .map_err(|e| Error::Storage(Box::new(e)))?;
                let modified = metadata
                    .modified()
                    .map_err(|e| Error::Storage(Box::new(e)))?;
                assets.push(PublishedAsset {
                    url: self.asset_url(&key),
                    uploaded_at: DateTime::<Utc>::from(modified),
                });
            }
        }

        Ok(assets)
    }

    async fn delete(&self, url: &str) -> Result<()> {
        let Some((_, key)) = url.split_once("/local-dump/") else {
            return Err(Error::storage(format!("not a local asset url: {}", url)));
        };
        if key.split('/').any(|segment| segment == "..") {
            return Err(Error::storage(format!("invalid asset path: {}", key)));
        }
        match tokio::fs::remove_file(self.root.join(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Storage(Box::new(e))),
        }
    }
}

/// Store key for a file, relative to the root, `/`-separated.
fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut key = String::new();
    for component in relative.components() {
        if !key.is_empty() {
            key.push('/');
        }
        key.push_str(component.as_os_str().to_str()?);
    }
    Some(key)
}
