//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::Result;
use crate::traits::store::BlobStore;
use crate::types::PublishedAsset;

/// In-memory blob storage.
///
/// Useful for testing and development. Not suitable for production
/// as data is lost on restart. URLs use the `memory://` scheme.
pub struct MemoryStore {
    objects: RwLock<HashMap<String, (Vec<u8>, DateTime<Utc>)>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Clear all stored objects.
    pub fn clear(&self) {
        self.objects.write().unwrap().clear();
    }

    /// Get the number of stored objects.
    pub fn object_count(&self) -> usize {
        self.objects.read().unwrap().len()
    }

    /// Get stored bytes by path.
    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.objects
            .read()
            .unwrap()
            .get(path)
            .map(|(bytes, _)| bytes.clone())
    }

    /// Rewrite an object's upload timestamp, for retention tests.
    pub fn set_uploaded_at(&self, path: &str, uploaded_at: DateTime<Utc>) {
        if let Some(entry) = self.objects.write().unwrap().get_mut(path) {
            entry.1 = uploaded_at;
        }
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn put(&self, path: &str, bytes: Vec<u8>, _public: bool) -> Result<String> {
        self.objects
            .write()
            .unwrap()
            .insert(path.to_string(), (bytes, Utc::now()));
        Ok(format!("memory://{}", path))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<PublishedAsset>> {
        Ok(self
            .objects
            .read()
            .unwrap()
            .iter()
            .filter(|(path, _)| path.starts_with(prefix))
            .map(|(path, (_, uploaded_at))| PublishedAsset {
                url: format!("memory://{}", path),
                uploaded_at: *uploaded_at,
            })
            .collect())
    }

    async fn delete(&self, url: &str) -> Result<()> {
        let path = url.strip_prefix("memory://").unwrap_or(url);
        self.objects.write().unwrap().remove(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_get() {
        let store = MemoryStore::new();
        let url = store
            .put("extracted/abc/fig.1.jpeg", vec![1, 2, 3], true)
            .await
            .unwrap();

        assert_eq!(url, "memory://extracted/abc/fig.1.jpeg");
        assert_eq!(store.get("extracted/abc/fig.1.jpeg"), Some(vec![1, 2, 3]));
        assert_eq!(store.object_count(), 1);
    }

    #[tokio::test]
    async fn test_list_filters_by_prefix() {
        let store = MemoryStore::new();
        store.put("extracted/a/fig.1.png", vec![0], true).await.unwrap();
        store.put("extracted/b/fig.1.png", vec![0], true).await.unwrap();
        store.put("other/x.png", vec![0], true).await.unwrap();

        let assets = store.list("extracted/").await.unwrap();
        assert_eq!(assets.len(), 2);
        assert!(assets.iter().all(|a| a.url.starts_with("memory://extracted/")));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStore::new();
        let url = store.put("extracted/a/fig.1.png", vec![0], true).await.unwrap();

        store.delete(&url).await.unwrap();
        assert_eq!(store.object_count(), 0);

        // Second delete of the same URL is still Ok
        store.delete(&url).await.unwrap();
    }
}
