//! Blob storage trait for published assets.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::PublishedAsset;

/// Object storage for extracted assets.
///
/// Implementations assign the upload timestamp at write time; callers never
/// supply one. Paths are `/`-separated keys relative to the store root.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write an object and return its retrievable URL.
    ///
    /// `public` requests unauthenticated read access on backends that
    /// distinguish visibility.
    async fn put(&self, path: &str, bytes: Vec<u8>, public: bool) -> Result<String>;

    /// List every object whose path starts with `prefix`.
    async fn list(&self, prefix: &str) -> Result<Vec<PublishedAsset>>;

    /// Delete an object by its URL.
    ///
    /// Deleting an object that no longer exists is not an error.
    async fn delete(&self, url: &str) -> Result<()>;
}
