//! Publishing extracted images into blob storage.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::traits::store::BlobStore;
use crate::types::{ExtractedImage, TagMap};

/// Prefix below which every invocation namespace lives. The retention
/// sweeper lists this same prefix.
pub const NAMESPACE_PREFIX: &str = "extracted/";

/// Uploads extracted images and records which tags reached storage.
pub struct AssetPublisher {
    store: Arc<dyn BlobStore>,
}

impl AssetPublisher {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    /// Publish each image under the invocation's own namespace.
    ///
    /// Returns tag to URL mappings in extraction order. A failed upload is
    /// logged and dropped, leaving its tag absent from the map; the
    /// remaining images still upload.
    pub async fn publish_all(&self, invocation_id: &str, images: &[ExtractedImage]) -> TagMap {
        let mut tag_map = TagMap::new();

        for image in images {
            let path = format!(
                "{}{}/{}.{}",
                NAMESPACE_PREFIX, invocation_id, image.tag, image.extension
            );
            match self.store.put(&path, image.bytes.clone(), true).await {
                Ok(url) => {
                    debug!(tag = %image.tag, url = %url, "published asset");
                    tag_map.insert(image.tag.clone(), url);
                }
                Err(e) => {
                    warn!(tag = %image.tag, error = %e, "failed to publish image, dropping tag");
                }
            }
        }

        tag_map
    }
}
