//! Retention sweeping of expired published assets.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::error::Result;
use crate::publisher::NAMESPACE_PREFIX;
use crate::traits::store::BlobStore;

/// Deletes published assets older than the retention window.
pub struct RetentionSweeper {
    store: Arc<dyn BlobStore>,
    max_age: Duration,
}

impl RetentionSweeper {
    /// Sweeper with the default 24 hour window.
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self {
            store,
            max_age: Duration::hours(24),
        }
    }

    /// Override the retention window.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Delete expired assets, returning how many were removed.
    ///
    /// Assets exactly at the boundary are kept. A failed deletion is
    /// logged and skipped without a retry; the next scheduled sweep will
    /// see the object again.
    pub async fn sweep(&self) -> Result<usize> {
        let assets = self.store.list(NAMESPACE_PREFIX).await?;
        let now = Utc::now();
        let mut deleted = 0;

        for asset in assets {
            if now - asset.uploaded_at <= self.max_age {
                continue;
            }
            match self.store.delete(&asset.url).await {
                Ok(()) => deleted += 1,
                Err(e) => {
                    warn!(url = %asset.url, error = %e, "failed to delete expired asset");
                }
            }
        }

        info!(deleted, "retention sweep complete");
        Ok(deleted)
    }
}
