//! Document fetching trait.

use async_trait::async_trait;

use crate::error::Result;

/// Retrieves source documents by URL.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Download the document body.
    ///
    /// Returns the raw bytes without interpreting them; the caller decides
    /// whether they parse as a PDF.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
