//! HTTP-based document fetcher.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::traits::fetcher::DocumentFetcher;

/// Fetches documents over HTTP.
///
/// Uses a bounded timeout so a stalled origin cannot hold an invocation
/// open indefinitely.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    /// Create a new fetcher with the default 60 second timeout.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Set a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url = %url, "document fetch starting");
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "document request failed");
            Error::Fetch(Box::new(e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(Box::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("HTTP {}", status),
            ))));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Fetch(Box::new(e)))?;
        debug!(url = %url, bytes = body.len(), "document fetched");
        Ok(body.to_vec())
    }
}
