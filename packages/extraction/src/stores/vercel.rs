//! Vercel Blob storage backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::traits::store::BlobStore;
use crate::types::PublishedAsset;

const DEFAULT_BASE_URL: &str = "https://blob.vercel-storage.com";
const API_VERSION: &str = "7";
const LIST_LIMIT: &str = "1000";

/// Blob store backed by the Vercel Blob REST API.
pub struct VercelBlobStore {
    http_client: reqwest::Client,
    token: String,
    base_url: String,
}

#[derive(Deserialize)]
struct PutResponse {
    url: String,
}

#[derive(Deserialize)]
struct ListResponse {
    blobs: Vec<BlobEntry>,
}

#[derive(Deserialize)]
struct BlobEntry {
    url: String,
    #[serde(rename = "uploadedAt")]
    uploaded_at: DateTime<Utc>,
}

impl VercelBlobStore {
    /// Create a store authorized by a read-write token.
    pub fn new(token: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the API endpoint (useful for testing).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn authorization(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

#[async_trait]
impl BlobStore for VercelBlobStore {
    async fn put(&self, path: &str, bytes: Vec<u8>, public: bool) -> Result<String> {
        let endpoint = format!("{}/{}", self.base_url, path);
        let access = if public { "public" } else { "private" };

        let response = self
            .http_client
            .put(&endpoint)
            .header("authorization", self.authorization())
            .header("x-api-version", API_VERSION)
            .header("x-content-type", content_type_for(path))
            .header("x-access", access)
            .body(bytes)
            .send()
            .await
            .map_err(|e| Error::Storage(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(path = %path, status = %status, "blob upload rejected");
            return Err(Error::storage(format!(
                "blob upload failed: HTTP {} {}",
                status, body
            )));
        }

        let uploaded: PutResponse = response
            .json()
            .await
            .map_err(|e| Error::Storage(Box::new(e)))?;
        debug!(path = %path, url = %uploaded.url, "uploaded blob");
        Ok(uploaded.url)
    }

    async fn list(&self, prefix: &str) -> Result<Vec<PublishedAsset>> {
        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[("prefix", prefix), ("limit", LIST_LIMIT)])
            .header("authorization", self.authorization())
            .header("x-api-version", API_VERSION)
            .send()
            .await
            .map_err(|e| Error::Storage(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(prefix = %prefix, status = %status, "blob list rejected");
            return Err(Error::storage(format!(
                "blob list failed: HTTP {} {}",
                status, body
            )));
        }

        let listing: ListResponse = response
            .json()
            .await
            .map_err(|e| Error::Storage(Box::new(e)))?;
        Ok(listing
            .blobs
            .into_iter()
            .map(|blob| PublishedAsset {
                url: blob.url,
                uploaded_at: blob.uploaded_at,
            })
            .collect())
    }

    async fn delete(&self, url: &str) -> Result<()> {
        let endpoint = format!("{}/delete", self.base_url);

        let response = self
            .http_client
            .post(&endpoint)
            .header("authorization", self.authorization())
            .header("x-api-version", API_VERSION)
            .json(&serde_json::json!({ "urls": [url] }))
            .send()
            .await
            .map_err(|e| Error::Storage(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(url = %url, status = %status, "blob delete rejected");
            return Err(Error::storage(format!(
                "blob delete failed: HTTP {} {}",
                status, body
            )));
        }
        Ok(())
    }
}

fn content_type_for(path: &str) -> &'static str {
    match path.rsplit_once('.').map(|(_, ext)| ext) {
        Some("jpeg") | Some("jpg") => "image/jpeg",
        Some("png") => "image/png",
        Some("jpx") | Some("jp2") => "image/jp2",
        _ => "application/octet-stream",
    }
}
