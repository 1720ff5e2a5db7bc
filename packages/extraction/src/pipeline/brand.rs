//! The BrandPipeline - main entry point for the extraction library.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::Result;
use crate::pdf::extract_images;
use crate::publisher::AssetPublisher;
use crate::resolve::resolve_tags;
use crate::traits::{classifier::BrandClassifier, fetcher::DocumentFetcher, store::BlobStore};
use crate::types::{BrandAssets, ClassificationRequest};

/// One call runs the whole brand extraction flow.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = BrandPipeline::new(fetcher, store, classifier);
/// let assets = pipeline.run("https://example.com/brand.pdf").await?;
/// ```
pub struct BrandPipeline {
    fetcher: Arc<dyn DocumentFetcher>,
    publisher: AssetPublisher,
    classifier: Arc<dyn BrandClassifier>,
}

impl BrandPipeline {
    /// Create a new pipeline.
    pub fn new(
        fetcher: Arc<dyn DocumentFetcher>,
        store: Arc<dyn BlobStore>,
        classifier: Arc<dyn BrandClassifier>,
    ) -> Self {
        Self {
            fetcher,
            publisher: AssetPublisher::new(store),
            classifier,
        }
    }

    /// Run the full extraction flow for one document.
    ///
    /// Every invocation publishes under a fresh namespace, so concurrent
    /// and repeated runs against the same document never collide. A fetch,
    /// parse, or classification failure aborts the invocation; callers
    /// decide how to shape that error for their surface.
    pub async fn run(&self, pdf_url: &str) -> Result<BrandAssets> {
        let invocation_id = Uuid::new_v4().to_string();
        info!(url = %pdf_url, invocation = %invocation_id, "starting brand extraction");

        let document = self.fetcher.fetch(pdf_url).await?;
        debug!(bytes = document.len(), "fetched document");

        let images = extract_images(&document)?;
        info!(images = images.len(), "extracted images");

        let tag_map = self.publisher.publish_all(&invocation_id, &images).await;

        let request = ClassificationRequest::new(pdf_url, tag_map.keys().cloned().collect());
        let answer = self.classifier.classify(&request).await?;

        Ok(resolve_tags(&tag_map, answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryStore;
    use crate::testing::pdf::{single_page, TestImage};
    use crate::testing::{MockClassifier, MockFetcher};
    use crate::types::ClassificationAnswer;

    const PDF_URL: &str = "https://example.com/brand.pdf";

    fn two_image_fetcher() -> MockFetcher {
        let buffer = single_page(&[
            TestImage::Jpeg {
                width: 100,
                height: 100,
            },
            TestImage::Jpeg {
                width: 200,
                height: 150,
            },
        ]);
        MockFetcher::new().with_document(PDF_URL, buffer)
    }

    #[tokio::test]
    async fn test_run_resolves_published_urls() {
        let classifier = MockClassifier::new().with_answer(
            PDF_URL,
            ClassificationAnswer {
                brand_name: "Acme".to_string(),
                logo: "fig.1".to_string(),
                product_images: vec!["fig.2".to_string()],
                ..Default::default()
            },
        );
        let pipeline = BrandPipeline::new(
            Arc::new(two_image_fetcher()),
            Arc::new(MemoryStore::new()),
            Arc::new(classifier),
        );

        let assets = pipeline.run(PDF_URL).await.unwrap();

        assert_eq!(assets.brand_name, "Acme");
        assert!(assets.logo.starts_with("memory://extracted/"));
        assert!(assets.logo.ends_with("/fig.1.jpeg"));
        assert_eq!(assets.product_images.len(), 1);
        assert!(assets.product_images[0].ends_with("/fig.2.jpeg"));
        assert!(assets.error.is_none());
    }

    #[tokio::test]
    async fn test_classifier_sees_tags_not_urls() {
        let classifier = Arc::new(MockClassifier::new());
        let pipeline = BrandPipeline::new(
            Arc::new(two_image_fetcher()),
            Arc::new(MemoryStore::new()),
            classifier.clone(),
        );

        pipeline.run(PDF_URL).await.unwrap();

        let calls = classifier.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].document_url, PDF_URL);
        assert_eq!(
            calls[0].available_tags,
            vec!["fig.1".to_string(), "fig.2".to_string()]
        );
    }

    #[tokio::test]
    async fn test_each_run_uses_fresh_namespace() {
        let store = Arc::new(MemoryStore::new());
        let classifier = MockClassifier::new().with_default_answer(ClassificationAnswer {
            logo: "fig.1".to_string(),
            ..Default::default()
        });
        let pipeline = BrandPipeline::new(
            Arc::new(two_image_fetcher()),
            store.clone(),
            Arc::new(classifier),
        );

        let first = pipeline.run(PDF_URL).await.unwrap();
        let second = pipeline.run(PDF_URL).await.unwrap();

        // Same document, but each run publishes under its own id
        assert_ne!(first.logo, second.logo);
        assert_eq!(store.object_count(), 4);
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts() {
        let pipeline = BrandPipeline::new(
            Arc::new(MockFetcher::new().fail_url(PDF_URL)),
            Arc::new(MemoryStore::new()),
            Arc::new(MockClassifier::new()),
        );

        let result = pipeline.run(PDF_URL).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_classification_failure_aborts() {
        let pipeline = BrandPipeline::new(
            Arc::new(two_image_fetcher()),
            Arc::new(MemoryStore::new()),
            Arc::new(MockClassifier::new().with_failure()),
        );

        let result = pipeline.run(PDF_URL).await;
        assert!(result.is_err());
    }
}
