//! Integration tests for the brand extraction pipeline.
//!
//! These tests verify the full workflow:
//! 1. Fetch the brand document
//! 2. Extract and tag raster images in document order
//! 3. Publish each image under a fresh invocation namespace
//! 4. Classify the document against the published tags
//! 5. Resolve the model's tag references to URLs

use std::sync::Arc;

use chrono::{Duration, Utc};
use extraction::stores::MemoryStore;
use extraction::testing::pdf::{document, single_page, TestImage};
use extraction::testing::{MockClassifier, MockFetcher, MockStore};
use extraction::types::ClassificationAnswer;
use extraction::{BrandPipeline, RetentionSweeper};

const PDF_URL: &str = "https://example.com/brand.pdf";

/// Helper to create a model answer referencing the given tags.
fn answer(logo: &str, products: &[&str], banners: &[&str]) -> ClassificationAnswer {
    ClassificationAnswer {
        brand_name: "Acme".to_string(),
        tagline: "Make anything".to_string(),
        description: "A maker of everything.".to_string(),
        colors: vec!["#FF5733".to_string(), "#1A1A1A".to_string()],
        logo: logo.to_string(),
        product_images: products.iter().map(|tag| tag.to_string()).collect(),
        banner_images: banners.iter().map(|tag| tag.to_string()).collect(),
    }
}

/// Helper to build a pipeline serving `pdf` at [`PDF_URL`] over a shared
/// in-memory store.
fn setup_pipeline(pdf: Vec<u8>, classifier: MockClassifier) -> (BrandPipeline, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let fetcher = MockFetcher::new().with_document(PDF_URL, pdf);
    let pipeline = BrandPipeline::new(Arc::new(fetcher), store.clone(), Arc::new(classifier));
    (pipeline, store)
}

#[tokio::test]
async fn test_full_pipeline_resolves_classified_assets() {
    let pdf = document(&[
        &[
            TestImage::Jpeg {
                width: 400,
                height: 300,
            },
            TestImage::Gray {
                width: 200,
                height: 200,
            },
        ],
        &[TestImage::Jpeg {
            width: 350,
            height: 250,
        }],
    ]);
    let classifier =
        MockClassifier::new().with_answer(PDF_URL, answer("fig.1", &["fig.2"], &["fig.3"]));
    let (pipeline, store) = setup_pipeline(pdf, classifier);

    let assets = pipeline.run(PDF_URL).await.unwrap();

    assert_eq!(assets.brand_name, "Acme");
    assert_eq!(assets.colors.len(), 2);
    assert!(assets.logo.contains("fig.1.jpeg"));
    assert_eq!(assets.product_images.len(), 1);
    assert!(assets.product_images[0].contains("fig.2.png"));
    assert_eq!(assets.banner_images.len(), 1);
    assert!(assets.banner_images[0].contains("fig.3.jpeg"));
    assert!(assets.error.is_none());
    assert_eq!(store.object_count(), 3);
}

#[tokio::test]
async fn test_classifier_receives_only_surviving_tags() {
    // Undersized and undecodable images never get a tag, so the model
    // never hears about them and the numbering stays gapless.
    let pdf = single_page(&[
        TestImage::Jpeg {
            width: 59,
            height: 400,
        },
        TestImage::Jpeg {
            width: 400,
            height: 300,
        },
        TestImage::Unsupported {
            width: 300,
            height: 300,
        },
        TestImage::Gray {
            width: 120,
            height: 90,
        },
    ]);
    let classifier = Arc::new(MockClassifier::new().with_answer(PDF_URL, answer("fig.1", &[], &[])));
    let store = Arc::new(MemoryStore::new());
    let fetcher = MockFetcher::new().with_document(PDF_URL, pdf);
    let pipeline = BrandPipeline::new(Arc::new(fetcher), store.clone(), classifier.clone());

    pipeline.run(PDF_URL).await.unwrap();

    let calls = classifier.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].available_tags,
        vec!["fig.1".to_string(), "fig.2".to_string()]
    );
    assert_eq!(store.object_count(), 2);
}

#[tokio::test]
async fn test_publish_failure_drops_tag_before_classification() {
    let pdf = single_page(&[
        TestImage::Jpeg {
            width: 400,
            height: 300,
        },
        TestImage::Jpeg {
            width: 400,
            height: 300,
        },
        TestImage::Jpeg {
            width: 400,
            height: 300,
        },
    ]);
    let classifier = Arc::new(
        MockClassifier::new().with_answer(PDF_URL, answer("fig.1", &["fig.2"], &["fig.3"])),
    );
    let store = Arc::new(MockStore::new().fail_path("fig.2"));
    let fetcher = MockFetcher::new().with_document(PDF_URL, pdf);
    let pipeline = BrandPipeline::new(Arc::new(fetcher), store.clone(), classifier.clone());

    let assets = pipeline.run(PDF_URL).await.unwrap();

    // The model only saw the tags that actually published.
    assert_eq!(
        classifier.calls()[0].available_tags,
        vec!["fig.1".to_string(), "fig.3".to_string()]
    );
    // Its reference to the dropped tag resolves to nothing.
    assert!(assets.logo.contains("fig.1.jpeg"));
    assert!(assets.product_images.is_empty());
    assert_eq!(assets.banner_images.len(), 1);
    assert_eq!(store.inner().object_count(), 2);
}

#[tokio::test]
async fn test_unknown_tag_references_resolve_empty() {
    let pdf = single_page(&[TestImage::Jpeg {
        width: 400,
        height: 300,
    }]);
    let classifier = MockClassifier::new().with_answer(
        PDF_URL,
        answer("fig.9", &["fig.1", "fig.7"], &["fig.8"]),
    );
    let (pipeline, _store) = setup_pipeline(pdf, classifier);

    let assets = pipeline.run(PDF_URL).await.unwrap();

    assert_eq!(assets.logo, "");
    assert_eq!(assets.product_images.len(), 1);
    assert!(assets.product_images[0].contains("fig.1.jpeg"));
    assert!(assets.banner_images.is_empty());
}

#[tokio::test]
async fn test_document_with_no_images_still_classifies() {
    let pdf = single_page(&[]);
    let classifier = Arc::new(MockClassifier::new().with_answer(PDF_URL, answer("", &[], &[])));
    let store = Arc::new(MemoryStore::new());
    let fetcher = MockFetcher::new().with_document(PDF_URL, pdf);
    let pipeline = BrandPipeline::new(Arc::new(fetcher), store.clone(), classifier.clone());

    let assets = pipeline.run(PDF_URL).await.unwrap();

    assert!(classifier.calls()[0].available_tags.is_empty());
    assert_eq!(assets.brand_name, "Acme");
    assert_eq!(assets.logo, "");
    assert_eq!(store.object_count(), 0);
}

#[tokio::test]
async fn test_repeat_runs_use_distinct_namespaces() {
    let pdf = single_page(&[TestImage::Jpeg {
        width: 400,
        height: 300,
    }]);
    let classifier = MockClassifier::new().with_answer(PDF_URL, answer("fig.1", &[], &[]));
    let (pipeline, store) = setup_pipeline(pdf, classifier);

    let first = pipeline.run(PDF_URL).await.unwrap();
    let second = pipeline.run(PDF_URL).await.unwrap();

    // Same document, same tag, but each run published its own copy.
    assert_ne!(first.logo, second.logo);
    assert_eq!(store.object_count(), 2);
}

#[tokio::test]
async fn test_sweep_reclaims_assets_older_than_retention() {
    let pdf = single_page(&[TestImage::Jpeg {
        width: 400,
        height: 300,
    }]);
    let classifier = MockClassifier::new().with_answer(PDF_URL, answer("fig.1", &[], &[]));
    let (pipeline, store) = setup_pipeline(pdf, classifier);

    let assets = pipeline.run(PDF_URL).await.unwrap();
    let sweeper = RetentionSweeper::new(store.clone());

    // Fresh assets survive.
    assert_eq!(sweeper.sweep().await.unwrap(), 0);
    assert_eq!(store.object_count(), 1);

    // Backdate the published object past the retention window.
    let path = assets
        .logo
        .strip_prefix("memory://")
        .expect("memory store URL")
        .to_string();
    store.set_uploaded_at(&path, Utc::now() - Duration::hours(25));

    assert_eq!(sweeper.sweep().await.unwrap(), 1);
    assert_eq!(store.object_count(), 0);

    // Sweeping again finds nothing.
    assert_eq!(sweeper.sweep().await.unwrap(), 0);
}
