//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the extraction library
//! without touching the network, real blob storage, or a live model.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{Error, Result};
use crate::stores::MemoryStore;
use crate::traits::{classifier::BrandClassifier, fetcher::DocumentFetcher, store::BlobStore};
use crate::types::{ClassificationAnswer, ClassificationRequest, PublishedAsset};

/// A mock document fetcher for testing.
///
/// Returns predefined bodies without making network requests.
#[derive(Default)]
pub struct MockFetcher {
    /// Predefined document bodies by URL
    documents: Arc<RwLock<HashMap<String, Vec<u8>>>>,

    /// URLs that should fail
    fail_urls: Arc<RwLock<Vec<String>>>,

    /// Fetched URLs, for assertions
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    /// Create a new mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predefined document body.
    pub fn with_document(self, url: impl Into<String>, body: Vec<u8>) -> Self {
        self.documents.write().unwrap().insert(url.into(), body);
        self
    }

    /// Mark a URL as failing.
    pub fn fail_url(self, url: impl Into<String>) -> Self {
        self.fail_urls.write().unwrap().push(url.into());
        self
    }

    /// Get all URLs fetched from this mock.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl DocumentFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.calls.write().unwrap().push(url.to_string());

        if self.fail_urls.read().unwrap().contains(&url.to_string()) {
            return Err(Error::Fetch(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "mock connection refused",
            ))));
        }

        self.documents
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| {
                Error::Fetch(Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no document for {}", url),
                )))
            })
    }
}

/// A mock brand classifier for testing.
///
/// Returns deterministic, configurable answers without calling a model.
#[derive(Default)]
pub struct MockClassifier {
    /// Predefined answers by document URL
    answers: Arc<RwLock<HashMap<String, ClassificationAnswer>>>,

    /// Answer for URLs without a predefined entry
    default_answer: Option<ClassificationAnswer>,

    /// Whether every call should fail
    fail: bool,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<ClassificationRequest>>>,
}

impl MockClassifier {
    /// Create a new mock classifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predefined answer for a document URL.
    pub fn with_answer(self, url: impl Into<String>, answer: ClassificationAnswer) -> Self {
        self.answers.write().unwrap().insert(url.into(), answer);
        self
    }

    /// Set the answer returned for unknown URLs.
    pub fn with_default_answer(mut self, answer: ClassificationAnswer) -> Self {
        self.default_answer = Some(answer);
        self
    }

    /// Make every classification call fail.
    pub fn with_failure(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Get all requests made to this mock.
    pub fn calls(&self) -> Vec<ClassificationRequest> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl BrandClassifier for MockClassifier {
    async fn classify(&self, request: &ClassificationRequest) -> Result<ClassificationAnswer> {
        self.calls.write().unwrap().push(request.clone());

        if self.fail {
            return Err(Error::Classification(Box::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                "mock classification failure",
            ))));
        }

        Ok(self
            .answers
            .read()
            .unwrap()
            .get(&request.document_url)
            .cloned()
            .unwrap_or_else(|| self.default_answer.clone().unwrap_or_default()))
    }
}

/// An in-memory blob store that can be told to refuse specific operations.
///
/// Wraps [`MemoryStore`] so successful calls behave normally.
#[derive(Default)]
pub struct MockStore {
    inner: MemoryStore,

    /// Path fragments whose writes should fail
    fail_paths: Arc<RwLock<Vec<String>>>,

    /// URLs whose deletion should fail
    fail_deletes: Arc<RwLock<Vec<String>>>,
}

impl MockStore {
    /// Create a new mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any write whose path contains `fragment`.
    pub fn fail_path(self, fragment: impl Into<String>) -> Self {
        self.fail_paths.write().unwrap().push(fragment.into());
        self
    }

    /// Fail deletion of a specific URL.
    pub fn fail_delete(self, url: impl Into<String>) -> Self {
        self.fail_deletes.write().unwrap().push(url.into());
        self
    }

    /// Access the wrapped store for inspection.
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }
}

#[async_trait]
impl BlobStore for MockStore {
    async fn put(&self, path: &str, bytes: Vec<u8>, public: bool) -> Result<String> {
        let refused = self
            .fail_paths
            .read()
            .unwrap()
            .iter()
            .any(|fragment| path.contains(fragment.as_str()));
        if refused {
            return Err(Error::storage(format!("mock write refused for {}", path)));
        }
        self.inner.put(path, bytes, public).await
    }

    async fn list(&self, prefix: &str) -> Result<Vec<PublishedAsset>> {
        self.inner.list(prefix).await
    }

    async fn delete(&self, url: &str) -> Result<()> {
        if self.fail_deletes.read().unwrap().contains(&url.to_string()) {
            return Err(Error::storage(format!("mock delete refused for {}", url)));
        }
        self.inner.delete(url).await
    }
}

/// PDF fixture builders for extraction tests.
pub mod pdf {
    use std::io::Write;

    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

    /// An image to embed in a fixture document.
    #[derive(Debug, Clone, Copy)]
    pub enum TestImage {
        /// DCTDecode stream with dummy JPEG bytes
        Jpeg { width: i64, height: i64 },

        /// FlateDecode DeviceGray stream with real compressed pixels
        Gray { width: i64, height: i64 },

        /// Stream with a filter the extractor does not handle
        Unsupported { width: i64, height: i64 },
    }

    impl TestImage {
        fn stream(&self) -> Stream {
            match *self {
                TestImage::Jpeg { width, height } => Stream::new(
                    dictionary! {
                        "Type" => "XObject",
                        "Subtype" => "Image",
                        "Width" => width,
                        "Height" => height,
                        "ColorSpace" => "DeviceRGB",
                        "BitsPerComponent" => 8,
                        "Filter" => "DCTDecode",
                    },
                    vec![0xFF, 0xD8, 0xFF, 0xE0, width as u8, height as u8],
                ),
                TestImage::Gray { width, height } => {
                    let pixels = vec![0x7F_u8; (width * height) as usize];
                    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::fast());
                    encoder.write_all(&pixels).expect("zlib write");
                    let compressed = encoder.finish().expect("zlib finish");
                    Stream::new(
                        dictionary! {
                            "Type" => "XObject",
                            "Subtype" => "Image",
                            "Width" => width,
                            "Height" => height,
                            "ColorSpace" => "DeviceGray",
                            "BitsPerComponent" => 8,
                            "Filter" => "FlateDecode",
                        },
                        compressed,
                    )
                }
                TestImage::Unsupported { width, height } => Stream::new(
                    dictionary! {
                        "Type" => "XObject",
                        "Subtype" => "Image",
                        "Width" => width,
                        "Height" => height,
                        "ColorSpace" => "DeviceRGB",
                        "BitsPerComponent" => 8,
                        "Filter" => "CCITTFaxDecode",
                    },
                    vec![0x00, 0x01, 0x02],
                ),
            }
        }
    }

    /// Serialize a document with one entry in `pages` per page.
    pub fn document(pages: &[&[TestImage]]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut kids = Vec::new();
        for images in pages {
            let mut xobjects = Dictionary::new();
            for (index, image) in images.iter().enumerate() {
                let stream_id = doc.add_object(image.stream());
                xobjects.set(format!("Im{index}"), Object::Reference(stream_id));
            }
            kids.push(add_page(&mut doc, pages_id, xobjects));
        }

        finish(doc, pages_id, kids)
    }

    /// Serialize a single-page document.
    pub fn single_page(images: &[TestImage]) -> Vec<u8> {
        document(&[images])
    }

    /// Single page holding `direct` images plus a form XObject whose
    /// resources hold `nested` images.
    pub fn with_form(direct: &[TestImage], nested: &[TestImage]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut xobjects = Dictionary::new();
        for (index, image) in direct.iter().enumerate() {
            let stream_id = doc.add_object(image.stream());
            xobjects.set(format!("Im{index}"), Object::Reference(stream_id));
        }

        let mut nested_xobjects = Dictionary::new();
        for (index, image) in nested.iter().enumerate() {
            let stream_id = doc.add_object(image.stream());
            nested_xobjects.set(format!("Nm{index}"), Object::Reference(stream_id));
        }
        let form_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "BBox" => vec![0.into(), 0.into(), 200.into(), 200.into()],
                "Resources" => dictionary! {
                    "XObject" => Object::Dictionary(nested_xobjects),
                },
            },
            Vec::new(),
        ));
        xobjects.set("Fm0", Object::Reference(form_id));

        let kids = vec![add_page(&mut doc, pages_id, xobjects)];
        finish(doc, pages_id, kids)
    }

    fn add_page(doc: &mut Document, pages_id: ObjectId, xobjects: Dictionary) -> Object {
        let resources_id = doc.add_object(dictionary! {
            "XObject" => Object::Dictionary(xobjects),
        });
        let content_id = doc.add_object(Stream::new(Dictionary::new(), Vec::new()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => Object::Reference(resources_id),
            "Contents" => Object::Reference(content_id),
        });
        Object::Reference(page_id)
    }

    fn finish(mut doc: Document, pages_id: ObjectId, kids: Vec<Object>) -> Vec<u8> {
        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .expect("failed to serialize test document");
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_fetcher_returns_predefined_body() {
        let fetcher = MockFetcher::new()
            .with_document("https://example.com/brand.pdf", vec![1, 2, 3]);

        let body = fetcher.fetch("https://example.com/brand.pdf").await.unwrap();
        assert_eq!(body, vec![1, 2, 3]);

        let result = fetcher.fetch("https://example.com/missing.pdf").await;
        assert!(result.is_err());

        assert_eq!(fetcher.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_mock_fetcher_fail_url() {
        let fetcher = MockFetcher::new()
            .with_document("https://ok.com/a.pdf", vec![0])
            .fail_url("https://fail.com/a.pdf");

        assert!(fetcher.fetch("https://fail.com/a.pdf").await.is_err());
        assert!(fetcher.fetch("https://ok.com/a.pdf").await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_classifier_records_requests() {
        let classifier = MockClassifier::new().with_answer(
            "https://example.com/brand.pdf",
            ClassificationAnswer {
                brand_name: "Acme".to_string(),
                ..Default::default()
            },
        );

        let request = ClassificationRequest::new(
            "https://example.com/brand.pdf",
            vec!["fig.1".to_string()],
        );
        let answer = classifier.classify(&request).await.unwrap();
        assert_eq!(answer.brand_name, "Acme");

        let calls = classifier.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].available_tags, vec!["fig.1".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_store_refuses_matching_writes() {
        let store = MockStore::new().fail_path("fig.2");

        assert!(store.put("extracted/a/fig.1.jpeg", vec![0], true).await.is_ok());
        assert!(store.put("extracted/a/fig.2.jpeg", vec![0], true).await.is_err());
    }
}
