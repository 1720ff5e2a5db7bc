//! Brand Asset Extraction Library
//!
//! Turns a PDF brand document into structured, addressable brand assets:
//! tagged raster images published to blob storage plus a model-produced
//! classification of what each image is.
//!
//! # Design Philosophy
//!
//! **"Tags travel, bytes stay"**
//!
//! - Images get stable `fig.N` tags in document order
//! - The model only ever reasons about tags, never bytes or URLs
//! - Tag references resolve to URLs at the very end, against this
//!   invocation's map only
//! - Every invocation publishes under its own namespace, swept after 24h
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use extraction::{BrandPipeline, HttpFetcher, OpenRouterClassifier};
//! use extraction::stores::VercelBlobStore;
//!
//! let pipeline = BrandPipeline::new(
//!     Arc::new(HttpFetcher::new()),
//!     Arc::new(VercelBlobStore::new(token)),
//!     Arc::new(OpenRouterClassifier::from_env()?),
//! );
//! let assets = pipeline.run("https://example.com/brand.pdf").await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (BlobStore, DocumentFetcher, BrandClassifier)
//! - [`types`] - Pipeline data types
//! - [`pdf`] - PDF raster image extraction
//! - [`pipeline`] - The end-to-end brand extraction flow
//! - [`publisher`] - Asset upload and tag mapping
//! - [`resolve`] - Tag reference resolution
//! - [`sweep`] - Retention sweeping of published assets
//! - [`stores`] - Storage implementations (Vercel Blob, local files, memory)
//! - [`classifiers`] - Classifier implementations (OpenRouter)
//! - [`fetchers`] - Document fetcher implementations
//! - [`testing`] - Mock implementations and PDF fixtures for testing

pub mod classifiers;
pub mod error;
pub mod fetchers;
pub mod pdf;
pub mod pipeline;
pub mod publisher;
pub mod resolve;
pub mod stores;
pub mod sweep;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{Error, ImageError, Result};
pub use traits::{
    classifier::BrandClassifier,
    fetcher::DocumentFetcher,
    store::BlobStore,
};
pub use types::{
    BrandAssets, ClassificationAnswer, ClassificationRequest, ExtractedImage, PublishedAsset,
    TagMap,
};

// Re-export the pipeline entry point
pub use pipeline::BrandPipeline;

// Re-export pipeline components
pub use pdf::{extract_images, MAX_IMAGES, MIN_DIMENSION};
pub use pipeline::{format_classify_prompt, CLASSIFY_BRAND_PROMPT};
pub use publisher::{AssetPublisher, NAMESPACE_PREFIX};
pub use resolve::resolve_tags;
pub use sweep::RetentionSweeper;

// Re-export implementations
pub use classifiers::{OpenRouterClassifier, DEFAULT_MODEL};
pub use fetchers::HttpFetcher;
pub use stores::{LocalFileStore, MemoryStore, VercelBlobStore};

// Re-export testing utilities
pub use testing::{MockClassifier, MockFetcher, MockStore};
