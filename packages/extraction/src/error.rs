//! Typed errors for the extraction pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that abort an invocation of the pipeline.
///
/// Per-image problems never appear here: a single image failing to decode
/// or publish is recovered locally (the image is skipped) and only logged.
#[derive(Debug, Error)]
pub enum Error {
    /// Document fetch failed (unreachable, non-success status, timeout)
    #[error("fetch failed: {0}")]
    Fetch(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The byte payload could not be loaded as a PDF
    #[error("unreadable PDF document: {0}")]
    Pdf(#[from] lopdf::Error),

    /// The classification exchange failed (transport, non-2xx, or
    /// unparseable payload)
    #[error("classification failed: {0}")]
    Classification(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Storage backend failure
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wrap a message as a storage failure.
    pub fn storage(message: impl Into<String>) -> Self {
        Error::Storage(message.into().into())
    }
}

/// Failures decoding a single embedded image. Always recovered by the
/// extractor (the image is skipped without consuming a tag number).
#[derive(Debug, Error)]
pub enum ImageError {
    /// Image dictionary missing a required entry or holding the wrong type
    #[error("malformed image dictionary: {0}")]
    Dict(#[from] lopdf::Error),

    /// Width or height is zero or negative
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    /// Stream filter this extractor cannot decode (CCITTFax, JBIG2, ...)
    #[error("unsupported filter: {0}")]
    UnsupportedFilter(String),

    /// Color space with no known raw-pixel layout
    #[error("unsupported color space: {0}")]
    UnsupportedColorSpace(String),

    /// Only 8 bits per component is supported for raw raster data
    #[error("unsupported bit depth: {0}")]
    UnsupportedDepth(i64),

    /// Zlib inflate of a FlateDecode stream failed
    #[error("inflate failed: {0}")]
    Inflate(#[from] std::io::Error),

    /// Decoded data does not cover the declared dimensions
    #[error("pixel buffer mismatch: got {got} bytes, expected {expected}")]
    PixelBufferMismatch { got: usize, expected: usize },

    /// Re-encoding decoded pixels as PNG failed
    #[error("PNG encoding failed: {0}")]
    PngEncode(#[from] image::ImageError),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for per-image decode operations.
pub type ImageResult<T> = std::result::Result<T, ImageError>;
