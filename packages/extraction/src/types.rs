//! Core data types for the brand-asset pipeline.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered mapping from figure tag to published asset URL.
///
/// Built incrementally by the publisher in traversal order. One per
/// invocation; never merged across invocations.
pub type TagMap = IndexMap<String, String>;

/// A raster image lifted out of a PDF document.
///
/// Immutable once produced. `tag` is a sequential identifier of the form
/// `fig.N`, unique within one invocation, assigned in document traversal
/// order (page-major, image-minor).
#[derive(Debug, Clone)]
pub struct ExtractedImage {
    /// Sequential identifier, e.g. "fig.3"
    pub tag: String,

    /// Encoded image bytes (JPEG/JPX passthrough or re-encoded PNG)
    pub bytes: Vec<u8>,

    /// File extension matching the encoding ("jpeg", "jpx", "png")
    pub extension: String,

    /// Pixel width from the image dictionary
    pub width: u32,

    /// Pixel height from the image dictionary
    pub height: u32,
}

/// A stored object listed from the blob namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishedAsset {
    /// Retrievable URL of the object
    pub url: String,

    /// When the storage layer wrote the object
    pub uploaded_at: DateTime<Utc>,
}

/// Input to the classification exchange: the document reference plus the
/// tags the model may cite. Never carries image bytes or URLs.
#[derive(Debug, Clone)]
pub struct ClassificationRequest {
    /// URL of the source document
    pub document_url: String,

    /// Tags available for the model to reference, in extraction order
    pub available_tags: Vec<String>,
}

impl ClassificationRequest {
    /// Create a request for one invocation.
    pub fn new(document_url: impl Into<String>, available_tags: Vec<String>) -> Self {
        Self {
            document_url: document_url.into(),
            available_tags,
        }
    }
}

/// The model's answer, parsed defensively from untrusted output.
///
/// Every field defaults when absent. Tag references may point at tags that
/// were never extracted; the resolver drops those, so they are valid input
/// here rather than parse errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassificationAnswer {
    #[serde(rename = "brandname", default)]
    pub brand_name: String,

    #[serde(default)]
    pub tagline: String,

    #[serde(default)]
    pub description: String,

    /// Primary brand colors as hex codes
    #[serde(default)]
    pub colors: Vec<String>,

    /// Tag reference to the single cleanest logo, or empty
    #[serde(default)]
    pub logo: String,

    #[serde(rename = "productimages", default)]
    pub product_images: Vec<String>,

    #[serde(rename = "bannerimages", default)]
    pub banner_images: Vec<String>,
}

/// Final result with tag references resolved to concrete URLs.
///
/// This is the shape callers always receive: on pipeline failure every
/// asset field is empty and `error` carries the message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandAssets {
    #[serde(rename = "brandname", default)]
    pub brand_name: String,

    #[serde(default)]
    pub tagline: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub colors: Vec<String>,

    /// URL of the logo asset, or empty when none resolved
    #[serde(default)]
    pub logo: String,

    #[serde(rename = "productimages", default)]
    pub product_images: Vec<String>,

    #[serde(rename = "bannerimages", default)]
    pub banner_images: Vec<String>,

    /// Failure message when the invocation was converted to the empty shape
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BrandAssets {
    /// Empty result carrying a failure message, for the uniform
    /// success-shape error policy.
    pub fn empty_with_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_defaults_for_missing_fields() {
        let answer: ClassificationAnswer = serde_json::from_str("{}").unwrap();
        assert_eq!(answer.brand_name, "");
        assert_eq!(answer.logo, "");
        assert!(answer.colors.is_empty());
        assert!(answer.product_images.is_empty());
        assert!(answer.banner_images.is_empty());
    }

    #[test]
    fn test_answer_wire_field_names() {
        let json = r##"{
            "brandname": "Acme",
            "colors": ["#FF0000"],
            "logo": "fig.1",
            "productimages": ["fig.2"],
            "bannerimages": ["fig.3"]
        }"##;
        let answer: ClassificationAnswer = serde_json::from_str(json).unwrap();
        assert_eq!(answer.brand_name, "Acme");
        assert_eq!(answer.product_images, vec!["fig.2"]);
        assert_eq!(answer.banner_images, vec!["fig.3"]);
    }

    #[test]
    fn test_empty_result_serializes_full_shape() {
        let result = BrandAssets::empty_with_error("fetch failed: boom");
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["error"], "fetch failed: boom");
        assert_eq!(value["brandname"], "");
        assert_eq!(value["tagline"], "");
        assert_eq!(value["description"], "");
        assert_eq!(value["logo"], "");
        assert_eq!(value["colors"], serde_json::json!([]));
        assert_eq!(value["productimages"], serde_json::json!([]));
        assert_eq!(value["bannerimages"], serde_json::json!([]));
    }

    #[test]
    fn test_error_field_omitted_on_success() {
        let result = BrandAssets::default();
        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("error").is_none());
    }
}
