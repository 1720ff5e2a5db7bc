//! Brand classification trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ClassificationAnswer, ClassificationRequest};

/// Produces a structured brand analysis of a document.
///
/// Implementations receive tag names only, never image bytes or asset URLs.
/// A returned answer may reference tags that do not exist; the resolver is
/// responsible for dropping those.
#[async_trait]
pub trait BrandClassifier: Send + Sync {
    /// Classify the document into the brand answer shape.
    ///
    /// Any transport, API, or parse failure is a single fatal error for the
    /// invocation; implementations never return partial answers.
    async fn classify(&self, request: &ClassificationRequest) -> Result<ClassificationAnswer>;
}
