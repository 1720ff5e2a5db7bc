//! Classifier implementations for the extraction library.
//!
//! This module provides reference implementations of the `BrandClassifier`
//! trait. Users can use these directly or implement their own.

mod openrouter;

pub use openrouter::{OpenRouterClassifier, DEFAULT_MODEL};
