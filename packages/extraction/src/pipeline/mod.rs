//! Brand extraction pipeline - the core of the library.
//!
//! The pipeline orchestrates:
//! - Fetch (download the source document)
//! - Extract (lift tagged raster images out of the PDF)
//! - Publish (upload assets under a fresh invocation namespace)
//! - Classify (ask the model to categorize the tags)
//! - Resolve (swap tag references for published URLs)

pub mod brand;
pub mod prompts;

pub use brand::BrandPipeline;
pub use prompts::{format_classify_prompt, CLASSIFY_BRAND_PROMPT};
