//! Core trait abstractions for the extraction library.
//!
//! These traits define the interfaces that applications implement
//! to provide storage, document fetching, and classification.

pub mod classifier;
pub mod fetcher;
pub mod store;
