// Brand Extraction Service - API Core
//
// This crate provides the HTTP layer over the extraction pipeline:
// configuration, JWT verification, and the axum routes that trigger
// brand extraction and retention sweeps.

pub mod config;
pub mod server;

pub use config::*;
