//! Storage implementations for the extraction library.
//!
//! Available backends:
//! - `MemoryStore` - In-memory storage (always available)
//! - `LocalFileStore` - Filesystem storage for local development
//! - `VercelBlobStore` - Vercel Blob REST storage

pub mod local;
pub mod memory;
pub mod vercel;

pub use local::LocalFileStore;
pub use memory::MemoryStore;
pub use vercel::VercelBlobStore;
