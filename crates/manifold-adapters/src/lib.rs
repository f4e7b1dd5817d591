//! Infrastructure adapters for Manifold.
//!
//! This crate implements the ports defined in `manifold-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod builtin_fragments;
pub mod fragment_loader;
pub mod fragment_store;
pub mod sink;
pub mod updates;

// Re-export commonly used adapters
pub use fragment_store::InMemoryFragmentStore;
pub use sink::{LocalSink, MemorySink};
pub use updates::DirectoryUpdateCatalog;
