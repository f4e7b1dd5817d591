//! Application layer for Manifold.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ManifestService, UpdateService)
//!   and the composition engine (ManifestCompiler)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! Naming rules, documents and serialization live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    CONFIG_FILE, GenerationReport, ManifestCompiler, ManifestService, UpdateReport, UpdateService,
};

// Re-export port traits (for adapter implementation)
pub use ports::{ArtifactSink, FragmentKey, FragmentStore, UpdateCatalog};

pub use error::ApplicationError;
