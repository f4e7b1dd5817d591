//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "generate a project" or "record updates".

pub mod compiler;
pub mod manifest_service;
pub mod update_service;

pub use compiler::ManifestCompiler;
pub use manifest_service::{CONFIG_FILE, GenerationReport, ManifestService, load_configuration};
pub use update_service::{UpdateReport, UpdateService};
