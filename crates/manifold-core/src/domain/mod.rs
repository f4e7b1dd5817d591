// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Manifold.
//!
//! Pure logic only: the service configuration, the site registry, naming
//! rules, placeholder substitution, the document model, its serializer and
//! the artifact recipes. Fragment lookup and file writing happen behind
//! ports defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No I/O**: no filesystem, network, or process calls
//! - **No logging**: tracing lives in the application services
//! - **Deterministic**: same configuration and password, same bytes
//!
// Public API - what the world sees
pub mod configuration;
pub mod document;
pub mod entities;
pub mod error;
pub mod manifests;
pub mod placeholders;
pub mod recipes;
pub mod serializer;
pub mod sites;
pub mod topology;
pub mod value_objects;

// Re-exports for convenience
pub use configuration::{ServiceConfiguration, ServiceConfigurationBuilder};
pub use document::{Key, Mapping, Node, Scalar};
pub use entities::{
    artifact_set::{Artifact, ArtifactSet},
    common::{Permissions, RelativePath},
};
pub use error::{DomainError, ErrorCategory};
pub use placeholders::{Delimiter, Token, TokenMap};
pub use recipes::{ArtifactRecipe, Condition, Contribution, DocumentKind, Part, RECIPES, Scope};
pub use sites::{SITE_REGISTRY, SiteDef};
pub use value_objects::{DatabasePassword, Environment, ServiceType};
