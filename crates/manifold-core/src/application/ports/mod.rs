//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `manifold-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `FragmentStore`: named template fragments
//!   - `ArtifactSink`: writes finished artifacts
//!   - `UpdateCatalog`: lists available project updates
//!
//! - **Driving (Input) Ports**: the services themselves, called by the CLI

pub mod output;

pub use output::{ArtifactSink, FragmentKey, FragmentStore, UpdateCatalog};
