//! Manifold Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Manifold
//! manifest compiler, following hexagonal (ports and adapters) architecture.
//! A service configuration goes in; env files, docker-compose manifests, a
//! CI pipeline and helper scripts come out.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           manifold-cli (CLI)            │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (ManifestService, UpdateService,       │
//! │   ManifestCompiler)                     │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │  (FragmentStore, ArtifactSink,          │
//! │   UpdateCatalog)                        │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     manifold-adapters (Infrastructure)  │
//! │  (InMemoryFragmentStore, LocalSink, ...) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (ServiceConfiguration, sites, naming,  │
//! │   documents, serializer, recipes)       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use manifold_core::prelude::*;
//!
//! // 1. Describe the service
//! let config = ServiceConfiguration::builder("wallet", "payments")
//!     .service_type(ServiceType::Api)
//!     .site("spilnu")
//!     .build()
//!     .unwrap();
//!
//! // 2. Use application service (with injected adapters)
//! let service = ManifestService::new(store, sink);
//! service.generate(&config, &DatabasePassword::generate()).unwrap();
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        GenerationReport, ManifestCompiler, ManifestService, UpdateReport, UpdateService,
        ports::{ArtifactSink, FragmentKey, FragmentStore, UpdateCatalog},
    };
    pub use crate::domain::{
        Artifact, ArtifactSet, DatabasePassword, Environment, ServiceConfiguration,
        ServiceConfigurationBuilder, ServiceType,
    };
    pub use crate::error::{ManifoldError, ManifoldResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
