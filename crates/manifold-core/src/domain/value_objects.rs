//! Domain value objects: ServiceType, Environment, DatabasePassword.
//!
//! These are pure value types with equality-by-value and no identity. Site
//! data lives in `sites.rs`; derived names live in `topology.rs`.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── ServiceType ──────────────────────────────────────────────────────────────

/// The primary service of a project.
///
/// Its string form names the primary compose service, the primary CI build
/// job and the Dockerfile build target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Web,
    #[default]
    Api,
}

impl ServiceType {
    pub const ALL: [Self; 2] = [Self::Web, Self::Api];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Api => "api",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "web" | "www" => Ok(Self::Web),
            "api" => Ok(Self::Api),
            other => Err(DomainError::UnknownServiceType(other.to_string())),
        }
    }
}

// ── Environment ──────────────────────────────────────────────────────────────

/// A deployment tier.
///
/// [`Environment::ALL`] fixes the iteration order used for every
/// per-environment artifact and CI job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Stage,
    Production,
}

impl Environment {
    pub const ALL: [Self; 2] = [Self::Stage, Self::Production];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stage => "stage",
            Self::Production => "production",
        }
    }

    /// Short code used in hostnames and runner tags.
    pub const fn short_code(&self) -> &'static str {
        match self {
            Self::Stage => "stage",
            Self::Production => "prod",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stage" | "staging" => Ok(Self::Stage),
            "production" | "prod" => Ok(Self::Production),
            other => Err(DomainError::UnknownEnvironment(other.to_string())),
        }
    }
}

// ── DatabasePassword ─────────────────────────────────────────────────────────

/// Password baked into the database bootstrap script and environment files.
///
/// Generated once per project by the caller and passed into compilation, so
/// compiling the same configuration with the same password is reproducible.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabasePassword(String);

impl DatabasePassword {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// A fresh random password (32 hex characters).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DatabasePassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DatabasePassword(***)")
    }
}
