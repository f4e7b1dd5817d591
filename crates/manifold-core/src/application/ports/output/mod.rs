//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `manifold-adapters` crate provides implementations.

use std::fmt;
use std::path::Path;

use crate::application::ApplicationError;
use crate::domain::Environment;
use crate::error::{ManifoldError, ManifoldResult};

/// Address of a fragment: its logical name plus the context it is needed in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FragmentKey {
    pub name: String,
    pub environment: Option<Environment>,
    pub site: Option<String>,
}

impl FragmentKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            environment: None,
            site: None,
        }
    }

    pub fn in_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn on_site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    /// Storage paths to try, most specific first.
    ///
    /// `{site}/{env}/{name}`, `{site}/{name}`, `{env}/{name}`, `{name}`;
    /// paths needing an absent qualifier are skipped.
    pub fn candidates(&self) -> Vec<String> {
        let env = self.environment.map(|e| e.as_str());
        let site = self.site.as_deref();
        let mut paths = Vec::with_capacity(4);
        if let (Some(site), Some(env)) = (site, env) {
            paths.push(format!("{site}/{env}/{}", self.name));
        }
        if let Some(site) = site {
            paths.push(format!("{site}/{}", self.name));
        }
        if let Some(env) = env {
            paths.push(format!("{env}/{}", self.name));
        }
        paths.push(self.name.clone());
        paths
    }

    /// Human description of the lookup context.
    pub fn scope(&self) -> String {
        match (self.environment, self.site.as_deref()) {
            (Some(env), Some(site)) => format!("{env} on {site}"),
            (Some(env), None) => env.to_string(),
            (None, Some(site)) => site.to_string(),
            (None, None) => "project".to_string(),
        }
    }

    /// The error a store returns when no candidate path exists.
    pub fn not_found(&self) -> ManifoldError {
        ApplicationError::MissingTemplate {
            fragment: self.name.clone(),
            scope: self.scope(),
        }
        .into()
    }
}

impl fmt::Display for FragmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.scope())
    }
}

/// Port for fragment retrieval.
///
/// Implemented by:
/// - `manifold_adapters::fragment_store::InMemoryFragmentStore` (built-ins
///   plus directory overrides)
#[cfg_attr(test, mockall::automock)]
pub trait FragmentStore: Send + Sync {
    /// Fetch the most specific fragment for `key`.
    ///
    /// Fails with `ApplicationError::MissingTemplate` when no candidate
    /// path exists.
    fn fetch(&self, key: &FragmentKey) -> ManifoldResult<String>;

    /// All stored fragment paths, sorted.
    fn list(&self) -> ManifoldResult<Vec<String>>;
}

/// Port for writing artifacts under a project root.
///
/// Implemented by:
/// - `manifold_adapters::sink::LocalSink` (production)
/// - `manifold_adapters::sink::MemorySink` (testing, dry runs)
///
/// All paths are relative to the sink's root. Parent directories are
/// created on write.
#[cfg_attr(test, mockall::automock)]
pub trait ArtifactSink: Send + Sync {
    /// Write `text` to `path`, replacing any existing file.
    fn write(&self, path: &Path, text: &str) -> ManifoldResult<()>;

    /// Mark an already written file as executable.
    fn mark_executable(&self, path: &Path) -> ManifoldResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Read back a file under the root.
    fn read(&self, path: &Path) -> ManifoldResult<String>;
}

/// Port for discovering project updates.
///
/// Implemented by:
/// - `manifold_adapters::updates::DirectoryUpdateCatalog`
#[cfg_attr(test, mockall::automock)]
pub trait UpdateCatalog: Send + Sync {
    /// Update identifiers, sorted by name.
    fn available(&self) -> ManifoldResult<Vec<String>>;
}
