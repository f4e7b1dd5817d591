//! Application layer errors.
//!
//! These errors represent failures at the ports, not invalid configuration.
//! Configuration errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while orchestrating a compilation or an update.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A fragment a recipe needs is not in the store.
    #[error("Missing template fragment '{fragment}' (looked up for {scope})")]
    MissingTemplate { fragment: String, scope: String },

    /// The artifact sink failed; the reason is the underlying I/O error.
    #[error("Failed to write {path}: {reason}")]
    SinkError { path: PathBuf, reason: String },

    /// Reading a project file failed.
    #[error("Failed to read {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    /// Store access failed (lock poisoned).
    #[error("Fragment store error")]
    StoreLockError,

    /// The project directory holds no saved configuration.
    #[error("No service configuration found at {path}")]
    ConfigurationNotFound { path: PathBuf },

    /// Output would overwrite an existing project.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// The update catalog could not be read.
    #[error("Update catalog unavailable at {path}: {reason}")]
    CatalogUnavailable { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingTemplate { fragment, .. } => vec![
                format!("No fragment named '{fragment}' is available"),
                "Check the fragments.local_path override directory".into(),
                "Try: manifold list fragments".into(),
            ],
            Self::SinkError { path, .. } => vec![
                format!("Failed to write: {}", path.display()),
                "Check that you have write permissions".into(),
                "Files written before the failure were left in place".into(),
            ],
            Self::ReadError { path, .. } => vec![format!(
                "Check that {} exists and is readable",
                path.display()
            )],
            Self::StoreLockError => vec![
                "The fragment store is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::ConfigurationNotFound { .. } => vec![
                "Run the command inside a generated project, or pass --dir".into(),
                "Create one with: manifold new <namespace> <name>".into(),
            ],
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Use --force to write into it anyway".into(),
                "Or regenerate in place with: manifold generate".into(),
            ],
            Self::CatalogUnavailable { .. } => vec![
                "Set updates.path in the configuration file".into(),
                "Or pass --updates-dir".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingTemplate { .. } | Self::ConfigurationNotFound { .. } => {
                ErrorCategory::NotFound
            }
            Self::SinkError { .. } | Self::ReadError { .. } | Self::StoreLockError => {
                ErrorCategory::Internal
            }
            Self::ProjectExists { .. } => ErrorCategory::Validation,
            Self::CatalogUnavailable { .. } => ErrorCategory::Configuration,
        }
    }
}
