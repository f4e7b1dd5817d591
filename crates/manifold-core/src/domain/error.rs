// ============================================================================
// domain/error.rs - CONFIGURATION AND MODEL ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// Every variant is an invalid-configuration condition: it is deterministic,
/// cannot be retried, and aborts the whole compilation before anything is
/// written.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Invalid identifier for {field}: '{value}' ({reason})")]
    InvalidIdentifier {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("Unknown deployment site: '{site}'")]
    UnknownSite { site: String },

    #[error("Deployment site listed twice: '{site}'")]
    DuplicateSite { site: String },

    #[error("Unknown service type: '{0}'")]
    UnknownServiceType(String),

    #[error("Unknown environment: '{0}'")]
    UnknownEnvironment(String),

    #[error("Malformed service configuration: {reason}")]
    MalformedConfiguration { reason: String },

    // ========================================================================
    // Artifact Set Violations
    // ========================================================================
    #[error("Duplicate artifact destination: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Destination pattern '{pattern}' needs {missing} but none is in scope")]
    UnboundDestination {
        pattern: &'static str,
        missing: &'static str,
    },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingRequiredField { field } => vec![
                format!("Provide a value for '{field}'"),
                "Check service-config.json or the command-line arguments".into(),
            ],
            Self::InvalidIdentifier { field, .. } => vec![
                format!("'{field}' may only contain lowercase letters, digits, '-' and '_'"),
                "It must start with a letter".into(),
            ],
            Self::UnknownSite { site } => vec![
                format!("'{site}' is not a registered deployment site"),
                "Try: manifold list sites".into(),
            ],
            Self::DuplicateSite { site } => {
                vec![format!("Remove the repeated '{site}' from the deployment list")]
            }
            Self::UnknownServiceType(_) => vec!["Valid service types: web, api".into()],
            Self::UnknownEnvironment(_) => {
                vec!["Valid environments: stage, production".into()]
            }
            Self::MalformedConfiguration { .. } => vec![
                "service-config.json could not be parsed".into(),
                "Fix the JSON by hand or recreate it with: manifold new".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownSite { .. } => ErrorCategory::NotFound,
            Self::MissingRequiredField { .. }
            | Self::InvalidIdentifier { .. }
            | Self::DuplicateSite { .. }
            | Self::UnknownServiceType(_)
            | Self::UnknownEnvironment(_)
            | Self::MalformedConfiguration { .. } => ErrorCategory::Validation,
            Self::DuplicatePath { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::UnboundDestination { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
