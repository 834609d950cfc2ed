// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (reports and retries can hold them)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
///
/// An unrecognised database choice is deliberately absent: resolution falls
/// back to the default variant and only records a warning.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("unknown database variant '{input}'")]
    UnknownVariant { input: String },

    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("Duplicate artifact path: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Artifact path leaves the output directory: {path}")]
    PathEscapesRoot { path: String },

    #[error("Artifact set is empty")]
    EmptyArtifactSet,

    // ========================================================================
    // Template Errors (programmer errors, caught by tests and catalog loading)
    // ========================================================================
    #[error("Malformed template '{template}': {reason}")]
    MalformedTemplate { template: String, reason: String },

    #[error("Template '{template}' does not cover every variant: {reason}")]
    TemplateCoverageGap { template: String, reason: String },

    // ========================================================================
    // Registry Invariants
    // ========================================================================
    #[error("Variant registry is inconsistent: {0}")]
    InconsistentRegistry(String),
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownVariant { input } => vec![
                format!("'{}' is not a supported database", input),
                "Supported databases: sqlite3, postgresql, mysql".into(),
                "Try: seedbed variants".into(),
            ],
            Self::InvalidProjectName { name, reason } => vec![
                format!("Project name '{}' is invalid: {}", name, reason),
                "Use letters, digits, hyphens and underscores".into(),
            ],
            Self::MalformedTemplate { template, .. }
            | Self::TemplateCoverageGap { template, .. } => vec![
                format!("The artifact template '{}' needs fixing", template),
                "If you use a custom templates directory, check its artifacts.toml".into(),
                "Otherwise please report this issue".into(),
            ],
            Self::PathEscapesRoot { path } => vec![
                format!("'{}' must name a file below the project directory", path),
                "Remove '..' components from artifact paths in artifacts.toml".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownVariant { .. }
            | Self::InvalidProjectName { .. }
            | Self::DuplicatePath { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::PathEscapesRoot { .. } => ErrorCategory::Validation,
            Self::EmptyArtifactSet => ErrorCategory::NotFound,
            Self::MalformedTemplate { .. }
            | Self::TemplateCoverageGap { .. }
            | Self::InconsistentRegistry(_) => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
