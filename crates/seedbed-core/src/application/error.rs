//! Application layer errors.
//!
//! These errors represent failures in orchestration, not domain rules.
//! Domain errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// An artifact could not be persisted. Fatal for the run.
    #[error("Failed to write {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    /// A directory could not be created.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The artifact catalog could not be read.
    #[error("Artifact catalog error: {reason}")]
    CatalogUnavailable { reason: String },

    /// Shared adapter state is unusable (lock poisoned).
    #[error("Adapter state lock poisoned")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::WriteFailed { path, .. } | Self::FilesystemError { path, .. } => vec![
                format!("Failed to write: {}", path.display()),
                "Check that you have write permissions and free disk space".into(),
                "Files written before the failure are left in place; re-run once fixed".into(),
            ],
            Self::CatalogUnavailable { .. } => vec![
                "Check templates.local_path in your configuration".into(),
                "The directory must contain an artifacts.toml manifest".into(),
            ],
            Self::StoreLockError => vec!["Try again in a moment".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::WriteFailed { .. } | Self::FilesystemError { .. } => ErrorCategory::Internal,
            Self::CatalogUnavailable { .. } => ErrorCategory::Configuration,
            Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
