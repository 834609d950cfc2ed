//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `seedbed-adapters` crate provides implementations.

use std::path::Path;

use crate::domain::ArtifactSpec;
use crate::error::SeedbedResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `seedbed_adapters::filesystem::LocalFilesystem` (production)
/// - `seedbed_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    ///
    /// Succeeds if the directory already exists.
    fn create_dir_all(&self, path: &Path) -> SeedbedResult<()>;

    /// Write `content` to `path`, fully replacing any existing file.
    ///
    /// Must be atomic-or-absent: after a failure the previous file (or no
    /// file) is observable, never a partially written one.
    fn write_file(&self, path: &Path, content: &str) -> SeedbedResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Port for the set of artifacts a run produces.
///
/// Implemented by:
/// - `seedbed_adapters::catalog::BuiltinCatalog` (embedded templates)
/// - `seedbed_adapters::catalog::DirectoryCatalog` (user override directory)
pub trait ArtifactCatalog: Send + Sync {
    /// All artifact specs, in registration order.
    fn specs(&self) -> SeedbedResult<Vec<ArtifactSpec>>;
}
