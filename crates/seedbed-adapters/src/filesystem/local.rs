//! Local filesystem adapter using std::fs.
//!
//! Writes go through a temp file in the target's own directory that is then
//! renamed over the target, so a reader sees either the old file or the new
//! one.

use std::io::{self, Write};
use std::path::Path;

use seedbed_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{SeedbedError, SeedbedResult},
};
use tempfile::NamedTempFile;
use tracing::trace;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> SeedbedResult<()> {
        if path.as_os_str().is_empty() {
            return Ok(());
        }
        std::fs::create_dir_all(path).map_err(|e| dir_error(path, e))
    }

    fn write_file(&self, path: &Path, content: &str) -> SeedbedResult<()> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| write_error(path, e))?;
        tmp.write_all(content.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| write_error(path, e))?;

        // Dropping a temp file that was never persisted removes it.
        tmp.persist(path).map_err(|e| write_error(path, e.error))?;
        trace!(path = %path.display(), bytes = content.len(), "persisted");

        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

fn write_error(path: &Path, e: io::Error) -> SeedbedError {
    ApplicationError::WriteFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
    .into()
}

fn dir_error(path: &Path, e: io::Error) -> SeedbedError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to create directory: {e}"),
    }
    .into()
}
