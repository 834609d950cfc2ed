//! Output Sink - persists rendered artifacts.
//!
//! Each artifact replaces whatever is at its target path; parent directories
//! are created as needed. The first failure aborts the remaining writes and
//! nothing already written is rolled back.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::{application::ports::Filesystem, domain::RenderedArtifact, error::SeedbedResult};

/// Writes artifacts through a [`Filesystem`] port.
pub struct OutputSink {
    filesystem: Box<dyn Filesystem>,
}

impl OutputSink {
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Write every artifact below `root`, returning the written paths in order.
    #[instrument(skip_all, fields(root = %root.display(), artifacts = artifacts.len()))]
    pub fn write(&self, root: &Path, artifacts: &[RenderedArtifact]) -> SeedbedResult<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(artifacts.len());

        for artifact in artifacts {
            let path = root.join(&artifact.path);

            if let Some(parent) = path.parent() {
                self.filesystem.create_dir_all(parent)?;
            }

            let replacing = self.filesystem.exists(&path);
            self.filesystem.write_file(&path, &artifact.content)?;
            debug!(path = %path.display(), replacing, "artifact written");

            written.push(path);
        }

        Ok(written)
    }
}
