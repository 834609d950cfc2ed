//! Artifact catalog loaded from a directory on disk.
//!
//! # Layout
//!
//! ```text
//! my-templates/
//! ├── artifacts.toml
//! ├── database.yml.tmpl
//! └── ...
//! ```
//!
//! # Manifest format
//!
//! ```toml
//! [[artifact]]
//! path     = "config/database.yml"   # output path, relative to the project
//! kind     = "data-store-config"     # see ArtifactKind
//! template = "database.yml.tmpl"     # template file, relative to the directory
//! ```
//!
//! Entries are rendered in manifest order. Every template is parsed and
//! coverage-checked on load, so a gap is reported before anything is written.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, instrument};

use seedbed_core::{
    application::{ApplicationError, ports::ArtifactCatalog},
    domain::{ArtifactKind, ArtifactSpec, DomainValidator as validator},
    error::SeedbedResult,
};

/// Manifest file name expected in a catalog directory.
pub const MANIFEST_FILE: &str = "artifacts.toml";

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised `artifacts.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct CatalogManifest {
    #[serde(rename = "artifact", default)]
    pub artifacts: Vec<ArtifactEntry>,
}

/// One `[[artifact]]` entry.
#[derive(Debug, Deserialize, Clone)]
pub struct ArtifactEntry {
    pub path: PathBuf,
    pub kind: ArtifactKind,
    pub template: PathBuf,
}

// ── Catalog ───────────────────────────────────────────────────────────────────

/// Reads artifact specs from a directory with an `artifacts.toml` manifest.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    root: PathBuf,
}

impl DirectoryCatalog {
    /// The directory does not need to exist yet; [`ArtifactCatalog::specs`]
    /// reports it when called.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read_manifest(&self) -> SeedbedResult<CatalogManifest> {
        let manifest_path = self.root.join(MANIFEST_FILE);
        let raw = fs::read_to_string(&manifest_path).map_err(|e| {
            unavailable(format!("failed to read '{}': {e}", manifest_path.display()))
        })?;

        toml::from_str(&raw).map_err(|e| {
            unavailable(format!("failed to parse '{}': {e}", manifest_path.display()))
        })
    }

    fn load_entry(&self, entry: &ArtifactEntry) -> SeedbedResult<ArtifactSpec> {
        if !stays_inside(&entry.template) {
            return Err(unavailable(format!(
                "template '{}' must be a relative path inside the catalog",
                entry.template.display()
            )));
        }

        let template_path = self.root.join(&entry.template);
        let source = fs::read_to_string(&template_path).map_err(|e| {
            unavailable(format!("failed to read '{}': {e}", template_path.display()))
        })?;

        let spec = ArtifactSpec::parse(&entry.path, entry.kind, &source)?;
        debug!(path = %entry.path.display(), kind = %entry.kind, "loaded artifact");
        Ok(spec)
    }
}

impl ArtifactCatalog for DirectoryCatalog {
    #[instrument(skip(self), fields(dir = %self.root.display()))]
    fn specs(&self) -> SeedbedResult<Vec<ArtifactSpec>> {
        if !self.root.is_dir() {
            return Err(unavailable(format!(
                "catalog directory not found: {}",
                self.root.display()
            )));
        }

        let manifest = self.read_manifest()?;
        let specs = manifest
            .artifacts
            .iter()
            .map(|entry| self.load_entry(entry))
            .collect::<SeedbedResult<Vec<_>>>()?;

        validator::validate_specs(&specs)?;
        debug!(count = specs.len(), "catalog loaded");
        Ok(specs)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn unavailable(reason: String) -> seedbed_core::error::SeedbedError {
    ApplicationError::CatalogUnavailable { reason }.into()
}

fn stays_inside(path: &Path) -> bool {
    path.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
