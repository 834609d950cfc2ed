//! Artifact catalogs.
//!
//! A catalog decides which artifacts a run renders and from which template
//! bodies. The built-in one ships with the binary; the directory one lets a
//! team swap the bodies while keeping the same propagation rules.

mod builtin;
mod directory;

pub use builtin::{BUILTIN_ARTIFACTS, BuiltinCatalog};
pub use directory::{ArtifactEntry, CatalogManifest, DirectoryCatalog, MANIFEST_FILE};
