//! Templates embedded at compile time.

use seedbed_core::{
    application::ports::ArtifactCatalog,
    domain::{ArtifactKind, ArtifactSpec},
    error::SeedbedResult,
};
use tracing::{debug, instrument};

/// `(relative path, kind, template source)` in registration order.
pub static BUILTIN_ARTIFACTS: &[(&str, ArtifactKind, &str)] = &[
    (
        "config/database.yml",
        ArtifactKind::DataStoreConfig,
        include_str!("../../templates/database.yml.tmpl"),
    ),
    (
        ".env",
        ArtifactKind::EnvFile,
        include_str!("../../templates/env.tmpl"),
    ),
    (
        "Dockerfile",
        ArtifactKind::ContainerBuild,
        include_str!("../../templates/Dockerfile.tmpl"),
    ),
    (
        "docker-compose.yml",
        ArtifactKind::Orchestration,
        include_str!("../../templates/docker-compose.yml.tmpl"),
    ),
    (
        "LICENSE",
        ArtifactKind::License,
        include_str!("../../templates/LICENSE.tmpl"),
    ),
    (
        "README.md",
        ArtifactKind::Readme,
        include_str!("../../templates/README.md.tmpl"),
    ),
];

/// The default artifact set.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl BuiltinCatalog {
    pub fn new() -> Self {
        Self
    }
}

impl ArtifactCatalog for BuiltinCatalog {
    #[instrument(skip_all)]
    fn specs(&self) -> SeedbedResult<Vec<ArtifactSpec>> {
        let specs = BUILTIN_ARTIFACTS
            .iter()
            .map(|(path, kind, source)| ArtifactSpec::parse(*path, *kind, source))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = specs.len(), "built-in artifacts parsed");
        Ok(specs)
    }
}
