use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::template::Template;

/// The role an artifact plays in the generated project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    DataStoreConfig,
    EnvFile,
    ContainerBuild,
    Orchestration,
    License,
    Readme,
}

impl ArtifactKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DataStoreConfig => "data-store-config",
            Self::EnvFile => "env-file",
            Self::ContainerBuild => "container-build",
            Self::Orchestration => "orchestration",
            Self::License => "license",
            Self::Readme => "readme",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "data-store-config" | "database" => Ok(Self::DataStoreConfig),
            "env-file" | "env" => Ok(Self::EnvFile),
            "container-build" | "dockerfile" => Ok(Self::ContainerBuild),
            "orchestration" | "compose" => Ok(Self::Orchestration),
            "license" => Ok(Self::License),
            "readme" => Ok(Self::Readme),
            other => Err(DomainError::MalformedTemplate {
                template: other.to_string(),
                reason: "unknown artifact kind".into(),
            }),
        }
    }
}

/// One output artifact: where it goes and how it is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactSpec {
    pub path: PathBuf,
    pub kind: ArtifactKind,
    pub template: Template,
}

impl ArtifactSpec {
    pub fn new(path: impl Into<PathBuf>, kind: ArtifactKind, template: Template) -> Self {
        Self {
            path: path.into(),
            kind,
            template,
        }
    }

    /// Parse `source` into a spec named after its path.
    pub fn parse(
        path: impl Into<PathBuf>,
        kind: ArtifactKind,
        source: &str,
    ) -> Result<Self, DomainError> {
        let path = path.into();
        let template = Template::parse(path.display().to_string(), source)?;
        Ok(Self::new(path, kind, template))
    }

    /// Render variables the artifact consumes.
    pub fn consumes(&self) -> BTreeSet<String> {
        self.template.variables()
    }
}

/// A rendered artifact, ready for the output sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedArtifact {
    pub path: PathBuf,
    pub kind: ArtifactKind,
    pub content: String,
}

impl RenderedArtifact {
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// Validate a set of artifact paths: non-empty, relative, confined to the
/// output root, unique after normalisation.
pub fn validate_paths<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Result<(), DomainError> {
    let mut seen = HashSet::new();
    let mut count = 0;

    for path in paths {
        count += 1;
        let path_str = path.display().to_string();

        if path.is_absolute() {
            return Err(DomainError::AbsolutePathNotAllowed { path: path_str });
        }
        let normalised = normalise(path).ok_or_else(|| DomainError::PathEscapesRoot {
            path: path_str.clone(),
        })?;
        if !seen.insert(normalised) {
            return Err(DomainError::DuplicatePath { path: path_str });
        }
    }

    if count == 0 {
        return Err(DomainError::EmptyArtifactSet);
    }
    Ok(())
}

/// Drop `.` components. `None` if anything but plain names remain, or if
/// nothing does.
fn normalise(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    (!out.as_os_str().is_empty()).then_some(out)
}
