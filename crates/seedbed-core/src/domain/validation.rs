use crate::domain::{
    artifact::{ArtifactSpec, RenderedArtifact, validate_paths},
    error::DomainError,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across entities.
pub struct DomainValidator;

impl DomainValidator {
    /// Project names end up in paths, YAML keys and database names.
    pub fn validate_project_name(name: &str) -> Result<(), DomainError> {
        let reason = if name.trim().is_empty() {
            Some("name cannot be empty")
        } else if name.starts_with('.') {
            Some("name cannot start with '.'")
        } else if name.contains('/') || name.contains('\\') {
            Some("name cannot contain path separators")
        } else if !name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | ' '))
        {
            Some("name may only contain letters, digits, '-', '_' and spaces")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(DomainError::InvalidProjectName {
                name: name.to_string(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// A catalog must have unique relative paths and templates that cover
    /// every variant.
    pub fn validate_specs(specs: &[ArtifactSpec]) -> Result<(), DomainError> {
        validate_paths(specs.iter().map(|s| s.path.as_path()))?;
        for spec in specs {
            spec.template.check_coverage()?;
        }
        Ok(())
    }

    pub fn validate_rendered(artifacts: &[RenderedArtifact]) -> Result<(), DomainError> {
        validate_paths(artifacts.iter().map(|a| a.path.as_path()))
    }
}
