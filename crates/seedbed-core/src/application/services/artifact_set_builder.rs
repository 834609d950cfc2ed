//! Artifact Set Builder - renders every artifact of a run from one context.
//!
//! The builder never touches the filesystem. Given a [`RenderContext`] it
//! returns one [`RenderedArtifact`] per registered [`ArtifactSpec`], in
//! registration order. Every render receives the same context, so any value
//! derived from the variant (adapter, image, port, credential keys) is the
//! same wherever it appears.

use tracing::{debug, instrument};

use crate::{
    application::ports::ArtifactCatalog,
    domain::{
        ArtifactSpec, DomainValidator as validator, RenderContext, RenderedArtifact, Variant,
        parameters_for,
    },
    error::SeedbedResult,
};

/// Renders the registered artifact specs.
#[derive(Debug, Clone)]
pub struct ArtifactSetBuilder {
    specs: Vec<ArtifactSpec>,
}

impl ArtifactSetBuilder {
    pub fn new(specs: Vec<ArtifactSpec>) -> Self {
        Self { specs }
    }

    /// Load the specs of a catalog.
    pub fn from_catalog(catalog: &dyn ArtifactCatalog) -> SeedbedResult<Self> {
        Ok(Self::new(catalog.specs()?))
    }

    pub fn specs(&self) -> &[ArtifactSpec] {
        &self.specs
    }

    /// Render every artifact against `ctx`.
    #[instrument(skip_all, fields(variant = %ctx.variant(), artifacts = self.specs.len()))]
    pub fn build(&self, ctx: &RenderContext) -> SeedbedResult<Vec<RenderedArtifact>> {
        let artifacts: Vec<RenderedArtifact> = self
            .specs
            .iter()
            .map(|spec| {
                let content = spec.template.render(ctx);
                debug!(path = %spec.path.display(), bytes = content.len(), "artifact rendered");
                RenderedArtifact {
                    path: spec.path.clone(),
                    kind: spec.kind,
                    content,
                }
            })
            .collect();

        validator::validate_rendered(&artifacts)?;
        Ok(artifacts)
    }

    /// Build with a fresh context for `variant`.
    pub fn build_for(
        &self,
        variant: Variant,
        project_name: &str,
    ) -> SeedbedResult<Vec<RenderedArtifact>> {
        let ctx = RenderContext::new(project_name, parameters_for(variant));
        self.build(&ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ArtifactKind, DomainError};
    use crate::error::SeedbedError;

    fn spec(path: &str, source: &str) -> ArtifactSpec {
        ArtifactSpec::parse(path, ArtifactKind::Readme, source).unwrap()
    }

    #[test]
    fn builds_in_registration_order() {
        let builder = ArtifactSetBuilder::new(vec![
            spec("b.txt", "{{DATABASE_ADAPTER}}"),
            spec("a.txt", "{{PROJECT_NAME}}"),
        ]);

        let artifacts = builder.build_for(Variant::Postgresql, "shop").unwrap();
        let paths: Vec<_> = artifacts.iter().map(|a| a.path.to_str().unwrap()).collect();

        assert_eq!(paths, ["b.txt", "a.txt"]);
        assert_eq!(artifacts[0].content, "postgresql");
        assert_eq!(artifacts[1].content, "shop");
    }

    #[test]
    fn every_spec_sees_the_same_context() {
        let builder = ArtifactSetBuilder::new(vec![
            spec("one", "{{SECRET_KEY_BASE}}"),
            spec("two", "{{SECRET_KEY_BASE}}"),
        ]);

        let artifacts = builder.build_for(Variant::Sqlite, "x").unwrap();
        assert_eq!(artifacts[0].content, artifacts[1].content);
    }

    #[test]
    fn empty_catalog_is_an_error() {
        let builder = ArtifactSetBuilder::new(Vec::new());
        assert!(matches!(
            builder.build_for(Variant::Sqlite, "x"),
            Err(SeedbedError::Domain(DomainError::EmptyArtifactSet))
        ));
    }
}
