//! Generate Service - the main application orchestrator.
//!
//! One run walks a strictly linear state machine:
//! 1. Resolve the variant (never fails, may warn)
//! 2. Render every artifact against one frozen context
//! 3. Write the artifacts through the output sink
//!
//! A [`GenerationReport`] only exists once the run reaches [`RunState::Done`].

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{
    application::{
        ports::{ArtifactCatalog, Filesystem},
        services::{ArtifactSetBuilder, OutputSink},
    },
    domain::{
        DomainValidator as validator, RenderContext, RenderedArtifact, VARIANT_REGISTRY, Variant,
        VariantDef, parameters_for, registry,
    },
    error::SeedbedResult,
};

/// Where a generation run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunState {
    ResolvingVariant,
    Rendering,
    Writing,
    Done,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ResolvingVariant => "resolving-variant",
            Self::Rendering => "rendering",
            Self::Writing => "writing",
            Self::Done => "done",
        };
        f.write_str(s)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub project_name: String,
    pub variant: Variant,
    /// User-visible warnings, e.g. an unsupported database choice.
    pub warnings: Vec<String>,
    /// Written paths in registration order. Empty for a preview.
    pub written: Vec<PathBuf>,
    pub state: RunState,
}

/// Result of a dry run: everything but the write.
#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    pub variant: Variant,
    pub warnings: Vec<String>,
    pub artifacts: Vec<RenderedArtifact>,
}

/// Main generation service.
pub struct GenerateService {
    catalog: Box<dyn ArtifactCatalog>,
    sink: OutputSink,
    registry: &'static [VariantDef],
}

impl GenerateService {
    /// Create a service from a catalog and a filesystem.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use seedbed_core::application::GenerateService;
    ///
    /// let service = GenerateService::new(
    ///     catalog,    // impl ArtifactCatalog
    ///     filesystem, // impl Filesystem
    /// );
    /// let report = service.generate("postgresql", "shop", "./shop")?;
    /// ```
    pub fn new(catalog: Box<dyn ArtifactCatalog>, filesystem: Box<dyn Filesystem>) -> Self {
        Self {
            catalog,
            sink: OutputSink::new(filesystem),
            registry: VARIANT_REGISTRY,
        }
    }

    #[cfg(test)]
    fn with_registry(mut self, registry: &'static [VariantDef]) -> Self {
        self.registry = registry;
        self
    }

    /// Generate every artifact for `raw_choice` below `output_root`.
    #[instrument(
        skip_all,
        fields(
            choice = %raw_choice,
            project = %project_name,
            output = %output_root.as_ref().display()
        )
    )]
    pub fn generate(
        &self,
        raw_choice: &str,
        project_name: &str,
        output_root: impl AsRef<Path>,
    ) -> SeedbedResult<GenerationReport> {
        let output_root = output_root.as_ref();
        let (ctx, warnings, builder) = self.prepare(raw_choice, project_name)?;

        let artifacts = self.render(&builder, &ctx)?;

        transition(RunState::Writing);
        let written = self.sink.write(output_root, &artifacts)?;

        transition(RunState::Done);
        info!(variant = %ctx.variant(), files = written.len(), "Generation completed");

        Ok(GenerationReport {
            project_name: project_name.to_string(),
            variant: ctx.variant(),
            warnings,
            written,
            state: RunState::Done,
        })
    }

    /// Resolve and render without writing anything.
    #[instrument(skip_all, fields(choice = %raw_choice, project = %project_name))]
    pub fn preview(&self, raw_choice: &str, project_name: &str) -> SeedbedResult<Preview> {
        let (ctx, warnings, builder) = self.prepare(raw_choice, project_name)?;
        let artifacts = self.render(&builder, &ctx)?;

        Ok(Preview {
            variant: ctx.variant(),
            warnings,
            artifacts,
        })
    }

    // ── Internal helpers ─────────────────────────────────────────────────

    fn prepare(
        &self,
        raw_choice: &str,
        project_name: &str,
    ) -> SeedbedResult<(RenderContext, Vec<String>, ArtifactSetBuilder)> {
        validator::validate_project_name(project_name)?;

        let builder = ArtifactSetBuilder::from_catalog(self.catalog.as_ref())?;
        validator::validate_specs(builder.specs())?;

        transition(RunState::ResolvingVariant);
        registry::verify_table(self.registry)?;
        let resolution = Variant::resolve(raw_choice);

        let ctx = RenderContext::new(project_name, parameters_for(resolution.variant));
        let warnings = resolution.warning.into_iter().collect();

        Ok((ctx, warnings, builder))
    }

    fn render(
        &self,
        builder: &ArtifactSetBuilder,
        ctx: &RenderContext,
    ) -> SeedbedResult<Vec<RenderedArtifact>> {
        transition(RunState::Rendering);
        builder.build(ctx)
    }
}

fn transition(state: RunState) {
    debug!(%state, "run state");
}
