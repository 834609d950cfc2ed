//! Implementation of the `seedbed new` command.
//!
//! Responsibility: pick the database choice, catalog and output directory,
//! call the core generate service, and display results. No business logic
//! lives here.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use seedbed_adapters::{BuiltinCatalog, DirectoryCatalog, LocalFilesystem};
use seedbed_core::{
    application::{GenerateService, GenerationReport, Preview, ports::ArtifactCatalog},
    domain::Variant,
};

use crate::{cli::NewArgs, config::AppConfig, error::CliResult, output::OutputManager};

/// Execute the `seedbed new` command.
///
/// 1. Resolve the database choice (flag, then config default)
/// 2. Resolve the output directory (`--output`, else `./NAME`)
/// 3. Preview on `--dry-run`, otherwise generate and write
/// 4. Print warnings, the file list and next steps
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(args: NewArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let choice = database_choice(&args, &config);
    let output_dir = output_dir(&args);
    debug!(choice = %choice, output = %output_dir.display(), "Arguments resolved");

    let service = GenerateService::new(catalog(&config), Box::new(LocalFilesystem::new()));

    if args.dry_run {
        let preview = service.preview(&choice, &args.name)?;
        return show_preview(&preview, &args.name, &output_dir, &output);
    }

    info!(project = %args.name, path = %output_dir.display(), "Generation started");
    let report = service.generate(&choice, &args.name, &output_dir)?;

    show_report(&report, &output_dir, &output)
}

// ── Argument resolution ───────────────────────────────────────────────────────

fn database_choice(args: &NewArgs, config: &AppConfig) -> String {
    args.database
        .clone()
        .unwrap_or_else(|| config.defaults.database.clone())
}

fn output_dir(args: &NewArgs) -> PathBuf {
    args.output
        .clone()
        .unwrap_or_else(|| PathBuf::from(".").join(&args.name))
}

fn catalog(config: &AppConfig) -> Box<dyn ArtifactCatalog> {
    match &config.templates.local_path {
        Some(dir) => {
            debug!(dir = %dir.display(), "Using template directory");
            Box::new(DirectoryCatalog::new(dir))
        }
        None => Box::new(BuiltinCatalog::new()),
    }
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_warnings(warnings: &[String], out: &OutputManager) -> CliResult<()> {
    for warning in warnings {
        out.warning(warning)?;
    }
    Ok(())
}

fn show_preview(
    preview: &Preview,
    name: &str,
    output_dir: &Path,
    out: &OutputManager,
) -> CliResult<()> {
    if out.is_json() {
        out.json(preview)?;
        return Ok(());
    }

    show_warnings(&preview.warnings, out)?;
    out.info(&format!(
        "Dry run: would create '{name}' ({}) at {}",
        describe(preview.variant),
        output_dir.display(),
    ))?;
    for artifact in &preview.artifacts {
        out.print(&format!(
            "  {:<24} {:>6} bytes",
            artifact.path.display(),
            artifact.size()
        ))?;
    }
    Ok(())
}

fn show_report(
    report: &GenerationReport,
    output_dir: &Path,
    out: &OutputManager,
) -> CliResult<()> {
    if out.is_json() {
        out.json(report)?;
        return Ok(());
    }

    show_warnings(&report.warnings, out)?;
    out.header(&format!(
        "Created '{}' with {}",
        report.project_name,
        describe(report.variant)
    ))?;
    for path in &report.written {
        out.print(&format!("  {}", path.display()))?;
    }
    out.success(&format!("{} files written", report.written.len()))?;

    if !out.is_quiet() {
        out.print("")?;
        out.print("Next steps:")?;
        out.print(&format!("  cd {}", output_dir.display()))?;
        if report.variant.is_file_based() {
            out.print("  docker compose up --build")?;
        } else {
            out.print("  docker compose up --build   # starts the database service too")?;
        }
    }

    Ok(())
}

fn describe(variant: Variant) -> String {
    format!("database: {variant}")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
