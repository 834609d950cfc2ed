//! `seedbed config`: inspect and initialise configuration.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: &GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let path = AppConfig::active_path(global.config.as_ref());

    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            if output.is_json() {
                output.json(&value)?;
            } else {
                output.print(&display_value(&value))?;
            }
        }

        ConfigCommands::List => {
            if output.is_json() {
                output.json(&config)?;
            } else {
                output.header(&format!("Configuration ({})", path.display()))?;
                for (key, value) in config.entries() {
                    output.print(&format!("  {key} = {value}"))?;
                }
            }
        }

        ConfigCommands::Path => {
            output.print(&path.display().to_string())?;
        }

        ConfigCommands::Init { force } => {
            init_config(&path, force)?;
            output.success(&format!("Wrote {}", path.display()))?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<serde_json::Value> {
    config
        .get(key)
        .filter(|v| !v.is_null() && !v.is_object())
        .ok_or_else(|| CliError::ConfigKeyNotFound { key: key.into() })
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Write the default configuration to `path`.
fn init_config(path: &Path, force: bool) -> CliResult<()> {
    if path.exists() && !force {
        return Err(CliError::ConfigExists {
            path: path.to_path_buf(),
        });
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_cli_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let body = AppConfig::default()
        .to_toml()
        .with_cli_context(|| "Failed to render default configuration")?;
    fs::write(path, body).with_cli_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), "Configuration initialised");
    Ok(())
}

// ── tests ─────────────────────────────────────────────────────────────────────
