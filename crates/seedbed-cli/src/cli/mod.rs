//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "seedbed",
    bin_name = "seedbed",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Web application skeletons wired to one database choice",
    long_about = "Seedbed generates the database config, .env, Dockerfile, \
                  docker-compose.yml, LICENSE and README of a new web \
                  application. Every file is derived from the same database \
                  choice, so they never disagree.",
    after_help = "EXAMPLES:\n\
        \x20 seedbed new my-shop --database postgresql\n\
        \x20 seedbed new my-shop --database mysql --output ./apps/shop\n\
        \x20 seedbed variants\n\
        \x20 seedbed completions bash > /usr/share/bash-completion/completions/seedbed",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a new project skeleton.
    #[command(
        visible_alias = "n",
        about = "Generate a new project",
        after_help = "EXAMPLES:\n\
            \x20 seedbed new my-shop                       # default database (sqlite3)\n\
            \x20 seedbed new my-shop --database pg         # aliases are accepted\n\
            \x20 seedbed new my-shop -d mysql --dry-run    # preview only"
    )]
    New(NewArgs),

    /// List supported database variants.
    #[command(
        visible_alias = "ls",
        about = "List supported database variants",
        after_help = "EXAMPLES:\n\
            \x20 seedbed variants\n\
            \x20 seedbed variants --format json"
    )]
    Variants(VariantsArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 seedbed completions bash > ~/.local/share/bash-completion/completions/seedbed\n\
            \x20 seedbed completions zsh  > ~/.zfunc/_seedbed\n\
            \x20 seedbed completions fish > ~/.config/fish/completions/seedbed.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the Seedbed configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 seedbed config init\n\
            \x20 seedbed config get defaults.database\n\
            \x20 seedbed config list"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `seedbed new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project name, used in the generated files.
    #[arg(value_name = "NAME", help = "Project name")]
    pub name: String,

    /// Database variant.  Not validated here: an unsupported value falls back
    /// to the default variant with a warning.
    #[arg(
        short = 'd',
        long = "database",
        value_name = "DATABASE",
        help = "Database: sqlite3, postgresql or mysql (default from config)"
    )]
    pub database: Option<String>,

    /// Target directory.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Directory to generate into (default: ./NAME)"
    )]
    pub output: Option<PathBuf>,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

// ── variants ──────────────────────────────────────────────────────────────────

/// Arguments for `seedbed variants`.
#[derive(Debug, Args)]
pub struct VariantsArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `variants` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `seedbed completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `seedbed config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.database`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
    /// Write a configuration file with the default values.
    Init {
        /// Overwrite an existing config file.
        #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
        force: bool,
    },
}

// ── tests ─────────────────────────────────────────────────────────────────────
