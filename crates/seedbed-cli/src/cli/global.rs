//! Flags shared by every subcommand.
//!
//! Flattened into [`super::Cli`] and marked `global`, so `seedbed new x -q`
//! and `seedbed -q new x` mean the same thing.

use std::path::PathBuf;

use clap::{ArgAction, Args, ValueEnum};

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Log verbosity: `-v` info, `-vv` debug, `-vvv` trace.
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true,
        help = "Increase verbosity (-v, -vv, -vvv)",
        long_help = "Increase logging verbosity. Without the flag only warnings \
                     and errors are logged. Also prints the full cause chain \
                     when a command fails."
    )]
    pub verbose: u8,

    /// Only errors and requested data (JSON, completions) are printed.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Suppress non-error output"
    )]
    pub quiet: bool,

    /// Honours `NO_COLOR` (<https://no-color.org>).
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// Read this file instead of the platform config location. The file
    /// must exist.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Configuration file path"
    )]
    pub config: Option<PathBuf>,

    /// When left at `auto`, `output.format` from the config decides.
    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "Output format: auto, human, plain or json"
    )]
    pub output_format: OutputFormat,
}

/// How results are rendered on stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human on a terminal, Plain when piped.
    #[default]
    Auto,
    Human,
    Plain,
    /// Reports and listings as JSON documents.
    Json,
}
