//! # Seedbed CLI
//!
//! `seedbed new NAME --database pg` writes a web application skeleton whose
//! database config, `.env`, Dockerfile, compose file, LICENSE and README all
//! follow from the one database choice.
//!
//! `main` parses arguments and installs logging; [`run`] loads configuration
//! and dispatches. Any [`CliError`] ends up in [`handle_error`], which owns
//! the exit code:
//!
//! | Code | Meaning                 |
//! |------|-------------------------|
//! |  0   | Success                 |
//! |  1   | Internal / system error |
//! |  2   | User / input error      |
//! |  3   | Resource not found      |
//! |  4   | Configuration error     |

use std::io::IsTerminal as _;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

fn main() -> ExitCode {
    // Missing .env is fine.
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also arrive here, on stdout with exit 0.
            let _ = e.print();
            return ExitCode::from(if e.use_stderr() { 2 } else { 0 });
        }
    };

    if let Err(e) = init_logging(&cli.global) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::from(1);
    }

    let verbose = cli.global.verbose > 0;
    match run(cli) {
        Ok(()) => {
            info!("Seedbed completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, verbose),
    }
}

/// Load configuration, build the output manager, dispatch.
#[instrument(skip_all)]
fn run(cli: Cli) -> CliResult<()> {
    let config = AppConfig::load(cli.global.config.as_ref())
        .with_cli_context(|| "Failed to load configuration")?;
    let output = OutputManager::new(&cli.global, &config);
    debug!(format = ?output.format(), quiet = cli.global.quiet, "CLI ready");

    match cli.command {
        Commands::New(cmd) => commands::new::execute(cmd, config, output),
        Commands::Variants(cmd) => commands::variants::execute(cmd, output),
        Commands::Completions(cmd) => commands::completions::execute(cmd),
        Commands::Config(cmd) => commands::config::execute(cmd, &cli.global, config, output),
    }
}

/// Log, print to stderr (stdout may be a pipe), and pick the exit code.
fn handle_error(err: CliError, verbose: bool) -> ExitCode {
    err.log();

    let color = std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    eprint!("{}", err.render(verbose, color));

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────
