//! Everything a command prints to stdout goes through [`OutputManager`].

use std::io::{self, IsTerminal};

use clap::ValueEnum;
use console::Term;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Resolved output settings plus the stdout handle.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    ///
    /// An explicit `--output-format` wins over `output.format` in config;
    /// `auto` then resolves to Human on a TTY and Plain otherwise.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let requested = match args.output_format {
            OutputFormat::Auto => {
                OutputFormat::from_str(&config.output.format, true).unwrap_or_default()
            }
            explicit => explicit,
        };

        let resolved_format = if requested == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            requested
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────
    // Everything except `json` is suppressed in quiet mode.

    pub fn print(&self, msg: &str) -> io::Result<()> {
        self.emit(msg.to_owned())
    }

    /// `✓ <msg>`
    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.marked('\u{2713}', msg, |t| t.green().bold().to_string())
    }

    /// `⚠ <msg>`
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.marked('\u{26a0}', msg, |t| t.yellow().bold().to_string())
    }

    /// `ℹ <msg>`
    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.marked('\u{2139}', msg, |t| t.blue().bold().to_string())
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        self.emit(self.paint(text, |t| t.cyan().bold().to_string()))
    }

    /// Pretty JSON document on stdout.  Printed even in quiet mode: it is
    /// the command's result, not chatter.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> io::Result<()> {
        let doc = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&doc)
    }

    /// `true` when results should be emitted as JSON.
    pub fn is_json(&self) -> bool {
        self.resolved_format == OutputFormat::Json
    }

    fn marked(&self, mark: char, msg: &str, style: fn(&str) -> String) -> io::Result<()> {
        let line = format!("{mark} {msg}");
        self.emit(self.paint(&line, style))
    }

    fn paint(&self, text: &str, style: fn(&str) -> String) -> String {
        if self.no_color {
            text.to_owned()
        } else {
            style(text)
        }
    }

    fn emit(&self, line: String) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(&line)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    /// `true` if quiet mode suppresses most output.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
