//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Per-day timesheet report for time-tracking exports.
///
/// Reads an export (a header, a blank line, then a JSON array of entries)
/// and prints hours per tag and day, with totals and overtime against the
/// expected workweek.
#[derive(Debug, Parser)]
#[command(name = "timesheet", version, about, long_about = None)]
pub struct Cli {
    /// Export to read. Reads standard input when omitted or "-".
    pub input: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// When to color the table.
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Output the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Override the current time (e.g. 2026-01-15T10:30:00Z or "2 hours ago").
    #[arg(long)]
    pub now: Option<String>,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when standard output is a terminal.
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Resolves the choice against whether stdout is a terminal.
    pub const fn enabled(self, is_terminal: bool) -> bool {
        match self {
            Self::Auto => is_terminal,
            Self::Always => true,
            Self::Never => false,
        }
    }
}
