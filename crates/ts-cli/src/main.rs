use std::io::{IsTerminal, Write};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ts_cli::commands::report::{self, Format};
use ts_cli::commands::util::parse_datetime;
use ts_cli::{Cli, Config};
use ts_core::Palette;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // stdout carries the report; logs go to stderr.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    if let Some(path) = &cli.config {
        anyhow::ensure!(path.exists(), "config file not found: {}", path.display());
    }
    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let now = match cli.now.as_deref() {
        Some(value) => parse_datetime(value, Utc::now()).context("invalid --now")?,
        None => Utc::now(),
    };

    let input = report::read_input(cli.input.as_deref())?;

    let stdout = std::io::stdout();
    let format = if cli.json {
        Format::Json
    } else {
        Format::Table(Palette::new(cli.color.enabled(stdout.is_terminal())))
    };

    let mut out = stdout.lock();
    report::run(&mut out, &input, &config, now, format)?;
    out.flush()?;

    Ok(())
}
