//! Timesheet CLI library.
//!
//! This crate provides the command-line interface for the timesheet report.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, ColorChoice};
pub use config::Config;
