//! Report command: reads an export and prints the timesheet.
//!
//! Output is either the aligned table (optionally colored) or a JSON
//! document with the same figures.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;
use ts_core::{Palette, Report, Tag, build_report, render};

use crate::Config;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Table(Palette),
    Json,
}

/// Reads the export from `path`, or stdin for `None` and `-`.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read standard input")?;
            Ok(input)
        }
    }
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub generated_at: String,
    pub region: String,
    pub period: JsonPeriod,
    pub columns: Vec<JsonColumn>,
    pub days: Vec<JsonDay>,
    pub active_tags: Vec<Tag>,
    pub expected_hours: f64,
    pub actual_hours: Option<f64>,
    pub overtime_hours: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct JsonPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct JsonColumn {
    pub tag: Tag,
    pub special: bool,
    pub total_hours: f64,
    pub percent: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct JsonDay {
    pub date: NaiveDate,
    pub workday: bool,
    pub today: bool,
    pub running: bool,
    pub hours: Vec<JsonCell>,
    pub notes: Vec<JsonNote>,
}

#[derive(Debug, Serialize)]
pub struct JsonCell {
    pub tag: Tag,
    pub hours: f64,
}

#[derive(Debug, Serialize)]
pub struct JsonNote {
    pub tag: Tag,
    pub annotations: Vec<String>,
}

/// Formats a walked report as JSON.
pub fn format_report_json(
    report: &Report,
    config: &Config,
    generated_at: DateTime<Utc>,
) -> Result<String> {
    let percentages = report.percentages();
    let columns = report
        .columns
        .iter()
        .zip(&report.totals)
        .zip(percentages)
        .map(|((column, total), percent)| JsonColumn {
            tag: column.tag.clone(),
            special: column.special,
            total_hours: *total,
            percent,
        })
        .collect();

    let days = report
        .rows
        .iter()
        .map(|row| JsonDay {
            date: row.date,
            workday: row.workday,
            today: row.today,
            running: row.running,
            hours: row
                .cells
                .iter()
                .flatten()
                .zip(&report.columns)
                .filter_map(|(hours, column)| {
                    hours.map(|hours| JsonCell {
                        tag: column.tag.clone(),
                        hours,
                    })
                })
                .collect(),
            notes: row
                .notes
                .iter()
                .map(|note| JsonNote {
                    tag: note.tag.clone(),
                    annotations: note.annotations.clone(),
                })
                .collect(),
        })
        .collect();

    let json = JsonReport {
        generated_at: generated_at.to_rfc3339(),
        region: config.region.to_string(),
        period: JsonPeriod {
            start: report.range.start,
            end: report.range.end,
        },
        columns,
        days,
        active_tags: report.active_tags.iter().cloned().collect(),
        expected_hours: report.expected_hours,
        actual_hours: report.actual_hours(),
        overtime_hours: report.overtime_hours(),
    };

    Ok(serde_json::to_string_pretty(&json)?)
}

// ========== Public Interface ==========

/// Builds the report from `input` and writes it in `format`.
///
/// Dates are localized to the system timezone.
pub fn run<W: Write>(
    writer: &mut W,
    input: &str,
    config: &Config,
    now: DateTime<Utc>,
    format: Format,
) -> Result<()> {
    let settings = config.settings();
    let holidays = config.holidays();
    let report = build_report(input, now, &Local, &settings, &holidays)
        .context("malformed input")?;

    match format {
        Format::Table(palette) => write!(writer, "{}", render(&report, palette))?,
        Format::Json => writeln!(writer, "{}", format_report_json(&report, config, now)?)?,
    }

    Ok(())
}
