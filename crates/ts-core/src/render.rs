//! Table rendering of a walked report.
//!
//! Styling is decided by small pure functions returning a [`Style`]; the
//! [`Palette`] turns styles into escape codes, or into nothing when color
//! is unavailable.

use std::collections::BTreeSet;
use std::fmt::Write;

use crate::calendar::{Column, DayRow, Note, Report};
use crate::tag::Tag;

const DATE_HEADING: &str = "Date     ";
const DESCRIPTION_HEADING: &str = "Description";
const FOOTER_INDENT: &str = "          ";
const MIN_COLUMN_WIDTH: usize = 5;
const PLACEHOLDER: &str = "-";
const NO_TAGS_WARNING: &str = "WARNING: No tags used!";

/// Visual treatment of a piece of output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain,
    /// Weekends and holidays.
    Muted,
    /// The current day.
    Accent,
    /// Untagged time and tags used without annotation.
    Warning,
    /// Tags of running entries on the current day.
    Active,
    Heading,
    Total,
    Percent,
}

/// Style for a tag cell.
///
/// Untagged time wins over everything, then running tags on today,
/// then the muted look of non-workdays.
pub fn cell_style(
    tag: &Tag,
    hours: Option<f64>,
    row: &DayRow,
    active_tags: &BTreeSet<Tag>,
) -> Style {
    match hours {
        Some(h) if tag.is_untagged() && h > 0.0 => Style::Warning,
        Some(_) if row.running && active_tags.contains(tag) => Style::Active,
        _ if !row.workday => Style::Muted,
        _ => Style::Plain,
    }
}

/// Style for the date label of a row.
pub const fn date_style(row: &DayRow) -> Style {
    if row.today {
        Style::Accent
    } else if !row.workday {
        Style::Muted
    } else {
        Style::Plain
    }
}

/// Maps styles to terminal escape sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    color: bool,
}

impl Palette {
    pub const PLAIN: Self = Self { color: false };
    pub const ANSI: Self = Self { color: true };

    pub const fn new(color: bool) -> Self {
        Self { color }
    }

    const fn code(self, style: Style) -> &'static str {
        match style {
            Style::Plain => "",
            Style::Muted => "\x1b[90m",
            Style::Accent => "\x1b[1;34m",
            Style::Warning => "\x1b[31m",
            Style::Active => "\x1b[1;32m",
            Style::Heading => "\x1b[4m",
            Style::Total => "\x1b[1m",
            Style::Percent => "\x1b[36m",
        }
    }

    /// Wraps `text` in the escape codes for `style`.
    pub fn paint(self, style: Style, text: &str) -> String {
        let code = self.code(style);
        if !self.color || code.is_empty() || text.is_empty() {
            return text.to_string();
        }
        format!("{code}{text}\x1b[0m")
    }
}

/// Column width: the label plus one space, at least five characters.
pub fn column_width(tag: &Tag) -> usize {
    (tag.label().chars().count() + 1).max(MIN_COLUMN_WIDTH)
}

fn pad(column: &Column, value: &str) -> String {
    let width = column_width(&column.tag);
    format!("{value:>width$}")
}

fn format_hours(hours: f64) -> String {
    format!("{hours:.2}")
}

fn header_line(report: &Report, palette: Palette) -> String {
    let mut parts = vec![palette.paint(Style::Heading, DATE_HEADING)];
    parts.extend(
        report
            .columns
            .iter()
            .map(|c| palette.paint(Style::Heading, &pad(c, c.tag.label()))),
    );
    format!(
        "{}  {}",
        parts.join(" "),
        palette.paint(Style::Heading, DESCRIPTION_HEADING)
    )
}

fn describe(notes: &[Note], palette: Palette) -> String {
    notes
        .iter()
        .map(|note| {
            if note.annotations.is_empty() {
                palette.paint(Style::Warning, note.tag.label())
            } else {
                format!("{}: {}", note.tag, note.annotations.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn day_line(report: &Report, row: &DayRow, palette: Palette) -> String {
    let date = palette.paint(date_style(row), &row.date.format("%m/%d %a").to_string());
    let Some(cells) = &row.cells else {
        return date;
    };

    let rendered: Vec<String> = report
        .columns
        .iter()
        .zip(cells)
        .map(|(column, &hours)| {
            let text = hours.map_or_else(|| PLACEHOLDER.to_string(), format_hours);
            let style = cell_style(&column.tag, hours, row, &report.active_tags);
            palette.paint(style, &pad(column, &text))
        })
        .collect();

    let mut line = format!(
        "{date} {}  {}",
        rendered.join(" "),
        describe(&row.notes, palette)
    );
    if cells.iter().all(Option::is_none) {
        line.push_str(&palette.paint(Style::Warning, NO_TAGS_WARNING));
    }
    line
}

fn footer_lines(report: &Report, palette: Palette) -> Vec<String> {
    let totals: Vec<String> = report
        .columns
        .iter()
        .zip(&report.totals)
        .map(|(column, total)| pad(column, &format_hours(*total)))
        .collect();

    let percentages: Vec<String> = report
        .columns
        .iter()
        .zip(report.percentages())
        .map(|(column, pct)| {
            let text = pct.map_or_else(String::new, |p| format!("{p:.0}%"));
            pad(column, &text)
        })
        .collect();

    let mut lines = vec![
        format!(
            "{FOOTER_INDENT}{}",
            palette.paint(Style::Total, &totals.join(" "))
        ),
        format!(
            "{FOOTER_INDENT}{}",
            palette.paint(Style::Percent, &percentages.join(" "))
        ),
        String::new(),
        format!("Expected: {:6.1} hours", report.expected_hours),
    ];
    if let (Some(actual), Some(overtime)) = (report.actual_hours(), report.overtime_hours()) {
        lines.push(format!("Actual:   {actual:6.1} hours"));
        lines.push(format!("Overtime: {overtime:6.1} hours"));
    }
    lines
}

/// Renders the full report table, one line per day plus the footer.
///
/// Trailing whitespace is stripped from every line.
pub fn render(report: &Report, palette: Palette) -> String {
    let mut lines = vec![header_line(report, palette)];
    lines.extend(report.rows.iter().map(|row| day_line(report, row, palette)));
    lines.extend(footer_lines(report, palette));

    let mut output = String::new();
    for line in lines {
        // Writing to a String cannot fail.
        let _ = writeln!(output, "{}", line.trim_end());
    }
    output
}
