//! Core logic for the timesheet report.
//!
//! This crate turns a time-tracking export into a per-day table:
//! - Entry parsing: normalizing raw records, tags and running entries
//! - Aggregation: per-day, per-tag durations and annotations
//! - Calendar walk: workdays, expected hours, quarter-hour rounding
//! - Rendering: the aligned table with styles and summary footer

pub mod aggregate;
pub mod calendar;
pub mod entry;
mod error;
pub mod holiday;
pub mod input;
mod pipeline;
pub mod render;
mod tag;

pub use aggregate::{DailyUsage, DayBucket, TagUsage, aggregate};
pub use calendar::{
    Column, DateRange, DayRow, Note, Report, ReportSettings, WalkContext, round_quarter_hour, walk,
};
pub use entry::{Entry, ParsedEntries, RawEntry, parse_entries};
pub use error::MalformedInput;
pub use holiday::{GermanHolidays, HolidayCalendar, InvalidRegion, NoHolidays, Region, WithExtraDates};
pub use input::{Header, parse_export};
pub use pipeline::build_report;
pub use render::{Palette, Style, cell_style, render};
pub use tag::{Tag, UNTAGGED_LABEL};
