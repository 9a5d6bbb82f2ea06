//! End-to-end report construction from an export blob.

use chrono::{DateTime, TimeZone, Utc};

use crate::aggregate::aggregate;
use crate::calendar::{DateRange, Report, ReportSettings, WalkContext, walk};
use crate::error::MalformedInput;
use crate::holiday::HolidayCalendar;
use crate::input::parse_export;

/// Parses, aggregates and walks an export.
///
/// `now` closes running entries; its local date in `tz` is "today".
/// Fails before producing anything if the export is malformed.
pub fn build_report<Tz: TimeZone>(
    text: &str,
    now: DateTime<Utc>,
    tz: &Tz,
    settings: &ReportSettings,
    holidays: &dyn HolidayCalendar,
) -> Result<Report, MalformedInput> {
    let (header, parsed) = parse_export(text, now)?;
    let today = now.with_timezone(tz).date_naive();
    let range = DateRange::from_header(&header, tz, today);
    let usage = aggregate(&parsed.entries, tz);

    let ctx = WalkContext {
        settings,
        holidays,
        today,
        active_tags: &parsed.active_tags,
    };
    Ok(walk(range, &usage, &ctx))
}
