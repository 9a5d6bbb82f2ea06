//! Report calendar: walks the requested date range day by day.
//!
//! Rounding to quarter hours happens per day and tag, before anything is
//! summed. Totals are therefore sums of rounded cells, which can differ
//! from rounding the sum of raw durations.

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate, TimeZone, Weekday};

use crate::aggregate::DailyUsage;
use crate::holiday::{HolidayCalendar, Region};
use crate::input::Header;
use crate::tag::Tag;

/// Default daily quota on workdays.
pub const DEFAULT_HOURS_PER_DAY: f64 = 8.0;

/// Leave ("Urlaub") and sick ("Krank") tags.
pub const DEFAULT_SPECIAL_TAGS: [&str; 2] = ["U", "K"];

/// Rounds hours to the nearest quarter hour, halves rounding up.
pub fn round_quarter_hour(hours: f64) -> f64 {
    (hours * 4.0).round() / 4.0
}

/// Inclusive range of report dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range; an end before the start collapses to the start day.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Resolves header bounds to local dates.
    ///
    /// The start bound maps to the local date of its instant. The end bound
    /// is exclusive: the last reported day is the local date of the final
    /// instant before it, so `temp.report.end` at local midnight stops the
    /// report on the previous day. Missing bounds default to `today`.
    pub fn from_header<Tz: TimeZone>(header: &Header, tz: &Tz, today: NaiveDate) -> Self {
        let start = header
            .start
            .map_or(today, |s| s.with_timezone(tz).date_naive());
        let end = header.end.map_or(today, |e| {
            (e - Duration::nanoseconds(1)).with_timezone(tz).date_naive()
        });
        Self::new(start, end)
    }

    /// Every date in the range, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(|d| *d <= self.end)
    }
}

/// Report-wide settings.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub region: Region,
    pub hours_per_day: f64,
    /// Always-shown tags, excluded from productive hours and notes.
    pub special_tags: Vec<Tag>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            region: Region::default(),
            hours_per_day: DEFAULT_HOURS_PER_DAY,
            special_tags: DEFAULT_SPECIAL_TAGS.iter().map(Tag::named).collect(),
        }
    }
}

/// A table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub tag: Tag,
    pub special: bool,
}

/// Special tags in configured order, then every other seen tag sorted.
///
/// The untagged sentinel sorts last.
pub fn column_order(special: &[Tag], seen: &BTreeSet<Tag>) -> Vec<Column> {
    let mut columns: Vec<Column> = Vec::with_capacity(special.len() + seen.len());
    for tag in special {
        if !columns.iter().any(|c| &c.tag == tag) {
            columns.push(Column {
                tag: tag.clone(),
                special: true,
            });
        }
    }
    columns.extend(
        seen.iter()
            .filter(|tag| !special.contains(tag))
            .map(|tag| Column {
                tag: tag.clone(),
                special: false,
            }),
    );
    columns
}

/// Annotations for one non-special tag on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub tag: Tag,
    /// Deduplicated, in encounter order. Empty if the tag had none.
    pub annotations: Vec<String>,
}

/// One walked day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayRow {
    pub date: NaiveDate,
    pub workday: bool,
    pub today: bool,
    /// Today, with at least one entry still running.
    pub running: bool,
    /// Rounded hours per column; `None` if nothing was logged that day.
    pub cells: Option<Vec<Option<f64>>>,
    pub notes: Vec<Note>,
}

/// The fully walked report.
#[derive(Debug, Clone)]
pub struct Report {
    pub range: DateRange,
    pub columns: Vec<Column>,
    pub rows: Vec<DayRow>,
    /// Sum of rounded cells per column.
    pub totals: Vec<f64>,
    pub expected_hours: f64,
    pub active_tags: BTreeSet<Tag>,
}

impl Report {
    /// Total of all non-special columns.
    pub fn productive_hours(&self) -> f64 {
        self.columns
            .iter()
            .zip(&self.totals)
            .filter(|(c, _)| !c.special)
            .map(|(_, t)| t)
            .sum()
    }

    /// Share of productive hours per column.
    ///
    /// Special columns are always `None`; so is every column when there are
    /// no productive hours.
    pub fn percentages(&self) -> Vec<Option<f64>> {
        let productive = self.productive_hours();
        self.columns
            .iter()
            .zip(&self.totals)
            .map(|(column, total)| {
                (!column.special && productive > 0.0).then(|| 100.0 * total / productive)
            })
            .collect()
    }

    /// Sum over all columns, or `None` when there are no columns at all.
    pub fn actual_hours(&self) -> Option<f64> {
        (!self.columns.is_empty()).then(|| self.totals.iter().sum())
    }

    pub fn overtime_hours(&self) -> Option<f64> {
        self.actual_hours().map(|actual| actual - self.expected_hours)
    }
}

/// Inputs shared by every day of the walk.
pub struct WalkContext<'a> {
    pub settings: &'a ReportSettings,
    pub holidays: &'a dyn HolidayCalendar,
    pub today: NaiveDate,
    pub active_tags: &'a BTreeSet<Tag>,
}

impl WalkContext<'_> {
    /// Weekdays that are not public holidays.
    pub fn is_workday(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
            && !self.holidays.is_holiday(date, &self.settings.region)
    }
}

/// Walks `range`, merging in aggregated usage.
pub fn walk(range: DateRange, usage: &DailyUsage, ctx: &WalkContext<'_>) -> Report {
    let columns = column_order(&ctx.settings.special_tags, usage.tags());
    let mut totals = vec![0.0; columns.len()];
    let mut expected_hours = 0.0;
    let mut rows = Vec::new();

    for date in range.days() {
        let workday = ctx.is_workday(date);
        if workday {
            expected_hours += ctx.settings.hours_per_day;
        }
        let today = date == ctx.today;

        let (cells, notes) = match usage.day(date) {
            None => (None, Vec::new()),
            Some(bucket) => {
                let mut cells = Vec::with_capacity(columns.len());
                let mut notes = Vec::new();
                for (column, total) in columns.iter().zip(totals.iter_mut()) {
                    let Some(tag_usage) = bucket.get(&column.tag) else {
                        cells.push(None);
                        continue;
                    };
                    let hours = round_quarter_hour(tag_usage.hours);
                    *total += hours;
                    cells.push(Some(hours));

                    if !column.special {
                        let mut annotations: Vec<String> = Vec::new();
                        for annotation in &tag_usage.annotations {
                            if !annotations.contains(annotation) {
                                annotations.push(annotation.clone());
                            }
                        }
                        notes.push(Note {
                            tag: column.tag.clone(),
                            annotations,
                        });
                    }
                }
                (Some(cells), notes)
            }
        };

        rows.push(DayRow {
            date,
            workday,
            today,
            running: today && !ctx.active_tags.is_empty(),
            cells,
            notes,
        });
    }

    tracing::debug!(
        start = %range.start,
        end = %range.end,
        expected_hours,
        "walked report range"
    );

    Report {
        range,
        columns,
        rows,
        totals,
        expected_hours,
        active_tags: ctx.active_tags.clone(),
    }
}
