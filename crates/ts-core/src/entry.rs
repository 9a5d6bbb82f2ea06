//! Entry parsing: raw export records to normalized time entries.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::error::MalformedInput;
use crate::tag::Tag;

/// Compact ISO 8601 form used by Timewarrior exports (`20250127T080000Z`).
const COMPACT_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Offset-less extended form, interpreted as UTC.
const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Parses an ISO 8601 date-time.
///
/// Supports:
/// - RFC 3339: "2025-01-27T08:00:00Z", "2025-01-27T09:00:00+01:00"
/// - Compact: "20250127T080000Z"
/// - No offset: "2025-01-27T08:00:00" (taken as UTC)
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, COMPACT_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, NAIVE_FORMAT))
        .ok()
        .map(|naive| naive.and_utc())
}

/// A record as it appears in the export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub annotation: Option<String>,
}

/// A time entry with resolved instants and a non-empty tag set.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub start: DateTime<Utc>,
    /// Recorded end, or the report's "now" for active entries.
    pub end: DateTime<Utc>,
    /// True when the export had no end time.
    pub active: bool,
    /// Uppercased, deduplicated, in export order. Never empty.
    pub tags: Vec<Tag>,
    pub annotation: Option<String>,
}

impl Entry {
    /// Elapsed time in hours.
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_hours(&self) -> f64 {
        (self.end - self.start).num_milliseconds() as f64 / MS_PER_HOUR
    }
}

/// Output of the parsing phase.
#[derive(Debug, Clone, Default)]
pub struct ParsedEntries {
    pub entries: Vec<Entry>,
    /// Tags of entries that are still running.
    pub active_tags: BTreeSet<Tag>,
}

/// Normalizes a single raw record.
///
/// `index` is the 1-based position used in error messages; `now` closes
/// entries without an end time.
pub fn normalize(
    raw: RawEntry,
    index: usize,
    now: DateTime<Utc>,
) -> Result<Entry, MalformedInput> {
    let start_raw = raw.start.ok_or(MalformedInput::MissingStart { index })?;
    let start = parse_timestamp(&start_raw).ok_or_else(|| MalformedInput::InvalidTimestamp {
        field: "start",
        value: start_raw.clone(),
        index,
    })?;

    let (end, active) = match raw.end {
        Some(end_raw) => {
            let end = parse_timestamp(&end_raw).ok_or_else(|| {
                MalformedInput::InvalidTimestamp {
                    field: "end",
                    value: end_raw.clone(),
                    index,
                }
            })?;
            (end, false)
        }
        None => (now, true),
    };

    if end < start {
        return Err(MalformedInput::EndBeforeStart { index });
    }

    let mut tags: Vec<Tag> = Vec::new();
    for tag in raw.tags.unwrap_or_default().iter().map(Tag::named) {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    if tags.is_empty() {
        tags.push(Tag::Untagged);
    }

    Ok(Entry {
        start,
        end,
        active,
        tags,
        annotation: raw.annotation.filter(|a| !a.trim().is_empty()),
    })
}

/// Parses the JSON entry array of an export.
pub fn parse_entries(json: &str, now: DateTime<Utc>) -> Result<ParsedEntries, MalformedInput> {
    let raw: Vec<RawEntry> = serde_json::from_str(json.trim())?;

    let mut parsed = ParsedEntries::default();
    for (idx, record) in raw.into_iter().enumerate() {
        let entry = normalize(record, idx + 1, now)?;
        if entry.active {
            parsed.active_tags.extend(entry.tags.iter().cloned());
        }
        parsed.entries.push(entry);
    }

    tracing::debug!(
        entries = parsed.entries.len(),
        active_tags = ?parsed.active_tags,
        "parsed entries"
    );
    Ok(parsed)
}
