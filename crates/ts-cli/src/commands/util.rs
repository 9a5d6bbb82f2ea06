//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use ts_core::entry::parse_timestamp;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(minute|hour|day|week)s?\s+ago$").unwrap());

/// Conservative bounds for relative time parsing (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

/// Parse a datetime string as either ISO 8601 or relative to `now`.
///
/// Supports:
/// - ISO 8601: "2026-01-15T10:30:00Z", "20260115T103000Z"
/// - Relative: "2 hours ago", "30 minutes ago", "1 day ago", "1 week ago"
pub fn parse_datetime(s: &str, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    if let Some(dt) = parse_timestamp(s) {
        return Ok(dt);
    }

    let Some(caps) = RELATIVE_TIME_RE.captures(s.trim()) else {
        anyhow::bail!(
            "Invalid datetime: {s}. Use ISO 8601 (e.g., 2026-01-15T10:30:00Z) or relative (e.g., '2 hours ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[2] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    Ok(now - Duration::minutes(n * minutes_per_unit))
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 29, 12, 0, 0).unwrap()
    }

    #[test]
    fn parses_iso_forms() {
        let expected = Utc.with_ymd_and_hms(2025, 1, 27, 8, 0, 0).unwrap();
        assert_eq!(
            parse_datetime("2025-01-27T08:00:00Z", now()).unwrap(),
            expected
        );
        assert_eq!(parse_datetime("20250127T080000Z", now()).unwrap(), expected);
    }

    #[test]
    fn parses_relative_forms() {
        assert_eq!(
            parse_datetime("2 hours ago", now()).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 29, 10, 0, 0).unwrap()
        );
        assert_eq!(
            parse_datetime("1 week ago", now()).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 22, 12, 0, 0).unwrap()
        );
        assert_eq!(
            parse_datetime("30 minutes ago", now()).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 29, 11, 30, 0).unwrap()
        );
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_datetime("next tuesday", now()).unwrap_err();
        assert!(err.to_string().contains("Invalid datetime"));
    }

    #[test]
    fn rejects_out_of_range() {
        let err = parse_datetime("99999999 weeks ago", now()).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }
}
