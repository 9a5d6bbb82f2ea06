//! Daily aggregation of entries into per-tag durations.
//!
//! Each entry is attributed entirely to the local calendar date of its
//! start. An entry with N tags contributes `duration / N` hours to each.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, TimeZone};

use crate::entry::Entry;
use crate::tag::Tag;

/// Accumulated time and notes for one tag on one day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagUsage {
    /// Unrounded hours.
    pub hours: f64,
    /// Annotations in encounter order, duplicates included.
    pub annotations: Vec<String>,
}

/// All tags used on a single day.
pub type DayBucket = BTreeMap<Tag, TagUsage>;

/// Per-day usage across the whole export.
#[derive(Debug, Clone, Default)]
pub struct DailyUsage {
    days: BTreeMap<NaiveDate, DayBucket>,
    tags: BTreeSet<Tag>,
}

impl DailyUsage {
    /// Folds one entry into its start day.
    #[allow(clippy::cast_precision_loss)]
    pub fn add<Tz: TimeZone>(&mut self, entry: &Entry, tz: &Tz) {
        let date = entry.start.with_timezone(tz).date_naive();
        let share = entry.duration_hours() / entry.tags.len().max(1) as f64;
        let bucket = self.days.entry(date).or_default();

        for tag in &entry.tags {
            self.tags.insert(tag.clone());
            let usage = bucket.entry(tag.clone()).or_default();
            usage.hours += share;
            if let Some(annotation) = &entry.annotation {
                usage.annotations.push(annotation.clone());
            }
        }
    }

    /// Usage for `date`, if anything was logged that day.
    pub fn day(&self, date: NaiveDate) -> Option<&DayBucket> {
        self.days.get(&date)
    }

    /// Every tag seen in any entry.
    pub const fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }
}

/// Buckets entries by the local date of their start in `tz`.
pub fn aggregate<Tz: TimeZone>(entries: &[Entry], tz: &Tz) -> DailyUsage {
    let mut usage = DailyUsage::default();
    for entry in entries {
        usage.add(entry, tz);
    }
    tracing::debug!(
        days = usage.days.len(),
        tags = usage.tags.len(),
        "aggregated entries"
    );
    usage
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, FixedOffset, Utc};

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn entry(start: &str, hours: i64, tags: &[&str], annotation: Option<&str>) -> Entry {
        let start = at(start);
        let tags = if tags.is_empty() {
            vec![Tag::Untagged]
        } else {
            tags.iter().map(Tag::named).collect()
        };
        Entry {
            start,
            end: start + Duration::hours(hours),
            active: false,
            tags,
            annotation: annotation.map(str::to_string),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn multi_tag_entries_split_evenly() {
        let entries = [
            entry("2025-01-27T08:00:00Z", 4, &["A", "B"], None),
            entry("2025-01-27T13:00:00Z", 4, &["A", "B"], None),
        ];
        let usage = aggregate(&entries, &Utc);
        let monday = usage.day(date(2025, 1, 27)).unwrap();

        assert!((monday[&Tag::named("A")].hours - 4.0).abs() < 1e-9);
        assert!((monday[&Tag::named("B")].hours - 4.0).abs() < 1e-9);
    }

    #[test]
    fn split_contributions_sum_to_duration() {
        for n in 1..=7 {
            let names: Vec<String> = (0..n).map(|i| format!("T{i}")).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let entries = [entry("2025-01-27T08:00:00Z", 5, &refs, None)];
            let usage = aggregate(&entries, &Utc);

            let total: f64 = usage
                .day(date(2025, 1, 27))
                .unwrap()
                .values()
                .map(|u| u.hours)
                .sum();
            assert!((total - 5.0).abs() < 1e-9, "{n} tags lost time: {total}");
        }
    }

    #[test]
    fn entry_is_attributed_to_local_start_date() {
        let berlin = FixedOffset::east_opt(3600).unwrap();
        // 23:30 UTC is already the next day in Berlin; the entry spans midnight.
        let entries = [entry("2025-01-27T23:30:00Z", 3, &["night"], None)];

        let utc = aggregate(&entries, &Utc);
        assert!(utc.day(date(2025, 1, 27)).is_some());
        assert!(utc.day(date(2025, 1, 28)).is_none());

        let local = aggregate(&entries, &berlin);
        assert!(local.day(date(2025, 1, 27)).is_none());
        let bucket = local.day(date(2025, 1, 28)).unwrap();
        assert!((bucket[&Tag::named("NIGHT")].hours - 3.0).abs() < 1e-9);
    }

    #[test]
    fn annotations_accumulate_in_order() {
        let entries = [
            entry("2025-01-27T08:00:00Z", 1, &["dev"], Some("review")),
            entry("2025-01-27T09:00:00Z", 1, &["dev"], None),
            entry("2025-01-27T10:00:00Z", 1, &["dev"], Some("deploy")),
            entry("2025-01-27T11:00:00Z", 1, &["dev"], Some("review")),
        ];
        let usage = aggregate(&entries, &Utc);
        let dev = &usage.day(date(2025, 1, 27)).unwrap()[&Tag::named("DEV")];
        assert_eq!(dev.annotations, vec!["review", "deploy", "review"]);
        assert!((dev.hours - 4.0).abs() < 1e-9);
    }

    #[test]
    fn untagged_entries_go_to_sentinel() {
        let entries = [entry("2025-01-27T08:00:00Z", 2, &[], Some("what was this"))];
        let usage = aggregate(&entries, &Utc);
        let bucket = usage.day(date(2025, 1, 27)).unwrap();
        assert_eq!(bucket.len(), 1);
        assert!((bucket[&Tag::Untagged].hours - 2.0).abs() < 1e-9);
        assert!(usage.tags().contains(&Tag::Untagged));
    }

    #[test]
    fn tags_collects_across_days() {
        let entries = [
            entry("2025-01-27T08:00:00Z", 1, &["b"], None),
            entry("2025-01-28T08:00:00Z", 1, &["a"], None),
        ];
        let usage = aggregate(&entries, &Utc);
        let tags: Vec<_> = usage.tags().iter().map(Tag::label).collect();
        assert_eq!(tags, vec!["A", "B"]);
        assert_eq!(
            usage.dates().collect::<Vec<_>>(),
            vec![date(2025, 1, 27), date(2025, 1, 28)]
        );
    }
}
