//! Public holiday lookup.
//!
//! The report only needs a yes/no answer per date, so the calendar is a
//! trait. [`GermanHolidays`] answers for Germany and its federal states;
//! [`WithExtraDates`] layers locally configured days off on top of any
//! calendar.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Region codes could not be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid region code: '{0}' (expected e.g. \"de\" or \"de_be\")")]
pub struct InvalidRegion(String);

/// A country with an optional subdivision, e.g. `de_be` for Berlin.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region {
    country: String,
    subdivision: Option<String>,
}

impl Region {
    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn subdivision(&self) -> Option<&str> {
        self.subdivision.as_deref()
    }
}

impl Default for Region {
    /// Berlin, Germany.
    fn default() -> Self {
        Self {
            country: "DE".to_string(),
            subdivision: Some("BE".to_string()),
        }
    }
}

impl FromStr for Region {
    type Err = InvalidRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidRegion(s.to_string());
        let mut parts = s.trim().split(['_', '-']);

        let country = parts
            .next()
            .filter(|c| c.len() == 2 && c.chars().all(|ch| ch.is_ascii_alphabetic()))
            .ok_or_else(invalid)?
            .to_ascii_uppercase();
        let subdivision = match parts.next() {
            Some(sub) if !sub.is_empty() && sub.chars().all(|ch| ch.is_ascii_alphanumeric()) => {
                Some(sub.to_ascii_uppercase())
            }
            Some(_) => return Err(invalid()),
            None => None,
        };
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self {
            country,
            subdivision,
        })
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subdivision {
            Some(sub) => write!(
                f,
                "{}_{}",
                self.country.to_ascii_lowercase(),
                sub.to_ascii_lowercase()
            ),
            None => write!(f, "{}", self.country.to_ascii_lowercase()),
        }
    }
}

impl Serialize for Region {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Region {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Answers whether a date is a public holiday in a region.
pub trait HolidayCalendar {
    fn is_holiday(&self, date: NaiveDate, region: &Region) -> bool;
}

/// Calendar without any holidays.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHolidays;

impl HolidayCalendar for NoHolidays {
    fn is_holiday(&self, _date: NaiveDate, _region: &Region) -> bool {
        false
    }
}

/// Adds fixed dates to another calendar, regardless of region.
#[derive(Debug, Clone, Default)]
pub struct WithExtraDates<C> {
    inner: C,
    dates: BTreeSet<NaiveDate>,
}

impl<C> WithExtraDates<C> {
    pub fn new(inner: C, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            inner,
            dates: dates.into_iter().collect(),
        }
    }
}

impl<C: HolidayCalendar> HolidayCalendar for WithExtraDates<C> {
    fn is_holiday(&self, date: NaiveDate, region: &Region) -> bool {
        self.dates.contains(&date) || self.inner.is_holiday(date, region)
    }
}

/// Statutory public holidays in Germany.
///
/// Nationwide holidays apply to `de` and every `de_xx` subdivision;
/// state holidays only to the subdivisions that observe them. Regions
/// outside Germany have no holidays.
#[derive(Debug, Clone, Copy, Default)]
pub struct GermanHolidays;

impl GermanHolidays {
    /// Returns the holiday's name, if `date` is one in `region`.
    pub fn name_of(date: NaiveDate, region: &Region) -> Option<&'static str> {
        if region.country() != "DE" {
            return None;
        }
        nationwide(date).or_else(|| region.subdivision().and_then(|s| regional(date, s)))
    }
}

impl HolidayCalendar for GermanHolidays {
    fn is_holiday(&self, date: NaiveDate, region: &Region) -> bool {
        Self::name_of(date, region).is_some()
    }
}

/// Easter Sunday in the Gregorian calendar (anonymous computus).
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
}

/// Signed distance in days from the same year's Easter Sunday.
fn easter_offset(date: NaiveDate) -> Option<i64> {
    easter_sunday(date.year()).map(|easter| (date - easter).num_days())
}

fn nationwide(date: NaiveDate) -> Option<&'static str> {
    let fixed = match (date.month(), date.day()) {
        (1, 1) => Some("Neujahr"),
        (5, 1) => Some("Tag der Arbeit"),
        (10, 3) if date.year() >= 1990 => Some("Tag der Deutschen Einheit"),
        (10, 31) if date.year() == 2017 => Some("Reformationstag"),
        (12, 25) => Some("1. Weihnachtstag"),
        (12, 26) => Some("2. Weihnachtstag"),
        _ => None,
    };
    fixed.or_else(|| match easter_offset(date)? {
        -2 => Some("Karfreitag"),
        1 => Some("Ostermontag"),
        39 => Some("Christi Himmelfahrt"),
        50 => Some("Pfingstmontag"),
        _ => None,
    })
}

fn regional(date: NaiveDate, state: &str) -> Option<&'static str> {
    let year = date.year();
    let in_states = |states: &[&str]| states.contains(&state);

    match (date.month(), date.day()) {
        (1, 6) if in_states(&["BW", "BY", "ST"]) => return Some("Heilige Drei Könige"),
        (3, 8) if (state == "BE" && year >= 2019) || (state == "MV" && year >= 2023) => {
            return Some("Internationaler Frauentag");
        }
        (5, 8) if state == "BE" && (year == 2020 || year == 2025) => {
            return Some("Tag der Befreiung");
        }
        (8, 15) if state == "SL" => return Some("Mariä Himmelfahrt"),
        (9, 20) if state == "TH" && year >= 2019 => return Some("Weltkindertag"),
        (10, 31)
            if in_states(&["BB", "MV", "SN", "ST", "TH"])
                || (year >= 2018 && in_states(&["HB", "HH", "NI", "SH"])) =>
        {
            return Some("Reformationstag");
        }
        (11, 1) if in_states(&["BW", "BY", "NW", "RP", "SL"]) => return Some("Allerheiligen"),
        _ => {}
    }

    if state == "SN" && is_repentance_day(date) {
        return Some("Buß- und Bettag");
    }

    match easter_offset(date)? {
        0 if state == "BB" => Some("Ostersonntag"),
        49 if state == "BB" => Some("Pfingstsonntag"),
        60 if in_states(&["BW", "BY", "HE", "NW", "RP", "SL"]) => Some("Fronleichnam"),
        _ => None,
    }
}

/// Buß- und Bettag: the last Wednesday before November 23.
fn is_repentance_day(date: NaiveDate) -> bool {
    let Some(nov_23) = NaiveDate::from_ymd_opt(date.year(), 11, 23) else {
        return false;
    };
    let wed = Weekday::Wed.num_days_from_monday();
    let back = i64::from((nov_23.weekday().num_days_from_monday() + 7 - wed) % 7);
    let back = if back == 0 { 7 } else { back };
    date == nov_23 - Duration::days(back)
}
