//! Configuration loading and management.

use std::path::Path;

use chrono::NaiveDate;
use figment::Figment;
use figment::providers::{Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use ts_core::calendar::{DEFAULT_HOURS_PER_DAY, DEFAULT_SPECIAL_TAGS};
use ts_core::{GermanHolidays, Region, ReportSettings, Tag, WithExtraDates};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Holiday region, e.g. `de_be`.
    pub region: Region,
    /// Expected hours per workday.
    pub hours_per_day: f64,
    /// Leave/sick tags, shown first and excluded from productive hours.
    pub special_tags: Vec<String>,
    /// Additional days off, as `YYYY-MM-DD` strings.
    pub extra_holidays: Vec<NaiveDate>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: Region::default(),
            hours_per_day: DEFAULT_HOURS_PER_DAY,
            special_tags: DEFAULT_SPECIAL_TAGS.iter().map(ToString::to_string).collect(),
            extra_holidays: Vec::new(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally overridden by a TOML file.
    ///
    /// Without a path, the built-in defaults are used as-is.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.extract()
    }

    /// Report settings derived from this configuration.
    pub fn settings(&self) -> ReportSettings {
        ReportSettings {
            region: self.region.clone(),
            hours_per_day: self.hours_per_day,
            special_tags: self.special_tags.iter().map(Tag::named).collect(),
        }
    }

    /// The regional holiday calendar plus configured extra days.
    pub fn holidays(&self) -> WithExtraDates<GermanHolidays> {
        WithExtraDates::new(GermanHolidays, self.extra_holidays.iter().copied())
    }
}
