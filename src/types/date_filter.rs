//! Date-range filtering for observation series.

use crate::error::WeatherProfileError;
use bon::Builder;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Conversion of loosely typed date inputs into a `NaiveDate`.
///
/// Implemented for `NaiveDate` itself and for `YYYY-MM-DD` strings.
pub trait AnyDate {
    fn get_date(self) -> Option<NaiveDate>;
}

impl AnyDate for NaiveDate {
    fn get_date(self) -> Option<NaiveDate> {
        Some(self)
    }
}

impl AnyDate for &str {
    fn get_date(self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.trim(), "%Y-%m-%d").ok()
    }
}

impl AnyDate for String {
    fn get_date(self) -> Option<NaiveDate> {
        self.as_str().get_date()
    }
}

impl AnyDate for &String {
    fn get_date(self) -> Option<NaiveDate> {
        self.as_str().get_date()
    }
}

/// An inclusive date range with optional bounds.
///
/// A missing bound leaves that side of the range open; with both bounds missing
/// every date matches. Bounds compare against the date component of an
/// observation's timestamp only.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use weather_profiles::DateFilter;
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
/// let filter = DateFilter::builder().start(day).end(day).build();
///
/// assert!(filter.contains(day));
/// assert!(!filter.contains(day.succ_opt().unwrap()));
/// assert!(DateFilter::all().contains(day));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Builder)]
pub struct DateFilter {
    /// First date included, if bounded.
    pub start: Option<NaiveDate>,
    /// Last date included, if bounded.
    pub end: Option<NaiveDate>,
}

impl DateFilter {
    /// A filter that lets every observation through.
    pub fn all() -> Self {
        Self::default()
    }

    /// Builds a filter from the `"YYYY-MM-DD"` or `""` strings of a date form.
    ///
    /// An empty string leaves that bound open.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherProfileError::InvalidDate`] when a non-empty input is not a
    /// valid date, and [`WeatherProfileError::InvertedDateRange`] when both bounds
    /// are given and `start` is after `end`.
    pub fn from_form(start: &str, end: &str) -> Result<Self, WeatherProfileError> {
        let start = parse_form_date(start)?;
        let end = parse_form_date(end)?;
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(WeatherProfileError::InvertedDateRange { start, end });
            }
        }
        Ok(Self { start, end })
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether `date` lies within the range, bounds included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

fn parse_form_date(raw: &str) -> Result<Option<NaiveDate>, WeatherProfileError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    raw.get_date()
        .map(Some)
        .ok_or_else(|| WeatherProfileError::InvalidDate(raw.to_string()))
}
