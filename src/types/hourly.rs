//! Hour-of-day aggregates produced by the hourly aggregator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of hour-of-day buckets in a profile.
pub const HOURS_PER_DAY: usize = 24;

/// The three quantities charted for every city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Temperature,
    Pressure,
    Humidity,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Temperature, Metric::Pressure, Metric::Humidity];

    /// Column name used in exported frames.
    pub fn column_name(&self) -> &'static str {
        match self {
            Metric::Temperature => "temperature",
            Metric::Pressure => "pressure",
            Metric::Humidity => "humidity",
        }
    }

    /// Display unit for chart axes.
    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Temperature => "°C",
            Metric::Pressure => "hPa",
            Metric::Humidity => "%",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

/// Averages of every observation sharing one hour of the day.
///
/// When `sample_count` is zero all three averages are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyBucket {
    /// Hour of day, `0..=23`.
    pub hour: u32,
    pub sample_count: u32,
    pub avg_temperature: Option<f64>,
    pub avg_pressure: Option<f64>,
    pub avg_humidity: Option<f64>,
}

impl HourlyBucket {
    pub fn empty(hour: u32) -> Self {
        Self {
            hour,
            sample_count: 0,
            avg_temperature: None,
            avg_pressure: None,
            avg_humidity: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sample_count == 0
    }

    pub fn average(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Temperature => self.avg_temperature,
            Metric::Pressure => self.avg_pressure,
            Metric::Humidity => self.avg_humidity,
        }
    }
}

/// The 24-hour profile of one city.
///
/// `buckets[h].hour == h` for every `h`. The counters report how many
/// observations did not contribute to any bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedCitySeries {
    pub name: String,
    pub buckets: [HourlyBucket; HOURS_PER_DAY],
    /// Observations whose timestamp could not be parsed.
    pub skipped_timestamps: usize,
    /// Observations outside the requested date range.
    pub outside_range: usize,
}

impl AggregatedCitySeries {
    pub fn bucket(&self, hour: u32) -> Option<&HourlyBucket> {
        self.buckets.get(hour as usize)
    }

    /// Total number of observations that landed in a bucket.
    pub fn sample_count(&self) -> u32 {
        self.buckets.iter().map(|bucket| bucket.sample_count).sum()
    }

    /// `(hour, average)` points for one metric, skipping empty hours.
    pub fn points(&self, metric: Metric) -> Vec<(u32, f64)> {
        self.buckets
            .iter()
            .filter_map(|bucket| bucket.average(metric).map(|avg| (bucket.hour, avg)))
            .collect()
    }
}
