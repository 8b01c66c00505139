//! Parsed observation records, grouped per city.

use crate::aggregate::aggregate;
use crate::feed::SkippedRecord;
use crate::types::date_filter::DateFilter;
use crate::types::hourly::AggregatedCitySeries;
use crate::types::timestamp::parse_timestamp;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One timestamped measurement for a city.
///
/// The timestamp is kept exactly as the feed wrote it; use
/// [`RawObservation::datetime`] to resolve it. All three metrics are finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    pub timestamp: String,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Hectopascal.
    pub pressure: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
}

impl RawObservation {
    /// The local wall-clock time of this observation, if the timestamp is parseable.
    pub fn datetime(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.timestamp)
    }
}

/// All observations of one city, in feed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySeries {
    pub name: String,
    pub observations: Vec<RawObservation>,
}

impl CitySeries {
    pub fn new(name: impl Into<String>, observations: Vec<RawObservation>) -> Self {
        Self {
            name: name.into(),
            observations,
        }
    }

    /// The raw timeline restricted to `filter`.
    ///
    /// Order is preserved. Observations whose timestamp cannot be parsed are
    /// left out, as they are during aggregation.
    pub fn filtered(&self, filter: &DateFilter) -> CitySeries {
        let observations = self
            .observations
            .iter()
            .filter(|obs| {
                obs.datetime()
                    .is_some_and(|datetime| filter.contains(datetime.date()))
            })
            .cloned()
            .collect();
        CitySeries::new(self.name.clone(), observations)
    }

    /// Hourly profile of this city. Shorthand for [`aggregate`].
    pub fn hourly_profile(&self, filter: &DateFilter) -> AggregatedCitySeries {
        aggregate(self, filter)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// The result of parsing one feed document.
///
/// Cities appear in feed order and carry unique names. Records that were dropped
/// during parsing are listed in `skipped`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeatherFeed {
    pub cities: Vec<CitySeries>,
    pub skipped: Vec<SkippedRecord>,
}

impl WeatherFeed {
    /// Looks up a city by its exact name.
    pub fn city(&self, name: &str) -> Option<&CitySeries> {
        self.cities.iter().find(|city| city.name == name)
    }

    pub fn city_names(&self) -> impl Iterator<Item = &str> {
        self.cities.iter().map(|city| city.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CitySeries> {
        self.cities.iter()
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Total number of observations kept across all cities.
    pub fn observation_count(&self) -> usize {
        self.cities.iter().map(CitySeries::len).sum()
    }

    /// Hourly profiles for every city, in feed order.
    pub fn aggregate(&self, filter: &DateFilter) -> Vec<AggregatedCitySeries> {
        self.cities.iter().map(|city| aggregate(city, filter)).collect()
    }
}

impl<'a> IntoIterator for &'a WeatherFeed {
    type Item = &'a CitySeries;
    type IntoIter = std::slice::Iter<'a, CitySeries>;

    fn into_iter(self) -> Self::IntoIter {
        self.cities.iter()
    }
}
