//! Hour-of-day aggregation of a city's observations.
//!
//! Observations are bucketed by the hour component of their local timestamp,
//! regardless of date: every 05:xx reading of the selected range lands in bucket
//! 5. The result is a diurnal profile with exactly one bucket per hour.

use crate::types::date_filter::DateFilter;
use crate::types::hourly::{AggregatedCitySeries, HourlyBucket, HOURS_PER_DAY};
use crate::types::observation::{CitySeries, RawObservation};
use chrono::Timelike;
use log::{debug, warn};

/// Decimal places kept in bucket averages.
pub const AVERAGE_PRECISION: u32 = 2;

/// Running means per metric.
///
/// Each update folds `x / n - mean / n` into the mean; neither term can exceed
/// the largest finite input, so finite readings always give a finite mean.
#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    count: u32,
    temperature: f64,
    pressure: f64,
    humidity: f64,
}

impl Accumulator {
    fn add(&mut self, observation: &RawObservation) {
        self.count += 1;
        let n = f64::from(self.count);
        let fold = |mean: f64, x: f64| mean + (x / n - mean / n);
        self.temperature = fold(self.temperature, observation.temperature);
        self.pressure = fold(self.pressure, observation.pressure);
        self.humidity = fold(self.humidity, observation.humidity);
    }

    fn into_bucket(self, hour: u32) -> HourlyBucket {
        if self.count == 0 {
            return HourlyBucket::empty(hour);
        }
        HourlyBucket {
            hour,
            sample_count: self.count,
            avg_temperature: Some(round_to_precision(self.temperature, AVERAGE_PRECISION)),
            avg_pressure: Some(round_to_precision(self.pressure, AVERAGE_PRECISION)),
            avg_humidity: Some(round_to_precision(self.humidity, AVERAGE_PRECISION)),
        }
    }
}

/// Builds the 24-hour profile of `series` over the dates admitted by `filter`.
///
/// Observations with an unparseable timestamp are left out and counted in
/// `skipped_timestamps`; those outside the range are counted in `outside_range`.
/// The function is pure: the same inputs always give the same output.
///
/// # Examples
///
/// ```
/// use weather_profiles::{aggregate, CitySeries, DateFilter, RawObservation};
///
/// let reading = |timestamp: &str, temperature: f64| RawObservation {
///     timestamp: timestamp.to_string(),
///     temperature,
///     pressure: 1013.0,
///     humidity: 40.0,
/// };
/// let austin = CitySeries::new(
///     "Austin",
///     vec![reading("2024-01-01 05:00:00", 10.0), reading("2024-01-02 05:00:00", 20.0)],
/// );
///
/// let profile = aggregate(&austin, &DateFilter::all());
/// assert_eq!(profile.buckets.len(), 24);
/// assert_eq!(profile.buckets[5].sample_count, 2);
/// assert_eq!(profile.buckets[5].avg_temperature, Some(15.0));
/// assert_eq!(profile.buckets[6].avg_temperature, None);
/// ```
pub fn aggregate(series: &CitySeries, filter: &DateFilter) -> AggregatedCitySeries {
    let mut accumulators = [Accumulator::default(); HOURS_PER_DAY];
    let mut skipped_timestamps = 0;
    let mut outside_range = 0;

    for observation in &series.observations {
        let Some(datetime) = observation.datetime() else {
            warn!(
                "Unparseable timestamp {:?} in city '{}', observation excluded",
                observation.timestamp, series.name
            );
            skipped_timestamps += 1;
            continue;
        };
        if !filter.contains(datetime.date()) {
            outside_range += 1;
            continue;
        }

        accumulators[datetime.hour() as usize].add(observation);
    }

    let buckets: [HourlyBucket; HOURS_PER_DAY] =
        std::array::from_fn(|hour| accumulators[hour].into_bucket(hour as u32));

    debug!(
        "Aggregated '{}': {} observations in {} populated hours, {} outside range, {} bad timestamps",
        series.name,
        series.observations.len() - skipped_timestamps - outside_range,
        buckets.iter().filter(|bucket| !bucket.is_empty()).count(),
        outside_range,
        skipped_timestamps
    );

    AggregatedCitySeries {
        name: series.name.clone(),
        buckets,
        skipped_timestamps,
        outside_range,
    }
}

/// Rounds half away from zero to `decimals` places.
///
/// Works on the binary value, so inputs such as `1.005` that are stored slightly
/// below the halfway point round down. Negative zero comes back as `0.0`.
/// Values too large to scale are returned unchanged; they carry no fractional
/// digits at that magnitude.
pub fn round_to_precision(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    let rounded = scaled.round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
