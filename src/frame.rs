//! Export of hourly profiles as polars `DataFrame`s for chart collaborators.
//!
//! One row per hour and city with the columns `city`, `hour`, `samples`,
//! `temperature`, `pressure` and `humidity`. Averages of empty hours are null.

use crate::types::hourly::{AggregatedCitySeries, Metric, HOURS_PER_DAY};
use polars::prelude::*;

impl AggregatedCitySeries {
    /// This profile as a 24-row frame, ordered by hour.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let hours: Vec<u32> = self.buckets.iter().map(|bucket| bucket.hour).collect();
        let samples: Vec<u32> = self.buckets.iter().map(|bucket| bucket.sample_count).collect();
        let averages = |metric: Metric| -> Vec<Option<f64>> {
            self.buckets
                .iter()
                .map(|bucket| bucket.average(metric))
                .collect()
        };

        df!(
            "city" => vec![self.name.as_str(); HOURS_PER_DAY],
            "hour" => hours,
            "samples" => samples,
            Metric::Temperature.column_name() => averages(Metric::Temperature),
            Metric::Pressure.column_name() => averages(Metric::Pressure),
            Metric::Humidity.column_name() => averages(Metric::Humidity)
        )
    }
}

/// Stacks the frames of several profiles, keeping their order.
///
/// The result is a single chunk per column. An empty slice gives an empty frame.
pub fn profiles_to_frame(profiles: &[AggregatedCitySeries]) -> PolarsResult<DataFrame> {
    let mut frames = profiles.iter().map(AggregatedCitySeries::to_frame);
    let Some(first) = frames.next() else {
        return Ok(DataFrame::empty());
    };
    let mut combined = first?;
    for frame in frames {
        combined.vstack_mut(&frame?)?;
    }
    combined.align_chunks_par();
    Ok(combined)
}
