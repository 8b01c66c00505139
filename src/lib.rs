//! Hourly weather profiles from multi-city observation feeds.
//!
//! A feed (XML or JSON) is parsed into one [`CitySeries`] per city, then each
//! series is collapsed into a 24-bucket [`AggregatedCitySeries`] holding the mean
//! temperature, pressure and humidity per hour of day over a [`DateFilter`].
//!
//! ```
//! use weather_profiles::{parse_feed, DateFilter, RawFeed};
//!
//! let raw = RawFeed::detect(r#"{"cities": [{"name": "Austin", "records": [
//!     {"time": "2024-01-01 05:00:00", "temperature": 10, "pressure": 1010, "humidity": 40},
//!     {"time": "2024-01-02 05:00:00", "temperature": 20, "pressure": 1020, "humidity": 60}
//! ]}]}"#);
//!
//! let feed = parse_feed(&raw)?;
//! let profiles = feed.aggregate(&DateFilter::all());
//!
//! assert_eq!(profiles[0].buckets[5].avg_temperature, Some(15.0));
//! # Ok::<(), weather_profiles::WeatherProfileError>(())
//! ```

mod aggregate;
mod error;
mod feed;
mod fetch;
mod frame;
mod pipeline;
mod types;

pub use error::WeatherProfileError;

pub use aggregate::{aggregate, round_to_precision, AVERAGE_PRECISION};
pub use feed::{
    parse_feed, parse_json, parse_json_value, parse_xml, FeedError, RawFeed, SkipReason,
    SkippedRecord,
};
pub use fetch::{
    FeedSource, FetchError, FetchRequest, FileFeedSource, HttpFeedSource, DEFAULT_ENDPOINT,
};
pub use frame::profiles_to_frame;
pub use pipeline::{ProfilePipeline, ProfileSnapshot, Refresh};

pub use types::date_filter::{AnyDate, DateFilter};
pub use types::hourly::{AggregatedCitySeries, HourlyBucket, Metric, HOURS_PER_DAY};
pub use types::observation::{CitySeries, RawObservation, WeatherFeed};
pub use types::timestamp::parse_timestamp;
