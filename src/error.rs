use crate::feed::FeedError;
use crate::fetch::FetchError;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherProfileError {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Start date {start} is after end date {end}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },
}
