//! Sources of raw feed documents.
//!
//! The parser and aggregator never touch the network; a [`FeedSource`] hands
//! them a [`RawFeed`] for a [`FetchRequest`].

pub mod error;
mod file;
mod http;

pub use error::FetchError;
pub use file::FileFeedSource;
pub use http::{HttpFeedSource, DEFAULT_ENDPOINT};

use crate::feed::RawFeed;
use crate::types::date_filter::DateFilter;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Body of a feed request: `YYYY-MM-DD` dates, or `""` for an open bound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRequest {
    pub start_date: String,
    pub end_date: String,
}

impl From<&DateFilter> for FetchRequest {
    fn from(filter: &DateFilter) -> Self {
        let format = |date: Option<chrono::NaiveDate>| {
            date.map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        };
        Self {
            start_date: format(filter.start),
            end_date: format(filter.end),
        }
    }
}

/// Something that can deliver a feed document.
pub trait FeedSource {
    fn fetch(
        &self,
        request: &FetchRequest,
    ) -> impl Future<Output = Result<RawFeed, FetchError>> + Send;
}
