//! Fetch, parse and aggregate, with stale results discarded.
//!
//! Every [`ProfilePipeline::refresh`] or [`ProfilePipeline::refilter`] call takes
//! a generation ticket. A refresh whose fetch completes after a newer call has
//! started is dropped without parsing, and nothing is published for it. The
//! latest snapshot is available through a `watch` channel so that renderers can
//! wait for new data.

use crate::error::WeatherProfileError;
use crate::feed::parse_feed;
use crate::fetch::{FeedSource, FetchRequest};
use crate::types::date_filter::DateFilter;
use crate::types::hourly::AggregatedCitySeries;
use crate::types::observation::WeatherFeed;
use log::{debug, info};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// A parsed feed together with the hourly profiles computed from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSnapshot {
    pub filter: DateFilter,
    pub feed: Arc<WeatherFeed>,
    pub profiles: Vec<AggregatedCitySeries>,
}

/// Outcome of a refresh.
#[derive(Debug, Clone)]
pub enum Refresh {
    /// The snapshot was computed and published.
    Published(Arc<ProfileSnapshot>),
    /// A newer request started before this one finished; nothing was published.
    Superseded,
}

impl Refresh {
    pub fn snapshot(&self) -> Option<&Arc<ProfileSnapshot>> {
        match self {
            Refresh::Published(snapshot) => Some(snapshot),
            Refresh::Superseded => None,
        }
    }
}

pub struct ProfilePipeline<S> {
    source: S,
    generation: AtomicU64,
    latest: watch::Sender<Option<Arc<ProfileSnapshot>>>,
}

impl<S: FeedSource> ProfilePipeline<S> {
    pub fn new(source: S) -> Self {
        let (latest, _) = watch::channel(None);
        Self {
            source,
            generation: AtomicU64::new(0),
            latest,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Receiver that is notified whenever a new snapshot is published.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<ProfileSnapshot>>> {
        self.latest.subscribe()
    }

    /// The most recently published snapshot.
    pub fn latest(&self) -> Option<Arc<ProfileSnapshot>> {
        self.latest.borrow().clone()
    }

    /// Fetches a feed for `filter`, then parses and aggregates it.
    ///
    /// # Errors
    ///
    /// Transport failures surface as [`WeatherProfileError::Fetch`] and malformed
    /// feeds as [`WeatherProfileError::Feed`]. In both cases the previously
    /// published snapshot is left in place. A fetch that fails after a newer
    /// request has started reports [`Refresh::Superseded`] instead.
    pub async fn refresh(&self, filter: DateFilter) -> Result<Refresh, WeatherProfileError> {
        let ticket = self.next_ticket();
        let fetched = self.source.fetch(&FetchRequest::from(&filter)).await;
        if !self.is_current(ticket) {
            debug!("Discarding feed of superseded refresh #{}", ticket);
            return Ok(Refresh::Superseded);
        }

        let feed = Arc::new(parse_feed(&fetched?)?);
        let snapshot = Arc::new(ProfileSnapshot {
            filter,
            profiles: feed.aggregate(&filter),
            feed,
        });
        Ok(self.publish(ticket, snapshot))
    }

    /// Recomputes the profiles of the latest feed for a new filter, without fetching.
    ///
    /// Returns `None` when nothing has been fetched yet.
    pub fn refilter(&self, filter: DateFilter) -> Option<Refresh> {
        let ticket = self.next_ticket();
        let feed = self.latest()?.feed.clone();
        let snapshot = Arc::new(ProfileSnapshot {
            filter,
            profiles: feed.aggregate(&filter),
            feed,
        });
        Some(self.publish(ticket, snapshot))
    }

    fn next_ticket(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    fn publish(&self, ticket: u64, snapshot: Arc<ProfileSnapshot>) -> Refresh {
        let published = self.latest.send_if_modified(|slot| {
            if self.is_current(ticket) {
                *slot = Some(snapshot.clone());
                true
            } else {
                false
            }
        });
        if published {
            info!(
                "Published {} hourly profiles (request #{})",
                snapshot.profiles.len(),
                ticket
            );
            Refresh::Published(snapshot)
        } else {
            debug!("Request #{} superseded before publishing", ticket);
            Refresh::Superseded
        }
    }
}
