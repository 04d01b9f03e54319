//! Fetch layer binding the current selection to live query results.
//!
//! - Instance list: fetched once, never polled
//! - CPU time series: keyed by [`SeriesKey`], refetched every [`POLL_INTERVAL`]
//!   while an instance is selected, never on window focus
//!
//! Out-of-order responses are handled by [`QueryCache`]: each fetch carries a
//! generation ticket and a result is applied only if no later-started fetch for
//! its key has landed first. Responses
//! for a key the view no longer shows stay in the cache but are never displayed.

mod cache;


use std::time::Duration;

use topsql_types::{CpuTimeSeries, TimeRange};

use crate::client::{ApiError, TopSqlApi};

pub use cache::{Completion, DEFAULT_CAPACITY, QueryCache, QueryState, QueryStatus, Ticket};

/// Interval between unconditional refetches of the series query
pub const POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Cache of raw series responses keyed by selection
pub type SeriesCache = QueryCache<SeriesKey, Vec<CpuTimeSeries>>;

/// Everything the series query depends on. Any change is a new key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub instance: String,
    pub top: Option<String>,
    pub time_range: Option<TimeRange>,
    pub window: Option<String>,
}

impl SeriesKey {
    /// Build a key, or `None` when no instance is selected (query disabled).
    pub fn new(
        instance: Option<&str>,
        top: Option<&str>,
        time_range: Option<TimeRange>,
        window: Option<&str>,
    ) -> Option<Self> {
        let instance = instance.filter(|i| !i.is_empty())?;
        Some(Self {
            instance: instance.to_string(),
            top: top.map(str::to_string),
            time_range,
            window: window.map(str::to_string),
        })
    }
}

/// Run the fetch a ticket was issued for, returning the ticket with its result
/// so the caller can hand both to [`QueryCache::complete`].
pub async fn fetch_series<A: TopSqlApi>(
    api: &A,
    ticket: Ticket<SeriesKey>,
) -> (Ticket<SeriesKey>, Result<Vec<CpuTimeSeries>, ApiError>) {
    let key = ticket.key();
    let result = api
        .get_cpu_time_data(&key.instance, key.top.as_deref(), key.time_range, key.window.as_deref())
        .await;
    (ticket, result)
}
