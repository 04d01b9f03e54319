//! Series query hook
//!
//! Fetches the CPU time series for the current [`SeriesKey`] as soon as the key
//! changes and again every [`POLL_INTERVAL`] while a key exists. Every fetch is
//! ticketed through the shared cache, so a late response never replaces one
//! started after it.

use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use topsql_core::{Completion, POLL_INTERVAL, SeriesCache, SeriesKey};

use crate::api;
use crate::types::SeriesSnapshot;

/// Start one fetch for `key`; the result lands in `cache` when it arrives.
fn start_fetch(mut cache: Signal<SeriesCache>, key: SeriesKey) {
    let ticket = cache.write().begin(&key);
    spawn(async move {
        let (ticket, result) = api::fetch_series(ticket).await;
        let generation = ticket.generation();
        match cache.write().complete(ticket, result) {
            Completion::Applied => {}
            Completion::Superseded => {
                tracing::debug!(generation, "Discarded superseded CPU time response");
            }
            Completion::Evicted => {
                tracing::debug!(generation, "Discarded CPU time response for evicted key");
            }
        }
    });
}

/// Live view of the series query for `key`; idle while `key` is `None`.
pub fn use_series_query(key: Memo<Option<SeriesKey>>) -> Memo<SeriesSnapshot> {
    let cache = use_signal(SeriesCache::new);

    // Immediate fetch on every key change
    use_effect(move || {
        if let Some(key) = key() {
            start_fetch(cache, key);
        }
    });

    // Unconditional refetch on an interval
    use_future(move || async move {
        let interval_ms = POLL_INTERVAL.as_millis() as u32;
        loop {
            TimeoutFuture::new(interval_ms).await;
            let current = key.peek().clone();
            if let Some(key) = current {
                start_fetch(cache, key);
            }
        }
    });

    use_memo(move || {
        let cache = cache.read();
        match key() {
            Some(key) => SeriesSnapshot::from(cache.state(&key)),
            None => SeriesSnapshot::idle(),
        }
    })
}
