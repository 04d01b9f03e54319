//! Keyed result cache with per-key generation counters.
//!
//! Every fetch takes a [`Ticket`] from [`QueryCache::begin`]. A completed fetch is
//! applied only when it was started after the result currently applied for its
//! key, so a slow response can never overwrite a newer one regardless of arrival
//! order. Responses that are merely slower than the next poll still land.

use std::fmt::Display;
use std::hash::Hash;

use hashbrown::HashMap;

/// Keys kept before the least recently requested one is dropped
pub const DEFAULT_CAPACITY: usize = 32;

/// Proof that a fetch was started; hand it back to [`QueryCache::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    key: K,
    generation: u64,
}

impl<K> Ticket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened to a completed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Result stored as the current value (or error) for its key
    Applied,
    /// A fetch started later for the same key already landed; result dropped
    Superseded,
    /// The key was evicted while the fetch was in flight; result dropped
    Evicted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Nothing requested for this key yet
    Idle,
    /// First fetch in flight, no data yet
    Loading,
    Success,
    Error,
}

/// Read-only view of one key's cached state.
#[derive(Debug, PartialEq)]
pub struct QueryState<'a, V> {
    pub status: QueryStatus,
    /// Last successfully applied value, kept across refetches and errors
    pub data: Option<&'a V>,
    /// Error from the most recent applied completion, if it failed
    pub error: Option<&'a str>,
    /// A fetch newer than the applied result is in flight
    pub is_fetching: bool,
}

impl<V> QueryState<'_, V> {
    fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            is_fetching: false,
        }
    }
}

struct Entry<V> {
    /// Newest generation handed out for this key
    issued: u64,
    /// Generation of the last completion that was applied (ok or error)
    settled: u64,
    value: Option<V>,
    error: Option<String>,
    last_used: u64,
}

pub struct QueryCache<K, V> {
    entries: HashMap<K, Entry<V>>,
    next_generation: u64,
    clock: u64,
    capacity: usize,
}

impl<K, V> Default for QueryCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            next_generation: 1,
            clock: 0,
            capacity: capacity.max(1),
        }
    }

    /// Start a fetch for `key`.
    pub fn begin(&mut self, key: &K) -> Ticket<K> {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.clock += 1;

        let clock = self.clock;
        let entry = self.entries.entry(key.clone()).or_insert_with(|| Entry {
            issued: 0,
            settled: 0,
            value: None,
            error: None,
            last_used: clock,
        });
        entry.issued = generation;
        entry.last_used = clock;

        self.evict_over_capacity(key);

        Ticket {
            key: key.clone(),
            generation,
        }
    }

    /// Finish a fetch. Applied unless a later-started fetch for the key already was.
    pub fn complete<E: Display>(&mut self, ticket: Ticket<K>, result: Result<V, E>) -> Completion {
        let Some(entry) = self.entries.get_mut(&ticket.key) else {
            return Completion::Evicted;
        };

        if ticket.generation <= entry.settled {
            tracing::debug!(
                generation = ticket.generation,
                applied = entry.settled,
                "Dropping superseded query result"
            );
            return Completion::Superseded;
        }

        entry.settled = ticket.generation;
        match result {
            Ok(value) => {
                entry.value = Some(value);
                entry.error = None;
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(error = %message, "Query failed");
                entry.error = Some(message);
            }
        }
        Completion::Applied
    }

    pub fn state(&self, key: &K) -> QueryState<'_, V> {
        let Some(entry) = self.entries.get(key) else {
            return QueryState::idle();
        };

        let is_fetching = entry.issued != entry.settled;
        let status = if entry.error.is_some() {
            QueryStatus::Error
        } else if entry.value.is_some() {
            QueryStatus::Success
        } else if is_fetching {
            QueryStatus::Loading
        } else {
            QueryStatus::Idle
        };

        QueryState {
            status,
            data: entry.value.as_ref(),
            error: entry.error.as_deref(),
            is_fetching,
        }
    }

    /// Current value for `key`, if one has been applied
    pub fn data(&self, key: &K) -> Option<&V> {
        self.entries.get(key).and_then(|e| e.value.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    fn evict_over_capacity(&mut self, keep: &K) {
        while self.entries.len() > self.capacity {
            let oldest = self
                .entries
                .iter()
                .filter(|(k, _)| *k != keep)
                .min_by_key(|(_, e)| e.last_used)
                .map(|(k, _)| k.clone());

            match oldest {
                Some(k) => {
                    self.entries.remove(&k);
                }
                None => break,
            }
        }
    }
}
