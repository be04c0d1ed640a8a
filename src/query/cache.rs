//! Process-wide query cache
//!
//! Values live in a `moka` cache keyed by `(QueryKey, generation)`, whose
//! `try_get_with` makes concurrent fetches of one key and generation share a
//! single load. A `DashMap` beside it tracks, per key, what observers can see
//! (idle / loading / error / data), the key's current generation, and who is
//! still using it. Every invalidation moves a key to a fresh generation drawn
//! from one process-wide counter, so a load started before the invalidation
//! fills an entry nobody will ask for again.
//!
//! A key's status entry lives only while something holds it: an observer, a
//! load in flight, or a cached value. Otherwise it is removed.

use super::{QueryData, QueryKey, QueryState};
use crate::config::Config;
use crate::error::{NewsError, Result, RetryPolicy};
use dashmap::DashMap;
use log::{debug, warn};
use moka::future::Cache;
use moka::notification::RemovalCause;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

type Slot = (QueryKey, u64);

#[derive(Debug, Clone, Default)]
enum Phase {
    #[default]
    Idle,
    Loading,
    Error(NewsError),
    Data(QueryData),
}

#[derive(Debug, Clone)]
struct KeyStatus {
    phase: Phase,
    generation: u64,
    observers: usize,
    in_flight: usize,
}

impl KeyStatus {
    fn new(generation: u64) -> Self {
        Self {
            phase: Phase::Idle,
            generation,
            observers: 0,
            in_flight: 0,
        }
    }

    fn is_unused(&self) -> bool {
        self.observers == 0 && self.in_flight == 0
    }

    /// Nothing would be lost by dropping the entry.
    fn is_disposable(&self) -> bool {
        self.is_unused() && !matches!(self.phase, Phase::Data(_))
    }
}

#[derive(Debug)]
struct Counters {
    fetches: AtomicU64,
    loads: AtomicU64,
    invalidations: AtomicU64,
    next_generation: AtomicU64,
}

impl Default for Counters {
    fn default() -> Self {
        Self {
            fetches: AtomicU64::new(0),
            loads: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
            next_generation: AtomicU64::new(1),
        }
    }
}

/// Cache statistics for logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub fetches: u64,
    pub loads: u64,
    pub invalidations: u64,
}

impl CacheStats {
    /// Fetches answered without starting a load of their own.
    pub fn hits(&self) -> u64 {
        self.fetches.saturating_sub(self.loads)
    }

    pub fn summary(&self) -> String {
        format!(
            "Query cache: {} fetches, {} loads, {} served from cache, {} invalidations",
            self.fetches,
            self.loads,
            self.hits(),
            self.invalidations
        )
    }
}

/// Shared keyed query state. Cloning is cheap and every clone sees the same entries.
#[derive(Clone)]
pub struct QueryCache {
    values: Cache<Slot, QueryData>,
    status: Arc<DashMap<QueryKey, KeyStatus>>,
    retry: RetryPolicy,
    counters: Arc<Counters>,
}

impl QueryCache {
    pub fn new(capacity: u64, retry: RetryPolicy) -> Self {
        debug!(
            "Initializing query cache (capacity: {}, retries: {})",
            capacity, retry.max_retries
        );
        let status: Arc<DashMap<QueryKey, KeyStatus>> = Arc::new(DashMap::new());
        let evicted = Arc::clone(&status);
        let values = Cache::builder()
            .max_capacity(capacity)
            .eviction_listener(move |slot: Arc<Slot>, _, cause: RemovalCause| {
                if cause.was_evicted() {
                    let (key, generation) = slot.as_ref();
                    debug!("Evicted {} (generation {})", key, generation);
                    evicted.remove_if(key, |_, s| s.generation == *generation && s.is_unused());
                }
            })
            .build();
        Self {
            values,
            status,
            retry,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let retry = RetryPolicy::new(config.query_retry, config.retry_delay(), MAX_RETRY_DELAY);
        Self::new(config.query_cache_capacity, retry)
    }

    /// Returns the cached value for `key`, or runs `fetcher` to load it.
    ///
    /// Callers arriving while a load for `key` is in flight wait for that load
    /// instead of starting another. A failed load is retried per the cache's
    /// [`RetryPolicy`]; the final error is recorded for the key and returned,
    /// but never cached, so the next fetch tries again.
    pub async fn fetch<F, Fut>(&self, key: QueryKey, fetcher: F) -> QueryState<QueryData>
    where
        F: Fn() -> Fut + Send + Sync,
        Fut: Future<Output = Result<QueryData>> + Send,
    {
        self.counters.fetches.fetch_add(1, Ordering::Relaxed);
        let mut pending = self.begin(&key);
        let slot = (key.clone(), pending.generation);

        match self.values.try_get_with(slot, self.load(&pending, &fetcher)).await {
            Ok(data) => {
                pending.outcome = Some(Phase::Data(data.clone()));
                QueryState::Data(data)
            }
            Err(err) => {
                let err = NewsError::clone(&err);
                pending.outcome = Some(Phase::Error(err.clone()));
                QueryState::Error(err)
            }
        }
    }

    async fn load<F, Fut>(&self, pending: &Pending<'_>, fetcher: &F) -> Result<QueryData>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<QueryData>>,
    {
        let key = &pending.key;
        self.counters.loads.fetch_add(1, Ordering::Relaxed);
        debug!("Cache MISS for {}, loading (generation {})", key, pending.generation);

        let mut failures = 0;
        loop {
            match fetcher().await {
                Ok(data) => return Ok(data),
                Err(err) => {
                    failures += 1;
                    if !self.retry.allows(failures, &err) {
                        debug!("Loading {} failed: {}", key, err);
                        return Err(err);
                    }
                    warn!(
                        "Loading {} failed: {} (retry {}/{})",
                        key, err, failures, self.retry.max_retries
                    );
                    tokio::time::sleep(self.retry.delay_for_attempt(failures)).await;
                }
            }
        }
    }

    fn next_generation(&self) -> u64 {
        self.counters.next_generation.fetch_add(1, Ordering::Relaxed)
    }

    /// Registers a fetch of `key` and marks it loading unless it already holds data.
    fn begin(&self, key: &QueryKey) -> Pending<'_> {
        let mut status = self
            .status
            .entry(key.clone())
            .or_insert_with(|| KeyStatus::new(self.next_generation()));
        status.in_flight += 1;
        if !matches!(status.phase, Phase::Data(_)) {
            status.phase = Phase::Loading;
        }
        Pending {
            cache: self,
            key: key.clone(),
            generation: status.generation,
            outcome: None,
        }
    }

    /// Records how a fetch of `generation` ended. An outcome for a generation
    /// that has since been invalidated is not recorded.
    fn settle(&self, key: &QueryKey, generation: u64, outcome: Option<Phase>) {
        let (disposable, unobserved_data) = match self.status.get_mut(key) {
            Some(mut status) => {
                status.in_flight = status.in_flight.saturating_sub(1);
                if status.generation == generation {
                    match outcome {
                        Some(phase) => status.phase = phase,
                        // Fetch was cancelled
                        None if matches!(status.phase, Phase::Loading) && status.in_flight == 0 => {
                            status.phase = Phase::Idle
                        }
                        None => {}
                    }
                }
                let unobserved_data = status.is_unused() && matches!(status.phase, Phase::Data(_));
                (status.is_disposable(), unobserved_data.then_some(status.generation))
            }
            None => (false, None),
        };
        if disposable {
            self.status.remove_if(key, |_, s| s.is_disposable());
        }
        // Already evicted while the fetch was settling
        if let Some(current) = unobserved_data {
            if !self.values.contains_key(&(key.clone(), current)) {
                self.status
                    .remove_if(key, |_, s| s.generation == current && s.is_unused());
            }
        }
    }

    /// What an observer of `key` currently sees.
    pub fn state(&self, key: &QueryKey) -> QueryState<QueryData> {
        let Some((phase, generation)) = self
            .status
            .get(key)
            .map(|s| (s.phase.clone(), s.generation))
        else {
            return QueryState::Idle;
        };
        match phase {
            Phase::Idle => QueryState::Idle,
            Phase::Loading => QueryState::Loading,
            Phase::Error(err) => QueryState::Error(err),
            Phase::Data(data) if self.values.contains_key(&(key.clone(), generation)) => {
                QueryState::Data(data)
            }
            // Evicted for capacity
            Phase::Data(_) => QueryState::Idle,
        }
    }

    /// Discards whatever is held for `key`; the next fetch loads it again.
    /// A load already in flight still answers its waiters but is not kept.
    pub fn invalidate(&self, key: &QueryKey) {
        self.counters.invalidations.fetch_add(1, Ordering::Relaxed);
        let removed = self.status.remove_if(key, |_, s| s.is_unused()).is_some();
        if removed {
            debug!("Invalidated {} (dropped)", key);
            return;
        }
        if let Some(mut status) = self.status.get_mut(key) {
            status.generation = self.next_generation();
            status.phase = Phase::Idle;
            debug!("Invalidated {} (generation {})", key, status.generation);
        }
    }

    pub fn invalidate_news_list(&self) {
        self.invalidate(&QueryKey::NewsList);
    }

    pub fn invalidate_news_item(&self, id: i64) {
        self.invalidate(&QueryKey::NewsItem(id));
    }

    /// Invalidates every key.
    pub fn clear(&self) {
        self.status.retain(|_, s| !s.is_unused());
        for mut status in self.status.iter_mut() {
            status.generation = self.next_generation();
            status.phase = Phase::Idle;
        }
        self.values.invalidate_all();
        self.counters.invalidations.fetch_add(1, Ordering::Relaxed);
        debug!("Query cache cleared");
    }

    /// Registers a consumer of `key`. When the last observer of a key is
    /// dropped the key is invalidated.
    pub fn observe(&self, key: QueryKey) -> QueryObserver {
        self.status
            .entry(key.clone())
            .or_insert_with(|| KeyStatus::new(self.next_generation()))
            .observers += 1;
        QueryObserver {
            cache: self.clone(),
            key,
        }
    }

    pub fn observers(&self, key: &QueryKey) -> usize {
        self.status.get(key).map_or(0, |s| s.observers)
    }

    /// Number of keys the cache currently keeps state for.
    pub fn tracked_keys(&self) -> usize {
        self.status.len()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            fetches: self.counters.fetches.load(Ordering::Relaxed),
            loads: self.counters.loads.load(Ordering::Relaxed),
            invalidations: self.counters.invalidations.load(Ordering::Relaxed),
        }
    }
}

/// One fetch of a key, settled on drop so a cancelled fetch is accounted for too.
struct Pending<'a> {
    cache: &'a QueryCache,
    key: QueryKey,
    generation: u64,
    outcome: Option<Phase>,
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        self.cache
            .settle(&self.key, self.generation, self.outcome.take());
    }
}

/// Keeps a key's cached value alive while held.
pub struct QueryObserver {
    cache: QueryCache,
    key: QueryKey,
}

impl QueryObserver {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }
}

impl Drop for QueryObserver {
    fn drop(&mut self) {
        let last = match self.cache.status.get_mut(&self.key) {
            Some(mut status) => {
                status.observers = status.observers.saturating_sub(1);
                status.observers == 0
            }
            None => false,
        };
        if last {
            debug!("Last observer of {} gone", self.key);
            self.cache.invalidate(&self.key);
        }
    }
}
