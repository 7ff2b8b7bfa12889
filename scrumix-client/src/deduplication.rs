use crate::key::{KeyPattern, RequestKey};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared, WeakShared};
use futures::Future;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Configuration for request deduplication
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DeduplicationConfig {
    /// Whether deduplication is enabled
    pub enabled: bool,
}

impl Default for DeduplicationConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

type PendingRequest<T> = Shared<BoxFuture<'static, T>>;

/// Map entry for a request that has been issued but not yet settled.
///
/// Only a weak handle is kept: the callers own the request, and once every
/// caller has dropped it the request is cancelled and its guard removes the
/// entry.
struct InFlight<T> {
    generation: u64,
    request: Option<WeakShared<BoxFuture<'static, T>>>,
    joiners: usize,
}

/// Removes the map entry of its request once that request settles or is
/// dropped. The generation check keeps a stale guard from removing an entry
/// that replaced its own after an invalidation.
struct InFlightGuard<T> {
    in_flight: Arc<DashMap<RequestKey, InFlight<T>>>,
    key: RequestKey,
    generation: u64,
}

impl<T> Drop for InFlightGuard<T> {
    fn drop(&mut self) {
        if self
            .in_flight
            .remove_if(&self.key, |_, entry| entry.generation == self.generation)
            .is_some()
        {
            log::debug!("Request settled for key: {}", self.key);
        }
    }
}

/// Request deduplication system
/// When multiple identical requests are in flight, only the first one is
/// executed and its output is shared with every caller that joined it
pub struct RequestDeduplicator<T> {
    in_flight: Arc<DashMap<RequestKey, InFlight<T>>>,
    next_generation: Arc<AtomicU64>,
    config: DeduplicationConfig,
}

impl<T> Clone for RequestDeduplicator<T> {
    fn clone(&self) -> Self {
        Self {
            in_flight: Arc::clone(&self.in_flight),
            next_generation: Arc::clone(&self.next_generation),
            config: self.config.clone(),
        }
    }
}

impl<T> RequestDeduplicator<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(config: DeduplicationConfig) -> Self {
        Self {
            in_flight: Arc::new(DashMap::new()),
            next_generation: Arc::new(AtomicU64::new(0)),
            config,
        }
    }

    /// Execute a request with deduplication.
    /// If the same request is already in flight, wait for its output;
    /// `request_fn` is then never called. Otherwise it is called on first poll,
    /// after the request is registered, so it may use this deduplicator.
    pub async fn execute<F, Fut>(&self, key: RequestKey, request_fn: F) -> T
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        if !self.config.enabled {
            return request_fn().await;
        }

        self.join_or_start(key, request_fn).await
    }

    fn join_or_start<F, Fut>(&self, key: RequestKey, request_fn: F) -> PendingRequest<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        // The entry lock is held until the new request is registered, so two
        // concurrent callers can never both start one
        match self.in_flight.entry(key) {
            Entry::Occupied(mut entry) => {
                let live = entry.get().request.as_ref().and_then(WeakShared::upgrade);
                if let Some(request) = live {
                    log::debug!("Request already in flight for key: {}", entry.key());
                    entry.get_mut().joiners += 1;
                    return request;
                }

                log::debug!("Replacing abandoned request for key: {}", entry.key());
                let (in_flight, request) = self.start(entry.key().clone(), request_fn);
                entry.insert(in_flight);
                request
            }
            Entry::Vacant(entry) => {
                log::debug!("Executing new request for key: {}", entry.key());
                let (in_flight, request) = self.start(entry.key().clone(), request_fn);
                entry.insert(in_flight);
                request
            }
        }
    }

    fn start<F, Fut>(&self, key: RequestKey, request_fn: F) -> (InFlight<T>, PendingRequest<T>)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let guard = InFlightGuard {
            in_flight: Arc::clone(&self.in_flight),
            key,
            generation,
        };
        // Built lazily: the shard lock is still held here
        let request = async move {
            let _guard = guard;
            request_fn().await
        }
        .boxed()
        .shared();

        let in_flight = InFlight {
            generation,
            request: request.downgrade(),
            joiners: 0,
        };
        (in_flight, request)
    }

    /// Whether a request for `key` is currently in flight
    pub fn contains(&self, key: &RequestKey) -> bool {
        self.in_flight.contains_key(key)
    }

    /// Forget the in-flight request for one key, so the next read for it
    /// issues a fresh request. Callers already waiting still get its output.
    pub fn invalidate_key(&self, key: &RequestKey) -> bool {
        self.in_flight.remove(key).is_some()
    }

    /// Forget every in-flight request matching `pattern`
    pub fn invalidate(&self, pattern: &KeyPattern) -> usize {
        let keys: Vec<_> = self
            .in_flight
            .iter()
            .filter(|entry| pattern.matches(entry.key()))
            .map(|entry| entry.key().clone())
            .collect();

        let removed = keys
            .iter()
            .filter(|key| self.in_flight.remove(key).is_some())
            .count();
        if removed > 0 {
            log::debug!("Invalidated {} in-flight requests matching {}", removed, pattern);
        }
        removed
    }

    /// Get statistics about in-flight requests
    pub fn stats(&self) -> DeduplicationStats {
        let pending_requests = self.in_flight.len();
        let total_waiters = self
            .in_flight
            .iter()
            .map(|entry| entry.value().joiners)
            .sum();

        DeduplicationStats {
            pending_requests,
            total_waiters,
        }
    }

    /// Clear all in-flight requests
    pub fn clear(&self) {
        self.in_flight.clear();
        log::info!("Request deduplicator cleared");
    }
}

/// Statistics for request deduplication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeduplicationStats {
    pub pending_requests: usize,
    /// Callers that joined an existing request instead of starting one
    pub total_waiters: usize,
}
