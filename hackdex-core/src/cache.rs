//! Keyed cache of asynchronous store reads.
//!
//! Every entry is addressed by a [`QueryKey`] (view, game, filters, page) and
//! tracks the last resolved payload, the last error and at most one in-flight
//! request. Concurrent reads of one key share that request. Each dispatch takes the
//! next per-key generation; a resolution whose generation is no longer current is
//! dropped, so a superseded request can never overwrite a newer one.

use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::rc::{Rc, Weak};

use crate::constants::{GC_TIME_MS, STALE_TIME_MS};
use crate::game::GameId;
use crate::query::QueryError;
use crate::runtime::{Clock, Spawner};

/// Which screen (or screen dependency) a cached read belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViewId {
    Pokedex,
    Encounters,
    Trainers,
    PokemonDetail,
    TrainerDetail,
    RouteDomain,
    TrainerSplits,
}

impl ViewId {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pokedex => "pokedex",
            Self::Encounters => "encounters",
            Self::Trainers => "trainers",
            Self::PokemonDetail => "pokemon-detail",
            Self::TrainerDetail => "trainer-detail",
            Self::RouteDomain => "route-domain",
            Self::TrainerSplits => "trainer-splits",
        }
    }
}

/// Ordered tuple identifying one cached read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    pub view: ViewId,
    pub game: GameId,
    pub filters: Vec<(String, String)>,
    pub page: u32,
}

impl QueryKey {
    #[must_use]
    pub fn new(view: ViewId, game: GameId) -> Self {
        Self {
            view,
            game,
            filters: Vec::new(),
            page: 0,
        }
    }

    /// Add a filter field. Empty values are skipped so they never reach a key.
    #[must_use]
    pub fn with(mut self, field: &str, value: &str) -> Self {
        if !value.is_empty() {
            self.filters.push((field.to_string(), value.to_string()));
            self.filters.sort();
        }
        self
    }

    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Never requested.
    Idle,
    /// First request in flight, nothing to show yet.
    Pending,
    Resolved,
    Error,
}

/// Point-in-time view of one entry.
#[derive(Debug)]
pub struct QuerySnapshot<V> {
    pub status: QueryStatus,
    pub data: Option<Rc<V>>,
    pub error: Option<QueryError>,
    /// A request for this key is outstanding (initial load or background refresh).
    pub is_fetching: bool,
    pub is_stale: bool,
    pub updated_at: Option<u64>,
}

impl<V> Clone for QuerySnapshot<V> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            is_fetching: self.is_fetching,
            is_stale: self.is_stale,
            updated_at: self.updated_at,
        }
    }
}

impl<V> QuerySnapshot<V> {
    fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            is_fetching: false,
            is_stale: false,
            updated_at: None,
        }
    }
}

/// Freshness and reclamation windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub stale_ms: u64,
    pub gc_ms: u64,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            stale_ms: STALE_TIME_MS,
            gc_ms: GC_TIME_MS,
        }
    }
}

/// Bulk invalidation hook used by the game context.
pub trait InvalidateAll {
    fn invalidate_all(&self);
}

type QueryResult<V> = Result<Rc<V>, QueryError>;
type InFlightFuture<V> = Shared<LocalBoxFuture<'static, QueryResult<V>>>;

struct InFlight<V> {
    generation: u64,
    future: InFlightFuture<V>,
}

struct Entry<V> {
    data: Option<Rc<V>>,
    error: Option<QueryError>,
    updated_at: Option<u64>,
    invalidated: bool,
    generation: u64,
    in_flight: Option<InFlight<V>>,
    observers: usize,
    unobserved_since: Option<u64>,
}

impl<V> Entry<V> {
    const fn new(now: u64) -> Self {
        Self {
            data: None,
            error: None,
            updated_at: None,
            invalidated: false,
            generation: 0,
            in_flight: None,
            observers: 0,
            unobserved_since: Some(now),
        }
    }

    fn is_stale(&self, now: u64, policy: CachePolicy) -> bool {
        self.invalidated
            || self
                .updated_at
                .is_none_or(|at| now.saturating_sub(at) >= policy.stale_ms)
    }

    fn snapshot(&self, now: u64, policy: CachePolicy) -> QuerySnapshot<V> {
        let status = if self.error.is_some() {
            QueryStatus::Error
        } else if self.data.is_some() {
            QueryStatus::Resolved
        } else if self.in_flight.is_some() {
            QueryStatus::Pending
        } else {
            QueryStatus::Idle
        };
        QuerySnapshot {
            status,
            data: self.data.clone(),
            error: self.error.clone(),
            is_fetching: self.in_flight.is_some(),
            is_stale: self.is_stale(now, policy),
            updated_at: self.updated_at,
        }
    }
}

type Listener = Rc<dyn Fn(&QueryKey)>;

struct CacheState<V> {
    entries: RefCell<HashMap<QueryKey, Entry<V>>>,
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_listener: Cell<u64>,
    clock: Rc<dyn Clock>,
    spawner: Rc<dyn Spawner>,
    policy: CachePolicy,
}

/// Cheaply clonable handle; clones share the same entries.
pub struct QueryCache<V> {
    shared: Rc<CacheState<V>>,
}

impl<V> Clone for QueryCache<V> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<V: 'static> QueryCache<V> {
    #[must_use]
    pub fn new(clock: Rc<dyn Clock>, spawner: Rc<dyn Spawner>, policy: CachePolicy) -> Self {
        Self {
            shared: Rc::new(CacheState {
                entries: RefCell::new(HashMap::new()),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
                clock,
                spawner,
                policy,
            }),
        }
    }

    fn now(&self) -> u64 {
        self.shared.clock.now_ms()
    }

    /// Current state of `key` without requesting anything.
    #[must_use]
    pub fn snapshot(&self, key: &QueryKey) -> QuerySnapshot<V> {
        let now = self.now();
        self.shared
            .entries
            .borrow()
            .get(key)
            .map_or_else(QuerySnapshot::idle, |e| e.snapshot(now, self.shared.policy))
    }

    /// Read `key`, calling `fetcher` only when needed.
    ///
    /// A fresh entry is returned as is. A stale one is returned immediately while a
    /// refresh runs in the background. A missing or errored one is (re)requested and
    /// reported as loading until the request settles. An outstanding request for the
    /// same key is joined instead of duplicated.
    pub fn fetch<F, Fut>(&self, key: &QueryKey, fetcher: F) -> QuerySnapshot<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, QueryError>> + 'static,
    {
        self.collect_garbage();
        let now = self.now();
        let policy = self.shared.policy;
        let needs_request = self.shared.entries.borrow().get(key).is_none_or(|entry| {
            entry.in_flight.is_none() && (entry.error.is_some() || entry.is_stale(now, policy))
        });
        if needs_request {
            self.dispatch(key, fetcher);
        }
        self.snapshot(key)
    }

    /// Warm `key` ahead of an anticipated navigation.
    pub fn prefetch<F, Fut>(&self, key: &QueryKey, fetcher: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, QueryError>> + 'static,
    {
        let _ = self.fetch(key, fetcher);
    }

    /// Like [`fetch`](Self::fetch), but wait for a value. Cached data, fresh or stale,
    /// resolves immediately; otherwise the outstanding request is awaited.
    ///
    /// Only results the cache accepted are returned. When the awaited request is
    /// superseded, the newer request is joined instead; when nothing replaced it (the
    /// entry was invalidated), the read fails with [`QueryError::Superseded`].
    pub fn ensure<F, Fut>(&self, key: &QueryKey, fetcher: F) -> LocalBoxFuture<'static, QueryResult<V>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, QueryError>> + 'static,
    {
        let snapshot = self.fetch(key, fetcher);
        if let (QueryStatus::Resolved, Some(data)) = (snapshot.status, snapshot.data) {
            return Box::pin(futures::future::ready(Ok(data)));
        }
        match self.in_flight(key) {
            Some((generation, future)) => {
                Box::pin(Self::accepted(Rc::downgrade(&self.shared), key.clone(), generation, future))
            }
            None => {
                let error = snapshot
                    .error
                    .unwrap_or_else(|| QueryError::Network(String::from("request was not issued")));
                Box::pin(futures::future::ready(Err(error)))
            }
        }
    }

    fn in_flight(&self, key: &QueryKey) -> Option<(u64, InFlightFuture<V>)> {
        self.shared
            .entries
            .borrow()
            .get(key)
            .and_then(|e| e.in_flight.as_ref().map(|f| (f.generation, f.future.clone())))
    }

    async fn accepted(
        cache: Weak<CacheState<V>>,
        key: QueryKey,
        mut generation: u64,
        mut future: InFlightFuture<V>,
    ) -> QueryResult<V> {
        loop {
            let result = future.await;
            let Some(shared) = cache.upgrade() else {
                return result;
            };
            let cache_now = Self { shared };
            let (current, settled) = match cache_now.shared.entries.borrow().get(&key) {
                Some(entry) => (
                    entry.generation,
                    entry.error.clone().map(Err).or_else(|| entry.data.clone().map(Ok)),
                ),
                None => return Err(QueryError::Superseded),
            };
            if current == generation {
                return result;
            }
            match (cache_now.in_flight(&key), settled) {
                (Some((next_generation, next)), _) => {
                    generation = next_generation;
                    future = next;
                }
                (None, Some(settled)) => return settled,
                (None, None) => return Err(QueryError::Superseded),
            }
        }
    }

    /// Issue a new request for `key` even if one is fresh or outstanding. The older
    /// request, if any, is superseded.
    pub fn refetch<F, Fut>(&self, key: &QueryKey, fetcher: F) -> QuerySnapshot<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, QueryError>> + 'static,
    {
        self.dispatch(key, fetcher);
        self.snapshot(key)
    }

    /// Mark `key` stale and supersede its outstanding request.
    pub fn invalidate(&self, key: &QueryKey) {
        let touched = self
            .shared
            .entries
            .borrow_mut()
            .get_mut(key)
            .map(Self::mark_invalid)
            .is_some();
        if touched {
            self.notify(key);
        }
    }

    fn mark_invalid(entry: &mut Entry<V>) {
        entry.invalidated = true;
        entry.generation += 1;
        entry.in_flight = None;
    }

    fn dispatch<F, Fut>(&self, key: &QueryKey, fetcher: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, QueryError>> + 'static,
    {
        let now = self.now();
        let request = fetcher();
        let future: InFlightFuture<V> = async move { request.await.map(Rc::new) }
            .boxed_local()
            .shared();
        let generation = {
            let mut entries = self.shared.entries.borrow_mut();
            let entry = entries.entry(key.clone()).or_insert_with(|| Entry::new(now));
            entry.generation += 1;
            entry.error = None;
            entry.in_flight = Some(InFlight {
                generation: entry.generation,
                future: future.clone(),
            });
            entry.generation
        };
        log::debug!("cache dispatch {} gen {generation}", key.view.as_str());

        let cache = Rc::downgrade(&self.shared);
        let settle_key = key.clone();
        self.shared.spawner.spawn(Box::pin(async move {
            let result = future.await;
            if let Some(shared) = cache.upgrade() {
                Self { shared }.settle(&settle_key, generation, result);
            }
        }));
        self.notify(key);
    }

    fn settle(&self, key: &QueryKey, generation: u64, result: QueryResult<V>) {
        let now = self.now();
        {
            let mut entries = self.shared.entries.borrow_mut();
            let Some(entry) = entries.get_mut(key) else {
                return;
            };
            if entry.generation != generation {
                log::debug!(
                    "discarding superseded {} result (gen {generation} < {})",
                    key.view.as_str(),
                    entry.generation
                );
                return;
            }
            entry.in_flight = None;
            match result {
                Ok(data) => {
                    entry.data = Some(data);
                    entry.error = None;
                    entry.updated_at = Some(now);
                    entry.invalidated = false;
                }
                Err(err) => {
                    log::debug!("{} request failed: {err}", key.view.as_str());
                    entry.error = Some(err);
                }
            }
        }
        self.notify(key);
    }

    /// Hold `key` alive; the eviction clock starts once every observer is dropped.
    #[must_use]
    pub fn observe(&self, key: &QueryKey) -> QueryObserver<V> {
        let now = self.now();
        let mut entries = self.shared.entries.borrow_mut();
        let entry = entries.entry(key.clone()).or_insert_with(|| Entry::new(now));
        entry.observers += 1;
        entry.unobserved_since = None;
        QueryObserver {
            cache: Rc::downgrade(&self.shared),
            key: key.clone(),
        }
    }

    fn release(&self, key: &QueryKey) {
        let now = self.now();
        if let Some(entry) = self.shared.entries.borrow_mut().get_mut(key) {
            entry.observers = entry.observers.saturating_sub(1);
            if entry.observers == 0 {
                entry.unobserved_since = Some(now);
            }
        }
    }

    /// Drop entries nobody has observed for the reclamation window.
    pub fn collect_garbage(&self) -> usize {
        let now = self.now();
        let gc_ms = self.shared.policy.gc_ms;
        let mut entries = self.shared.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|_, e| {
            e.observers > 0
                || e.in_flight.is_some()
                || e.unobserved_since
                    .is_none_or(|since| now.saturating_sub(since) < gc_ms)
        });
        before - entries.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn in_flight_count(&self) -> usize {
        self.shared
            .entries
            .borrow()
            .values()
            .filter(|e| e.in_flight.is_some())
            .count()
    }

    /// Call `listener` with the key of every entry that changes.
    #[must_use]
    pub fn subscribe(&self, listener: impl Fn(&QueryKey) + 'static) -> CacheSubscription {
        let id = self.shared.next_listener.get();
        self.shared.next_listener.set(id + 1);
        self.shared
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        let weak: Weak<CacheState<V>> = Rc::downgrade(&self.shared);
        CacheSubscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.listeners.borrow_mut().retain(|(l, _)| *l != id);
                }
            })),
        }
    }

    fn notify(&self, key: &QueryKey) {
        let listeners: Vec<Listener> = self
            .shared
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(key);
        }
    }
}

impl<V: 'static> InvalidateAll for QueryCache<V> {
    /// Drop every payload regardless of key and supersede all outstanding requests.
    /// Unlike [`QueryCache::invalidate`], nothing cached before the call is served
    /// afterwards, not even as a stale placeholder. Observers are kept.
    fn invalidate_all(&self) {
        let keys: Vec<QueryKey> = {
            let mut entries = self.shared.entries.borrow_mut();
            for entry in entries.values_mut() {
                Self::mark_invalid(entry);
                entry.data = None;
                entry.error = None;
                entry.updated_at = None;
            }
            entries.keys().cloned().collect()
        };
        log::debug!("invalidated {} cache entries", keys.len());
        for key in &keys {
            self.notify(key);
        }
    }
}

/// Keeps one entry observed while alive.
pub struct QueryObserver<V: 'static> {
    cache: Weak<CacheState<V>>,
    key: QueryKey,
}

impl<V: 'static> QueryObserver<V> {
    #[must_use]
    pub const fn key(&self) -> &QueryKey {
        &self.key
    }
}

impl<V: 'static> Drop for QueryObserver<V> {
    fn drop(&mut self) {
        if let Some(shared) = self.cache.upgrade() {
            QueryCache { shared }.release(&self.key);
        }
    }
}

/// Removes its cache listener on drop.
pub struct CacheSubscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Drop for CacheSubscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}
