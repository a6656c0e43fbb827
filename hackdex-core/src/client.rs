//! Store reads routed through the shared query cache.

use futures::future::LocalBoxFuture;
use std::rc::Rc;

use crate::QueryTransport;
use crate::cache::{CachePolicy, QueryCache, QueryKey, QueryObserver, QuerySnapshot};
use crate::game::GameContext;
use crate::query::{QueryError, QueryRequest, QueryResponse};
use crate::runtime::{Clock, Spawner};

/// Everything a screen needs to read the store: the transport, the response cache
/// and the active game. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct DexClient {
    transport: Rc<dyn QueryTransport>,
    cache: QueryCache<QueryResponse>,
    game: GameContext,
    clock: Rc<dyn Clock>,
}

impl DexClient {
    /// Wire a client together. The cache is attached to `game` so a game switch
    /// invalidates every entry.
    #[must_use]
    pub fn new(
        transport: Rc<dyn QueryTransport>,
        game: GameContext,
        clock: Rc<dyn Clock>,
        spawner: Rc<dyn Spawner>,
    ) -> Self {
        Self::with_policy(transport, game, clock, spawner, CachePolicy::default())
    }

    #[must_use]
    pub fn with_policy(
        transport: Rc<dyn QueryTransport>,
        game: GameContext,
        clock: Rc<dyn Clock>,
        spawner: Rc<dyn Spawner>,
        policy: CachePolicy,
    ) -> Self {
        let cache = QueryCache::new(clock.clone(), spawner, policy);
        game.attach_cache(Rc::new(cache.clone()));
        Self {
            transport,
            cache,
            game,
            clock,
        }
    }

    #[must_use]
    pub const fn game(&self) -> &GameContext {
        &self.game
    }

    #[must_use]
    pub const fn cache(&self) -> &QueryCache<QueryResponse> {
        &self.cache
    }

    #[must_use]
    pub fn clock(&self) -> Rc<dyn Clock> {
        self.clock.clone()
    }

    fn fetcher(
        &self,
        request: QueryRequest,
    ) -> impl FnOnce() -> LocalBoxFuture<'static, Result<QueryResponse, QueryError>> + use<> {
        let transport = self.transport.clone();
        move || transport.execute(&request)
    }

    pub fn fetch(&self, key: &QueryKey, request: QueryRequest) -> QuerySnapshot<QueryResponse> {
        self.cache.fetch(key, self.fetcher(request))
    }

    pub fn prefetch(&self, key: &QueryKey, request: QueryRequest) {
        self.cache.prefetch(key, self.fetcher(request));
    }

    pub fn refetch(&self, key: &QueryKey, request: QueryRequest) -> QuerySnapshot<QueryResponse> {
        self.cache.refetch(key, self.fetcher(request))
    }

    pub fn ensure(
        &self,
        key: &QueryKey,
        request: QueryRequest,
    ) -> LocalBoxFuture<'static, Result<Rc<QueryResponse>, QueryError>> {
        self.cache.ensure(key, self.fetcher(request))
    }

    #[must_use]
    pub fn observe(&self, key: &QueryKey) -> QueryObserver<QueryResponse> {
        self.cache.observe(key)
    }
}
