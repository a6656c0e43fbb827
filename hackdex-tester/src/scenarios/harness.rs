use anyhow::{Context, Result};
use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::future::LocalBoxFuture;
use hackdex_core::{
    DexClient, GameContext, ListController, ListView, Location, ManualClock, MemoryLocation,
    MemoryPreferences, MemoryStore, QueryError, QueryParams, QueryRequest, QueryResponse,
    QueryTransport,
};
use std::cell::RefCell;
use std::rc::Rc;

/// One simulated browser tab: an address bar, a saved preference, a clock and a
/// single-threaded executor around a client.
pub struct Harness {
    pub pool: LocalPool,
    pub clock: ManualClock,
    pub store: MemoryStore,
    pub location: MemoryLocation,
    pub prefs: MemoryPreferences,
    pub client: DexClient,
}

impl Harness {
    pub fn new(fixture: &str, search: &str) -> Result<Self> {
        let store = MemoryStore::from_json(fixture).context("fixture is not a store document")?;
        Ok(Self::with_transport(store.clone(), Rc::new(store), search))
    }

    pub fn with_transport(store: MemoryStore, transport: Rc<dyn QueryTransport>, search: &str) -> Self {
        let pool = LocalPool::new();
        let clock = ManualClock::starting_at(1_000_000);
        let prefs = MemoryPreferences::default();
        let location = MemoryLocation::new(search);
        let game = GameContext::resolve(&QueryParams::parse(search), Rc::new(prefs.clone()));
        let client = DexClient::new(transport, game, Rc::new(clock.clone()), Rc::new(pool.spawner()));
        Self {
            pool,
            clock,
            store,
            location,
            prefs,
            client,
        }
    }

    pub fn mount<V: ListView>(&mut self) -> ListController<V> {
        let controller = ListController::<V>::mount(
            self.client.clone(),
            Rc::new(self.location.clone()),
            V::Domain::default(),
        );
        self.settle();
        controller
    }

    /// Load and install the controller's domain, if it has one.
    pub fn load_domain<V: ListView>(&mut self, controller: &mut ListController<V>) -> Result<()> {
        if let Some(pending) = controller.load_domain() {
            let domain = self.pool.run_until(pending)?;
            controller.set_domain(domain);
        }
        self.settle();
        Ok(())
    }

    pub fn settle(&mut self) {
        self.pool.run_until_stalled();
    }

    pub fn url(&self) -> QueryParams {
        QueryParams::parse(&self.location.search())
    }

    pub fn requests_to(&self, collection: &str) -> usize {
        self.store
            .requests()
            .iter()
            .filter(|r| r.collection == collection)
            .count()
    }
}

type Pending = (QueryRequest, oneshot::Sender<Result<QueryResponse, QueryError>>);

/// Transport that holds every request until released, so responses can be
/// delivered out of order.
#[derive(Clone, Default)]
pub struct GatedStore {
    inner: MemoryStore,
    pending: Rc<RefCell<Vec<Pending>>>,
}

impl GatedStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            pending: Rc::default(),
        }
    }

    pub fn outstanding(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Answer the `index`-th outstanding request from the backing store.
    pub fn release(&self, index: usize) -> Result<()> {
        let (request, reply) = {
            let mut pending = self.pending.borrow_mut();
            anyhow::ensure!(index < pending.len(), "no outstanding request #{index}");
            pending.remove(index)
        };
        let _ = reply.send(self.inner.answer(&request));
        Ok(())
    }
}

impl QueryTransport for GatedStore {
    fn execute(&self, request: &QueryRequest) -> LocalBoxFuture<'static, Result<QueryResponse, QueryError>> {
        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().push((request.clone(), tx));
        Box::pin(async move {
            rx.await
                .unwrap_or_else(|_| Err(QueryError::Network(String::from("request abandoned"))))
        })
    }
}
