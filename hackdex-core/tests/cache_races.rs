use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::future::LocalBoxFuture;
use hackdex_core::constants::GC_TIME_MS;
use hackdex_core::views::detail::pokemon_detail;
use hackdex_core::{
    DexClient, GameContext, GameId, ManualClock, MemoryPreferences, QueryError, QueryKey,
    QueryParams, QueryRequest, QueryResponse, QueryStatus, QueryTransport, ViewId,
};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

type Reply = oneshot::Sender<Result<QueryResponse, QueryError>>;

/// Transport whose responses are released by hand, in any order.
#[derive(Default)]
struct GatedTransport {
    pending: RefCell<Vec<Reply>>,
}

impl GatedTransport {
    fn release(&self, index: usize, label: &str) {
        let reply = self.pending.borrow_mut().remove(index);
        let response = QueryResponse {
            rows: vec![json!({ "label": label })],
            total_count: Some(1),
        };
        let _ = reply.send(Ok(response));
    }

    fn outstanding(&self) -> usize {
        self.pending.borrow().len()
    }
}

impl QueryTransport for GatedTransport {
    fn execute(
        &self,
        _request: &QueryRequest,
    ) -> LocalBoxFuture<'static, Result<QueryResponse, QueryError>> {
        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().push(tx);
        Box::pin(async move {
            rx.await
                .unwrap_or_else(|_| Err(QueryError::Network(String::from("request dropped"))))
        })
    }
}

fn setup(pool: &LocalPool) -> (Rc<GatedTransport>, DexClient) {
    let transport = Rc::new(GatedTransport::default());
    let game = GameContext::resolve(&QueryParams::new(), Rc::new(MemoryPreferences::default()));
    let client = DexClient::new(
        transport.clone(),
        game,
        Rc::new(ManualClock::starting_at(0)),
        Rc::new(pool.spawner()),
    );
    (transport, client)
}

fn label(client: &DexClient, key: &QueryKey) -> Option<String> {
    client
        .cache()
        .snapshot(key)
        .data
        .and_then(|r| r.rows.first().and_then(|row| row["label"].as_str().map(String::from)))
}

#[test]
fn newer_request_wins_when_older_resolves_last() {
    let mut pool = LocalPool::new();
    let (transport, client) = setup(&pool);
    let key = QueryKey::new(ViewId::Pokedex, client.game().active_game());
    let request = QueryRequest::new("pokedex_view");

    client.fetch(&key, request.clone());
    client.refetch(&key, request);
    assert_eq!(transport.outstanding(), 2);

    transport.release(1, "B");
    pool.run_until_stalled();
    assert_eq!(label(&client, &key).as_deref(), Some("B"));

    transport.release(0, "A");
    pool.run_until_stalled();
    assert_eq!(label(&client, &key).as_deref(), Some("B"));
    assert_eq!(client.cache().snapshot(&key).status, QueryStatus::Resolved);
}

#[test]
fn response_landing_after_game_switch_is_discarded() {
    let mut pool = LocalPool::new();
    let (transport, client) = setup(&pool);
    let key = QueryKey::new(ViewId::Encounters, client.game().active_game()).with("route", "R1");

    client.fetch(&key, QueryRequest::new("encounter_view"));
    client.game().set_active_game(GameId::new("ERX").unwrap());
    transport.release(0, "pre-switch");
    pool.run_until_stalled();

    let snapshot = client.cache().snapshot(&key);
    assert!(snapshot.data.is_none());
    assert!(!snapshot.is_fetching);
}

#[test]
fn concurrent_ensures_share_one_request() {
    let mut pool = LocalPool::new();
    let (transport, client) = setup(&pool);
    let key = QueryKey::new(ViewId::TrainerSplits, client.game().active_game());

    let first = client.ensure(&key, QueryRequest::new("game_split_view"));
    let second = client.ensure(&key, QueryRequest::new("game_split_view"));
    assert_eq!(transport.outstanding(), 1);

    transport.release(0, "splits");
    let (a, b) = pool.run_until(futures::future::join(first, second));
    assert!(Rc::ptr_eq(&a.unwrap(), &b.unwrap()));
}

#[test]
fn detail_read_from_previous_game_never_resolves_with_its_record() {
    let mut pool = LocalPool::new();
    let (transport, client) = setup(&pool);
    let (fro_key, fro_request) = pokemon_detail(&client.game().active_game(), 25);
    let fro = client.ensure(&fro_key, fro_request);

    client.game().set_active_game(GameId::new("ERX").unwrap());
    let (erx_key, erx_request) = pokemon_detail(&client.game().active_game(), 25);
    let erx = client.ensure(&erx_key, erx_request);
    assert_eq!(transport.outstanding(), 2);

    transport.release(1, "ERX");
    transport.release(0, "FRO");
    let (fro, erx) = pool.run_until(futures::future::join(fro, erx));

    assert_eq!(fro.unwrap_err(), QueryError::Superseded);
    let erx = erx.unwrap();
    assert_eq!(erx.rows[0]["label"], "ERX");
    assert!(label(&client, &fro_key).is_none());
}

#[test]
fn observed_detail_read_outlives_the_gc_window() {
    let mut pool = LocalPool::new();
    let clock = ManualClock::starting_at(0);
    let transport = Rc::new(GatedTransport::default());
    let game = GameContext::resolve(&QueryParams::new(), Rc::new(MemoryPreferences::default()));
    let client = DexClient::new(
        transport.clone(),
        game,
        Rc::new(clock.clone()),
        Rc::new(pool.spawner()),
    );
    let (key, request) = pokemon_detail(&client.game().active_game(), 6);

    let observer = client.observe(&key);
    let read = client.ensure(&key, request);
    transport.release(0, "charizard");
    assert!(pool.run_until(read).is_ok());

    clock.advance(GC_TIME_MS * 2);
    assert_eq!(client.cache().collect_garbage(), 0);
    assert_eq!(label(&client, &key).as_deref(), Some("charizard"));

    drop(observer);
    clock.advance(GC_TIME_MS);
    assert_eq!(client.cache().collect_garbage(), 1);
    assert_eq!(client.cache().snapshot(&key).status, QueryStatus::Idle);
}
