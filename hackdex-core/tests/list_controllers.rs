use futures::executor::LocalPool;
use hackdex_core::constants::GAME_PREFERENCE_KEY;
use hackdex_core::views::encounters::ENCOUNTER_COLLECTION;
use hackdex_core::{
    Clock, DexClient, EmptyKind, EncounterDomain, EncounterFilters, EncountersView, FilterOp,
    GameContext, GameId, ListController, ListView, Location, ManualClock, MemoryLocation,
    MemoryPreferences, MemoryStore, PokedexView, QueryParams, TimeOfDay, TrainersView, ViewStatus,
};
use serde_json::{Value, json};
use std::rc::Rc;

struct Harness {
    pool: LocalPool,
    clock: ManualClock,
    store: MemoryStore,
    prefs: MemoryPreferences,
    location: MemoryLocation,
    client: DexClient,
}

impl Harness {
    fn new(search: &str) -> Self {
        let pool = LocalPool::new();
        let clock = ManualClock::starting_at(10_000);
        let store = fixture_store();
        let prefs = MemoryPreferences::default();
        let location = MemoryLocation::new(search);
        let game = GameContext::resolve(&QueryParams::parse(search), Rc::new(prefs.clone()));
        let client = DexClient::new(
            Rc::new(store.clone()),
            game,
            Rc::new(clock.clone()),
            Rc::new(pool.spawner()),
        );
        Self {
            pool,
            clock,
            store,
            prefs,
            location,
            client,
        }
    }

    fn mount<V: ListView>(&mut self, domain: V::Domain) -> ListController<V> {
        let controller =
            ListController::<V>::mount(self.client.clone(), Rc::new(self.location.clone()), domain);
        self.pool.run_until_stalled();
        controller
    }

    fn load_domain<V: ListView>(&mut self, controller: &mut ListController<V>) {
        if let Some(pending) = controller.load_domain() {
            let domain = self.pool.run_until(pending).unwrap();
            controller.set_domain(domain);
        }
        self.pool.run_until_stalled();
    }

    fn list_requests(&self, collection: &str) -> usize {
        self.store
            .requests()
            .iter()
            .filter(|r| r.collection == collection)
            .count()
    }

    fn url(&self) -> QueryParams {
        QueryParams::parse(&self.location.search())
    }
}

fn pokedex_row(game: &str, id: u32, name: &str, types: &[&str]) -> Value {
    json!({
        "game_id": game,
        "id": id,
        "dex_number": id,
        "name": name,
        "types": types,
        "sort_index": id,
    })
}

fn encounter_row(method: &str, time: &str, pokemon: &str, slot: u32) -> Value {
    json!({
        "game_id": "FRO",
        "route": "R1",
        "method": method,
        "time": time,
        "pokemon_id": slot + 10,
        "pokemon": pokemon,
        "min_level": 2,
        "max_level": 5,
        "rate": 20,
        "slot": slot,
        "sort_index": 1,
    })
}

fn fixture_store() -> MemoryStore {
    let store = MemoryStore::default();
    let mut dex: Vec<Value> = (1..=50)
        .map(|id| pokedex_row("FRO", id, &format!("Sprout {id}"), &["grass"]))
        .collect();
    dex.push(pokedex_row("FRO", 51, "Charmander", &["fire"]));
    dex.push(pokedex_row("ERX", 1, "Treecko", &["grass"]));
    store.insert_rows("pokedex_view", dex);

    store.insert_rows(
        ENCOUNTER_COLLECTION,
        vec![
            encounter_row("Grass", "day", "Rattata", 0),
            encounter_row("Grass", "any", "Pidgey", 1),
            encounter_row("Grass", "night", "Hoothoot", 2),
            encounter_row("Surf", "any", "Tentacool", 3),
        ],
    );
    store.insert_rows(
        "route_encounter_domain_view",
        vec![
            json!({"game_id": "FRO", "route": "R1", "method": "Grass", "time": "day", "sort_index": 1}),
            json!({"game_id": "FRO", "route": "R1", "method": "Grass", "time": "night", "sort_index": 1}),
            json!({"game_id": "FRO", "route": "R1", "method": "Surf", "time": "any", "sort_index": 2}),
            json!({"game_id": "FRO", "route": "R2", "method": "Grass", "time": "any", "sort_index": 1}),
        ],
    );
    store.insert_rows(
        "trainer_view",
        vec![
            json!({"game_id": "FRO", "id": 1, "name": "Youngster Joey", "class": "Youngster", "split": "Brock", "split_order": 1, "types": ["normal"], "team_size": 1, "sort_index": 1}),
            json!({"game_id": "FRO", "id": 2, "name": "Brock", "class": "Leader", "split": "Brock", "split_order": 1, "types": ["rock"], "team_size": 2, "sort_index": 2}),
            json!({"game_id": "FRO", "id": 3, "name": "Misty", "class": "Leader", "split": "Misty", "split_order": 2, "types": ["water"], "team_size": 2, "sort_index": 3}),
        ],
    );
    store.insert_rows(
        "game_split_view",
        vec![
            json!({"game_id": "FRO", "split": "Brock", "split_order": 1}),
            json!({"game_id": "FRO", "split": "Misty", "split_order": 2}),
        ],
    );
    store.insert_rows(
        "pokemon_detail_view",
        vec![json!({"game_id": "FRO", "id": 51, "dex_number": 4, "name": "Charmander", "types": ["fire"]})],
    );
    store
}

#[test]
fn canonical_url_sync_is_idempotent() {
    let mut h = Harness::new("?type=FIRE&page=1&game=FRO");
    let mut dex = h.mount::<PokedexView>(());
    assert_eq!(h.location.search(), "?game=FRO&type=fire");
    assert_eq!(h.location.writes(), 1);

    assert!(dex.set_type("grass"));
    assert_eq!(h.location.writes(), 2);
    assert!(!dex.set_type("grass"));
    assert!(!dex.on_location_change());
    assert_eq!(h.location.writes(), 2);
    assert_eq!(h.url().get("type"), Some("grass"));
    assert_eq!(h.location.history_len(), 1);
}

#[test]
fn game_switch_never_serves_previous_game_rows() {
    let mut h = Harness::new("?game=FRO");
    let mut dex = h.mount::<PokedexView>(());
    assert_eq!(dex.state().status, ViewStatus::Ready);
    assert_eq!(dex.state().rows[0].name, "Sprout 1");

    assert!(h.client.game().set_active_game(GameId::new("ERX").unwrap()));
    let between = dex.state();
    assert_eq!(between.status, ViewStatus::Loading);
    assert!(between.rows.is_empty());

    dex.on_game_change();
    h.pool.run_until_stalled();
    let state = dex.state();
    assert_eq!(state.status, ViewStatus::Ready);
    assert_eq!(state.rows.len(), 1);
    assert_eq!(state.rows[0].name, "Treecko");
    assert_eq!(h.url().get("game"), Some("ERX"));
    assert_eq!(h.prefs.value(GAME_PREFERENCE_KEY).as_deref(), Some("ERX"));
}

#[test]
fn identical_screens_share_one_request() {
    let mut h = Harness::new("?game=FRO&type=fire");
    let first = ListController::<PokedexView>::mount(
        h.client.clone(),
        Rc::new(h.location.clone()),
        (),
    );
    let second = ListController::<PokedexView>::mount(
        h.client.clone(),
        Rc::new(h.location.clone()),
        (),
    );
    assert_eq!(first.state().status, ViewStatus::Loading);
    h.pool.run_until_stalled();
    assert_eq!(h.store.calls(), 1);
    assert_eq!(first.state(), second.state());
    assert_eq!(first.state().rows[0].name, "Charmander");
}

#[test]
fn unknown_method_is_normalized_and_never_sent() {
    let mut h = Harness::new("?game=FRO&route=R1&method=DoesNotExist");
    let mut encounters = h.mount::<EncountersView>(EncounterDomain::default());
    assert_eq!(h.list_requests(ENCOUNTER_COLLECTION), 0);

    h.load_domain(&mut encounters);
    assert_eq!(encounters.filters().method, "all");
    assert_eq!(h.url().get("method"), None);
    let request = h.store.last_request().unwrap();
    assert_eq!(request.collection, ENCOUNTER_COLLECTION);
    assert!(request.filters.iter().all(|f| f.field != "method"));
    assert_eq!(encounters.state().rows.len(), 4);
}

#[test]
fn rapid_typing_issues_one_search_request() {
    let mut h = Harness::new("?game=FRO");
    let mut dex = h.mount::<PokedexView>(());
    let before = h.store.calls();

    let p = dex.input_search("p");
    h.clock.advance(50);
    let pi = dex.input_search("pi");
    h.clock.advance(50);
    let pik = dex.input_search("pik");
    assert_eq!(dex.search_input(), "pik");

    for ticket in [p, pi, pik] {
        h.clock.set(h.clock.now_ms().max(ticket.due_at()));
        dex.settle_search(ticket);
        h.pool.run_until_stalled();
    }
    assert_eq!(h.store.calls(), before + 1);
    let request = h.store.last_request().unwrap();
    assert!(
        request
            .filters
            .iter()
            .any(|f| f.field == "name" && f.op == FilterOp::ILike(String::from("pik")))
    );
    assert_eq!(h.url().get("search"), Some("pik"));
    assert_eq!(dex.state().empty, Some(EmptyKind::NoResults));
}

#[test]
fn lookahead_row_drives_next_button() {
    let mut h = Harness::new("?game=FRO");
    let mut dex = h.mount::<PokedexView>(());
    let first = dex.state();
    assert_eq!(first.rows.len(), 50);
    assert!(first.can_next);
    assert!(!first.can_prev);
    assert_eq!(first.total_count, Some(51));

    assert!(dex.next_page());
    h.pool.run_until_stalled();
    let second = dex.state();
    assert_eq!(second.page, 2);
    assert_eq!(second.rows.len(), 1);
    assert!(!second.can_next);
    assert!(second.can_prev);
    assert!(!dex.next_page());
    assert_eq!(h.url().get("page"), Some("2"));

    assert!(dex.set_type("grass"));
    h.pool.run_until_stalled();
    let exact = dex.state();
    assert_eq!(exact.page, 1);
    assert_eq!(exact.rows.len(), 50);
    assert!(!exact.can_next);
}

#[test]
fn deep_link_hydrates_exactly_and_fetches_once() {
    let search = "?game=FRO&route=R1&method=Grass&time=day&search=rat&page=2";
    let mut h = Harness::new(search);
    let mut encounters = h.mount::<EncountersView>(EncounterDomain::default());
    h.load_domain(&mut encounters);

    assert_eq!(
        *encounters.filters(),
        EncounterFilters {
            route: String::from("R1"),
            method: String::from("Grass"),
            time: TimeOfDay::Day,
            search: String::from("rat"),
            page: 2,
        }
    );
    assert_eq!(h.client.game().active_game().as_str(), "FRO");
    assert_eq!(h.location.writes(), 0);
    assert_eq!(h.list_requests(ENCOUNTER_COLLECTION), 1);

    let request = h.store.last_request().unwrap();
    assert_eq!((request.range_start, request.range_end), (50, 100));
    let ops: Vec<(&str, &FilterOp)> = request
        .filters
        .iter()
        .map(|f| (f.field.as_str(), &f.op))
        .collect();
    assert!(ops.contains(&("game_id", &FilterOp::Eq(String::from("FRO")))));
    assert!(ops.contains(&("route", &FilterOp::Eq(String::from("R1")))));
    assert!(ops.contains(&("method", &FilterOp::Eq(String::from("Grass")))));
    assert!(ops.contains(&(
        "time",
        &FilterOp::In(vec![String::from("day"), String::from("any")])
    )));
    assert!(ops.contains(&("pokemon", &FilterOp::ILike(String::from("rat")))));
}

#[test]
fn route_selection_pushes_history_and_back_restores() {
    let mut h = Harness::new("?game=FRO");
    let mut encounters = h.mount::<EncountersView>(EncounterDomain::default());
    assert_eq!(encounters.state().status, ViewStatus::Idle);

    assert!(encounters.select_route("R1"));
    h.load_domain(&mut encounters);
    assert_eq!(h.location.history_len(), 2);
    assert_eq!(encounters.state().status, ViewStatus::Ready);

    assert!(encounters.toggle_time(TimeOfDay::Night));
    h.pool.run_until_stalled();
    let names: Vec<String> = encounters
        .state()
        .rows
        .into_iter()
        .map(|r| r.pokemon)
        .collect();
    assert_eq!(names, vec!["Pidgey", "Hoothoot", "Tentacool"]);
    assert!(encounters.toggle_time(TimeOfDay::Night));
    assert_eq!(encounters.filters().time, TimeOfDay::All);

    assert!(h.location.back());
    assert!(encounters.on_location_change());
    assert_eq!(*encounters.filters(), EncounterFilters::default());
    assert_eq!(encounters.state().status, ViewStatus::Idle);
}

#[test]
fn failed_read_waits_for_manual_retry() {
    let mut h = Harness::new("?game=FRO");
    h.store.fail_next(1);
    let mut dex = h.mount::<PokedexView>(());
    let failed = dex.state();
    assert_eq!(failed.status, ViewStatus::Error);
    assert!(failed.error.is_some());

    h.clock.advance(60_000);
    h.pool.run_until_stalled();
    assert_eq!(h.store.calls(), 1);

    assert!(dex.retry());
    assert_eq!(dex.state().status, ViewStatus::Loading);
    h.pool.run_until_stalled();
    assert_eq!(dex.state().status, ViewStatus::Ready);
    assert!(!dex.retry());
}

#[test]
fn trainers_wait_for_split_domain() {
    let mut h = Harness::new("?game=FRO&split=Misty");
    let mut trainers = h.mount::<TrainersView>(Default::default());
    assert_eq!(h.list_requests("trainer_view"), 0);
    assert!(trainers.domain_key().is_some());
    h.load_domain(&mut trainers);
    let state = trainers.state();
    assert_eq!(state.rows.len(), 1);
    assert_eq!(state.rows[0].name, "Misty");

    assert!(trainers.set_split("all"));
    h.pool.run_until_stalled();
    assert_eq!(trainers.state().rows.len(), 3);
    assert_eq!(h.url().get("split"), None);
}

#[test]
fn empty_game_reports_no_data() {
    let mut h = Harness::new("?game=UNB");
    let dex = h.mount::<PokedexView>(());
    assert_eq!(dex.domain_key(), None);
    let state = dex.state();
    assert_eq!(state.status, ViewStatus::Ready);
    assert_eq!(state.empty, Some(EmptyKind::NoData));
}

#[test]
fn hover_prefetch_warms_detail_cache() {
    let mut h = Harness::new("?game=FRO&type=fire");
    let dex = h.mount::<PokedexView>(());
    let row = dex.state().rows[0].clone();
    dex.prefetch_detail(&row);
    h.pool.run_until_stalled();
    let calls = h.store.calls();

    let (key, request) = PokedexView::detail_request(&h.client.game().active_game(), &row).unwrap();
    let detail = h.pool.run_until(h.client.ensure(&key, request)).unwrap();
    assert_eq!(detail.rows.len(), 1);
    assert_eq!(h.store.calls(), calls);
}
