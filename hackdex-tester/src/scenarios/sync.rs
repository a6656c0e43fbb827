//! URL synchronization scenarios.

use anyhow::{Result, ensure};
use hackdex_core::views::encounters::ENCOUNTER_COLLECTION;
use hackdex_core::views::pokedex::POKEDEX_COLLECTION;
use hackdex_core::{EncountersView, Location, PokedexView, TimeOfDay};
use serde_json::json;

use super::harness::Harness;

pub fn url_sync(fixture: &str) -> Result<()> {
    let mut h = Harness::new(fixture, "?type=FIRE&page=0&game=FRO&search=%20")?;
    let mut dex = h.mount::<PokedexView>();
    ensure!(
        h.location.search() == "?game=FRO&type=fire",
        "canonical URL was {:?}",
        h.location.search()
    );
    ensure!(h.location.writes() == 1, "expected one rewrite, saw {}", h.location.writes());

    let _second = h.mount::<PokedexView>();
    ensure!(!dex.on_location_change(), "canonical URL should not change filters");
    ensure!(h.location.writes() == 1, "canonical URL was rewritten again");

    h.location.navigate_external("?game=ERX&type=fire");
    ensure!(!dex.on_location_change(), "a foreign game alone should not change filters");
    ensure!(h.client.game().active_game().as_str() == "FRO", "URL edit switched the game");
    ensure!(h.url().get("game") == Some("FRO"), "foreign game param was kept");
    ensure!(h.requests_to(POKEDEX_COLLECTION) == 1, "URL sync caused extra reads");
    Ok(())
}

pub fn deep_link(fixture: &str) -> Result<()> {
    let mut h = Harness::new(
        fixture,
        "?game=FRO&route=Route%201&method=grass&time=day&search=rat",
    )?;
    let mut encounters = h.mount::<EncountersView>();
    ensure!(h.requests_to(ENCOUNTER_COLLECTION) == 0, "list read issued before the route domain");

    h.load_domain(&mut encounters)?;
    let filters = encounters.filters();
    ensure!(filters.route == "Route 1", "route {:?}", filters.route);
    ensure!(filters.method == "grass", "method {:?}", filters.method);
    ensure!(filters.time == TimeOfDay::Day, "time {:?}", filters.time);
    ensure!(filters.search == "rat", "search {:?}", filters.search);
    ensure!(h.location.writes() == 0, "canonical deep link was rewritten");
    ensure!(h.requests_to(ENCOUNTER_COLLECTION) == 1, "expected exactly one list read");

    let rows = encounters.state().rows;
    ensure!(
        rows.len() == 1 && rows[0].pokemon == "Rattata",
        "unexpected rows {:?}",
        rows.iter().map(|r| &r.pokemon).collect::<Vec<_>>()
    );
    Ok(())
}

pub fn debounce(fixture: &str) -> Result<()> {
    let mut h = Harness::new(fixture, "?game=FRO")?;
    let mut dex = h.mount::<PokedexView>();
    let before = h.requests_to(POKEDEX_COLLECTION);

    let mut tickets = Vec::new();
    for term in ["c", "ch", "cha", "char"] {
        tickets.push(dex.input_search(term));
        h.clock.advance(100);
    }
    h.clock.advance(300);
    let applied = tickets
        .into_iter()
        .filter(|ticket| dex.settle_search(*ticket))
        .count();
    h.settle();

    ensure!(applied == 1, "{applied} keystrokes were applied");
    ensure!(
        h.requests_to(POKEDEX_COLLECTION) == before + 1,
        "expected one search read, saw {}",
        h.requests_to(POKEDEX_COLLECTION) - before
    );
    ensure!(h.url().get("search") == Some("char"), "search param {:?}", h.url().get("search"));
    let names: Vec<String> = dex.state().rows.into_iter().map(|r| r.name).collect();
    ensure!(names == ["Charmander", "Charizard"], "rows {names:?}");
    Ok(())
}

pub fn pagination(fixture: &str) -> Result<()> {
    let mut h = Harness::new(fixture, "?game=PAG")?;
    let rows = (1..=60)
        .map(|id| {
            json!({
                "game_id": "PAG", "id": id, "dex_number": id, "name": format!("Mon {id:02}"),
                "types": ["normal"], "sort_index": id,
            })
        })
        .collect();
    h.store.insert_rows(POKEDEX_COLLECTION, rows);

    let mut dex = h.mount::<PokedexView>();
    let first = dex.state();
    ensure!(first.rows.len() == 50, "page 1 showed {} rows", first.rows.len());
    ensure!(first.can_next && !first.can_prev, "page 1 buttons wrong");
    ensure!(first.total_count == Some(60), "total {:?}", first.total_count);

    ensure!(dex.next_page(), "next page refused");
    h.settle();
    let second = dex.state();
    ensure!(second.rows.len() == 10, "page 2 showed {} rows", second.rows.len());
    ensure!(!second.can_next && second.can_prev, "page 2 buttons wrong");
    ensure!(h.url().get("page") == Some("2"), "page param {:?}", h.url().get("page"));
    ensure!(!dex.next_page(), "paged past the end");

    ensure!(dex.prev_page(), "previous page refused");
    h.settle();
    ensure!(h.url().get("page").is_none(), "page 1 should not be in the URL");
    ensure!(
        h.requests_to(POKEDEX_COLLECTION) == 2,
        "revisiting page 1 read the store again"
    );
    Ok(())
}

pub fn history(fixture: &str) -> Result<()> {
    let mut h = Harness::new(fixture, "?game=FRO")?;
    let mut encounters = h.mount::<EncountersView>();

    ensure!(encounters.select_route("Route 1"), "route selection ignored");
    h.load_domain(&mut encounters)?;
    ensure!(encounters.select_route("Viridian Forest"), "second route ignored");
    h.load_domain(&mut encounters)?;
    ensure!(h.location.history_len() == 3, "history has {} entries", h.location.history_len());
    ensure!(encounters.state().rows.len() == 1, "Viridian Forest should list one encounter");

    ensure!(h.location.back(), "no history to go back to");
    ensure!(encounters.on_location_change(), "back navigation ignored");
    h.load_domain(&mut encounters)?;
    ensure!(encounters.filters().route == "Route 1", "route {:?}", encounters.filters().route);
    ensure!(encounters.state().rows.len() == 4, "Route 1 rows not restored");
    ensure!(
        h.requests_to(ENCOUNTER_COLLECTION) == 2,
        "back navigation re-read a cached route"
    );
    Ok(())
}
