//! Query cache scenarios: coalescing, ordering, game isolation and retries.

use anyhow::{Context, Result, ensure};
use futures::executor::block_on;
use hackdex_core::constants::GAME_PREFERENCE_KEY;
use hackdex_core::runtime::InstantSleeper;
use hackdex_core::views::pokedex::POKEDEX_COLLECTION;
use hackdex_core::{
    GameId, ListController, MemoryStore, PokedexView, PreflightOutcome, PreflightPolicy,
    QueryError, ViewStatus, preflight,
};
use std::rc::Rc;

use super::harness::{GatedStore, Harness};

fn gated(fixture: &str, search: &str) -> Result<(GatedStore, Harness)> {
    let store = MemoryStore::from_json(fixture).context("fixture is not a store document")?;
    let gate = GatedStore::new(store.clone());
    let harness = Harness::with_transport(store, Rc::new(gate.clone()), search);
    Ok((gate, harness))
}

fn game(id: &str) -> Result<GameId> {
    GameId::new(id).context("game id")
}

pub fn coalescing(fixture: &str) -> Result<()> {
    let mut h = Harness::new(fixture, "?game=FRO&type=fire")?;
    let location = Rc::new(h.location.clone());
    let first = ListController::<PokedexView>::mount(h.client.clone(), location.clone(), ());
    let second = ListController::<PokedexView>::mount(h.client.clone(), location, ());
    ensure!(first.state().status == ViewStatus::Loading, "first screen not loading");
    h.settle();

    ensure!(h.requests_to(POKEDEX_COLLECTION) == 1, "identical screens issued separate reads");
    ensure!(first.state().rows == second.state().rows, "screens disagree on rows");
    ensure!(first.state().rows.len() == 2, "expected the two fire species");

    let _third = h.mount::<PokedexView>();
    ensure!(h.requests_to(POKEDEX_COLLECTION) == 1, "fresh entry was read again");
    Ok(())
}

pub fn race(fixture: &str) -> Result<()> {
    let (gate, mut h) = gated(fixture, "?game=FRO")?;
    let mut dex = h.mount::<PokedexView>();
    ensure!(dex.set_type("fire"), "type change ignored");
    ensure!(gate.outstanding() == 2, "expected two reads in flight");
    ensure!(dex.state().status == ViewStatus::Loading, "should be loading");

    gate.release(1)?;
    h.settle();
    let newer: Vec<String> = dex.state().rows.into_iter().map(|r| r.name).collect();
    ensure!(newer == ["Charmander", "Charizard"], "newer response not shown: {newer:?}");

    gate.release(0)?;
    h.settle();
    let after: Vec<String> = dex.state().rows.into_iter().map(|r| r.name).collect();
    ensure!(after == newer, "older response overwrote the newer one: {after:?}");
    Ok(())
}

pub fn game_switch(fixture: &str) -> Result<()> {
    let (gate, mut h) = gated(fixture, "?game=FRO")?;
    let mut dex = h.mount::<PokedexView>();
    gate.release(0)?;
    h.settle();
    let fro: Vec<String> = dex.state().rows.into_iter().map(|r| r.name).collect();
    ensure!(fro.len() == 9, "FRO should list 9 species, got {}", fro.len());

    h.client.game().set_active_game(game("ERX")?);
    let between = dex.state();
    ensure!(between.rows.is_empty(), "previous game's rows shown after switch");
    dex.on_game_change();
    gate.release(0)?;
    h.settle();
    let erx: Vec<String> = dex.state().rows.into_iter().map(|r| r.name).collect();
    ensure!(erx == ["Treecko", "Torchic"], "ERX rows {erx:?}");
    ensure!(h.url().get("game") == Some("ERX"), "game param not updated");

    // A read still in flight when the game changes must never land.
    ensure!(dex.set_type("fire"), "type change ignored");
    h.client.game().set_active_game(game("FRO")?);
    gate.release(0)?;
    h.settle();
    ensure!(dex.state().rows.is_empty(), "stale ERX response was shown");

    dex.on_game_change();
    gate.release(0)?;
    h.settle();
    let back: Vec<String> = dex.state().rows.into_iter().map(|r| r.name).collect();
    ensure!(
        back.iter().all(|name| fro.contains(name)) && !back.is_empty(),
        "rows after switching back {back:?}"
    );
    ensure!(
        h.prefs.value(GAME_PREFERENCE_KEY).as_deref() == Some("FRO"),
        "preference not saved"
    );
    Ok(())
}

pub fn retry(fixture: &str) -> Result<()> {
    let mut h = Harness::new(fixture, "?game=FRO")?;
    h.store.fail_next(1);
    let mut dex = h.mount::<PokedexView>();
    let failed = dex.state();
    ensure!(failed.status == ViewStatus::Error, "status {:?}", failed.status);
    ensure!(
        matches!(failed.error, Some(QueryError::Network(_))),
        "error {:?}",
        failed.error
    );

    h.clock.advance(60_000);
    h.settle();
    ensure!(h.requests_to(POKEDEX_COLLECTION) == 1, "failed read retried on its own");

    ensure!(dex.retry(), "retry refused");
    h.settle();
    ensure!(dex.state().status == ViewStatus::Ready, "retry did not recover");
    ensure!(!dex.retry(), "retry accepted while ready");
    Ok(())
}

pub fn preflight_probe(fixture: &str) -> Result<()> {
    let store = MemoryStore::from_json(fixture).context("fixture is not a store document")?;
    let sleeper = InstantSleeper::default();

    store.fail_next(2);
    let outcome = block_on(preflight(&store, &sleeper, PreflightPolicy::default()));
    ensure!(outcome == PreflightOutcome::Connected { attempts: 3 }, "outcome {outcome:?}");
    ensure!(sleeper.slept_ms() == 2_000, "waited {}ms", sleeper.slept_ms());

    store.fail_next(5);
    let outcome = block_on(preflight(&store, &sleeper, PreflightPolicy::default()));
    ensure!(!outcome.is_connected(), "probe should give up after 3 attempts");
    ensure!(store.calls() == 6, "expected 6 probe calls, saw {}", store.calls());
    Ok(())
}
