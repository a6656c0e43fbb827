//! Scenario catalog. Each scenario drives the core state machinery through one
//! user-visible behavior against the fixture store and fails with a description of
//! the first violated expectation.

mod cache;
pub mod harness;
mod sync;

use anyhow::{Result, ensure};
use hackdex_core::{EncountersView, PokedexView, TrainersView, ViewStatus};

use harness::Harness;

pub type ScenarioFn = fn(&str) -> Result<()>;

#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub key: &'static str,
    pub description: &'static str,
    pub run: ScenarioFn,
}

const CATALOG: &[Scenario] = &[
    Scenario {
        key: "smoke",
        description: "Every list view loads rows for the fallback game",
        run: smoke,
    },
    Scenario {
        key: "url-sync",
        description: "Non-canonical URLs are rewritten once and then left alone",
        run: sync::url_sync,
    },
    Scenario {
        key: "deep-link",
        description: "A shared link restores every filter with a single list request",
        run: sync::deep_link,
    },
    Scenario {
        key: "debounce",
        description: "Rapid typing issues one search request after the quiet period",
        run: sync::debounce,
    },
    Scenario {
        key: "pagination",
        description: "The lookahead row drives the next button and page params",
        run: sync::pagination,
    },
    Scenario {
        key: "history",
        description: "Route selection adds a history entry that back navigation restores",
        run: sync::history,
    },
    Scenario {
        key: "coalescing",
        description: "Identical screens share one in-flight request",
        run: cache::coalescing,
    },
    Scenario {
        key: "race",
        description: "A newer request wins even when the older response lands last",
        run: cache::race,
    },
    Scenario {
        key: "game-switch",
        description: "Switching games never shows rows from the previous game",
        run: cache::game_switch,
    },
    Scenario {
        key: "retry",
        description: "Failed reads wait for a manual retry and then recover",
        run: cache::retry,
    },
    Scenario {
        key: "preflight",
        description: "The startup probe retries a bounded number of times",
        run: cache::preflight_probe,
    },
];

pub fn catalog() -> &'static [Scenario] {
    CATALOG
}

pub fn get_scenario(key: &str) -> Option<&'static Scenario> {
    CATALOG.iter().find(|s| s.key == key)
}

pub fn list_scenarios() -> impl Iterator<Item = (&'static str, &'static str)> {
    CATALOG.iter().map(|s| (s.key, s.description))
}

fn smoke(fixture: &str) -> Result<()> {
    let mut h = Harness::new(fixture, "")?;
    ensure!(
        h.client.game().active_game().as_str() == "FRO",
        "fallback game should be FRO, got {}",
        h.client.game().active_game()
    );

    let dex = h.mount::<PokedexView>();
    let state = dex.state();
    ensure!(state.status == ViewStatus::Ready, "pokedex status {:?}", state.status);
    ensure!(!state.rows.is_empty(), "pokedex returned no rows");

    let mut trainers = h.mount::<TrainersView>();
    h.load_domain(&mut trainers)?;
    ensure!(trainers.domain().splits == ["Brock", "Misty"], "splits {:?}", trainers.domain().splits);
    ensure!(trainers.state().rows.len() == 3, "expected 3 trainers");

    let mut encounters = h.mount::<EncountersView>();
    ensure!(encounters.state().status == ViewStatus::Idle, "encounters should wait for a route");
    encounters.select_route("Route 1");
    h.load_domain(&mut encounters)?;
    let state = encounters.state();
    ensure!(state.status == ViewStatus::Ready, "encounters status {:?}", state.status);
    ensure!(state.rows.len() == 4, "expected 4 encounters, got {}", state.rows.len());
    Ok(())
}
