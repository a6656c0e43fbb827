#![cfg(target_arch = "wasm32")]

use hackdex_core::constants::GAME_PREFERENCE_KEY;
use hackdex_core::{Location, PreferenceStore};
use wasm_bindgen_test::*;

use hackdex_web::platform::{BrowserLocation, LocalPreferences};

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn local_preferences_round_trip() {
    let prefs = LocalPreferences;
    prefs.save(GAME_PREFERENCE_KEY, "ERX").expect("save preference");
    assert_eq!(
        prefs.load(GAME_PREFERENCE_KEY).expect("load preference").as_deref(),
        Some("ERX")
    );
}

#[wasm_bindgen_test]
fn replace_search_keeps_path_and_history_length() {
    let location = BrowserLocation;
    let history = hackdex_web::dom::history().expect("history");
    let before = history.length().expect("history length");

    location.replace_search("?game=FRO&type=fire");
    assert_eq!(location.search(), "?game=FRO&type=fire");
    assert_eq!(history.length().expect("history length"), before);

    location.push_search("?game=FRO&type=water");
    assert_eq!(location.search(), "?game=FRO&type=water");
    assert_eq!(history.length().expect("history length"), before + 1);
}
