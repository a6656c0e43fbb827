use hackdex_core::KNOWN_GAMES;
use yew::prelude::*;

use crate::components::event_value;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    /// Active game id.
    pub active: AttrValue,
    pub on_change: Callback<String>,
}

/// Select listing the known games. An active id outside the list is still shown
/// so the control never misreports the current game.
#[function_component(GamePicker)]
pub fn game_picker(p: &Props) -> Html {
    let on_change = {
        let cb = p.on_change.clone();
        Callback::from(move |e: Event| {
            if let Some(value) = event_value(&e) {
                cb.emit(value);
            }
        })
    };
    let known = KNOWN_GAMES.iter().any(|g| g.id == p.active.as_str());
    html! {
        <>
            <label for="game-select" class="sr-only">{ "Game" }</label>
            <select id="game-select" onchange={on_change} aria-label="Game">
                { for KNOWN_GAMES.iter().map(|g| html! {
                    <option value={g.id} selected={g.id == p.active.as_str()}>{ g.name }</option>
                }) }
                if !known {
                    <option value={p.active.clone()} selected=true>{ p.active.clone() }</option>
                }
            </select>
        </>
    }
}
