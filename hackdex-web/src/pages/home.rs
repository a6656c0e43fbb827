use yew::prelude::*;

use crate::router::Route;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    /// Display name of the active game.
    pub game_name: AttrValue,
    pub on_navigate: Callback<Route>,
}

#[function_component(Home)]
pub fn home(p: &Props) -> Html {
    let card = |route: Route, blurb: &'static str| {
        let label = route.nav_label().unwrap_or_default();
        let onclick = {
            let cb = p.on_navigate.clone();
            Callback::from(move |_: MouseEvent| cb.emit(route.clone()))
        };
        html! {
            <button type="button" class="home-card" {onclick}>
                <h2>{ label }</h2>
                <p>{ blurb }</p>
            </button>
        }
    };
    html! {
        <section class="panel home">
            <h1>{ "Hackdex" }</h1>
            <p class="home-game">{ format!("Browsing {}", p.game_name) }</p>
            <div class="home-cards">
                { card(Route::Pokedex, "Every species in the game, with types and stats.") }
                { card(Route::Encounters, "Wild Pokémon by route, method and time of day.") }
                { card(Route::Trainers, "Trainer rosters, grouped by progression split.") }
            </div>
        </section>
    }
}
