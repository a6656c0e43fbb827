use hackdex_core::PokemonDetail;
use hackdex_core::views::detail::pokemon_detail;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::app::hooks::{DetailState, use_active_game, use_detail};
use crate::app::state::use_services;
use crate::pages::{detail_notice, type_badges};
use crate::router::Route;

#[derive(Properties, PartialEq, Clone)]
pub struct ViewProps {
    pub detail: PokemonDetail,
    /// A location was chosen; carries the route name.
    pub on_route: Callback<String>,
}

#[function_component(PokemonDetailView)]
pub fn pokemon_detail_view(p: &ViewProps) -> Html {
    let d = &p.detail;
    let stats = [
        ("HP", d.base_stats.hp),
        ("Attack", d.base_stats.attack),
        ("Defense", d.base_stats.defense),
        ("Sp. Atk", d.base_stats.sp_attack),
        ("Sp. Def", d.base_stats.sp_defense),
        ("Speed", d.base_stats.speed),
    ];
    html! {
        <article class="detail pokemon">
            <h1>{ format!("#{:03} {}", d.dex_number, d.name) }</h1>
            { type_badges(&d.types) }
            <section>
                <h2>{ "Abilities" }</h2>
                <ul>{ for d.abilities.iter().map(|a| html! { <li>{ a.clone() }</li> }) }</ul>
            </section>
            <section>
                <h2>{ "Base stats" }</h2>
                <table class="stats">
                    <tbody>
                        { for stats.iter().map(|(label, value)| html! {
                            <tr><th>{ *label }</th><td>{ *value }</td></tr>
                        }) }
                        <tr class="total"><th>{ "Total" }</th><td>{ d.base_stats.total() }</td></tr>
                    </tbody>
                </table>
            </section>
            <section>
                <h2>{ "Where to find" }</h2>
                if d.locations.is_empty() {
                    <p>{ "Not found in the wild." }</p>
                } else {
                    <ul class="locations">
                        { for d.locations.iter().map(|route| {
                            let onclick = {
                                let cb = p.on_route.clone();
                                let route = route.clone();
                                Callback::from(move |_: MouseEvent| cb.emit(route.clone()))
                            };
                            html! { <li><button type="button" class="link" {onclick}>{ route.clone() }</button></li> }
                        }) }
                    </ul>
                }
            </section>
        </article>
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct PageProps {
    pub id: u32,
}

#[function_component(PokemonDetailPage)]
pub fn pokemon_detail_page(p: &PageProps) -> Html {
    let services = use_services();
    let game = use_active_game(&services);
    let (state, retry) = use_detail::<PokemonDetail>(&services, pokemon_detail(&game, p.id));
    let navigator = use_navigator();

    let on_route = Callback::from(move |route: String| {
        if let Some(nav) = &navigator {
            let query = [("route", route.as_str()), ("game", game.as_str())];
            if let Err(err) = nav.push_with_query(&Route::Encounters, &query) {
                log::warn!("navigation to {route} failed: {err}");
            }
        }
    });

    html! {
        <section class="panel detail-page" id="main">
            {
                match &state {
                    DetailState::Ready(detail) => html! {
                        <PokemonDetailView detail={detail.clone()} {on_route} />
                    },
                    other => detail_notice(other, "Pokémon", &retry).unwrap_or_default(),
                }
            }
        </section>
    }
}
