use hackdex_core::{PokedexRow, PokedexView};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::app::hooks::use_list_controller;
use crate::app::state::use_services;
use crate::components::filters::TypeSelect;
use crate::components::pager::Pager;
use crate::components::search_box::SearchBox;
use crate::components::status::StatusPanel;
use crate::pages::type_badges;
use crate::router::Route;

#[derive(Properties, PartialEq, Clone)]
pub struct TableProps {
    pub rows: Vec<PokedexRow>,
    pub on_open: Callback<u32>,
    #[prop_or_default]
    pub on_hover: Callback<PokedexRow>,
}

#[function_component(PokedexTable)]
pub fn pokedex_table(p: &TableProps) -> Html {
    if p.rows.is_empty() {
        return Html::default();
    }
    html! {
        <table class="list pokedex">
            <thead>
                <tr><th>{ "#" }</th><th>{ "Name" }</th><th>{ "Types" }</th></tr>
            </thead>
            <tbody>
                { for p.rows.iter().map(|row| {
                    let onclick = {
                        let cb = p.on_open.clone();
                        let id = row.id;
                        Callback::from(move |_: MouseEvent| cb.emit(id))
                    };
                    let onmouseenter = {
                        let cb = p.on_hover.clone();
                        let row = row.clone();
                        Callback::from(move |_: MouseEvent| cb.emit(row.clone()))
                    };
                    html! {
                        <tr key={row.id} class="row-link" {onclick} {onmouseenter}>
                            <td class="dex-number">{ format!("{:03}", row.dex_number) }</td>
                            <td>{ row.name.clone() }</td>
                            <td>{ type_badges(&row.types) }</td>
                        </tr>
                    }
                }) }
            </tbody>
        </table>
    }
}

#[function_component(PokedexPage)]
pub fn pokedex_page() -> Html {
    let services = use_services();
    let handle = use_list_controller::<PokedexView>(&services);
    let navigator = use_navigator();

    let state = handle.state();
    let filters = handle.filters();
    let on_open = Callback::from(move |id: u32| {
        if let Some(nav) = &navigator {
            nav.push(&Route::PokemonDetail { id });
        }
    });

    html! {
        <section class="panel list-page" id="main">
            <h1>{ "Pokédex" }</h1>
            <div class="filters">
                <SearchBox
                    id="pokedex-search"
                    value={handle.search_input()}
                    placeholder="Search species"
                    on_input={handle.on_search()}
                />
                <TypeSelect
                    selected={filters.elemental_type.clone()}
                    on_change={handle.action(|c, t: String| { c.set_type(&t); })}
                />
            </div>
            <StatusPanel
                status={state.status}
                error={state.error.clone()}
                empty={state.empty}
                is_refreshing={state.is_refreshing}
                on_retry={handle.action(|c, ()| { c.retry(); })}
            />
            <PokedexTable rows={state.rows.clone()} {on_open} on_hover={handle.on_hover()} />
            <Pager
                page={state.page}
                can_prev={state.can_prev}
                can_next={state.can_next}
                total_count={state.total_count}
                on_prev={handle.action(|c, ()| { c.prev_page(); })}
                on_next={handle.action(|c, ()| { c.next_page(); })}
                on_hover_next={handle.on_hover_next()}
            />
        </section>
    }
}
