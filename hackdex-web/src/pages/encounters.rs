use hackdex_core::{EncounterRow, EncountersView, TimeOfDay};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::app::hooks::use_list_controller;
use crate::app::state::use_services;
use crate::components::display_label;
use crate::components::filters::{MethodTabs, TimeToggle};
use crate::components::pager::Pager;
use crate::components::search_box::SearchBox;
use crate::components::status::StatusPanel;
use crate::router::Route;

#[derive(Properties, PartialEq, Clone)]
pub struct RouteFormProps {
    /// Route currently shown.
    pub route: AttrValue,
    pub on_select: Callback<String>,
}

/// Free-text route chooser. Submitting selects the route as a navigation step.
#[function_component(RouteForm)]
pub fn route_form(p: &RouteFormProps) -> Html {
    let draft = use_state(|| p.route.to_string());
    {
        let draft = draft.clone();
        use_effect_with(p.route.clone(), move |route| {
            draft.set(route.to_string());
            || ()
        });
    }
    let oninput = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(value) = crate::components::event_value(&e) {
                draft.set(value);
            }
        })
    };
    let onsubmit = {
        let draft = draft.clone();
        let cb = p.on_select.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            cb.emit((*draft).trim().to_string());
        })
    };
    html! {
        <form class="route-form" {onsubmit}>
            <label for="route-input">{ "Route" }</label>
            <input id="route-input" type="text" placeholder="e.g. Route 1" value={(*draft).clone()} {oninput} />
            <button type="submit">{ "Show" }</button>
        </form>
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct TableProps {
    pub rows: Vec<EncounterRow>,
    pub on_open: Callback<u32>,
    #[prop_or_default]
    pub on_hover: Callback<EncounterRow>,
}

#[function_component(EncounterTable)]
pub fn encounter_table(p: &TableProps) -> Html {
    if p.rows.is_empty() {
        return Html::default();
    }
    html! {
        <table class="list encounters">
            <thead>
                <tr>
                    <th>{ "Pokémon" }</th><th>{ "Method" }</th><th>{ "Time" }</th>
                    <th>{ "Levels" }</th><th>{ "Rate" }</th>
                </tr>
            </thead>
            <tbody>
                { for p.rows.iter().map(|row| {
                    let onclick = {
                        let cb = p.on_open.clone();
                        let id = row.pokemon_id;
                        Callback::from(move |_: MouseEvent| cb.emit(id))
                    };
                    let onmouseenter = {
                        let cb = p.on_hover.clone();
                        let row = row.clone();
                        Callback::from(move |_: MouseEvent| cb.emit(row.clone()))
                    };
                    html! {
                        <tr class="row-link" {onclick} {onmouseenter}>
                            <td>{ row.pokemon.clone() }</td>
                            <td>{ display_label(&row.method) }</td>
                            <td>{ display_label(&row.time) }</td>
                            <td>{ row.level_range() }</td>
                            <td>{ format!("{}%", row.rate) }</td>
                        </tr>
                    }
                }) }
            </tbody>
        </table>
    }
}

#[function_component(EncountersPage)]
pub fn encounters_page() -> Html {
    let services = use_services();
    let handle = use_list_controller::<EncountersView>(&services);
    let navigator = use_navigator();

    let state = handle.state();
    let filters = handle.filters();
    let domain = handle.domain();
    let on_open = Callback::from(move |id: u32| {
        if let Some(nav) = &navigator {
            nav.push(&Route::PokemonDetail { id });
        }
    });
    let route_ready = !filters.route.is_empty() && domain.describes(&filters.route);
    let idle_hint = if filters.route.is_empty() {
        "Choose a route to see its encounters."
    } else {
        "Loading route…"
    };

    let domain_notice = handle.domain_error.as_ref().map(|err| {
        let retry = {
            let cb = handle.retry_domain.clone();
            Callback::from(move |_: MouseEvent| cb.emit(()))
        };
        html! {
            <div class="status error" role="alert">
                <p>{ format!("Could not load this route: {err}") }</p>
                <button id="domain-retry" type="button" onclick={retry}>{ "Try again" }</button>
            </div>
        }
    });

    html! {
        <section class="panel list-page" id="main">
            <h1>{ "Encounters" }</h1>
            <RouteForm
                route={filters.route.clone()}
                on_select={handle.action(|c, route: String| { c.select_route(&route); })}
            />
            { domain_notice.unwrap_or_default() }
            if route_ready {
                <div class="filters">
                    <MethodTabs
                        methods={domain.methods.clone()}
                        selected={filters.method.clone()}
                        on_select={handle.action(|c, m: String| { c.set_method(&m); })}
                    />
                    <TimeToggle
                        selected={filters.time}
                        available={domain.times.clone()}
                        on_toggle={handle.action(|c, t: TimeOfDay| { c.toggle_time(t); })}
                    />
                    <SearchBox
                        id="encounter-search"
                        value={handle.search_input()}
                        placeholder="Search Pokémon on this route"
                        on_input={handle.on_search()}
                    />
                </div>
            }
            <StatusPanel
                status={state.status}
                error={state.error.clone()}
                empty={state.empty}
                is_refreshing={state.is_refreshing}
                idle_hint={AttrValue::from(idle_hint)}
                on_retry={handle.action(|c, ()| { c.retry(); })}
            />
            <EncounterTable rows={state.rows.clone()} {on_open} on_hover={handle.on_hover()} />
            if route_ready {
                <Pager
                    page={state.page}
                    can_prev={state.can_prev}
                    can_next={state.can_next}
                    total_count={state.total_count}
                    on_prev={handle.action(|c, ()| { c.prev_page(); })}
                    on_next={handle.action(|c, ()| { c.next_page(); })}
                    on_hover_next={handle.on_hover_next()}
                />
            }
        </section>
    }
}
