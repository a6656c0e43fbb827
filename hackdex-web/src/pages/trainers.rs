use hackdex_core::{TrainerRow, TrainersView};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::app::hooks::use_list_controller;
use crate::app::state::use_services;
use crate::components::filters::{SplitSelect, TypeSelect};
use crate::components::pager::Pager;
use crate::components::search_box::SearchBox;
use crate::components::status::StatusPanel;
use crate::pages::type_badges;
use crate::router::Route;

#[derive(Properties, PartialEq, Clone)]
pub struct TableProps {
    pub rows: Vec<TrainerRow>,
    pub on_open: Callback<u32>,
    #[prop_or_default]
    pub on_hover: Callback<TrainerRow>,
}

#[function_component(TrainerTable)]
pub fn trainer_table(p: &TableProps) -> Html {
    if p.rows.is_empty() {
        return Html::default();
    }
    html! {
        <table class="list trainers">
            <thead>
                <tr>
                    <th>{ "Trainer" }</th><th>{ "Class" }</th><th>{ "Split" }</th>
                    <th>{ "Types" }</th><th>{ "Team" }</th>
                </tr>
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
                            <td>{ row.name.clone() }</td>
                            <td>{ row.class.clone() }</td>
                            <td>{ row.split.clone() }</td>
                            <td>{ type_badges(&row.types) }</td>
                            <td>{ row.team_size }</td>
                        </tr>
                    }
                }) }
            </tbody>
        </table>
    }
}

#[function_component(TrainersPage)]
pub fn trainers_page() -> Html {
    let services = use_services();
    let handle = use_list_controller::<TrainersView>(&services);
    let navigator = use_navigator();

    let state = handle.state();
    let filters = handle.filters();
    let domain = handle.domain();
    let on_open = Callback::from(move |id: u32| {
        if let Some(nav) = &navigator {
            nav.push(&Route::TrainerDetail { id });
        }
    });
    let domain_notice = handle.domain_error.as_ref().map(|err| {
        let retry = {
            let cb = handle.retry_domain.clone();
            Callback::from(move |_: MouseEvent| cb.emit(()))
        };
        html! {
            <div class="status error" role="alert">
                <p>{ format!("Could not load splits: {err}") }</p>
                <button id="domain-retry" type="button" onclick={retry}>{ "Try again" }</button>
            </div>
        }
    });

    html! {
        <section class="panel list-page" id="main">
            <h1>{ "Trainers" }</h1>
            <div class="filters">
                <SearchBox
                    id="trainer-search"
                    value={handle.search_input()}
                    placeholder="Search trainers"
                    on_input={handle.on_search()}
                />
                <TypeSelect
                    selected={filters.elemental_type.clone()}
                    on_change={handle.action(|c, t: String| { c.set_type(&t); })}
                />
                <SplitSelect
                    splits={domain.splits.clone()}
                    selected={filters.split.clone()}
                    on_change={handle.action(|c, s: String| { c.set_split(&s); })}
                />
            </div>
            { domain_notice.unwrap_or_default() }
            <StatusPanel
                status={state.status}
                error={state.error.clone()}
                empty={state.empty}
                is_refreshing={state.is_refreshing}
                idle_hint={AttrValue::from("Loading splits…")}
                on_retry={handle.action(|c, ()| { c.retry(); })}
            />
            <TrainerTable rows={state.rows.clone()} {on_open} on_hover={handle.on_hover()} />
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
