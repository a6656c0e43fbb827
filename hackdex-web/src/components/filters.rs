//! Filter controls shared by the list pages.

use hackdex_core::TimeOfDay;
use hackdex_core::constants::{ALL, ELEMENTAL_TYPES};
use yew::prelude::*;

use crate::components::{display_label, event_value};

fn select_callback(cb: &Callback<String>) -> Callback<Event> {
    let cb = cb.clone();
    Callback::from(move |e: Event| {
        if let Some(value) = event_value(&e) {
            cb.emit(value);
        }
    })
}

#[derive(Properties, PartialEq, Clone)]
pub struct TypeSelectProps {
    pub selected: AttrValue,
    pub on_change: Callback<String>,
}

#[function_component(TypeSelect)]
pub fn type_select(p: &TypeSelectProps) -> Html {
    html! {
        <label class="filter type-filter">
            <span>{ "Type" }</span>
            <select id="type-select" onchange={select_callback(&p.on_change)}>
                <option value={ALL} selected={p.selected.as_str() == ALL}>{ "All types" }</option>
                { for ELEMENTAL_TYPES.iter().map(|t| html! {
                    <option value={*t} selected={p.selected.as_str() == *t}>{ display_label(t) }</option>
                }) }
            </select>
        </label>
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct SplitSelectProps {
    pub splits: Vec<String>,
    pub selected: AttrValue,
    pub on_change: Callback<String>,
}

#[function_component(SplitSelect)]
pub fn split_select(p: &SplitSelectProps) -> Html {
    html! {
        <label class="filter split-filter">
            <span>{ "Split" }</span>
            <select id="split-select" onchange={select_callback(&p.on_change)} disabled={p.splits.is_empty()}>
                <option value={ALL} selected={p.selected.as_str() == ALL}>{ "All splits" }</option>
                { for p.splits.iter().map(|s| html! {
                    <option value={s.clone()} selected={p.selected.as_str() == s.as_str()}>{ s.clone() }</option>
                }) }
            </select>
        </label>
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct MethodTabsProps {
    /// Methods present on the route, in display order.
    pub methods: Vec<String>,
    pub selected: AttrValue,
    pub on_select: Callback<String>,
}

#[function_component(MethodTabs)]
pub fn method_tabs(p: &MethodTabsProps) -> Html {
    let tab = |value: &str, label: String| {
        let active = p.selected.as_str() == value;
        let onclick = {
            let cb = p.on_select.clone();
            let value = value.to_string();
            Callback::from(move |_: MouseEvent| cb.emit(value.clone()))
        };
        html! {
            <button
                type="button"
                role="tab"
                class={classes!("tab", active.then_some("active"))}
                aria-selected={if active { "true" } else { "false" }}
                {onclick}
            >
                { label }
            </button>
        }
    };
    html! {
        <div class="method-tabs" role="tablist" aria-label="Encounter method">
            { tab(ALL, String::from("All")) }
            { for p.methods.iter().map(|m| tab(m, display_label(m))) }
        </div>
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct TimeToggleProps {
    pub selected: TimeOfDay,
    /// Times present on the route; absent options are disabled.
    pub available: Vec<TimeOfDay>,
    pub on_toggle: Callback<TimeOfDay>,
}

/// Day/night toggle. Clicking the active option clears it.
#[function_component(TimeToggle)]
pub fn time_toggle(p: &TimeToggleProps) -> Html {
    let options = [TimeOfDay::Day, TimeOfDay::Night].into_iter().map(|time| {
        let pressed = p.selected == time;
        let onclick = {
            let cb = p.on_toggle.clone();
            Callback::from(move |_: MouseEvent| cb.emit(time))
        };
        html! {
            <button
                type="button"
                class={classes!("time-toggle", pressed.then_some("active"))}
                aria-pressed={if pressed { "true" } else { "false" }}
                disabled={!p.available.contains(&time)}
                {onclick}
            >
                { display_label(time.as_str()) }
            </button>
        }
    });
    html! {
        <div class="time-toggles" role="group" aria-label="Time of day">{ for options }</div>
    }
}
