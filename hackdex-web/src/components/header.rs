use yew::prelude::*;

use crate::app::bootstrap::Connectivity;
use crate::components::game_picker::GamePicker;
use crate::router::Route;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub current: Option<Route>,
    pub active_game: AttrValue,
    pub connectivity: Connectivity,
    pub on_navigate: Callback<Route>,
    pub on_game_change: Callback<String>,
    pub on_retry_connection: Callback<()>,
}

#[function_component(Header)]
pub fn header(p: &Props) -> Html {
    let nav = Route::nav_items().into_iter().filter_map(|item| {
        let label = item.nav_label()?;
        let active = p.current.as_ref().is_some_and(|c| c.is_within(&item));
        let onclick = {
            let cb = p.on_navigate.clone();
            let target = item.clone();
            Callback::from(move |_: MouseEvent| cb.emit(target.clone()))
        };
        Some(html! {
            <button
                type="button"
                class={classes!("nav-link", active.then_some("active"))}
                aria-current={active.then_some("page")}
                {onclick}
            >
                { label }
            </button>
        })
    });
    let home = {
        let cb = p.on_navigate.clone();
        Callback::from(move |_: MouseEvent| cb.emit(Route::Home))
    };
    let banner = match &p.connectivity {
        Connectivity::Online => Html::default(),
        Connectivity::Checking => html! {
            <div class="connection checking" role="status">{ "Connecting to the data store…" }</div>
        },
        Connectivity::Offline(message) => {
            let retry = {
                let cb = p.on_retry_connection.clone();
                Callback::from(move |_: MouseEvent| cb.emit(()))
            };
            html! {
                <div class="connection offline" role="alert">
                    <span>{ format!("Data store unreachable: {message}") }</span>
                    <button id="connection-retry" type="button" onclick={retry}>{ "Retry" }</button>
                </div>
            }
        }
    };
    html! {
        <header role="banner">
            <a href="#main" class="sr-only">{ "Skip to content" }</a>
            <div class="header-content">
                <button type="button" class="brand" onclick={home}>{ "Hackdex" }</button>
                <nav aria-label="Sections" class="header-nav">{ for nav }</nav>
                <div class="header-right">
                    <GamePicker active={p.active_game.clone()} on_change={p.on_game_change.clone()} />
                </div>
            </div>
            { banner }
        </header>
    }
}
