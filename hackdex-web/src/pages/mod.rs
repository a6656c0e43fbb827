pub mod encounters;
pub mod home;
pub mod not_found;
pub mod pokedex;
pub mod pokemon_detail;
pub mod trainer_detail;
pub mod trainers;

use yew::prelude::*;

use crate::app::hooks::DetailState;

/// Notice for a detail read that has not produced a record.
pub(crate) fn detail_notice<T>(state: &DetailState<T>, what: &str, on_retry: &Callback<()>) -> Option<Html> {
    match state {
        DetailState::Ready(_) => None,
        DetailState::Loading => Some(html! {
            <p class="status loading" role="status" aria-busy="true">{ "Loading…" }</p>
        }),
        DetailState::Missing => Some(html! {
            <p class="status empty">{ format!("No {what} with this id in the selected game.") }</p>
        }),
        DetailState::Failed(err) => {
            let retry = {
                let cb = on_retry.clone();
                Callback::from(move |_: MouseEvent| cb.emit(()))
            };
            Some(html! {
                <div class="status error" role="alert">
                    <p>{ err.to_string() }</p>
                    <button id="status-retry" type="button" onclick={retry}>{ "Try again" }</button>
                </div>
            })
        }
    }
}

/// Small type chips for a row.
pub(crate) fn type_badges(types: &[String]) -> Html {
    html! {
        <span class="types">
            { for types.iter().map(|t| html! {
                <span class={classes!("type-badge", format!("type-{t}"))}>{ crate::components::display_label(t) }</span>
            }) }
        </span>
    }
}
