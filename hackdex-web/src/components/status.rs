use hackdex_core::{EmptyKind, QueryError, ViewStatus};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub status: ViewStatus,
    #[prop_or_default]
    pub error: Option<QueryError>,
    #[prop_or_default]
    pub empty: Option<EmptyKind>,
    #[prop_or_default]
    pub is_refreshing: bool,
    /// Shown while the view waits for a required choice.
    #[prop_or_default]
    pub idle_hint: Option<AttrValue>,
    pub on_retry: Callback<()>,
}

/// Loading, error and empty notices for a list. Renders nothing for a populated,
/// settled list.
#[function_component(StatusPanel)]
pub fn status_panel(p: &Props) -> Html {
    match p.status {
        ViewStatus::Idle => p.idle_hint.as_ref().map_or_else(Html::default, |hint| {
            html! { <p class="status idle">{ hint.clone() }</p> }
        }),
        ViewStatus::Loading => html! {
            <p class="status loading" role="status" aria-busy="true">{ "Loading…" }</p>
        },
        ViewStatus::Error => {
            let retry = {
                let cb = p.on_retry.clone();
                Callback::from(move |_: MouseEvent| cb.emit(()))
            };
            let message = p
                .error
                .as_ref()
                .map_or_else(|| String::from("Something went wrong."), ToString::to_string);
            html! {
                <div class="status error" role="alert">
                    <p>{ message }</p>
                    <button id="status-retry" type="button" onclick={retry}>{ "Try again" }</button>
                </div>
            }
        }
        ViewStatus::Ready => {
            let empty = match p.empty {
                Some(EmptyKind::NoResults) => html! {
                    <p class="status empty no-results">{ "No results match these filters." }</p>
                },
                Some(EmptyKind::NoData) => html! {
                    <p class="status empty no-data">{ "This game has no data for this view yet." }</p>
                },
                None => Html::default(),
            };
            html! {
                <>
                    if p.is_refreshing {
                        <p class="status refreshing" role="status">{ "Refreshing…" }</p>
                    }
                    { empty }
                </>
            }
        }
    }
}
