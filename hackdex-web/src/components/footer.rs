use yew::prelude::*;

#[function_component(Footer)]
pub fn footer() -> Html {
    html! {
        <footer>{ "Hackdex · fan-made data browser for Pokémon ROM hacks" }</footer>
    }
}
