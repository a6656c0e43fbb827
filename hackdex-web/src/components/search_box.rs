use yew::prelude::*;

use crate::components::event_value;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub id: AttrValue,
    /// Raw box contents, which may run ahead of the applied filter.
    pub value: AttrValue,
    pub placeholder: AttrValue,
    pub on_input: Callback<String>,
}

#[function_component(SearchBox)]
pub fn search_box(p: &Props) -> Html {
    let oninput = {
        let cb = p.on_input.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(value) = event_value(&e) {
                cb.emit(value);
            }
        })
    };
    html! {
        <div class="search-box">
            <label for={p.id.clone()} class="sr-only">{ p.placeholder.clone() }</label>
            <input
                id={p.id.clone()}
                type="search"
                autocomplete="off"
                placeholder={p.placeholder.clone()}
                value={p.value.clone()}
                {oninput}
            />
        </div>
    }
}
