pub mod filters;
pub mod footer;
pub mod game_picker;
pub mod header;
pub mod pager;
pub mod search_box;
pub mod status;

/// Value of the `<select>` or `<input>` an event fired on.
#[must_use]
pub fn event_value(event: &web_sys::Event) -> Option<String> {
    use wasm_bindgen::JsCast;
    let target = event.target()?;
    if let Some(select) = target.dyn_ref::<web_sys::HtmlSelectElement>() {
        return Some(select.value());
    }
    target
        .dyn_ref::<web_sys::HtmlInputElement>()
        .map(web_sys::HtmlInputElement::value)
}

/// Title-case a store value for display (`"old-rod"` becomes `"Old Rod"`).
#[must_use]
pub fn display_label(raw: &str) -> String {
    raw.split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
