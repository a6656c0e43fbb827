use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub page: u32,
    pub can_prev: bool,
    pub can_next: bool,
    #[prop_or_default]
    pub total_count: Option<u64>,
    pub on_prev: Callback<()>,
    pub on_next: Callback<()>,
    /// Pointer entered the next button; used to warm the next page.
    #[prop_or_default]
    pub on_hover_next: Callback<()>,
}

#[function_component(Pager)]
pub fn pager(p: &Props) -> Html {
    let prev = {
        let cb = p.on_prev.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    let next = {
        let cb = p.on_next.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    let hover = {
        let cb = p.on_hover_next.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    let summary = p.total_count.map_or_else(
        || format!("Page {}", p.page),
        |total| format!("Page {} · {total} total", p.page),
    );
    html! {
        <nav class="pager" aria-label="Pagination">
            <button id="page-prev" type="button" disabled={!p.can_prev} onclick={prev}>{ "Previous" }</button>
            <span class="pager-summary" aria-live="polite">{ summary }</span>
            <button id="page-next" type="button" disabled={!p.can_next} onclick={next} onmouseenter={hover}>
                { "Next" }
            </button>
        </nav>
    }
}
