use hackdex_core::TrainerDetail;
use hackdex_core::views::detail::trainer_detail;
use yew::prelude::*;

use crate::app::hooks::{DetailState, use_active_game, use_detail};
use crate::app::state::use_services;
use crate::pages::detail_notice;

#[derive(Properties, PartialEq, Clone)]
pub struct ViewProps {
    pub detail: TrainerDetail,
}

#[function_component(TrainerDetailView)]
pub fn trainer_detail_view(p: &ViewProps) -> Html {
    let d = &p.detail;
    html! {
        <article class="detail trainer">
            <h1>{ format!("{} {}", d.class, d.name) }</h1>
            <p class="split">{ format!("Split: {}", d.split) }</p>
            <ol class="team">
                { for d.team.iter().map(|member| html! {
                    <li class="team-member">
                        <h2>{ format!("{} Lv. {}", member.species, member.level) }</h2>
                        if let Some(ability) = &member.ability {
                            <p class="ability">{ format!("Ability: {ability}") }</p>
                        }
                        if let Some(item) = &member.item {
                            <p class="item">{ format!("Item: {item}") }</p>
                        }
                        <ul class="moves">{ for member.moves.iter().map(|m| html! { <li>{ m.clone() }</li> }) }</ul>
                    </li>
                }) }
            </ol>
        </article>
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct PageProps {
    pub id: u32,
}

#[function_component(TrainerDetailPage)]
pub fn trainer_detail_page(p: &PageProps) -> Html {
    let services = use_services();
    let game = use_active_game(&services);
    let (state, retry) = use_detail::<TrainerDetail>(&services, trainer_detail(&game, p.id));

    html! {
        <section class="panel detail-page" id="main">
            {
                match &state {
                    DetailState::Ready(detail) => html! { <TrainerDetailView detail={detail.clone()} /> },
                    other => detail_notice(other, "trainer", &retry).unwrap_or_default(),
                }
            }
        </section>
    }
}
