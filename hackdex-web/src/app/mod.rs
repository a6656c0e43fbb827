#[cfg(target_arch = "wasm32")]
use crate::router::Route;
#[cfg(target_arch = "wasm32")]
use yew::prelude::*;
#[cfg(target_arch = "wasm32")]
use yew_router::prelude::*;

pub mod bootstrap;
pub mod hooks;
pub mod state;

pub use state::{Services, use_services};

#[cfg(target_arch = "wasm32")]
#[function_component(App)]
pub fn app() -> Html {
    let router_base = crate::paths::router_base().map(AttrValue::from);
    html! {
        <BrowserRouter basename={router_base}>
            <AppInner />
        </BrowserRouter>
    }
}

#[cfg(target_arch = "wasm32")]
#[function_component(AppInner)]
pub fn app_inner() -> Html {
    let services = use_memo((), |()| Services::browser());
    html! {
        <ContextProvider<Services> context={(*services).clone()}>
            <Shell />
        </ContextProvider<Services>>
    }
}

#[cfg(target_arch = "wasm32")]
#[function_component(Shell)]
fn shell() -> Html {
    use crate::components::footer::Footer;
    use crate::components::header::Header;
    use hackdex_core::GameId;

    let services = use_services();
    let (connectivity, retry_connection) = bootstrap::use_preflight(&services);
    bootstrap::use_cache_gc(&services);
    let game = hooks::use_active_game(&services);
    let navigator = use_navigator();
    let route = use_route::<Route>();

    let on_navigate = Callback::from(move |target: Route| {
        if let Some(nav) = &navigator {
            nav.push(&target);
        }
    });
    let on_game_change = {
        let client = services.client.clone();
        Callback::from(move |raw: String| match GameId::new(&raw) {
            Ok(id) => {
                client.game().set_active_game(id);
            }
            Err(err) => log::warn!("ignoring game selection {raw:?}: {err}"),
        })
    };

    html! {
        <>
            <Header
                current={route}
                active_game={game.as_str().to_string()}
                {connectivity}
                {on_navigate}
                {on_game_change}
                on_retry_connection={retry_connection}
            />
            <main>
                <Switch<Route> render={switch} />
            </main>
            <Footer />
        </>
    }
}

#[cfg(target_arch = "wasm32")]
fn switch(route: Route) -> Html {
    use crate::pages::encounters::EncountersPage;
    use crate::pages::pokedex::PokedexPage;
    use crate::pages::pokemon_detail::PokemonDetailPage;
    use crate::pages::trainer_detail::TrainerDetailPage;
    use crate::pages::trainers::TrainersPage;

    match route {
        Route::Home => html! { <HomeRoute /> },
        Route::Pokedex => html! { <PokedexPage /> },
        Route::PokemonDetail { id } => html! { <PokemonDetailPage {id} /> },
        Route::Encounters => html! { <EncountersPage /> },
        Route::Trainers => html! { <TrainersPage /> },
        Route::TrainerDetail { id } => html! { <TrainerDetailPage {id} /> },
        Route::NotFound => html! { <NotFoundRoute /> },
    }
}

#[cfg(target_arch = "wasm32")]
#[function_component(HomeRoute)]
fn home_route() -> Html {
    let services = use_services();
    let game = hooks::use_active_game(&services);
    let navigator = use_navigator();
    let name = hackdex_core::game::game_info(&game).map_or_else(|| game.to_string(), |g| g.name.to_string());
    let on_navigate = Callback::from(move |target: Route| {
        if let Some(nav) = &navigator {
            nav.push(&target);
        }
    });
    html! { <crate::pages::home::Home game_name={name} {on_navigate} /> }
}

#[cfg(target_arch = "wasm32")]
#[function_component(NotFoundRoute)]
fn not_found_route() -> Html {
    let navigator = use_navigator();
    let on_go_home = Callback::from(move |()| {
        if let Some(nav) = &navigator {
            nav.push(&Route::Home);
        }
    });
    html! { <crate::pages::not_found::NotFound {on_go_home} /> }
}
