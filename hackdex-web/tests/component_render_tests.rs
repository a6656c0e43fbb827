use futures::executor::block_on;
use hackdex_core::views::detail::{BaseStats, TeamMember};
use hackdex_core::{
    EmptyKind, EncounterRow, PokedexRow, PokemonDetail, QueryError, TimeOfDay, TrainerDetail,
    ViewStatus,
};
use hackdex_web::app::bootstrap::Connectivity;
use hackdex_web::components::filters::{MethodTabs, SplitSelect, TimeToggle, TypeSelect};
use hackdex_web::components::footer::Footer;
use hackdex_web::components::game_picker::GamePicker;
use hackdex_web::components::header::Header;
use hackdex_web::components::pager::Pager;
use hackdex_web::components::status::StatusPanel;
use hackdex_web::pages::encounters::EncounterTable;
use hackdex_web::pages::not_found::NotFound;
use hackdex_web::pages::pokedex::PokedexTable;
use hackdex_web::pages::pokemon_detail::PokemonDetailView;
use hackdex_web::pages::trainer_detail::TrainerDetailView;
use hackdex_web::router::Route;
use yew::{AttrValue, Callback, LocalServerRenderer};

fn header_props(connectivity: Connectivity) -> hackdex_web::components::header::Props {
    hackdex_web::components::header::Props {
        current: Some(Route::TrainerDetail { id: 3 }),
        active_game: AttrValue::from("ERX"),
        connectivity,
        on_navigate: Callback::noop(),
        on_game_change: Callback::noop(),
        on_retry_connection: Callback::noop(),
    }
}

#[test]
fn header_marks_current_section_and_game() {
    let html = block_on(
        LocalServerRenderer::<Header>::with_props(header_props(Connectivity::Online)).render(),
    );
    assert!(html.contains("game-select"));
    assert!(html.contains("Emerald Rogue X"));
    assert!(html.contains("aria-current=\"page\""));
    assert!(!html.contains("connection-retry"));
}

#[test]
fn header_offers_retry_when_store_is_unreachable() {
    let props = header_props(Connectivity::Offline(String::from("Network error: refused")));
    let html = block_on(LocalServerRenderer::<Header>::with_props(props).render());
    assert!(html.contains("connection-retry"));
    assert!(html.contains("Network error: refused"));
}

#[test]
fn game_picker_keeps_unknown_active_game_visible() {
    let props = hackdex_web::components::game_picker::Props {
        active: AttrValue::from("ZZZ"),
        on_change: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<GamePicker>::with_props(props).render());
    assert!(html.contains("value=\"ZZZ\""));
    assert!(html.contains("FireRed Omega"));
}

#[test]
fn footer_renders() {
    let html = block_on(LocalServerRenderer::<Footer>::new().render());
    assert!(html.contains("<footer>"));
}

#[test]
fn pager_disables_unavailable_directions() {
    let props = hackdex_web::components::pager::Props {
        page: 1,
        can_prev: false,
        can_next: true,
        total_count: Some(120),
        on_prev: Callback::noop(),
        on_next: Callback::noop(),
        on_hover_next: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<Pager>::with_props(props).render());
    assert!(html.contains("Page 1 · 120 total"));
    assert!(html.contains("page-prev"));
    assert_eq!(html.matches("disabled").count(), 1);
}

fn status_props(status: ViewStatus) -> hackdex_web::components::status::Props {
    hackdex_web::components::status::Props {
        status,
        error: None,
        empty: None,
        is_refreshing: false,
        idle_hint: None,
        on_retry: Callback::noop(),
    }
}

#[test]
fn status_panel_covers_each_state() {
    let render = |props| block_on(LocalServerRenderer::<StatusPanel>::with_props(props).render());

    assert!(render(status_props(ViewStatus::Loading)).contains("Loading"));

    let mut error = status_props(ViewStatus::Error);
    error.error = Some(QueryError::Remote {
        status: 503,
        message: String::from("down"),
    });
    let html = render(error);
    assert!(html.contains("status-retry"));
    assert!(html.contains("Store returned 503: down"));

    let mut no_results = status_props(ViewStatus::Ready);
    no_results.empty = Some(EmptyKind::NoResults);
    assert!(render(no_results).contains("no-results"));

    let mut no_data = status_props(ViewStatus::Ready);
    no_data.empty = Some(EmptyKind::NoData);
    assert!(render(no_data).contains("no-data"));

    let mut refreshing = status_props(ViewStatus::Ready);
    refreshing.is_refreshing = true;
    assert!(render(refreshing).contains("Refreshing"));

    let mut idle = status_props(ViewStatus::Idle);
    idle.idle_hint = Some(AttrValue::from("Choose a route"));
    assert!(render(idle).contains("Choose a route"));
    assert!(!render(status_props(ViewStatus::Idle)).contains("status"));
}

#[test]
fn filter_controls_reflect_selection() {
    let html = block_on(
        LocalServerRenderer::<TypeSelect>::with_props(
            hackdex_web::components::filters::TypeSelectProps {
                selected: AttrValue::from("fire"),
                on_change: Callback::noop(),
            },
        )
        .render(),
    );
    assert!(html.contains("type-select"));
    assert!(html.contains("Fairy"));

    let html = block_on(
        LocalServerRenderer::<SplitSelect>::with_props(
            hackdex_web::components::filters::SplitSelectProps {
                splits: vec![String::from("Brock"), String::from("Misty")],
                selected: AttrValue::from("Misty"),
                on_change: Callback::noop(),
            },
        )
        .render(),
    );
    assert!(html.contains("All splits"));
    assert!(html.contains("Misty"));

    let html = block_on(
        LocalServerRenderer::<MethodTabs>::with_props(
            hackdex_web::components::filters::MethodTabsProps {
                methods: vec![String::from("grass"), String::from("old-rod")],
                selected: AttrValue::from("old-rod"),
                on_select: Callback::noop(),
            },
        )
        .render(),
    );
    assert!(html.contains("Old Rod"));
    assert_eq!(html.matches("aria-selected=\"true\"").count(), 1);

    let html = block_on(
        LocalServerRenderer::<TimeToggle>::with_props(
            hackdex_web::components::filters::TimeToggleProps {
                selected: TimeOfDay::Night,
                available: vec![TimeOfDay::Night],
                on_toggle: Callback::noop(),
            },
        )
        .render(),
    );
    assert_eq!(html.matches("aria-pressed=\"true\"").count(), 1);
    assert!(html.contains("disabled"));
}

#[test]
fn list_tables_render_rows() {
    let rows = vec![PokedexRow {
        id: 6,
        dex_number: 6,
        name: String::from("Charizard"),
        types: vec![String::from("fire"), String::from("flying")],
        sort_index: 6,
    }];
    let html = block_on(
        LocalServerRenderer::<PokedexTable>::with_props(hackdex_web::pages::pokedex::TableProps {
            rows,
            on_open: Callback::noop(),
            on_hover: Callback::noop(),
        })
        .render(),
    );
    assert!(html.contains("Charizard"));
    assert!(html.contains("006"));
    assert!(html.contains("type-flying"));

    let rows = vec![EncounterRow {
        route: String::from("Route 1"),
        method: String::from("grass"),
        time: String::from("day"),
        pokemon_id: 16,
        pokemon: String::from("Pidgey"),
        min_level: 2,
        max_level: 5,
        rate: 30,
        slot: 1,
        sort_index: 1,
    }];
    let html = block_on(
        LocalServerRenderer::<EncounterTable>::with_props(
            hackdex_web::pages::encounters::TableProps {
                rows,
                on_open: Callback::noop(),
                on_hover: Callback::noop(),
            },
        )
        .render(),
    );
    assert!(html.contains("Pidgey"));
    assert!(html.contains("2-5"));
    assert!(html.contains("30%"));

    let html = block_on(
        LocalServerRenderer::<PokedexTable>::with_props(hackdex_web::pages::pokedex::TableProps {
            rows: Vec::new(),
            on_open: Callback::noop(),
            on_hover: Callback::noop(),
        })
        .render(),
    );
    assert!(!html.contains("<table"));
}

#[test]
fn detail_views_render_records() {
    let detail = PokemonDetail {
        id: 25,
        dex_number: 25,
        name: String::from("Pikachu"),
        types: vec![String::from("electric")],
        abilities: vec![String::from("Static")],
        base_stats: BaseStats {
            hp: 35,
            attack: 55,
            defense: 40,
            sp_attack: 50,
            sp_defense: 50,
            speed: 90,
        },
        locations: vec![String::from("Viridian Forest")],
    };
    let html = block_on(
        LocalServerRenderer::<PokemonDetailView>::with_props(
            hackdex_web::pages::pokemon_detail::ViewProps {
                detail,
                on_route: Callback::noop(),
            },
        )
        .render(),
    );
    assert!(html.contains("#025 Pikachu"));
    assert!(html.contains("320"));
    assert!(html.contains("Viridian Forest"));

    let detail = TrainerDetail {
        id: 3,
        name: String::from("Misty"),
        class: String::from("Leader"),
        split: String::from("Misty"),
        team: vec![TeamMember {
            species: String::from("Starmie"),
            level: 21,
            ability: None,
            item: Some(String::from("Mystic Water")),
            moves: vec![String::from("Water Pulse")],
        }],
    };
    let html = block_on(
        LocalServerRenderer::<TrainerDetailView>::with_props(
            hackdex_web::pages::trainer_detail::ViewProps { detail },
        )
        .render(),
    );
    assert!(html.contains("Leader Misty"));
    assert!(html.contains("Starmie Lv. 21"));
    assert!(html.contains("Item: Mystic Water"));
    assert!(!html.contains("Ability:"));
}

#[test]
fn not_found_offers_way_home() {
    let props = hackdex_web::pages::not_found::Props {
        on_go_home: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<NotFound>::with_props(props).render());
    assert!(html.contains("not-found"));
    assert!(html.contains("Back to start"));
}
