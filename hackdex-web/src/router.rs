use yew_router::prelude::*;

#[derive(Clone, Debug, Routable, PartialEq, Eq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/pokedex")]
    Pokedex,
    #[at("/pokemon/:id")]
    PokemonDetail { id: u32 },
    #[at("/encounters")]
    Encounters,
    #[at("/trainers")]
    Trainers,
    #[at("/trainers/:id")]
    TrainerDetail { id: u32 },
    #[at("/404")]
    #[not_found]
    NotFound,
}

impl Route {
    /// Label shown in the navigation bar, for top-level screens only.
    #[must_use]
    pub const fn nav_label(&self) -> Option<&'static str> {
        match self {
            Self::Pokedex => Some("Pokédex"),
            Self::Encounters => Some("Encounters"),
            Self::Trainers => Some("Trainers"),
            Self::Home | Self::PokemonDetail { .. } | Self::TrainerDetail { .. } | Self::NotFound => {
                None
            }
        }
    }

    /// Top-level screens in navigation order.
    #[must_use]
    pub const fn nav_items() -> [Self; 3] {
        [Self::Pokedex, Self::Encounters, Self::Trainers]
    }

    /// Whether this route belongs under the given navigation item.
    #[must_use]
    pub const fn is_within(&self, section: &Self) -> bool {
        matches!(
            (self, section),
            (Self::Pokedex | Self::PokemonDetail { .. }, Self::Pokedex)
                | (Self::Encounters, Self::Encounters)
                | (Self::Trainers | Self::TrainerDetail { .. }, Self::Trainers)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Route;
    use yew_router::Routable;

    #[test]
    fn paths_round_trip() {
        for route in [
            Route::Home,
            Route::Pokedex,
            Route::PokemonDetail { id: 25 },
            Route::Encounters,
            Route::Trainers,
            Route::TrainerDetail { id: 7 },
        ] {
            assert_eq!(Route::recognize(&route.to_path()), Some(route));
        }
        assert_eq!(Route::PokemonDetail { id: 25 }.to_path(), "/pokemon/25");
    }

    #[test]
    fn unknown_paths_fall_through_to_not_found() {
        assert_eq!(Route::recognize("/moves"), Some(Route::NotFound));
        assert_eq!(Route::recognize("/pokemon/pikachu"), Some(Route::NotFound));
    }

    #[test]
    fn detail_routes_highlight_their_section() {
        assert!(Route::TrainerDetail { id: 1 }.is_within(&Route::Trainers));
        assert!(!Route::TrainerDetail { id: 1 }.is_within(&Route::Pokedex));
        assert_eq!(Route::Home.nav_label(), None);
    }
}
