//! Per-screen filter models and the store requests they translate to.
//!
//! A [`ListView`] is a stateless description of one list screen: how its filters
//! hydrate from URL parameters, how they serialize back, which collection they query
//! and which values the current dataset allows. [`ListController`] does the stateful
//! work on top of it.
//!
//! [`ListController`]: crate::controller::ListController

pub mod detail;
pub mod encounters;
pub mod pokedex;
pub mod trainers;

pub use detail::{PokemonDetail, TeamMember, TrainerDetail};
pub use encounters::{EncounterDomain, EncounterFilters, EncounterRow, EncountersView};
pub use pokedex::{PokedexFilters, PokedexRow, PokedexView};
pub use trainers::{TrainerDomain, TrainerFilters, TrainerRow, TrainersView};

use serde::de::DeserializeOwned;
use std::fmt::Debug;

use crate::cache::{QueryKey, ViewId};
use crate::game::GameId;
use crate::params::QueryParams;
use crate::query::{QueryError, QueryRequest, QueryResponse};

pub const PAGE_PARAM: &str = "page";
pub const SEARCH_PARAM: &str = "search";
pub const TYPE_PARAM: &str = "type";

pub trait ListView: 'static {
    type Filters: Clone + PartialEq + Debug + Default + 'static;
    type Row: DeserializeOwned + Clone + PartialEq + Debug + 'static;
    /// Values the filters may take for the current dataset.
    type Domain: Clone + PartialEq + Debug + Default + 'static;

    const VIEW: ViewId;

    /// Filters from URL parameters, normalized against `domain`.
    fn hydrate(params: &QueryParams, domain: &Self::Domain) -> Self::Filters;

    /// Re-check `filters` against a (possibly newer) domain.
    fn normalize(filters: &Self::Filters, domain: &Self::Domain) -> Self::Filters;

    /// Canonical URL parameters, defaults omitted. Never includes `game`.
    fn to_params(filters: &Self::Filters) -> QueryParams;

    /// Whether a list request may be issued yet.
    fn is_ready(_filters: &Self::Filters, _domain: &Self::Domain) -> bool {
        true
    }

    /// List request for the page named by `filters`, with one lookahead row.
    fn request(game: &GameId, filters: &Self::Filters) -> QueryRequest;

    fn search(filters: &Self::Filters) -> &str;
    fn set_search(filters: &mut Self::Filters, term: String);
    fn page(filters: &Self::Filters) -> u32;
    fn set_page(filters: &mut Self::Filters, page: u32);

    /// Whether anything narrows the result set beyond the view's scope.
    fn has_active_filters(filters: &Self::Filters) -> bool;

    /// Filters carried over to another game. Game-specific values are dropped.
    fn for_new_game(filters: &Self::Filters) -> Self::Filters;

    /// Query backing the domain, if the view has one.
    fn domain_request(_game: &GameId, _filters: &Self::Filters) -> Option<(QueryKey, QueryRequest)> {
        None
    }

    /// # Errors
    ///
    /// Returns [`QueryError::Decode`] when the rows do not describe a domain.
    fn domain_from_response(
        _filters: &Self::Filters,
        _response: &QueryResponse,
    ) -> Result<Self::Domain, QueryError> {
        Ok(Self::Domain::default())
    }

    /// Detail read a row links to, used for hover prefetch.
    fn detail_request(game: &GameId, row: &Self::Row) -> Option<(QueryKey, QueryRequest)>;

    /// Cache key of the list request. Filter fields come from the canonical
    /// parameters, so defaults and empty values never reach the key.
    fn key(game: &GameId, filters: &Self::Filters) -> QueryKey {
        Self::to_params(filters)
            .iter()
            .filter(|(name, _)| *name != PAGE_PARAM)
            .fold(QueryKey::new(Self::VIEW, game.clone()), |key, (name, value)| {
                key.with(name, value)
            })
            .page(Self::page(filters))
    }
}

/// First row of a single-record response, if any.
///
/// # Errors
///
/// Returns [`QueryError::Decode`] when the row does not match `T`.
pub fn first_row<T: DeserializeOwned>(response: &QueryResponse) -> Result<Option<T>, QueryError> {
    response
        .rows
        .first()
        .map(|row| serde_json::from_value(row.clone()).map_err(|e| QueryError::Decode(e.to_string())))
        .transpose()
}
