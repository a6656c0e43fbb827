//! National-dex style species list.

use serde::{Deserialize, Serialize};

use super::{ListView, PAGE_PARAM, SEARCH_PARAM, TYPE_PARAM, detail};
use crate::cache::{QueryKey, ViewId};
use crate::filters::{is_all, normalize_search, normalize_type};
use crate::game::GameId;
use crate::pagination::{PageWindow, parse_page};
use crate::params::QueryParams;
use crate::query::{Filter, OrderBy, QueryRequest};

pub const POKEDEX_COLLECTION: &str = "pokedex_view";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PokedexFilters {
    pub search: String,
    pub elemental_type: String,
    pub page: u32,
}

impl Default for PokedexFilters {
    fn default() -> Self {
        Self {
            search: String::new(),
            elemental_type: String::from(crate::constants::ALL),
            page: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokedexRow {
    pub id: u32,
    pub dex_number: u32,
    pub name: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub sort_index: i64,
}

pub struct PokedexView;

impl ListView for PokedexView {
    type Filters = PokedexFilters;
    type Row = PokedexRow;
    type Domain = ();

    const VIEW: ViewId = ViewId::Pokedex;

    fn hydrate(params: &QueryParams, domain: &()) -> PokedexFilters {
        let raw = PokedexFilters {
            search: normalize_search(params.get(SEARCH_PARAM)),
            elemental_type: params.get(TYPE_PARAM).unwrap_or_default().to_string(),
            page: parse_page(params.get(PAGE_PARAM)),
        };
        Self::normalize(&raw, domain)
    }

    fn normalize(filters: &PokedexFilters, _domain: &()) -> PokedexFilters {
        let elemental_type = normalize_type(Some(&filters.elemental_type));
        if !is_all(&filters.elemental_type) && is_all(&elemental_type) {
            log::debug!("unknown type {:?} normalized to all", filters.elemental_type);
        }
        PokedexFilters {
            elemental_type,
            ..filters.clone()
        }
    }

    fn to_params(filters: &PokedexFilters) -> QueryParams {
        let mut params = QueryParams::new();
        params.set(SEARCH_PARAM, filters.search.as_str());
        if !is_all(&filters.elemental_type) {
            params.set(TYPE_PARAM, filters.elemental_type.as_str());
        }
        if filters.page > 1 {
            params.set(PAGE_PARAM, filters.page.to_string());
        }
        params
    }

    fn request(game: &GameId, filters: &PokedexFilters) -> QueryRequest {
        let window = PageWindow::new(filters.page);
        let mut request =
            QueryRequest::new(POKEDEX_COLLECTION).filter(Filter::eq("game_id", game.as_str()));
        if !filters.search.is_empty() {
            request = request.filter(Filter::ilike("name", filters.search.as_str()));
        }
        if !is_all(&filters.elemental_type) {
            request = request.filter(Filter::contains("types", filters.elemental_type.as_str()));
        }
        request
            .order_by(OrderBy::asc("sort_index"))
            .order_by(OrderBy::asc("id"))
            .range(window.range_start(), window.range_end())
    }

    fn search(filters: &PokedexFilters) -> &str {
        &filters.search
    }

    fn set_search(filters: &mut PokedexFilters, term: String) {
        filters.search = term;
    }

    fn page(filters: &PokedexFilters) -> u32 {
        filters.page
    }

    fn set_page(filters: &mut PokedexFilters, page: u32) {
        filters.page = page.max(1);
    }

    fn has_active_filters(filters: &PokedexFilters) -> bool {
        !filters.search.is_empty() || !is_all(&filters.elemental_type)
    }

    fn for_new_game(filters: &PokedexFilters) -> PokedexFilters {
        PokedexFilters {
            page: 1,
            ..filters.clone()
        }
    }

    fn detail_request(game: &GameId, row: &PokedexRow) -> Option<(QueryKey, QueryRequest)> {
        Some(detail::pokemon_detail(game, row.id))
    }
}
