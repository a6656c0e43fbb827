//! Trainer battles grouped by progression split.

use serde::{Deserialize, Serialize};

use super::{ListView, PAGE_PARAM, SEARCH_PARAM, TYPE_PARAM, detail};
use crate::cache::{QueryKey, ViewId};
use crate::constants::ALL;
use crate::filters::{is_all, normalize_choice, normalize_search, normalize_type};
use crate::game::GameId;
use crate::pagination::{PageWindow, parse_page};
use crate::params::QueryParams;
use crate::query::{Filter, OrderBy, QueryError, QueryRequest, QueryResponse};

pub const TRAINER_COLLECTION: &str = "trainer_view";
pub const SPLIT_COLLECTION: &str = "game_split_view";
pub const SPLIT_PARAM: &str = "split";

const SPLIT_ROW_LIMIT: u32 = 199;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainerFilters {
    pub search: String,
    pub elemental_type: String,
    pub split: String,
    pub page: u32,
}

impl Default for TrainerFilters {
    fn default() -> Self {
        Self {
            search: String::new(),
            elemental_type: String::from(ALL),
            split: String::from(ALL),
            page: 1,
        }
    }
}

/// Splits known for the active game, in progression order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrainerDomain {
    pub loaded: bool,
    pub splits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerRow {
    pub id: u32,
    pub name: String,
    pub class: String,
    pub split: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub team_size: u8,
    #[serde(default)]
    pub sort_index: i64,
}

#[derive(Debug, Deserialize)]
struct SplitRow {
    split: String,
}

pub struct TrainersView;

impl ListView for TrainersView {
    type Filters = TrainerFilters;
    type Row = TrainerRow;
    type Domain = TrainerDomain;

    const VIEW: ViewId = ViewId::Trainers;

    fn hydrate(params: &QueryParams, domain: &TrainerDomain) -> TrainerFilters {
        let raw = TrainerFilters {
            search: normalize_search(params.get(SEARCH_PARAM)),
            elemental_type: params.get(TYPE_PARAM).unwrap_or_default().to_string(),
            split: params.get_nonempty(SPLIT_PARAM).unwrap_or(ALL).trim().to_string(),
            page: parse_page(params.get(PAGE_PARAM)),
        };
        Self::normalize(&raw, domain)
    }

    fn normalize(filters: &TrainerFilters, domain: &TrainerDomain) -> TrainerFilters {
        let split = if domain.loaded {
            let split = normalize_choice(Some(&filters.split), &domain.splits);
            if !is_all(&filters.split) && is_all(&split) {
                log::debug!("unknown split {:?} normalized to all", filters.split);
            }
            split
        } else {
            filters.split.clone()
        };
        TrainerFilters {
            elemental_type: normalize_type(Some(&filters.elemental_type)),
            split,
            ..filters.clone()
        }
    }

    fn to_params(filters: &TrainerFilters) -> QueryParams {
        let mut params = QueryParams::new();
        params.set(SEARCH_PARAM, filters.search.as_str());
        if !is_all(&filters.elemental_type) {
            params.set(TYPE_PARAM, filters.elemental_type.as_str());
        }
        if !is_all(&filters.split) {
            params.set(SPLIT_PARAM, filters.split.as_str());
        }
        if filters.page > 1 {
            params.set(PAGE_PARAM, filters.page.to_string());
        }
        params
    }

    fn is_ready(filters: &TrainerFilters, domain: &TrainerDomain) -> bool {
        is_all(&filters.split) || domain.loaded
    }

    fn request(game: &GameId, filters: &TrainerFilters) -> QueryRequest {
        let window = PageWindow::new(filters.page);
        let mut request =
            QueryRequest::new(TRAINER_COLLECTION).filter(Filter::eq("game_id", game.as_str()));
        if !filters.search.is_empty() {
            request = request.filter(Filter::ilike("name", filters.search.as_str()));
        }
        if !is_all(&filters.elemental_type) {
            request = request.filter(Filter::contains("types", filters.elemental_type.as_str()));
        }
        if !is_all(&filters.split) {
            request = request.filter(Filter::eq("split", filters.split.as_str()));
        }
        request
            .order_by(OrderBy::asc("sort_index"))
            .order_by(OrderBy::asc("split_order"))
            .order_by(OrderBy::asc("id"))
            .range(window.range_start(), window.range_end())
    }

    fn search(filters: &TrainerFilters) -> &str {
        &filters.search
    }

    fn set_search(filters: &mut TrainerFilters, term: String) {
        filters.search = term;
    }

    fn page(filters: &TrainerFilters) -> u32 {
        filters.page
    }

    fn set_page(filters: &mut TrainerFilters, page: u32) {
        filters.page = page.max(1);
    }

    fn has_active_filters(filters: &TrainerFilters) -> bool {
        !filters.search.is_empty() || !is_all(&filters.elemental_type) || !is_all(&filters.split)
    }

    fn for_new_game(filters: &TrainerFilters) -> TrainerFilters {
        TrainerFilters {
            split: String::from(ALL),
            page: 1,
            ..filters.clone()
        }
    }

    fn domain_request(game: &GameId, _filters: &TrainerFilters) -> Option<(QueryKey, QueryRequest)> {
        let key = QueryKey::new(ViewId::TrainerSplits, game.clone());
        let request = QueryRequest::new(SPLIT_COLLECTION)
            .filter(Filter::eq("game_id", game.as_str()))
            .order_by(OrderBy::asc("split_order"))
            .range(0, SPLIT_ROW_LIMIT);
        Some((key, request))
    }

    fn domain_from_response(
        _filters: &TrainerFilters,
        response: &QueryResponse,
    ) -> Result<TrainerDomain, QueryError> {
        let rows: Vec<SplitRow> = response.decode()?;
        let mut splits: Vec<String> = Vec::with_capacity(rows.len());
        for row in rows {
            if !splits.contains(&row.split) {
                splits.push(row.split);
            }
        }
        Ok(TrainerDomain {
            loaded: true,
            splits,
        })
    }

    fn detail_request(game: &GameId, row: &TrainerRow) -> Option<(QueryKey, QueryRequest)> {
        Some(detail::trainer_detail(game, row.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn splits() -> TrainerDomain {
        TrainerDomain {
            loaded: true,
            splits: vec![String::from("Brock"), String::from("Misty")],
        }
    }

    #[test]
    fn split_waits_for_domain_before_normalizing() {
        let params = QueryParams::parse("?split=Misty&type=water");
        let provisional = TrainersView::hydrate(&params, &TrainerDomain::default());
        assert_eq!(provisional.split, "Misty");
        assert!(!TrainersView::is_ready(&provisional, &TrainerDomain::default()));

        let checked = TrainersView::normalize(&provisional, &splits());
        assert_eq!(checked.split, "Misty");
        assert!(TrainersView::is_ready(&checked, &splits()));

        let gone = TrainersView::hydrate(&QueryParams::parse("?split=Giovanni"), &splits());
        assert_eq!(gone.split, ALL);
    }

    #[test]
    fn unfiltered_split_is_ready_immediately() {
        let filters = TrainersView::hydrate(&QueryParams::new(), &TrainerDomain::default());
        assert!(TrainersView::is_ready(&filters, &TrainerDomain::default()));
        assert!(!TrainersView::has_active_filters(&filters));
    }

    #[test]
    fn split_domain_keeps_progression_order() {
        let response = QueryResponse {
            rows: vec![
                json!({"split": "Brock"}),
                json!({"split": "Misty"}),
                json!({"split": "Brock"}),
            ],
            total_count: None,
        };
        let domain =
            TrainersView::domain_from_response(&TrainerFilters::default(), &response).unwrap();
        assert_eq!(domain, splits());
    }

    #[test]
    fn switching_games_drops_split() {
        let filters = TrainerFilters {
            search: String::from("leader"),
            split: String::from("Misty"),
            page: 4,
            ..TrainerFilters::default()
        };
        let carried = TrainersView::for_new_game(&filters);
        assert_eq!(carried.split, ALL);
        assert_eq!(carried.page, 1);
        assert_eq!(carried.search, "leader");
    }
}
