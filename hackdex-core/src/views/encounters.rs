//! Wild encounters for one route.
//!
//! Nothing is listed until a route is chosen. Method and time values are checked
//! against the route's [`EncounterDomain`] once it has loaded; until then the URL
//! values are kept provisionally and no list request is issued.

use serde::{Deserialize, Serialize};

use super::{ListView, PAGE_PARAM, SEARCH_PARAM, detail};
use crate::cache::{QueryKey, ViewId};
use crate::constants::ALL;
use crate::filters::{TimeOfDay, is_all, normalize_choice, normalize_search};
use crate::game::GameId;
use crate::pagination::{PageWindow, parse_page};
use crate::params::QueryParams;
use crate::query::{Filter, OrderBy, QueryError, QueryRequest, QueryResponse};

pub const ENCOUNTER_COLLECTION: &str = "encounter_view";
pub const ROUTE_DOMAIN_COLLECTION: &str = "route_encounter_domain_view";
pub const ROUTE_PARAM: &str = "route";
pub const METHOD_PARAM: &str = "method";
pub const TIME_PARAM: &str = "time";

/// Upper bound on domain rows read for a single route.
const DOMAIN_ROW_LIMIT: u32 = 499;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncounterFilters {
    pub route: String,
    pub method: String,
    pub time: TimeOfDay,
    pub search: String,
    pub page: u32,
}

impl Default for EncounterFilters {
    fn default() -> Self {
        Self {
            route: String::new(),
            method: String::from(ALL),
            time: TimeOfDay::All,
            search: String::new(),
            page: 1,
        }
    }
}

impl EncounterFilters {
    /// Selecting a route starts over on everything that depends on it.
    #[must_use]
    pub fn with_route(route: &str) -> Self {
        Self {
            route: route.trim().to_string(),
            ..Self::default()
        }
    }
}

/// Methods and times present on one route.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncounterDomain {
    /// Route this domain describes; `None` until loaded.
    pub route: Option<String>,
    pub methods: Vec<String>,
    pub times: Vec<TimeOfDay>,
}

impl EncounterDomain {
    #[must_use]
    pub fn describes(&self, route: &str) -> bool {
        self.route.as_deref() == Some(route)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterRow {
    pub route: String,
    pub method: String,
    /// `day`, `night` or `any`.
    pub time: String,
    pub pokemon_id: u32,
    pub pokemon: String,
    pub min_level: u8,
    pub max_level: u8,
    pub rate: u8,
    pub slot: u32,
    #[serde(default)]
    pub sort_index: i64,
}

impl EncounterRow {
    #[must_use]
    pub fn level_range(&self) -> String {
        if self.min_level == self.max_level {
            self.min_level.to_string()
        } else {
            format!("{}-{}", self.min_level, self.max_level)
        }
    }
}

#[derive(Debug, Deserialize)]
struct DomainRow {
    method: String,
    time: String,
}

pub struct EncountersView;

impl ListView for EncountersView {
    type Filters = EncounterFilters;
    type Row = EncounterRow;
    type Domain = EncounterDomain;

    const VIEW: ViewId = ViewId::Encounters;

    fn hydrate(params: &QueryParams, domain: &EncounterDomain) -> EncounterFilters {
        let time = params
            .get_nonempty(TIME_PARAM)
            .map_or(TimeOfDay::All, |raw| {
                TimeOfDay::parse(raw).unwrap_or_else(|| {
                    log::debug!("unknown time {raw:?} normalized to all");
                    TimeOfDay::All
                })
            });
        let raw = EncounterFilters {
            route: params.get(ROUTE_PARAM).unwrap_or_default().trim().to_string(),
            method: params.get_nonempty(METHOD_PARAM).unwrap_or(ALL).trim().to_string(),
            time,
            search: normalize_search(params.get(SEARCH_PARAM)),
            page: parse_page(params.get(PAGE_PARAM)),
        };
        Self::normalize(&raw, domain)
    }

    fn normalize(filters: &EncounterFilters, domain: &EncounterDomain) -> EncounterFilters {
        if filters.route.is_empty() {
            return EncounterFilters {
                search: filters.search.clone(),
                ..EncounterFilters::default()
            };
        }
        if !domain.describes(&filters.route) {
            return filters.clone();
        }
        let method = normalize_choice(Some(&filters.method), &domain.methods);
        if !is_all(&filters.method) && is_all(&method) {
            log::debug!(
                "method {:?} not on route {:?}, normalized to all",
                filters.method,
                filters.route
            );
        }
        let time = if filters.time == TimeOfDay::All || domain.times.contains(&filters.time) {
            filters.time
        } else {
            log::debug!("time {:?} not on route {:?}", filters.time, filters.route);
            TimeOfDay::All
        };
        EncounterFilters {
            method,
            time,
            ..filters.clone()
        }
    }

    fn to_params(filters: &EncounterFilters) -> QueryParams {
        let mut params = QueryParams::new();
        params.set(ROUTE_PARAM, filters.route.as_str());
        if !is_all(&filters.method) {
            params.set(METHOD_PARAM, filters.method.as_str());
        }
        if filters.time != TimeOfDay::All {
            params.set(TIME_PARAM, filters.time.as_str());
        }
        params.set(SEARCH_PARAM, filters.search.as_str());
        if filters.page > 1 {
            params.set(PAGE_PARAM, filters.page.to_string());
        }
        params
    }

    fn is_ready(filters: &EncounterFilters, domain: &EncounterDomain) -> bool {
        !filters.route.is_empty() && domain.describes(&filters.route)
    }

    fn request(game: &GameId, filters: &EncounterFilters) -> QueryRequest {
        let window = PageWindow::new(filters.page);
        let mut request = QueryRequest::new(ENCOUNTER_COLLECTION)
            .filter(Filter::eq("game_id", game.as_str()))
            .filter(Filter::eq("route", filters.route.as_str()));
        if !is_all(&filters.method) {
            request = request.filter(Filter::eq("method", filters.method.as_str()));
        }
        if filters.time != TimeOfDay::All {
            request = request.filter(Filter::any_of("time", &[filters.time.as_str(), "any"]));
        }
        if !filters.search.is_empty() {
            request = request.filter(Filter::ilike("pokemon", filters.search.as_str()));
        }
        request
            .order_by(OrderBy::asc("sort_index"))
            .order_by(OrderBy::asc("method"))
            .order_by(OrderBy::asc("slot"))
            .range(window.range_start(), window.range_end())
    }

    fn search(filters: &EncounterFilters) -> &str {
        &filters.search
    }

    fn set_search(filters: &mut EncounterFilters, term: String) {
        filters.search = term;
    }

    fn page(filters: &EncounterFilters) -> u32 {
        filters.page
    }

    fn set_page(filters: &mut EncounterFilters, page: u32) {
        filters.page = page.max(1);
    }

    fn has_active_filters(filters: &EncounterFilters) -> bool {
        !is_all(&filters.method) || filters.time != TimeOfDay::All || !filters.search.is_empty()
    }

    fn for_new_game(filters: &EncounterFilters) -> EncounterFilters {
        EncounterFilters {
            search: filters.search.clone(),
            ..EncounterFilters::default()
        }
    }

    fn domain_request(
        game: &GameId,
        filters: &EncounterFilters,
    ) -> Option<(QueryKey, QueryRequest)> {
        if filters.route.is_empty() {
            return None;
        }
        let key = QueryKey::new(ViewId::RouteDomain, game.clone()).with(ROUTE_PARAM, &filters.route);
        let request = QueryRequest::new(ROUTE_DOMAIN_COLLECTION)
            .filter(Filter::eq("game_id", game.as_str()))
            .filter(Filter::eq("route", filters.route.as_str()))
            .order_by(OrderBy::asc("sort_index"))
            .range(0, DOMAIN_ROW_LIMIT);
        Some((key, request))
    }

    fn domain_from_response(
        filters: &EncounterFilters,
        response: &QueryResponse,
    ) -> Result<EncounterDomain, QueryError> {
        let rows: Vec<DomainRow> = response.decode()?;
        let mut domain = EncounterDomain {
            route: Some(filters.route.clone()),
            ..EncounterDomain::default()
        };
        for row in rows {
            if !domain.methods.contains(&row.method) {
                domain.methods.push(row.method);
            }
            match TimeOfDay::parse(&row.time) {
                Some(TimeOfDay::All) | None => {}
                Some(time) if !domain.times.contains(&time) => domain.times.push(time),
                Some(_) => {}
            }
        }
        Ok(domain)
    }

    fn detail_request(game: &GameId, row: &EncounterRow) -> Option<(QueryKey, QueryRequest)> {
        Some(detail::pokemon_detail(game, row.pokemon_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::FilterOp;
    use serde_json::json;

    fn route_one() -> EncounterDomain {
        EncounterDomain {
            route: Some(String::from("R1")),
            methods: vec![String::from("Grass"), String::from("Surf")],
            times: vec![TimeOfDay::Day, TimeOfDay::Night],
        }
    }

    #[test]
    fn unknown_method_normalizes_to_all_and_sends_no_method_filter() {
        let filters = EncountersView::hydrate(
            &QueryParams::parse("?route=R1&method=DoesNotExist"),
            &route_one(),
        );
        assert_eq!(filters.method, ALL);
        let request = EncountersView::request(&GameId::fallback(), &filters);
        assert!(request.filters.iter().all(|f| f.field != "method"));
    }

    #[test]
    fn url_values_are_provisional_until_domain_loads() {
        let params = QueryParams::parse("?route=R1&method=Grass&time=day");
        let filters = EncountersView::hydrate(&params, &EncounterDomain::default());
        assert_eq!(filters.method, "Grass");
        assert!(!EncountersView::is_ready(&filters, &EncounterDomain::default()));
        assert!(EncountersView::is_ready(&filters, &route_one()));
    }

    #[test]
    fn no_route_means_nothing_to_request() {
        let filters = EncountersView::hydrate(&QueryParams::parse("?method=Grass"), &route_one());
        assert_eq!(filters, EncounterFilters::default());
        assert!(!EncountersView::is_ready(&filters, &route_one()));
        assert!(EncountersView::domain_request(&GameId::fallback(), &filters).is_none());
    }

    #[test]
    fn time_filter_includes_any_time_rows() {
        let filters = EncounterFilters {
            time: TimeOfDay::Night,
            ..EncounterFilters::with_route("R1")
        };
        let request = EncountersView::request(&GameId::fallback(), &filters);
        let time = request.filters.iter().find(|f| f.field == "time").unwrap();
        assert_eq!(
            time.op,
            FilterOp::In(vec![String::from("night"), String::from("any")])
        );
    }

    #[test]
    fn domain_is_built_from_distinct_methods_and_times() {
        let response = QueryResponse {
            rows: vec![
                json!({"method": "Grass", "time": "day"}),
                json!({"method": "Grass", "time": "night"}),
                json!({"method": "Surf", "time": "any"}),
            ],
            total_count: Some(3),
        };
        let domain =
            EncountersView::domain_from_response(&EncounterFilters::with_route("R1"), &response)
                .unwrap();
        assert_eq!(domain, route_one());
    }

    #[test]
    fn level_range_collapses_equal_bounds() {
        let row = EncounterRow {
            route: String::from("R1"),
            method: String::from("Grass"),
            time: String::from("any"),
            pokemon_id: 19,
            pokemon: String::from("Rattata"),
            min_level: 2,
            max_level: 4,
            rate: 45,
            slot: 0,
            sort_index: 0,
        };
        assert_eq!(row.level_range(), "2-4");
        assert_eq!(EncounterRow { max_level: 2, ..row }.level_range(), "2");
    }
}
