//! Stateful list screen controller.
//!
//! Owns the filter state of one mounted list view and keeps it in step with the URL
//! and the query cache. The UI layer drives it with events (mount, input, paging,
//! retry, popstate, game switch) and renders [`ListController::state`].

use futures::future::LocalBoxFuture;
use std::cell::Cell;
use std::rc::Rc;

use crate::cache::{QueryKey, QueryObserver, QueryStatus};
use crate::client::DexClient;
use crate::constants::{GAME_PARAM, PAGE_SIZE};
use crate::debounce::{DebounceTicket, Debouncer};
use crate::filters::TimeOfDay;
use crate::pagination::Paged;
use crate::params::{HistoryMode, Location, QueryParams, UrlSync};
use crate::query::{QueryError, QueryResponse};
use crate::views::{
    EncounterFilters, EncountersView, ListView, PokedexFilters, PokedexView, TrainerFilters,
    TrainersView,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

impl ViewStatus {
    /// Transitions the list screens may take. `Idle` is reachable from anywhere
    /// because clearing a required filter (no route) leaves nothing to load.
    /// `Error` may go straight to `Ready` when the next key is already cached, or
    /// when a retry clears the error on an entry that still holds rows.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (_, Self::Idle)
                | (Self::Idle, Self::Loading | Self::Ready)
                | (Self::Loading, Self::Loading | Self::Ready | Self::Error)
                | (Self::Ready, Self::Ready | Self::Loading | Self::Error)
                | (Self::Error, Self::Error | Self::Loading | Self::Ready)
        )
    }
}

/// Why a ready list has no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyKind {
    /// Filters exclude everything.
    NoResults,
    /// The game has no rows for this view at all.
    NoData,
}

/// Everything a list screen renders.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<R> {
    pub status: ViewStatus,
    pub rows: Vec<R>,
    pub page: u32,
    pub can_prev: bool,
    pub can_next: bool,
    /// Stale rows are shown while a newer response is fetched.
    pub is_refreshing: bool,
    pub total_count: Option<u64>,
    pub error: Option<QueryError>,
    pub empty: Option<EmptyKind>,
}

pub struct ListController<V: ListView> {
    client: DexClient,
    url: UrlSync,
    filters: V::Filters,
    domain: V::Domain,
    search_input: String,
    debouncer: Debouncer,
    observer: Option<QueryObserver<QueryResponse>>,
    last_status: Cell<ViewStatus>,
}

impl<V: ListView> ListController<V> {
    /// Hydrate from the current URL and issue the first request if the view is
    /// ready. The URL is rewritten (replace) only when it was not canonical.
    #[must_use]
    pub fn mount(client: DexClient, location: Rc<dyn Location>, domain: V::Domain) -> Self {
        let url = UrlSync::new(location);
        let filters = V::hydrate(&url.read_params(), &domain);
        let debouncer = Debouncer::new(client.clock());
        let mut controller = Self {
            search_input: V::search(&filters).to_string(),
            client,
            url,
            filters,
            domain,
            debouncer,
            observer: None,
            last_status: Cell::new(ViewStatus::Idle),
        };
        log::debug!("mount {} with {:?}", V::VIEW.as_str(), controller.filters);
        controller.commit(HistoryMode::Replace);
        controller
    }

    #[must_use]
    pub const fn filters(&self) -> &V::Filters {
        &self.filters
    }

    #[must_use]
    pub const fn domain(&self) -> &V::Domain {
        &self.domain
    }

    /// Raw search box contents, ahead of the debounced filter value.
    #[must_use]
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    #[must_use]
    pub const fn client(&self) -> &DexClient {
        &self.client
    }

    /// Key of the list read currently shown, if any.
    #[must_use]
    pub fn current_key(&self) -> Option<&QueryKey> {
        self.observer.as_ref().map(QueryObserver::key)
    }

    fn canonical_params(&self) -> QueryParams {
        V::to_params(&self.filters).with(GAME_PARAM, self.client.game().active_game().as_str())
    }

    fn commit(&mut self, mode: HistoryMode) {
        self.url.write_params(&self.canonical_params(), mode);
        self.request();
    }

    fn request(&mut self) {
        if !V::is_ready(&self.filters, &self.domain) {
            self.observer = None;
            return;
        }
        let game = self.client.game().active_game();
        let key = V::key(&game, &self.filters);
        if self.current_key() != Some(&key) {
            self.observer = Some(self.client.observe(&key));
        }
        self.client.fetch(&key, V::request(&game, &self.filters));
    }

    fn apply(&mut self, next: V::Filters, mode: HistoryMode) -> bool {
        if next == self.filters {
            return false;
        }
        self.filters = next;
        self.commit(mode);
        true
    }

    /// Record a keystroke. The caller schedules [`settle_search`](Self::settle_search)
    /// at the ticket's due time.
    pub fn input_search(&mut self, raw: &str) -> DebounceTicket {
        self.search_input = raw.to_string();
        self.debouncer.input(raw.trim())
    }

    /// Apply the debounced search term if `ticket` is still the latest keystroke.
    /// Returns whether the filter changed.
    pub fn settle_search(&mut self, ticket: DebounceTicket) -> bool {
        let Some(term) = self.debouncer.settle(ticket) else {
            return false;
        };
        let mut next = self.filters.clone();
        V::set_search(&mut next, term);
        V::set_page(&mut next, 1);
        self.apply(next, HistoryMode::Replace)
    }

    /// Change non-search filters immediately. The page resets to 1.
    pub fn update(&mut self, change: impl FnOnce(&mut V::Filters)) -> bool {
        self.update_with(HistoryMode::Replace, change)
    }

    pub fn update_with(&mut self, mode: HistoryMode, change: impl FnOnce(&mut V::Filters)) -> bool {
        let mut next = self.filters.clone();
        change(&mut next);
        V::set_page(&mut next, 1);
        let next = V::normalize(&next, &self.domain);
        self.apply(next, mode)
    }

    pub fn next_page(&mut self) -> bool {
        if !self.state().can_next {
            return false;
        }
        self.go_to_page(V::page(&self.filters) + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        let page = V::page(&self.filters);
        page > 1 && self.go_to_page(page - 1)
    }

    fn go_to_page(&mut self, page: u32) -> bool {
        let mut next = self.filters.clone();
        V::set_page(&mut next, page);
        self.apply(next, HistoryMode::Replace)
    }

    /// Re-issue the failed read for the identical key.
    pub fn retry(&mut self) -> bool {
        if self.state().status != ViewStatus::Error {
            return false;
        }
        let game = self.client.game().active_game();
        let key = V::key(&game, &self.filters);
        log::info!("retrying {}", V::VIEW.as_str());
        self.client.refetch(&key, V::request(&game, &self.filters));
        true
    }

    /// Cache key of the domain the current filters depend on.
    #[must_use]
    pub fn domain_key(&self) -> Option<QueryKey> {
        V::domain_request(&self.client.game().active_game(), &self.filters).map(|(key, _)| key)
    }

    /// Read the domain the current filters depend on, through the cache. `None` when
    /// the view has no domain for these filters.
    #[must_use]
    pub fn load_domain(&self) -> Option<LocalBoxFuture<'static, Result<V::Domain, QueryError>>> {
        let game = self.client.game().active_game();
        let (key, request) = V::domain_request(&game, &self.filters)?;
        let filters = self.filters.clone();
        let pending = self.client.ensure(&key, request);
        Some(Box::pin(async move {
            let response = pending.await?;
            V::domain_from_response(&filters, &response)
        }))
    }

    /// Install a freshly loaded domain and re-check the filters against it. Values
    /// the domain rejects are rewritten in place (replace).
    pub fn set_domain(&mut self, domain: V::Domain) {
        if domain == self.domain {
            return;
        }
        self.domain = domain;
        self.filters = V::normalize(&self.filters, &self.domain);
        self.commit(HistoryMode::Replace);
    }

    /// Re-hydrate after back/forward navigation or a manual URL edit. The active
    /// game is not changed from here; a foreign `game` value is rewritten.
    pub fn on_location_change(&mut self) -> bool {
        let next = V::hydrate(&self.url.read_params(), &self.domain);
        if next == self.filters {
            self.url.write_params(&self.canonical_params(), HistoryMode::Replace);
            return false;
        }
        self.debouncer.cancel();
        self.search_input = V::search(&next).to_string();
        self.filters = next;
        self.commit(HistoryMode::Replace);
        true
    }

    /// Follow a game switch: drop the per-game domain and game-specific filters,
    /// then request the new game's rows.
    pub fn on_game_change(&mut self) {
        self.domain = V::Domain::default();
        self.filters = V::for_new_game(&self.filters);
        self.search_input = V::search(&self.filters).to_string();
        self.commit(HistoryMode::Replace);
    }

    /// Warm the cache for the detail page `row` links to.
    pub fn prefetch_detail(&self, row: &V::Row) {
        let game = self.client.game().active_game();
        if let Some((key, request)) = V::detail_request(&game, row) {
            self.client.prefetch(&key, request);
        }
    }

    /// Warm the cache for the following page when one exists.
    pub fn prefetch_next_page(&self) {
        if !self.state().can_next {
            return;
        }
        let game = self.client.game().active_game();
        let mut next = self.filters.clone();
        V::set_page(&mut next, V::page(&self.filters) + 1);
        self.client.prefetch(&V::key(&game, &next), V::request(&game, &next));
    }

    #[must_use]
    pub fn state(&self) -> ViewState<V::Row> {
        let page = V::page(&self.filters);
        let mut state = ViewState {
            status: ViewStatus::Idle,
            rows: Vec::new(),
            page,
            can_prev: page > 1,
            can_next: false,
            is_refreshing: false,
            total_count: None,
            error: None,
            empty: None,
        };
        if let Some(key) = self.current_key() {
            let snapshot = self.client.cache().snapshot(key);
            match (snapshot.status, snapshot.data) {
                (QueryStatus::Error, _) => {
                    state.status = ViewStatus::Error;
                    state.error = snapshot.error;
                }
                (QueryStatus::Resolved, Some(response)) => match response.decode::<V::Row>() {
                    Ok(rows) => {
                        let paged = Paged::from_lookahead(rows, PAGE_SIZE);
                        state.status = ViewStatus::Ready;
                        state.can_next = paged.has_more;
                        state.is_refreshing = snapshot.is_fetching;
                        state.total_count = response.total_count;
                        if paged.rows.is_empty() {
                            state.empty = Some(if V::has_active_filters(&self.filters) {
                                EmptyKind::NoResults
                            } else {
                                EmptyKind::NoData
                            });
                        }
                        state.rows = paged.rows;
                    }
                    Err(err) => {
                        state.status = ViewStatus::Error;
                        state.error = Some(err);
                    }
                },
                _ => state.status = ViewStatus::Loading,
            }
        }
        let previous = self.last_status.replace(state.status);
        if !previous.can_transition_to(state.status) {
            log::warn!(
                "{} went {previous:?} -> {:?}",
                V::VIEW.as_str(),
                state.status
            );
        }
        state
    }
}

impl ListController<PokedexView> {
    pub fn set_type(&mut self, elemental_type: &str) -> bool {
        self.update(|f: &mut PokedexFilters| f.elemental_type = elemental_type.to_string())
    }
}

impl ListController<EncountersView> {
    /// Choosing a route is navigation: it adds a history entry and starts the route
    /// over with default method, time and search.
    pub fn select_route(&mut self, route: &str) -> bool {
        let next = EncounterFilters::with_route(route);
        if next.route == self.filters.route {
            return false;
        }
        self.debouncer.cancel();
        self.search_input.clear();
        self.filters = next;
        self.commit(HistoryMode::Push);
        true
    }

    pub fn set_method(&mut self, method: &str) -> bool {
        self.update(|f: &mut EncounterFilters| f.method = method.to_string())
    }

    /// Tri-state time toggle; re-selecting the active option clears it.
    pub fn toggle_time(&mut self, clicked: TimeOfDay) -> bool {
        self.update(|f: &mut EncounterFilters| f.time = f.time.toggle(clicked))
    }
}

impl ListController<TrainersView> {
    pub fn set_type(&mut self, elemental_type: &str) -> bool {
        self.update(|f: &mut TrainerFilters| f.elemental_type = elemental_type.to_string())
    }

    pub fn set_split(&mut self, split: &str) -> bool {
        self.update(|f: &mut TrainerFilters| f.split = split.to_string())
    }
}
