//! Hooks binding core controllers and cache reads to component lifecycles.

use hackdex_core::views::first_row;
use hackdex_core::{
    Clock, GameId, ListController, ListView, QueryError, QueryKey, QueryRequest, Sleeper, ViewState,
};
use serde::de::DeserializeOwned;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use yew::prelude::*;

use crate::app::state::Services;
use crate::dom::PopStateListener;

/// A mounted list controller plus the plumbing to re-render its component.
pub struct ListHandle<V: ListView> {
    controller: Rc<RefCell<ListController<V>>>,
    refresh: Callback<()>,
    sleeper: Rc<dyn Sleeper>,
    pub domain_error: Option<QueryError>,
    pub retry_domain: Callback<()>,
}

impl<V: ListView> Clone for ListHandle<V> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            refresh: self.refresh.clone(),
            sleeper: self.sleeper.clone(),
            domain_error: self.domain_error.clone(),
            retry_domain: self.retry_domain.clone(),
        }
    }
}

impl<V: ListView> ListHandle<V> {
    #[must_use]
    pub fn state(&self) -> ViewState<V::Row> {
        self.controller.borrow().state()
    }

    #[must_use]
    pub fn filters(&self) -> V::Filters {
        self.controller.borrow().filters().clone()
    }

    #[must_use]
    pub fn domain(&self) -> V::Domain {
        self.controller.borrow().domain().clone()
    }

    #[must_use]
    pub fn search_input(&self) -> String {
        self.controller.borrow().search_input().to_string()
    }

    /// Callback that applies `act` to the controller, then re-renders.
    pub fn action<E: 'static>(
        &self,
        act: impl Fn(&mut ListController<V>, E) + 'static,
    ) -> Callback<E> {
        let controller = self.controller.clone();
        let refresh = self.refresh.clone();
        Callback::from(move |event: E| {
            act(&mut controller.borrow_mut(), event);
            refresh.emit(());
        })
    }

    /// Keystroke handler for the search box. The term is applied once typing has
    /// been quiet for the debounce window.
    #[must_use]
    pub fn on_search(&self) -> Callback<String> {
        let controller = self.controller.clone();
        let refresh = self.refresh.clone();
        let sleeper = self.sleeper.clone();
        Callback::from(move |raw: String| {
            let (ticket, now) = {
                let mut ctl = controller.borrow_mut();
                (ctl.input_search(&raw), ctl.client().clock().now_ms())
            };
            refresh.emit(());
            let delay = ticket.due_at().saturating_sub(now);
            let controller = controller.clone();
            let refresh = refresh.clone();
            let timer = sleeper.sleep(delay);
            wasm_bindgen_futures::spawn_local(async move {
                timer.await;
                if controller.borrow_mut().settle_search(ticket) {
                    refresh.emit(());
                }
            });
        })
    }

    /// Warm the detail read behind `row`.
    #[must_use]
    pub fn on_hover(&self) -> Callback<V::Row> {
        let controller = self.controller.clone();
        Callback::from(move |row: V::Row| controller.borrow().prefetch_detail(&row))
    }

    #[must_use]
    pub fn on_hover_next(&self) -> Callback<()> {
        let controller = self.controller.clone();
        Callback::from(move |()| controller.borrow().prefetch_next_page())
    }
}

/// Mount a list controller for the lifetime of the calling component.
///
/// The controller follows cache updates, game switches and back/forward navigation,
/// and loads its view's domain whenever the domain key changes.
#[hook]
pub fn use_list_controller<V: ListView>(services: &Services) -> ListHandle<V> {
    let update = use_force_update();
    let controller = {
        let client = services.client.clone();
        let location = services.location.clone();
        use_mut_ref(move || ListController::<V>::mount(client, location, V::Domain::default()))
    };
    let refresh = {
        let update = update.clone();
        Callback::from(move |()| update.force_update())
    };

    {
        let controller = controller.clone();
        let client = services.client.clone();
        let update = update.clone();
        use_effect_with((), move |()| {
            let cache_sub = client.cache().subscribe({
                let update = update.clone();
                move |_| update.force_update()
            });
            let game_sub = client.game().subscribe({
                let controller = controller.clone();
                let update = update.clone();
                move |game: &GameId| {
                    log::debug!("{} following game {game}", V::VIEW.as_str());
                    match controller.try_borrow_mut() {
                        Ok(mut ctl) => ctl.on_game_change(),
                        Err(_) => log::warn!("{} busy during game switch", V::VIEW.as_str()),
                    }
                    update.force_update();
                }
            });
            let popstate = PopStateListener::new(move |_| {
                if controller.borrow_mut().on_location_change() {
                    update.force_update();
                }
            });
            move || {
                drop(popstate);
                drop(game_sub);
                drop(cache_sub);
            }
        });
    }

    let domain_key = controller.borrow().domain_key();
    let domain_error = use_state(|| None::<QueryError>);
    let domain_round = use_state(|| 0_u32);
    {
        let controller = controller.clone();
        let domain_error = domain_error.clone();
        let refresh = refresh.clone();
        use_effect_with((domain_key, *domain_round), move |(key, _)| {
            let pending = controller.borrow().load_domain();
            if let Some(pending) = pending {
                let expected = key.clone();
                domain_error.set(None);
                wasm_bindgen_futures::spawn_local(async move {
                    match pending.await {
                        Ok(domain) => {
                            let mut ctl = controller.borrow_mut();
                            if ctl.domain_key() == expected {
                                ctl.set_domain(domain);
                            }
                            drop(ctl);
                            refresh.emit(());
                        }
                        Err(err) => {
                            log::warn!("{} domain failed: {err}", V::VIEW.as_str());
                            if controller.borrow().domain_key() == expected {
                                domain_error.set(Some(err));
                            }
                        }
                    }
                });
            }
            || ()
        });
    }
    let retry_domain = {
        let domain_round = domain_round.clone();
        Callback::from(move |()| domain_round.set(domain_round.wrapping_add(1)))
    };

    ListHandle {
        controller,
        refresh,
        sleeper: services.sleeper.clone(),
        domain_error: (*domain_error).clone(),
        retry_domain,
    }
}

/// Single-record read shown by the detail pages.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState<T> {
    Loading,
    Ready(T),
    Missing,
    Failed(QueryError),
}

/// Read one record through the cache, re-reading when `read`'s key changes.
/// The key stays observed while mounted, so the cache will not reclaim it.
#[hook]
pub fn use_detail<T>(services: &Services, read: (QueryKey, QueryRequest)) -> (DetailState<T>, Callback<()>)
where
    T: DeserializeOwned + Clone + PartialEq + 'static,
{
    let state = use_state(|| DetailState::<T>::Loading);
    let round = use_state(|| 0_u32);
    let (key, request) = read;
    {
        let state = state.clone();
        let client = services.client.clone();
        use_effect_with((key, *round), move |(key, _)| {
            state.set(DetailState::Loading);
            let observer = client.observe(key);
            let live = Rc::new(Cell::new(true));
            let pending = client.ensure(key, request);
            {
                let live = live.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let next = match pending.await {
                        Ok(response) => match first_row::<T>(&response) {
                            Ok(Some(record)) => DetailState::Ready(record),
                            Ok(None) => DetailState::Missing,
                            Err(err) => DetailState::Failed(err),
                        },
                        Err(err) => DetailState::Failed(err),
                    };
                    // A newer key or retry owns the state now.
                    if live.get() {
                        state.set(next);
                    }
                });
            }
            move || {
                live.set(false);
                drop(observer);
            }
        });
    }
    let retry = {
        let round = round.clone();
        Callback::from(move |()| round.set(round.wrapping_add(1)))
    };
    ((*state).clone(), retry)
}

/// Active game, re-rendering the caller whenever it changes.
#[hook]
pub fn use_active_game(services: &Services) -> GameId {
    let game = services.client.game().clone();
    let active = use_state(|| game.active_game());
    {
        let active = active.clone();
        use_effect_with((), move |()| {
            let subscription = game.subscribe(move |next: &GameId| active.set(next.clone()));
            move || drop(subscription)
        });
    }
    (*active).clone()
}
