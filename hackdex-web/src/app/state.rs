use hackdex_core::{
    Clock, DexClient, GameContext, Location, PreferenceStore, QueryParams, QueryTransport, Sleeper,
    Spawner,
};
use std::rc::Rc;
use yew::prelude::*;

/// Shared handles every screen reads through. Provided once at the root as a context.
#[derive(Clone)]
pub struct Services {
    pub client: DexClient,
    pub transport: Rc<dyn QueryTransport>,
    pub location: Rc<dyn Location>,
    pub sleeper: Rc<dyn Sleeper>,
}

impl PartialEq for Services {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.transport, &other.transport) && Rc::ptr_eq(&self.location, &other.location)
    }
}

impl Services {
    /// Resolve the active game from the address bar and saved preference, then wire
    /// the client around it.
    #[must_use]
    pub fn new(
        transport: Rc<dyn QueryTransport>,
        location: Rc<dyn Location>,
        preferences: Rc<dyn PreferenceStore>,
        clock: Rc<dyn Clock>,
        spawner: Rc<dyn Spawner>,
        sleeper: Rc<dyn Sleeper>,
    ) -> Self {
        let game = GameContext::resolve(&QueryParams::parse(&location.search()), preferences);
        log::info!("active game {}", game.active_game());
        let client = DexClient::new(transport.clone(), game, clock, spawner);
        Self {
            client,
            transport,
            location,
            sleeper,
        }
    }

    /// Services backed by the browser and the configured REST store.
    #[must_use]
    pub fn browser() -> Self {
        use crate::platform::{BrowserClock, BrowserLocation, BrowserSleeper, BrowserSpawner, LocalPreferences};
        Self::new(
            Rc::new(crate::transport::RestTransport::new(crate::config::StoreConfig::from_env())),
            Rc::new(BrowserLocation),
            Rc::new(LocalPreferences),
            Rc::new(BrowserClock),
            Rc::new(BrowserSpawner),
            Rc::new(BrowserSleeper),
        )
    }
}

/// Services from the nearest provider.
///
/// # Panics
/// Panics when called outside the root `ContextProvider<Services>`.
#[hook]
pub fn use_services() -> Services {
    use_context::<Services>().expect("Services context should be provided by the app root")
}
