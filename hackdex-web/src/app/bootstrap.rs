use hackdex_core::{PreflightOutcome, PreflightPolicy, preflight};
use yew::prelude::*;

use crate::app::state::Services;

/// How often unobserved cache entries are swept.
const GC_INTERVAL_MS: u64 = 60_000;

/// Store reachability as shown in the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connectivity {
    Checking,
    Online,
    Offline(String),
}

impl Connectivity {
    #[must_use]
    pub fn from_outcome(outcome: &PreflightOutcome) -> Self {
        match outcome {
            PreflightOutcome::Connected { .. } => Self::Online,
            PreflightOutcome::Unreachable { attempts, error } => {
                Self::Offline(format!("{error} (after {attempts} attempts)"))
            }
        }
    }

    #[must_use]
    pub const fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }
}

/// Probe the store once on startup. The returned callback starts another round
/// after the automatic attempts are spent.
#[hook]
pub fn use_preflight(services: &Services) -> (Connectivity, Callback<()>) {
    let status = use_state(|| Connectivity::Checking);
    let round = use_state(|| 0_u32);

    {
        let status = status.clone();
        let transport = services.transport.clone();
        let sleeper = services.sleeper.clone();
        use_effect_with(*round, move |_| {
            status.set(Connectivity::Checking);
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = preflight(&*transport, &*sleeper, PreflightPolicy::default()).await;
                status.set(Connectivity::from_outcome(&outcome));
            });
            || ()
        });
    }

    let retry = {
        let round = round.clone();
        Callback::from(move |()| round.set(round.wrapping_add(1)))
    };
    ((*status).clone(), retry)
}

/// Sweep the cache on a timer for as long as the app is mounted.
#[hook]
pub fn use_cache_gc(services: &Services) {
    let cache = services.client.cache().clone();
    let sleeper = services.sleeper.clone();
    use_effect_with((), move |()| {
        let alive = std::rc::Rc::new(std::cell::Cell::new(true));
        let running = alive.clone();
        wasm_bindgen_futures::spawn_local(async move {
            while running.get() {
                sleeper.sleep(GC_INTERVAL_MS).await;
                let reclaimed = cache.collect_garbage();
                if reclaimed > 0 {
                    log::debug!("cache gc reclaimed {reclaimed} entries");
                }
            }
        });
        move || alive.set(false)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use hackdex_core::QueryError;

    #[test]
    fn outcomes_map_to_shell_states() {
        assert_eq!(
            Connectivity::from_outcome(&PreflightOutcome::Connected { attempts: 2 }),
            Connectivity::Online
        );
        let offline = Connectivity::from_outcome(&PreflightOutcome::Unreachable {
            attempts: 3,
            error: QueryError::Network(String::from("timeout")),
        });
        assert_eq!(
            offline,
            Connectivity::Offline(String::from("Network error: timeout (after 3 attempts)"))
        );
        assert!(!offline.is_online());
    }
}
