//! Active game selection.
//!
//! One process-wide cell, written only through [`GameContext::set_active_game`].
//! Its initial value is resolved once, in priority order: the URL `game` parameter,
//! the persisted preference, then [`FALLBACK_GAME`].

use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::cache::InvalidateAll;
use crate::constants::{FALLBACK_GAME, GAME_PARAM, GAME_PREFERENCE_KEY};
use crate::params::QueryParams;
use crate::{PreferenceStore, StorageError};

/// Opaque, non-empty game identifier. The store decides whether it exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameId(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("game identifier must not be empty")]
pub struct EmptyGameId;

impl GameId {
    /// # Errors
    ///
    /// Returns [`EmptyGameId`] for blank input.
    pub fn new(raw: &str) -> Result<Self, EmptyGameId> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Err(EmptyGameId)
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn fallback() -> Self {
        Self(FALLBACK_GAME.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Picker metadata for a selectable game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameInfo {
    pub id: &'static str,
    pub name: &'static str,
}

pub const KNOWN_GAMES: &[GameInfo] = &[
    GameInfo {
        id: "FRO",
        name: "FireRed Omega",
    },
    GameInfo {
        id: "ERX",
        name: "Emerald Rogue X",
    },
    GameInfo {
        id: "RBD",
        name: "Radical Red",
    },
    GameInfo {
        id: "UNB",
        name: "Unbound",
    },
];

#[must_use]
pub fn game_info(id: &GameId) -> Option<&'static GameInfo> {
    KNOWN_GAMES.iter().find(|g| g.id == id.as_str())
}

type GameListener = Rc<dyn Fn(&GameId)>;

struct GameContextInner {
    active: RefCell<GameId>,
    store: Rc<dyn PreferenceStore>,
    caches: RefCell<Vec<Rc<dyn InvalidateAll>>>,
    listeners: RefCell<Vec<(u64, GameListener)>>,
    next_listener: Cell<u64>,
}

/// Shared handle to the active game. Clones observe the same cell.
#[derive(Clone)]
pub struct GameContext {
    inner: Rc<GameContextInner>,
}

impl GameContext {
    /// Resolve the initial game from `url`, then `store`, then the fallback.
    #[must_use]
    pub fn resolve(url: &QueryParams, store: Rc<dyn PreferenceStore>) -> Self {
        let from_url = url.get_nonempty(GAME_PARAM).and_then(|v| GameId::new(v).ok());
        let from_store = || match store.load(GAME_PREFERENCE_KEY) {
            Ok(value) => value.and_then(|v| GameId::new(&v).ok()),
            Err(err) => {
                log::warn!("ignoring unreadable game preference: {err}");
                None
            }
        };
        let active = from_url.or_else(from_store).unwrap_or_else(GameId::fallback);
        log::debug!("active game resolved to {active}");
        Self {
            inner: Rc::new(GameContextInner {
                active: RefCell::new(active),
                store,
                caches: RefCell::new(Vec::new()),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
            }),
        }
    }

    #[must_use]
    pub fn active_game(&self) -> GameId {
        self.inner.active.borrow().clone()
    }

    /// Register a cache that must be invalidated whenever the game changes.
    pub fn attach_cache(&self, cache: Rc<dyn InvalidateAll>) {
        self.inner.caches.borrow_mut().push(cache);
    }

    /// Switch games. Persists the choice (best effort), invalidates every attached
    /// cache and notifies listeners. Returns `false` when `id` is already active.
    pub fn set_active_game(&self, id: GameId) -> bool {
        if *self.inner.active.borrow() == id {
            return false;
        }
        log::info!("switching game to {id}");
        self.inner.active.replace(id.clone());
        if let Err(err) = self.inner.store.save(GAME_PREFERENCE_KEY, id.as_str()) {
            log::warn!("game preference not persisted: {err}");
        }
        let caches = self.inner.caches.borrow().clone();
        for cache in caches {
            cache.invalidate_all();
        }
        let listeners: Vec<GameListener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(&id);
        }
        true
    }

    /// Call `listener` after every game switch until the returned guard drops.
    #[must_use]
    pub fn subscribe(&self, listener: impl Fn(&GameId) + 'static) -> GameSubscription {
        let id = self.inner.next_listener.get();
        self.inner.next_listener.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        GameSubscription {
            inner: Rc::downgrade(&self.inner),
            id,
        }
    }
}

/// Unsubscribes its listener on drop.
pub struct GameSubscription {
    inner: std::rc::Weak<GameContextInner>,
    id: u64,
}

impl Drop for GameSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.listeners.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

/// Preference store backed by a map, for native runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: Rc<RefCell<HashMap<String, String>>>,
    fail_writes: Rc<Cell<bool>>,
}

impl MemoryPreferences {
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let prefs = Self::default();
        prefs
            .values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        prefs
    }

    /// Make every later write fail, like a full or disabled browser storage.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::Write(format!("{key} rejected")));
        }
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
