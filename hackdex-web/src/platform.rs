//! Browser implementations of the core runtime seams.

use futures::future::LocalBoxFuture;
use hackdex_core::{Clock, Location, PreferenceStore, Sleeper, Spawner, StorageError};
use wasm_bindgen::JsValue;

use crate::dom;

/// Preferences persisted in `localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalPreferences;

impl PreferenceStore for LocalPreferences {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let storage = dom::local_storage().map_err(|_| StorageError::Unavailable)?;
        storage
            .get_item(key)
            .map_err(|e| StorageError::Read(dom::js_error_message(&e)))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = dom::local_storage().map_err(|_| StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write(dom::js_error_message(&e)))
    }
}

/// The real address bar. Only the query string is rewritten; the path and hash stay.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserLocation;

impl BrowserLocation {
    fn write(search: &str, push: bool) {
        let (path, _) = dom::current_path_and_search();
        let hash = dom::window().location().hash().unwrap_or_default();
        let url = target_url(&path, search, &hash);
        let result = dom::history().and_then(|history| {
            if push {
                history.push_state_with_url(&JsValue::NULL, "", Some(&url))
            } else {
                history.replace_state_with_url(&JsValue::NULL, "", Some(&url))
            }
        });
        if let Err(err) = result {
            log::warn!("history update to {url} failed: {}", dom::js_error_message(&err));
        }
    }
}

impl Location for BrowserLocation {
    fn search(&self) -> String {
        dom::current_path_and_search().1
    }

    fn replace_search(&self, search: &str) {
        Self::write(search, false);
    }

    fn push_search(&self, search: &str) {
        Self::write(search, true);
    }
}

/// Relative URL for a history entry: path, query string (with `?`) and hash.
#[must_use]
pub fn target_url(path: &str, search: &str, hash: &str) -> String {
    let path = if path.is_empty() { "/" } else { path };
    let search = match search.strip_prefix('?').unwrap_or(search) {
        "" => String::new(),
        rest => format!("?{rest}"),
    };
    format!("{path}{search}{hash}")
}

/// `Date.now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn now_ms(&self) -> u64 {
        dom::now_ms().max(0.0) as u64
    }
}

/// Detached tasks on the browser microtask queue.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSpawner;

impl Spawner for BrowserSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

/// `setTimeout`-backed timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSleeper;

impl Sleeper for BrowserSleeper {
    fn sleep(&self, duration_ms: u64) -> LocalBoxFuture<'static, ()> {
        let duration = i32::try_from(duration_ms).unwrap_or(i32::MAX);
        Box::pin(async move {
            if let Err(err) = dom::sleep_ms(duration).await {
                log::warn!("timer failed: {}", dom::js_error_message(&err));
            }
        })
    }
}
