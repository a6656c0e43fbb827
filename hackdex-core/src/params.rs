//! Address-bar query string binding.
//!
//! [`UrlSync`] keeps a view's filter parameters and the location's query string
//! mutually derivable. Writes compare canonical serializations first, so writing the
//! current state back is a no-op and cannot start a URL ⇄ state update loop.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use url::form_urlencoded;

/// Query string parameters keyed by name, serialized in key order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `?a=1&b=2` (leading `?` optional). Later duplicates win.
    #[must_use]
    pub fn parse(search: &str) -> Self {
        let raw = search.strip_prefix('?').unwrap_or(search);
        Self(
            form_urlencoded::parse(raw.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        )
    }

    /// Canonical query string including the leading `?`, or empty when no
    /// non-empty parameter remains.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        let mut any = false;
        for (key, value) in self.0.iter().filter(|(_, v)| !v.is_empty()) {
            serializer.append_pair(key, value);
            any = true;
        }
        if any {
            format!("?{}", serializer.finish())
        } else {
            String::new()
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Non-empty, trimmed value of `key`.
    #[must_use]
    pub fn get_nonempty(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Set `key`; an empty value removes it.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.0.remove(key);
        } else {
            self.0.insert(key.to_string(), value);
        }
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.set(&k.into(), v);
        }
        params
    }
}

/// Whether a write adds a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    Replace,
    Push,
}

/// The address bar, minus path changes.
pub trait Location {
    /// Current query string, with or without a leading `?`.
    fn search(&self) -> String;
    /// Swap the query string in place.
    fn replace_search(&self, search: &str);
    /// Swap the query string, adding a history entry.
    fn push_search(&self, search: &str);
}

/// In-memory location with a history stack.
#[derive(Debug, Clone, Default)]
pub struct MemoryLocation {
    history: Rc<RefCell<Vec<String>>>,
    index: Rc<Cell<usize>>,
    writes: Rc<Cell<usize>>,
}

impl MemoryLocation {
    #[must_use]
    pub fn new(search: &str) -> Self {
        Self {
            history: Rc::new(RefCell::new(vec![search.to_string()])),
            index: Rc::new(Cell::new(0)),
            writes: Rc::new(Cell::new(0)),
        }
    }

    /// Number of replace or push writes received.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.borrow().len()
    }

    /// Step back one history entry, like the browser back button.
    pub fn back(&self) -> bool {
        let index = self.index.get();
        if index == 0 {
            return false;
        }
        self.index.set(index - 1);
        true
    }

    /// Simulate the user editing the address bar.
    pub fn navigate_external(&self, search: &str) {
        self.push_entry(search);
    }

    fn push_entry(&self, search: &str) {
        let mut history = self.history.borrow_mut();
        history.truncate(self.index.get() + 1);
        history.push(search.to_string());
        self.index.set(history.len() - 1);
    }
}

impl Location for MemoryLocation {
    fn search(&self) -> String {
        self.history
            .borrow()
            .get(self.index.get())
            .cloned()
            .unwrap_or_default()
    }

    fn replace_search(&self, search: &str) {
        self.writes.set(self.writes.get() + 1);
        if let Some(slot) = self.history.borrow_mut().get_mut(self.index.get()) {
            *slot = search.to_string();
        }
    }

    fn push_search(&self, search: &str) {
        self.writes.set(self.writes.get() + 1);
        self.push_entry(search);
    }
}

/// Binding between a [`Location`] and canonical [`QueryParams`].
#[derive(Clone)]
pub struct UrlSync {
    location: Rc<dyn Location>,
}

impl UrlSync {
    #[must_use]
    pub fn new(location: Rc<dyn Location>) -> Self {
        Self { location }
    }

    #[must_use]
    pub fn read_params(&self) -> QueryParams {
        QueryParams::parse(&self.location.search())
    }

    /// Write `next` to the address bar. Returns `false` without touching the
    /// location when `next` already matches the current canonical serialization.
    pub fn write_params(&self, next: &QueryParams, mode: HistoryMode) -> bool {
        let target = next.to_query_string();
        if self.read_params().to_query_string() == target {
            return false;
        }
        log::debug!("url sync {mode:?} -> {target:?}");
        match mode {
            HistoryMode::Replace => self.location.replace_search(&target),
            HistoryMode::Push => self.location.push_search(&target),
        }
        true
    }
}
