//! Hackdex Core
//!
//! Platform-agnostic state synchronization for the Hackdex ROM-hack data browser.
//! This crate owns the active game, URL query sync, the keyed query cache and the
//! list view controllers, without UI or browser dependencies.

pub mod cache;
pub mod client;
pub mod constants;
pub mod controller;
pub mod debounce;
pub mod filters;
pub mod game;
pub mod memory;
pub mod pagination;
pub mod params;
pub mod preflight;
pub mod query;
pub mod runtime;
pub mod views;

// Re-export commonly used types
pub use cache::{
    CachePolicy, CacheSubscription, InvalidateAll, QueryCache, QueryKey, QueryObserver,
    QuerySnapshot, QueryStatus, ViewId,
};
pub use client::DexClient;
pub use controller::{EmptyKind, ListController, ViewState, ViewStatus};
pub use debounce::{DebounceTicket, Debouncer};
pub use filters::TimeOfDay;
pub use game::{GameContext, GameId, GameInfo, GameSubscription, KNOWN_GAMES, MemoryPreferences};
pub use memory::MemoryStore;
pub use pagination::{PageWindow, Paged};
pub use params::{HistoryMode, Location, MemoryLocation, QueryParams, UrlSync};
pub use preflight::{PreflightOutcome, PreflightPolicy, preflight};
pub use query::{Direction, Filter, FilterOp, OrderBy, QueryError, QueryRequest, QueryResponse};
pub use runtime::{Clock, ManualClock, Sleeper, Spawner};
pub use views::{
    EncounterDomain, EncounterFilters, EncounterRow, EncountersView, ListView, PokedexFilters,
    PokedexRow, PokedexView, PokemonDetail, TrainerDetail, TrainerDomain, TrainerFilters,
    TrainerRow, TrainersView,
};

use futures::future::LocalBoxFuture;

/// Trait for abstracting reads against the remote data store
/// Platform-specific implementations should provide this
pub trait QueryTransport {
    /// Execute one read
    ///
    /// # Errors
    ///
    /// Resolves to an error if the store is unreachable, rejects the request, or
    /// answers with something that is not a list of rows.
    fn execute(&self, request: &QueryRequest)
    -> LocalBoxFuture<'static, Result<QueryResponse, QueryError>>;
}

/// Trait for abstracting small persisted key/value preferences
pub trait PreferenceStore {
    /// Load a stored value
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store a value
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage rejects the write.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage read failed: {0}")]
    Read(String),
    #[error("storage write failed: {0}")]
    Write(String),
}
