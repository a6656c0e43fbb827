//! Tunables shared by the cache, controllers and preflight probe.

/// Rows shown per list page. One extra row is requested to detect further pages.
pub const PAGE_SIZE: u32 = 50;

/// Quiescence delay before a raw search term is treated as changed.
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

/// Freshness window of a resolved cache entry.
pub const STALE_TIME_MS: u64 = 5 * 60 * 1000;

/// Disuse window after which an unobserved cache entry is reclaimed.
pub const GC_TIME_MS: u64 = 15 * 60 * 1000;

/// Game used when neither the URL nor a saved preference names one.
pub const FALLBACK_GAME: &str = "FRO";

/// Preference key holding the last selected game.
pub const GAME_PREFERENCE_KEY: &str = "hackdex.game";

/// URL parameter carrying the active game.
pub const GAME_PARAM: &str = "game";

/// Canonical value of a cleared choice filter.
pub const ALL: &str = "all";

/// Automatic connectivity probe attempts before a manual retry is offered.
pub const PREFLIGHT_ATTEMPTS: u32 = 3;

/// Delay between automatic connectivity probe attempts.
pub const PREFLIGHT_RETRY_DELAY_MS: u64 = 1_000;

/// Elemental types accepted by the `type` filter, in display order.
pub const ELEMENTAL_TYPES: [&str; 18] = [
    "normal", "fire", "water", "grass", "electric", "ice", "fighting", "poison", "ground",
    "flying", "psychic", "bug", "rock", "ghost", "dragon", "dark", "steel", "fairy",
];
