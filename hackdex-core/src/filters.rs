//! Filter value normalization shared by the list views.
//!
//! Values arriving from the URL are checked against the domain the current dataset
//! allows. Anything outside it collapses to the view default instead of failing,
//! since stale shared links are expected after data changes.

use serde::{Deserialize, Serialize};

use crate::constants::{ALL, ELEMENTAL_TYPES};

/// Time-of-day toggle. `All` is the canonical cleared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    #[default]
    All,
    Day,
    Night,
}

impl TimeOfDay {
    pub const OPTIONS: [Self; 3] = [Self::All, Self::Day, Self::Night];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => ALL,
            Self::Day => "day",
            Self::Night => "night",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" | "any" => Some(Self::All),
            "day" => Some(Self::Day),
            "night" => Some(Self::Night),
            _ => None,
        }
    }

    /// Result of activating `clicked`: re-activating the current option clears the
    /// toggle back to `All` rather than to an empty value.
    #[must_use]
    pub fn toggle(self, clicked: Self) -> Self {
        if clicked == self { Self::All } else { clicked }
    }
}

/// Keep `raw` only if it names one of `allowed` (case-insensitively), returning the
/// domain's spelling; otherwise `"all"`.
#[must_use]
pub fn normalize_choice<S: AsRef<str>>(raw: Option<&str>, allowed: &[S]) -> String {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| {
            allowed
                .iter()
                .map(|a| a.as_ref())
                .find(|a: &&str| a.eq_ignore_ascii_case(v))
        })
        .map_or_else(|| ALL.to_string(), str::to_string)
}

/// Elemental type filter value, `"all"` when absent or unknown.
#[must_use]
pub fn normalize_type(raw: Option<&str>) -> String {
    normalize_choice(raw, &ELEMENTAL_TYPES)
}

/// Trimmed free-text search.
#[must_use]
pub fn normalize_search(raw: Option<&str>) -> String {
    raw.map(str::trim).unwrap_or_default().to_string()
}

#[must_use]
pub fn is_all(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case(ALL)
}
