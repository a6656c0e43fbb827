//! Compile-time deployment settings for the remote store.

const DEFAULT_STORE_URL: &str = "http://localhost:54321";

/// Where and how to reach the store's REST endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl StoreConfig {
    /// Read `HACKDEX_STORE_URL` and `HACKDEX_STORE_KEY` as baked in at build time.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_values(option_env!("HACKDEX_STORE_URL"), option_env!("HACKDEX_STORE_KEY"))
    }

    fn from_values(url: Option<&str>, key: Option<&str>) -> Self {
        let base_url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_STORE_URL)
            .trim_end_matches('/')
            .to_string();
        let api_key = key.map(str::trim).filter(|k| !k.is_empty()).map(String::from);
        Self { base_url, api_key }
    }

    /// Absolute URL of a REST path such as `pokedex_view?select=*`.
    #[must_use]
    pub fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Maximum log level, from `HACKDEX_LOG` at build time (default `info`).
#[must_use]
pub fn log_level() -> log::LevelFilter {
    parse_level(option_env!("HACKDEX_LOG"))
}

fn parse_level(raw: Option<&str>) -> log::LevelFilter {
    raw.and_then(|v| v.trim().parse().ok())
        .unwrap_or(log::LevelFilter::Info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_url_defaults_and_trims() {
        let config = StoreConfig::from_values(None, Some("  "));
        assert_eq!(config.base_url, DEFAULT_STORE_URL);
        assert_eq!(config.api_key, None);

        let config = StoreConfig::from_values(Some("https://db.example.org/"), Some("anon"));
        assert_eq!(
            config.rest_url("/pokedex_view?select=*"),
            "https://db.example.org/rest/v1/pokedex_view?select=*"
        );
        assert_eq!(config.api_key.as_deref(), Some("anon"));
    }

    #[test]
    fn log_level_parses_names() {
        assert_eq!(parse_level(Some("debug")), log::LevelFilter::Debug);
        assert_eq!(parse_level(Some("WARN")), log::LevelFilter::Warn);
        assert_eq!(parse_level(Some("chatty")), log::LevelFilter::Info);
        assert_eq!(parse_level(None), log::LevelFilter::Info);
    }
}
