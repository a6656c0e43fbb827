use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Store document bundled with the tester.
pub const BUNDLED_FIXTURE: &str = include_str!("../../fixtures/store.json");

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Read a store document from `path`, or the bundled one when no path is given.
pub fn load_fixture(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture {}", path.display())),
        None => Ok(BUNDLED_FIXTURE.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" smoke, ,race,  retry ");
        assert_eq!(parts, vec!["smoke", "race", "retry"]);
    }

    #[test]
    fn load_fixture_defaults_to_bundled_document() {
        let fixture = load_fixture(None).unwrap();
        assert!(fixture.contains("pokedex_view"));
    }

    #[test]
    fn load_fixture_reports_missing_file() {
        let missing = std::env::temp_dir().join("hackdex-missing-fixture.json");
        let err = load_fixture(Some(&missing)).unwrap_err();
        assert!(format!("{err:#}").contains("hackdex-missing-fixture.json"));
    }
}
