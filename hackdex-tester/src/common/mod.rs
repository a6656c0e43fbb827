pub mod reports;
pub mod runner;
pub mod util;

pub use reports::ScenarioResult;
pub use runner::run_scenarios;
pub use util::{load_fixture, split_csv};
