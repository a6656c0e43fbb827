use colored::Colorize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::ScenarioResult;
use crate::scenarios::{Scenario, get_scenario};

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("unknown scenario")]
    Unknown,
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
    #[error("scenario aborted: {0}")]
    Aborted(String),
    #[error("{0:#}")]
    Failed(anyhow::Error),
}

/// Run each named scenario on a blocking worker, in order, bounded by `timeout`.
pub async fn run_scenarios(
    names: &[String],
    fixture: Arc<str>,
    timeout: Duration,
    verbose: bool,
) -> Vec<ScenarioResult> {
    let mut results = Vec::with_capacity(names.len());
    for name in names {
        let started = Instant::now();
        let outcome = match get_scenario(name) {
            Some(scenario) => run_one(scenario, fixture.clone(), timeout).await,
            None => Err(RunError::Unknown),
        };
        let duration = started.elapsed();

        match &outcome {
            Ok(()) => println!("✅ {} - {:?}", name.green(), duration),
            Err(RunError::Unknown) => eprintln!("⚠️  Unknown scenario: {}", name.yellow()),
            Err(err) => eprintln!("❌ {} - {:?}: {}", name.red(), duration, err),
        }
        if verbose {
            if let Some(scenario) = get_scenario(name) {
                println!("   {}", scenario.description.dimmed());
            }
        }

        results.push(ScenarioResult {
            scenario_name: name.clone(),
            passed: outcome.is_ok(),
            failure: outcome.err().map(|err| err.to_string()),
            duration,
        });
    }
    results
}

async fn run_one(scenario: &'static Scenario, fixture: Arc<str>, timeout: Duration) -> Result<(), RunError> {
    log::debug!("starting scenario {}", scenario.key);
    let task = tokio::task::spawn_blocking(move || (scenario.run)(&fixture));
    match tokio::time::timeout(timeout, task).await {
        Err(_) => Err(RunError::TimedOut(timeout)),
        Ok(Err(join)) => Err(RunError::Aborted(join.to_string())),
        Ok(Ok(result)) => result.map_err(RunError::Failed),
    }
}
