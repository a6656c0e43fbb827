//! Startup connectivity probe.
//!
//! The only automatic retry in the system: a bounded number of attempts with a fixed
//! pause between them, after which the caller offers a manual retry.

use crate::QueryTransport;
use crate::constants::{PREFLIGHT_ATTEMPTS, PREFLIGHT_RETRY_DELAY_MS};
use crate::query::{QueryError, QueryRequest};
use crate::runtime::Sleeper;
use crate::views::pokedex::POKEDEX_COLLECTION;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreflightPolicy {
    pub attempts: u32,
    pub delay_ms: u64,
}

impl Default for PreflightPolicy {
    fn default() -> Self {
        Self {
            attempts: PREFLIGHT_ATTEMPTS,
            delay_ms: PREFLIGHT_RETRY_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreflightOutcome {
    Connected { attempts: u32 },
    Unreachable { attempts: u32, error: QueryError },
}

impl PreflightOutcome {
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }
}

/// Probe the store with a one-row read.
pub async fn preflight(
    transport: &dyn QueryTransport,
    sleeper: &dyn Sleeper,
    policy: PreflightPolicy,
) -> PreflightOutcome {
    let probe = QueryRequest::new(POKEDEX_COLLECTION).range(0, 0);
    let attempts = policy.attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match transport.execute(&probe).await {
            Ok(_) => {
                log::info!("store reachable after {attempt} attempt(s)");
                return PreflightOutcome::Connected { attempts: attempt };
            }
            Err(error) if attempt >= attempts => {
                log::error!("store unreachable: {error}");
                return PreflightOutcome::Unreachable {
                    attempts: attempt,
                    error,
                };
            }
            Err(error) => {
                log::warn!("preflight attempt {attempt}/{attempts} failed: {error}");
                sleeper.sleep(policy.delay_ms).await;
            }
        }
    }
}
