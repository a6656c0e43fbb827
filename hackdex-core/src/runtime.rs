//! Event-loop seams: time, task spawning and timers.
//!
//! The core never touches a concrete executor. Browsers plug in `spawn_local` and
//! `Date.now()`, tests plug in a `LocalPool` and a manual clock.

use futures::future::LocalBoxFuture;
use std::cell::Cell;
use std::rc::Rc;

/// Millisecond wall clock.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Runs detached futures on the current thread's event loop.
pub trait Spawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

/// Timer used by the preflight probe between automatic attempts.
pub trait Sleeper {
    fn sleep(&self, duration_ms: u64) -> LocalBoxFuture<'static, ()>;
}

/// Clock backed by `SystemTime`, for native targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or_default()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    #[must_use]
    pub fn starting_at(now_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(now_ms)),
        }
    }

    pub fn advance(&self, delta_ms: u64) {
        self.now.set(self.now.get().saturating_add(delta_ms));
    }

    pub fn set(&self, now_ms: u64) {
        self.now.set(now_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

impl Spawner for futures::executor::LocalSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        use futures::task::LocalSpawnExt;
        if let Err(err) = self.spawn_local(task) {
            log::warn!("executor refused task: {err}");
        }
    }
}

/// Sleeper that resolves immediately while recording the requested delays.
#[derive(Debug, Clone, Default)]
pub struct InstantSleeper {
    slept: Rc<Cell<u64>>,
}

impl InstantSleeper {
    /// Total milliseconds requested so far.
    #[must_use]
    pub fn slept_ms(&self) -> u64 {
        self.slept.get()
    }
}

impl Sleeper for InstantSleeper {
    fn sleep(&self, duration_ms: u64) -> LocalBoxFuture<'static, ()> {
        self.slept.set(self.slept.get().saturating_add(duration_ms));
        Box::pin(futures::future::ready(()))
    }
}
