//! Generation-tagged debouncing for raw search input.
//!
//! Each keystroke takes a ticket. The event loop schedules a timer per ticket and
//! hands it back through [`Debouncer::settle`] once the delay elapses. Only the
//! newest ticket can settle, and only after its own quiescence deadline.

use std::rc::Rc;

use crate::constants::SEARCH_DEBOUNCE_MS;
use crate::runtime::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket {
    generation: u64,
    due_at: u64,
}

impl DebounceTicket {
    #[must_use]
    pub const fn due_at(self) -> u64 {
        self.due_at
    }
}

pub struct Debouncer {
    clock: Rc<dyn Clock>,
    delay_ms: u64,
    generation: u64,
    pending: Option<String>,
}

impl Debouncer {
    #[must_use]
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self::with_delay(clock, SEARCH_DEBOUNCE_MS)
    }

    #[must_use]
    pub fn with_delay(clock: Rc<dyn Clock>, delay_ms: u64) -> Self {
        Self {
            clock,
            delay_ms,
            generation: 0,
            pending: None,
        }
    }

    #[must_use]
    pub const fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Record a raw value, superseding any earlier ticket.
    pub fn input(&mut self, raw: impl Into<String>) -> DebounceTicket {
        self.generation += 1;
        self.pending = Some(raw.into());
        DebounceTicket {
            generation: self.generation,
            due_at: self.clock.now_ms().saturating_add(self.delay_ms),
        }
    }

    /// Release the pending value if `ticket` is still the newest and due.
    pub fn settle(&mut self, ticket: DebounceTicket) -> Option<String> {
        if ticket.generation != self.generation || self.clock.now_ms() < ticket.due_at {
            return None;
        }
        self.pending.take()
    }

    /// Drop any pending value, e.g. when the filter is replaced from the URL.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.pending = None;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
