//! Debounce timer primitive.
//!
//! The editor defers expensive derived-state work (re-highlighting, word-index rebuilds,
//! selection-driven occurrence scans) behind cancel-and-reschedule deadlines: every
//! triggering event replaces the previous deadline, so a burst of events produces exactly
//! one execution after the burst settles. Timers hold no threads; the single-threaded host
//! polls them from its event loop.

use std::time::{Duration, Instant};

/// A cancel-and-reschedule deadline.
///
/// At most one execution is pending at any time: [`schedule`](Self::schedule) replaces any
/// previous deadline, and [`poll`](Self::poll) fires at most once per schedule.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Create a debouncer with a fixed delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// The configured delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule (or reschedule) the deadline `delay` after `now`, superseding any pending
    /// execution.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Drop any pending execution.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` if an execution is pending.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` exactly once after the deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
