//! Debounced highlight scheduling.
//!
//! Every keystroke produces a buffer-change notification; re-highlighting on each one
//! would tie typing latency to tokenization cost. The scheduler coalesces change
//! notifications into one debounced pass over the visible region, so highlighting work is
//! bounded to once per delay window regardless of keystroke rate. Language and theme
//! switches bypass the debounce: they are rare, deliberate actions where a full-document
//! pass is worth the latency.

use notepad_core::Debouncer;
use std::ops::Range;
use std::time::{Duration, Instant};

/// Delay between the last buffer change and the resulting highlight pass.
pub const HIGHLIGHT_DEBOUNCE: Duration = Duration::from_millis(100);

/// The region a scheduled highlight pass should cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightPass {
    /// Re-highlight the entire document.
    Full,
    /// Re-highlight a half-open range of 1-indexed lines.
    Lines(Range<usize>),
}

/// Coalesces buffer-change notifications into debounced highlight passes.
///
/// The host tells the scheduler which lines are visible; each change schedules a pass over
/// that region, superseding any pass not yet run. Changes arriving while a pass is pending
/// widen it to the union of the visible regions seen, so scrolling while typing never
/// loses coverage.
#[derive(Debug)]
pub struct HighlightScheduler {
    timer: Debouncer,
    viewport: Option<Range<usize>>,
    pending: Option<HighlightPass>,
}

impl HighlightScheduler {
    /// Create a scheduler with the standard debounce delay.
    pub fn new() -> Self {
        Self::with_delay(HIGHLIGHT_DEBOUNCE)
    }

    /// Create a scheduler with a custom delay (mainly for tests).
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            timer: Debouncer::new(delay),
            viewport: None,
            pending: None,
        }
    }

    /// The currently visible 1-indexed line range, if the host has reported one.
    pub fn viewport(&self) -> Option<Range<usize>> {
        self.viewport.clone()
    }

    /// Record the visible line range. Without one, passes conservatively cover the whole
    /// document.
    pub fn set_viewport(&mut self, lines: Range<usize>) {
        self.viewport = Some(lines);
    }

    /// Returns `true` if a pass is scheduled but has not yet fired.
    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }

    /// Note a buffer change: schedule a debounced pass over the visible region,
    /// superseding (and widening) any pending pass.
    pub fn note_change(&mut self, now: Instant) {
        let visible = match &self.viewport {
            Some(lines) => HighlightPass::Lines(lines.clone()),
            None => HighlightPass::Full,
        };
        self.pending = Some(match self.pending.take() {
            Some(previous) => coalesce(previous, visible),
            None => visible,
        });
        self.timer.schedule(now);
    }

    /// Bypass the debounce: cancel any pending pass and return an immediate full pass.
    ///
    /// Used on language and theme switches, where stale coloring is worse than latency.
    pub fn request_full(&mut self) -> HighlightPass {
        self.timer.cancel();
        self.pending = None;
        HighlightPass::Full
    }

    /// Poll the debounce timer, returning the coalesced pass when it comes due.
    pub fn poll(&mut self, now: Instant) -> Option<HighlightPass> {
        if self.timer.poll(now) {
            self.pending.take()
        } else {
            None
        }
    }
}

impl Default for HighlightScheduler {
    fn default() -> Self {
        Self::new()
    }
}

fn coalesce(a: HighlightPass, b: HighlightPass) -> HighlightPass {
    match (a, b) {
        (HighlightPass::Lines(a), HighlightPass::Lines(b)) => {
            HighlightPass::Lines(a.start.min(b.start)..a.end.max(b.end))
        }
        _ => HighlightPass::Full,
    }
}
