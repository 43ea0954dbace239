//! Occurrence-highlight index.
//!
//! Tracks every position of a highlighted term so the host can render "all occurrences"
//! markers and navigate between them. The index is derived state: any buffer edit
//! invalidates it unconditionally, because stored offsets would silently desynchronize
//! from content otherwise.

use crate::buffer::TextBuffer;
use crate::search::{Query, SearchMatch, SearchOptions};
use crate::tags::{TagId, TagTable};
use std::ops::Range;

/// The set of buffer ranges matching a highlighted term, with a navigation cursor.
#[derive(Debug, Default)]
pub struct OccurrenceIndex {
    term: Option<String>,
    matches: Vec<SearchMatch>,
    cursor: Option<usize>,
    disabled: bool,
}

impl OccurrenceIndex {
    /// Create an empty, enabled index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if occurrence highlighting is enabled.
    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    /// Enable or disable the feature. Disabling clears all state and tags.
    pub fn set_enabled(&mut self, enabled: bool, tags: &mut TagTable) {
        self.disabled = !enabled;
        if !enabled {
            self.clear(tags);
        }
    }

    /// Highlight every occurrence of `term` and return the match count.
    ///
    /// Performs a case-insensitive forward scan of the whole buffer, collecting
    /// non-overlapping matches and tagging each one. If the current selection coincides
    /// exactly with one of the matches, the cursor starts on that match; otherwise there
    /// is no current match until the first navigation. An empty term, or a disabled
    /// feature, leaves the index empty and returns 0.
    pub fn set_term(&mut self, buffer: &TextBuffer, tags: &mut TagTable, term: &str) -> usize {
        self.clear(tags);
        if term.is_empty() || self.disabled {
            return 0;
        }

        let options = SearchOptions {
            case_sensitive: false,
            whole_word: false,
            regex: false,
        };
        let Ok(query) = Query::new(term, options) else {
            return 0;
        };

        let text = buffer.text();
        self.matches = query.find_all(&text);

        let buffer_len = buffer.char_count();
        for m in &self.matches {
            let _ = tags.apply(TagId::OCCURRENCE, m.range(), buffer_len);
        }

        if let Some(selection) = buffer.selection() {
            self.cursor = self
                .matches
                .iter()
                .position(|m| m.start == selection.start && m.end == selection.end);
        }

        self.term = Some(term.to_string());
        self.matches.len()
    }

    /// Drop all matches, the cursor, and the occurrence tags.
    ///
    /// Called on every buffer edit (stale offsets must never survive) and when the
    /// feature is disabled.
    pub fn clear(&mut self, tags: &mut TagTable) {
        tags.clear(TagId::OCCURRENCE);
        self.term = None;
        self.matches.clear();
        self.cursor = None;
    }

    /// The currently highlighted term, if any.
    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    /// Number of matches currently tracked.
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// All tracked matches, in buffer order.
    pub fn matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    /// Index of the current match, if navigation has selected one.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// The range of the current match, if any.
    pub fn current_match(&self) -> Option<Range<usize>> {
        self.cursor.map(|idx| self.matches[idx].range())
    }

    /// Advance to the next match, wrapping past the end.
    ///
    /// Moves the caret to the match start and makes the match the active selection.
    /// Returns the match range so the host can scroll it into view, or `None` when there
    /// are no matches.
    pub fn next(&mut self, buffer: &mut TextBuffer) -> Option<Range<usize>> {
        if self.matches.is_empty() {
            return None;
        }

        let idx = match self.cursor {
            Some(current) => (current + 1) % self.matches.len(),
            None => 0,
        };
        Some(self.select(buffer, idx))
    }

    /// Retreat to the previous match, wrapping past the start.
    ///
    /// Same caret/selection behavior as [`next`](Self::next).
    pub fn previous(&mut self, buffer: &mut TextBuffer) -> Option<Range<usize>> {
        if self.matches.is_empty() {
            return None;
        }

        let count = self.matches.len();
        let idx = match self.cursor {
            Some(current) => (current + count - 1) % count,
            None => count - 1,
        };
        Some(self.select(buffer, idx))
    }

    fn select(&mut self, buffer: &mut TextBuffer, idx: usize) -> Range<usize> {
        self.cursor = Some(idx);
        let range = self.matches[idx].range();
        buffer.set_caret(range.start);
        buffer.set_selection(range.clone());
        range
    }

    /// A short status summary for a navigation bar: `"term" - current/total`.
    ///
    /// The current index reads 0 while no match is selected.
    pub fn summary(&self) -> Option<String> {
        let term = self.term.as_deref()?;
        let current = self.cursor.map(|idx| idx + 1).unwrap_or(0);
        Some(format!(
            "\"{}\" - {}/{}",
            term,
            current,
            self.matches.len()
        ))
    }
}
