//! Find/replace over the buffer.
//!
//! A [`FindReplace`] wraps a compiled [`Query`] with the navigation conventions of a find
//! bar: forward search starts one character past the caret so repeated "find next" walks
//! through the document, both directions wrap around, and the current hit is marked with
//! the search tag rather than selected.

use crate::buffer::TextBuffer;
use crate::search::{Query, SearchError, SearchMatch, SearchOptions};
use crate::tags::{TagId, TagTable};
use std::ops::Range;

/// A find/replace session for one query.
#[derive(Debug, Clone)]
pub struct FindReplace {
    query: Query,
    term: String,
    options: SearchOptions,
}

impl FindReplace {
    /// Compile `term` under `options`.
    pub fn new(term: &str, options: SearchOptions) -> Result<Self, SearchError> {
        Ok(Self {
            query: Query::new(term, options)?,
            term: term.to_string(),
            options,
        })
    }

    /// The query term this session was compiled from.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// The options this session was compiled under.
    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Find the next match after the caret, wrapping past the end of the document.
    ///
    /// On a hit: the search tag moves to the match, and the caret moves to the match end
    /// so the following `find_next` continues past it. Returns the match for the host to
    /// scroll into view.
    pub fn find_next(&self, buffer: &mut TextBuffer, tags: &mut TagTable) -> Option<SearchMatch> {
        let text = buffer.text();
        let from = (buffer.caret() + 1).min(buffer.char_count());
        let hit = self.query.find_wrapped(&text, from)?;

        self.mark(buffer, tags, hit);
        buffer.set_caret(hit.end);
        Some(hit)
    }

    /// Find the nearest match ending at or before the caret, wrapping past the start.
    ///
    /// On a hit: the search tag moves to the match, and the caret moves to the match
    /// start so the following `find_prev` continues before it.
    pub fn find_prev(&self, buffer: &mut TextBuffer, tags: &mut TagTable) -> Option<SearchMatch> {
        let text = buffer.text();
        let hit = self
            .query
            .find_before(&text, buffer.caret())
            .or_else(|| self.query.find_before(&text, buffer.char_count()))?;

        self.mark(buffer, tags, hit);
        buffer.set_caret(hit.start);
        Some(hit)
    }

    /// Replace the current hit with `replacement`.
    ///
    /// The current hit is the selection if one exists, otherwise the range under the
    /// search tag. Replacement only happens when that range is exactly a match of the
    /// query; otherwise this advances to the next match instead and returns `false`, so
    /// "replace" on an unpositioned bar behaves like "find".
    pub fn replace_current(
        &self,
        buffer: &mut TextBuffer,
        tags: &mut TagTable,
        replacement: &str,
    ) -> bool {
        let target = buffer
            .selection()
            .or_else(|| tags.ranges(TagId::SEARCH).first().cloned());

        let matched = match target {
            Some(range) if self.query.matches_exactly(&buffer.text(), range.clone()) => range,
            _ => {
                self.find_next(buffer, tags);
                return false;
            }
        };

        buffer.replace(matched, replacement);
        // The replaced range is gone; the tag over it is stale.
        tags.clear(TagId::SEARCH);
        true
    }

    /// Replace every non-overlapping match in the document. Returns the replacement count.
    ///
    /// Matches are collected against a snapshot and applied back to front so earlier
    /// replacements never shift the offsets of later ones; text introduced by a
    /// replacement is not rescanned.
    pub fn replace_all(&self, buffer: &mut TextBuffer, tags: &mut TagTable, replacement: &str) -> usize {
        let matches = self.query.find_all(&buffer.text());
        for hit in matches.iter().rev() {
            buffer.replace(hit.range(), replacement);
        }
        if !matches.is_empty() {
            tags.clear(TagId::SEARCH);
        }
        matches.len()
    }

    /// The range currently under the search tag, if any.
    pub fn current_hit(tags: &TagTable) -> Option<Range<usize>> {
        tags.ranges(TagId::SEARCH).first().cloned()
    }

    /// Remove the search tag.
    pub fn clear_highlight(tags: &mut TagTable) {
        tags.clear(TagId::SEARCH);
    }

    fn mark(&self, buffer: &TextBuffer, tags: &mut TagTable, hit: SearchMatch) {
        tags.clear(TagId::SEARCH);
        let _ = tags.apply(TagId::SEARCH, hit.range(), buffer.char_count());
    }
}
