//! Text search queries.
//!
//! Queries operate over a UTF-8 `&str` and report **character offsets** (not byte offsets)
//! in all public inputs and outputs. Plain substring queries are escaped and compiled into
//! a regex so the plain and regex paths share one engine; whole-word matching filters on
//! the characters adjacent to each candidate.

use regex::RegexBuilder;
use std::ops::Range;
use thiserror::Error;

/// Options that control how a query matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// If `true`, matching is case-sensitive.
    pub case_sensitive: bool,
    /// If `true`, matches only whole words (ASCII-alphanumeric and `_` boundaries).
    pub whole_word: bool,
    /// If `true`, the query string is a regex pattern.
    pub regex: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            whole_word: false,
            regex: false,
        }
    }
}

/// A match expressed as a half-open character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
}

impl SearchMatch {
    /// Length of the match in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the match is empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// The match as a char-offset range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Search errors.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The query's regex pattern failed to compile.
    #[error("invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// A compiled search query.
///
/// Compile once, run many times; occurrence scans and find/replace reuse the same compiled
/// query across a navigation session.
#[derive(Debug, Clone)]
pub struct Query {
    regex: regex::Regex,
    whole_word: bool,
    empty_query: bool,
}

impl Query {
    /// Compile a query string under the given options.
    pub fn new(query: &str, options: SearchOptions) -> Result<Self, SearchError> {
        let pattern = if options.regex {
            query.to_string()
        } else {
            regex::escape(query)
        };

        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(!options.case_sensitive)
            .multi_line(true)
            .build()?;

        Ok(Self {
            regex,
            whole_word: options.whole_word,
            empty_query: query.is_empty(),
        })
    }

    /// Find every non-overlapping match in `text`, in order.
    ///
    /// The scan resumes immediately after each match's end, so overlapping occurrences are
    /// not double-counted. Empty matches are discarded.
    pub fn find_all(&self, text: &str) -> Vec<SearchMatch> {
        if self.empty_query {
            return Vec::new();
        }

        let mut matches = Vec::new();
        let mut converter = OffsetConverter::new(text);
        for m in self.regex.find_iter(text) {
            if m.start() == m.end() {
                continue;
            }
            let start = converter.byte_to_char(m.start());
            let end = converter.byte_to_char(m.end());
            let candidate = SearchMatch { start, end };
            if self.whole_word && !self.is_whole_word(text, m.start(), m.end()) {
                continue;
            }
            matches.push(candidate);
        }
        matches
    }

    /// Find the first match at or after the character offset `from`.
    pub fn find_from(&self, text: &str, from: usize) -> Option<SearchMatch> {
        if self.empty_query {
            return None;
        }

        let mut from_byte = char_to_byte(text, from);
        loop {
            let m = self.regex.find_at(text, from_byte)?;
            if m.start() == m.end() {
                // Step past an empty match so the scan terminates.
                let mut next = m.end() + 1;
                while next < text.len() && !text.is_char_boundary(next) {
                    next += 1;
                }
                if next > text.len() {
                    return None;
                }
                from_byte = next;
                continue;
            }
            if self.whole_word && !self.is_whole_word(text, m.start(), m.end()) {
                from_byte = m.end();
                continue;
            }

            let mut converter = OffsetConverter::new(text);
            return Some(SearchMatch {
                start: converter.byte_to_char(m.start()),
                end: converter.byte_to_char(m.end()),
            });
        }
    }

    /// Find the last match that ends at or before the character offset `limit`.
    pub fn find_before(&self, text: &str, limit: usize) -> Option<SearchMatch> {
        if self.empty_query {
            return None;
        }

        let limit_byte = char_to_byte(text, limit);
        let mut converter = OffsetConverter::new(text);
        let mut last = None;
        for m in self.regex.find_iter(text) {
            if m.end() > limit_byte {
                break;
            }
            if m.start() == m.end() {
                continue;
            }
            if self.whole_word && !self.is_whole_word(text, m.start(), m.end()) {
                continue;
            }
            last = Some(SearchMatch {
                start: converter.byte_to_char(m.start()),
                end: converter.byte_to_char(m.end()),
            });
        }
        last
    }

    /// Find forward from `from`, wrapping to the start of `text` when nothing follows.
    pub fn find_wrapped(&self, text: &str, from: usize) -> Option<SearchMatch> {
        self.find_from(text, from)
            .or_else(|| self.find_from(text, 0))
    }

    /// Returns `true` if `range` is exactly a match of this query.
    ///
    /// Used to decide whether the current selection corresponds to the "current match" in
    /// find/replace and occurrence flows.
    pub fn matches_exactly(&self, text: &str, range: Range<usize>) -> bool {
        if range.start >= range.end {
            return false;
        }
        match self.find_from(text, range.start) {
            Some(m) => m.start == range.start && m.end == range.end,
            None => false,
        }
    }

    fn is_whole_word(&self, text: &str, start_byte: usize, end_byte: usize) -> bool {
        let before = text[..start_byte].chars().next_back();
        let after = text[end_byte..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    }
}

fn is_word_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

fn char_to_byte(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Converts ascending byte offsets to char offsets in a single forward pass.
struct OffsetConverter<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> OffsetConverter<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            byte: 0,
            chars: 0,
        }
    }

    /// Convert a byte offset to a char offset. Offsets must be fed in ascending order.
    fn byte_to_char(&mut self, byte_offset: usize) -> usize {
        debug_assert!(byte_offset >= self.byte);
        self.chars += self.text[self.byte..byte_offset].chars().count();
        self.byte = byte_offset;
        self.chars
    }
}
