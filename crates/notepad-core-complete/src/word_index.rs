//! The bounded word index and caret-side word helpers.

use regex::Regex;
use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;
use std::time::Duration;

/// Words shorter than this are not indexed.
pub const MIN_WORD_LENGTH: usize = 2;

/// Prefixes shorter than this yield no suggestions.
pub const MIN_PREFIX_LENGTH: usize = 3;

/// Cardinality cap for the index; which words survive truncation is arbitrary.
pub const MAX_WORDS: usize = 1000;

/// Buffers above this character count clear the index instead of being scanned.
pub const MAX_SCAN_CHARS: usize = 50_000;

/// Maximum number of suggestions returned per lookup.
pub const MAX_SUGGESTIONS: usize = 10;

/// Delay between the last keystroke and the index rebuild.
pub const REBUILD_DEBOUNCE: Duration = Duration::from_millis(300);

static WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-zA-Z_][a-zA-Z0-9_]*\b").expect("valid regex"));

fn is_word_char(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphanumeric()
}

/// A bounded set of identifier-like words with prefix lookup.
#[derive(Debug, Default)]
pub struct WordIndex {
    words: HashSet<String>,
    disabled: bool,
}

impl WordIndex {
    /// Create an empty, enabled index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of indexed words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if no words are indexed.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Returns `true` if `word` is indexed.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Returns `true` if suggestions are enabled.
    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    /// Enable or disable the feature. Disabling clears the index.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
        if !enabled {
            self.words.clear();
        }
    }

    /// Rebuild the index wholesale from buffer content.
    ///
    /// Extracts every maximal identifier run of at least [`MIN_WORD_LENGTH`] chars,
    /// deduplicates, and truncates to [`MAX_WORDS`] (arbitrary survivors). Buffers over
    /// [`MAX_SCAN_CHARS`] clear the index instead; scanning them on every debounce would
    /// dominate the editing loop.
    pub fn rebuild(&mut self, text: &str) {
        self.words.clear();
        if self.disabled {
            return;
        }
        if text.chars().count() > MAX_SCAN_CHARS {
            return;
        }

        for m in WORD_REGEX.find_iter(text) {
            if m.as_str().len() < MIN_WORD_LENGTH {
                continue;
            }
            if self.words.len() >= MAX_WORDS && !self.words.contains(m.as_str()) {
                break;
            }
            self.words.insert(m.as_str().to_string());
        }
    }

    /// Merge host-supplied vocabulary (language keywords, snippet names) into the index.
    ///
    /// Added words are subject to the same cardinality cap as scanned ones.
    pub fn add_words<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.disabled {
            return;
        }
        for word in words {
            if self.words.len() >= MAX_WORDS {
                break;
            }
            self.words.insert(word.into());
        }
    }

    /// Suggestions for a prefix, best first.
    ///
    /// Case-insensitive prefix match over the index, excluding the prefix itself, ordered
    /// by ascending length then lowercase-lexicographically - the shortest plausible
    /// completion comes first. At most [`MAX_SUGGESTIONS`] results; empty for prefixes
    /// shorter than [`MIN_PREFIX_LENGTH`].
    pub fn suggest(&self, prefix: &str) -> Vec<String> {
        if self.disabled || prefix.chars().count() < MIN_PREFIX_LENGTH {
            return Vec::new();
        }

        let prefix_lower = prefix.to_lowercase();
        let mut matches: Vec<&String> = self
            .words
            .iter()
            .filter(|w| w.to_lowercase().starts_with(&prefix_lower) && w.as_str() != prefix)
            .collect();

        matches.sort_by(|a, b| {
            a.chars()
                .count()
                .cmp(&b.chars().count())
                .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        });
        matches
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .cloned()
            .collect()
    }
}

/// The identifier run ending at `column` in `line_text`: the prefix being typed.
///
/// Walks left from the caret over identifier chars, then drops any leading digits so the
/// result starts like an identifier. Returns `None` when the caret does not follow an
/// identifier char.
pub fn current_word_at(line_text: &str, column: usize) -> Option<String> {
    let chars: Vec<char> = line_text.chars().collect();
    let column = column.min(chars.len());

    let mut start = column;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    while start < column && chars[start].is_ascii_digit() {
        start += 1;
    }

    if start == column {
        return None;
    }
    Some(chars[start..column].iter().collect())
}

/// The full identifier run surrounding `column`, as a char-column range.
///
/// Used to find the text to replace when a suggestion is accepted; a caret in the middle
/// of `wo|rd` replaces all of `word`. Returns an empty range at `column` when no
/// identifier surrounds it.
pub fn word_bounds_at(line_text: &str, column: usize) -> Range<usize> {
    let chars: Vec<char> = line_text.chars().collect();
    let column = column.min(chars.len());

    let mut start = column;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = column;
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }
    start..end
}
