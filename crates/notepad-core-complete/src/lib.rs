#![warn(missing_docs)]
//! `notepad-core-complete` - document-derived autocomplete for `notepad-core`.
//!
//! A [`WordIndex`] is a bounded vocabulary extracted from buffer content: identifier-like
//! words, deduplicated, capped in cardinality, with prefix lookup for suggestion
//! generation. The index is rebuilt wholesale on a debounce timer owned by the session
//! ([`REBUILD_DEBOUNCE`]), never incrementally - an incremental index would have to track
//! every edit to stay honest, and a full scan under the size ceiling is cheap enough.
//!
//! The crate also provides the caret-side helpers a completion popup needs:
//! [`current_word_at`] (the identifier run ending at the caret, i.e. the prefix being
//! typed) and [`word_bounds_at`] (the full identifier run around a column, for
//! replacement when a suggestion is accepted).

mod word_index;

pub use word_index::{
    MAX_SCAN_CHARS, MAX_SUGGESTIONS, MAX_WORDS, MIN_PREFIX_LENGTH, MIN_WORD_LENGTH,
    REBUILD_DEBOUNCE, WordIndex, current_word_at, word_bounds_at,
};
