//! Region highlighting.
//!
//! [`SyntaxHighlighter`] turns a bounded region of buffer text into syntax tags: expand
//! the request to whole-line boundaries (tokenizing a partial line misreads tokens that
//! span the line), read the text, tokenize, map spans, and apply each span's tag. Regions
//! above a character ceiling are skipped entirely rather than blocking the UI thread on a
//! pathologically long line; the user sees unhighlighted text, not latency.

use crate::lexer::LexerRegistry;
use crate::spans::map_spans;
use crate::token::TokenKind;
use notepad_core::{TagTable, TextBuffer};
use notepad_core_lang::LanguageId;
use std::ops::Range;

/// Character-length ceiling above which a region pass is skipped.
pub const DEFAULT_REGION_CEILING: usize = 4000;

/// Applies syntax tags over bounded regions of a buffer.
///
/// Plain-text and whitespace tokens are never tagged; they render in the theme's default
/// foreground, so tagging them would only bloat the tag table.
#[derive(Debug)]
pub struct SyntaxHighlighter {
    registry: LexerRegistry,
    language: LanguageId,
    region_ceiling: usize,
}

impl SyntaxHighlighter {
    /// Create a highlighter over a lexer registry, starting in plain text.
    pub fn new(registry: LexerRegistry) -> Self {
        Self {
            registry,
            language: LanguageId::plain_text(),
            region_ceiling: DEFAULT_REGION_CEILING,
        }
    }

    /// Override the region ceiling (mainly for tests).
    pub fn with_region_ceiling(mut self, ceiling: usize) -> Self {
        self.region_ceiling = ceiling;
        self
    }

    /// The active language.
    pub fn language(&self) -> &LanguageId {
        &self.language
    }

    /// Switch the active language. The caller is expected to follow with a full pass.
    pub fn set_language(&mut self, language: LanguageId) {
        self.language = language;
    }

    /// The lexer registry, for registering host languages.
    pub fn registry_mut(&mut self) -> &mut LexerRegistry {
        &mut self.registry
    }

    /// Highlight the entire document.
    pub fn highlight_all(&self, buffer: &TextBuffer, tags: &mut TagTable) -> bool {
        self.highlight(buffer, tags, 0..buffer.char_count())
    }

    /// Highlight a char-offset region, expanded outward to whole-line boundaries.
    ///
    /// Returns `false` when the expanded region exceeds the ceiling and the pass was
    /// skipped. Existing syntax tags in the region are removed either way only when the
    /// pass runs; a skipped pass leaves the region untouched.
    ///
    /// Span application failures are independent: a span that cannot be tagged is skipped
    /// (one uncolored token) without aborting the rest of the region.
    pub fn highlight(&self, buffer: &TextBuffer, tags: &mut TagTable, region: Range<usize>) -> bool {
        let region = expand_to_lines(buffer, region);
        if region.len() > self.region_ceiling {
            tracing::debug!(
                start = region.start,
                end = region.end,
                ceiling = self.region_ceiling,
                "skipping oversized highlight region"
            );
            return false;
        }

        for kind in TokenKind::ALL {
            if !is_tagged(kind) {
                continue;
            }
            let id = tags.intern(kind.tag_name());
            tags.remove_in(id, region.clone());
        }

        let text = buffer.text_in(region.clone());
        let tokens = self.registry.tokenize(&text, &self.language);
        let start = buffer.offset_to_position(region.start);
        let buffer_len = buffer.char_count();

        for span in map_spans(&tokens, start) {
            if !is_tagged(span.kind) {
                continue;
            }
            let id = tags.intern(span.kind.tag_name());
            let range = buffer.position_to_offset(span.start)..buffer.position_to_offset(span.end);
            if let Err(err) = tags.apply(id, range, buffer_len) {
                tracing::debug!(kind = %span.kind, %err, "skipping untaggable span");
            }
        }
        true
    }
}

fn is_tagged(kind: TokenKind) -> bool {
    !matches!(kind, TokenKind::Text | TokenKind::Whitespace)
}

/// Expand a char-offset region outward to whole-line boundaries, clamped to the buffer.
///
/// The expanded end excludes the final line's newline; the newline itself carries no
/// visible styling.
fn expand_to_lines(buffer: &TextBuffer, region: Range<usize>) -> Range<usize> {
    let buffer_len = buffer.char_count();
    let end = region.end.min(buffer_len);
    let start = region.start.min(end);

    let start_line = buffer.offset_to_position(start).line;
    let end_line = buffer.offset_to_position(end).line;

    let expanded_start = buffer.line_range(start_line).map_or(0, |r| r.start);
    let expanded_end = buffer.line_range(end_line).map_or(buffer_len, |r| r.end);
    expanded_start..expanded_end
}
