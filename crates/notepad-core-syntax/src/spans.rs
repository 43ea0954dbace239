//! Token-to-span mapping.
//!
//! Converts a flat token stream into buffer-coordinate spans. Exactness here is
//! load-bearing: every tag downstream is placed by these coordinates, and an off-by-one in
//! the newline arithmetic corrupts all coloring after the first multi-line token.

use crate::token::{Token, TokenKind};
use notepad_core::Position;

/// A token projected onto buffer coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpan {
    /// The token's category.
    pub kind: TokenKind,
    /// Start coordinate (inclusive).
    pub start: Position,
    /// End coordinate (exclusive).
    pub end: Position,
}

/// Map a token stream onto buffer coordinates, starting at `start`.
///
/// Walks tokens in order with a `(line, column)` cursor. A token without newlines ends at
/// `start column + char length`; a token with embedded newlines ends `newline count` lines
/// down, at the char length of its text after the last newline. Spans tile the tokenized
/// range: each span starts where the previous one ended, and for a lossless token stream
/// the union covers the range exactly.
pub fn map_spans(tokens: &[Token], start: Position) -> Vec<TokenSpan> {
    let mut spans = Vec::with_capacity(tokens.len());
    let mut cursor = start;

    for token in tokens {
        if token.text.is_empty() {
            continue;
        }
        let end = token_end(token, cursor);
        spans.push(TokenSpan {
            kind: token.kind,
            start: cursor,
            end,
        });
        cursor = end;
    }
    spans
}

fn token_end(token: &Token, start: Position) -> Position {
    let newlines = token.text.matches('\n').count();
    if newlines == 0 {
        return Position::new(start.line, start.column + token.char_len());
    }

    let tail = token.text.rsplit('\n').next().unwrap_or_default();
    Position::new(start.line + newlines, tail.chars().count())
}
