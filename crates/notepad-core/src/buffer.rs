//! Text storage and change notifications.
//!
//! [`TextBuffer`] owns the document text in a rope, the caret, and the selection. The
//! highlighting, occurrence, and autocomplete subsystems are pure observers: they read the
//! buffer through this API and react to [`BufferChange`] notifications, but never own it.
//!
//! All public offsets count Unicode scalar values (`char`); coordinate conversion goes
//! through [`Position`] (1-indexed lines, 0-indexed columns).

use crate::coords::Position;
use ropey::Rope;
use std::ops::Range;

/// A record describing one buffer mutation.
#[derive(Debug, Clone)]
pub struct BufferChange {
    /// Version number before the mutation.
    pub old_version: u64,
    /// Version number after the mutation.
    pub new_version: u64,
    /// The affected char-offset region after the mutation, or `None` for "whole buffer".
    ///
    /// `None` is the conservative default used by wholesale replacement; observers must
    /// treat it as "everything may have changed".
    pub region: Option<Range<usize>>,
}

/// Change notification callback type.
pub type ChangeCallback = Box<dyn FnMut(&BufferChange)>;

/// A mutable text buffer addressed by char offsets and (line, column) coordinates.
pub struct TextBuffer {
    rope: Rope,
    version: u64,
    caret: usize,
    selection: Option<Range<usize>>,
    callbacks: Vec<ChangeCallback>,
}

impl TextBuffer {
    /// Create a buffer holding `text`.
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            version: 0,
            caret: 0,
            selection: None,
            callbacks: Vec::new(),
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Total character count.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Total line count (an empty buffer has one line).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Current buffer version; incremented by every mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The complete document text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// The text in a char-offset range, clamped to the buffer.
    pub fn text_in(&self, range: Range<usize>) -> String {
        let end = range.end.min(self.rope.len_chars());
        let start = range.start.min(end);
        self.rope.slice(start..end).to_string()
    }

    /// The text of a 1-indexed line, without its trailing newline.
    pub fn line_text(&self, line: usize) -> Option<String> {
        let line_idx = line.checked_sub(1)?;
        if line_idx >= self.rope.len_lines() {
            return None;
        }

        let mut text = self.rope.line(line_idx).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        if text.ends_with('\r') {
            text.pop();
        }
        Some(text)
    }

    /// Character length of a 1-indexed line, excluding its trailing newline.
    pub fn line_len(&self, line: usize) -> Option<usize> {
        let line_idx = line.checked_sub(1)?;
        if line_idx >= self.rope.len_lines() {
            return None;
        }

        let start = self.rope.line_to_char(line_idx);
        let len = if line_idx + 1 < self.rope.len_lines() {
            self.rope.line_to_char(line_idx + 1) - start - 1
        } else {
            self.rope.len_chars() - start
        };
        Some(len)
    }

    /// Char-offset range of a 1-indexed line, from line start to line end (newline excluded).
    pub fn line_range(&self, line: usize) -> Option<Range<usize>> {
        let line_idx = line.checked_sub(1)?;
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let start = self.rope.line_to_char(line_idx);
        let len = self.line_len(line)?;
        Some(start..start + len)
    }

    /// Convert a char offset (clamped) to a position.
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let offset = offset.min(self.rope.len_chars());
        let line_idx = self.rope.char_to_line(offset);
        let column = offset - self.rope.line_to_char(line_idx);
        Position::new(line_idx + 1, column)
    }

    /// Convert a position to a char offset.
    ///
    /// Lines past the end clamp to the end of the document; columns past the end of their
    /// line clamp to the line end (before the newline).
    pub fn position_to_offset(&self, position: Position) -> usize {
        let Some(line_idx) = position.line.checked_sub(1) else {
            return 0;
        };
        if line_idx >= self.rope.len_lines() {
            return self.rope.len_chars();
        }

        let start = self.rope.line_to_char(line_idx);
        let line_len = self.line_len(position.line).unwrap_or(0);
        start + position.column.min(line_len)
    }

    /// The text between two positions.
    pub fn text_between(&self, start: Position, end: Position) -> String {
        self.text_in(self.position_to_offset(start)..self.position_to_offset(end))
    }

    /// Caret location as a char offset.
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Caret location as a position.
    pub fn caret_position(&self) -> Position {
        self.offset_to_position(self.caret)
    }

    /// Move the caret to a char offset (clamped).
    pub fn set_caret(&mut self, offset: usize) {
        self.caret = offset.min(self.rope.len_chars());
    }

    /// The current selection as a char-offset range, if any.
    pub fn selection(&self) -> Option<Range<usize>> {
        self.selection.clone()
    }

    /// Set the selection (clamped; an empty range clears the selection).
    pub fn set_selection(&mut self, range: Range<usize>) {
        let end = range.end.min(self.rope.len_chars());
        let start = range.start.min(end);
        self.selection = if start < end { Some(start..end) } else { None };
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// The selected text, if a selection exists.
    pub fn selected_text(&self) -> Option<String> {
        self.selection.clone().map(|range| self.text_in(range))
    }

    /// Register a change notification callback.
    pub fn subscribe(&mut self, callback: impl FnMut(&BufferChange) + 'static) {
        self.callbacks.push(Box::new(callback));
    }

    /// Insert `text` at a char offset (clamped). Returns the change record.
    pub fn insert(&mut self, offset: usize, text: &str) -> BufferChange {
        let offset = offset.min(self.rope.len_chars());
        self.rope.insert(offset, text);

        let inserted = text.chars().count();
        if self.caret >= offset {
            self.caret += inserted;
        }

        self.finish_mutation(Some(offset..offset + inserted))
    }

    /// Delete a char-offset range (clamped). Returns the change record.
    pub fn delete(&mut self, range: Range<usize>) -> BufferChange {
        let end = range.end.min(self.rope.len_chars());
        let start = range.start.min(end);
        if start < end {
            self.rope.remove(start..end);
        }

        if self.caret > end {
            self.caret -= end - start;
        } else if self.caret > start {
            self.caret = start;
        }

        self.finish_mutation(Some(start..start))
    }

    /// Replace a char-offset range with `text`. Returns the change record.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> BufferChange {
        let end = range.end.min(self.rope.len_chars());
        let start = range.start.min(end);
        if start < end {
            self.rope.remove(start..end);
        }
        self.rope.insert(start, text);

        let inserted = text.chars().count();
        let removed = end - start;
        if self.caret > end {
            self.caret = self.caret - removed + inserted;
        } else if self.caret > start {
            self.caret = start + inserted;
        }

        self.finish_mutation(Some(start..start + inserted))
    }

    /// Replace the entire document. The change region is "whole buffer".
    pub fn set_text(&mut self, text: &str) -> BufferChange {
        self.rope = Rope::from_str(text);
        self.caret = self.caret.min(self.rope.len_chars());
        self.finish_mutation(None)
    }

    fn finish_mutation(&mut self, region: Option<Range<usize>>) -> BufferChange {
        self.selection = None;
        let change = BufferChange {
            old_version: self.version,
            new_version: self.version + 1,
            region,
        };
        self.version += 1;

        for callback in self.callbacks.iter_mut() {
            callback(&change);
        }
        change
    }
}

impl std::fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextBuffer")
            .field("char_count", &self.rope.len_chars())
            .field("line_count", &self.rope.len_lines())
            .field("version", &self.version)
            .field("caret", &self.caret)
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}
