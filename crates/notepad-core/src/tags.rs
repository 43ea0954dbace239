//! Named visual tags.
//!
//! A tag marks a half-open char-offset range with a named visual role ("occurrence",
//! "search", "syntax.keyword", ...). Tags carry no colors; the hosting view layer resolves
//! tag names to styles. Tag names are interned to stable [`TagId`]s so hot paths compare
//! integers, not strings.

use std::collections::HashMap;
use std::ops::Range;
use thiserror::Error;

/// A stable identifier for a named tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TagId(pub u32);

impl TagId {
    /// Occurrence-highlight matches.
    pub const OCCURRENCE: Self = Self(1);
    /// The current find/replace hit.
    pub const SEARCH: Self = Self(2);
    /// The line containing the caret.
    pub const CURRENT_LINE: Self = Self(3);
    /// Lint error underlines.
    pub const LINT_ERROR: Self = Self(4);
    /// Lint warning underlines.
    pub const LINT_WARNING: Self = Self(5);
    /// Lint info underlines.
    pub const LINT_INFO: Self = Self(6);

    /// First id handed out for dynamically interned names.
    const DYNAMIC_BASE: u32 = 0x0100_0000;
}

/// Tag application errors.
///
/// These exist so callers applying many tags in a batch can skip the offending range and
/// keep going; see the region highlighter's failure semantics.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TagError {
    /// The range start is greater than its end.
    #[error("inverted tag range {start}..{end}")]
    InvertedRange {
        /// Offending range start.
        start: usize,
        /// Offending range end.
        end: usize,
    },

    /// The range extends past the end of the buffer.
    #[error("tag range {start}..{end} exceeds buffer length {buffer_len}")]
    OutOfBounds {
        /// Offending range start.
        start: usize,
        /// Offending range end.
        end: usize,
        /// Buffer length the range was validated against.
        buffer_len: usize,
    },
}

/// The table of all applied tags, keyed by interned tag id.
///
/// Ranges are kept sorted by start offset per tag. Overlaps between different tags are
/// fine (e.g. an occurrence inside the current line); overlaps within one tag are allowed
/// but not merged.
#[derive(Debug, Default)]
pub struct TagTable {
    name_to_id: HashMap<String, TagId>,
    dynamic_names: Vec<String>,
    ranges: HashMap<TagId, Vec<Range<usize>>>,
}

impl TagTable {
    /// Create an empty tag table with the built-in names pre-interned.
    pub fn new() -> Self {
        let mut table = Self::default();
        for (name, id) in Self::BUILTIN_NAMES {
            table.name_to_id.insert(name.to_string(), id);
        }
        table
    }

    const BUILTIN_NAMES: [(&'static str, TagId); 6] = [
        ("occurrence", TagId::OCCURRENCE),
        ("search", TagId::SEARCH),
        ("current-line", TagId::CURRENT_LINE),
        ("lint.error", TagId::LINT_ERROR),
        ("lint.warning", TagId::LINT_WARNING),
        ("lint.info", TagId::LINT_INFO),
    ];

    /// Get (or allocate) a stable id for a tag name.
    pub fn intern(&mut self, name: &str) -> TagId {
        if let Some(&id) = self.name_to_id.get(name) {
            return id;
        }

        let id = TagId(TagId::DYNAMIC_BASE + self.dynamic_names.len() as u32);
        self.dynamic_names.push(name.to_string());
        self.name_to_id.insert(name.to_string(), id);
        id
    }

    /// The name a tag id was interned under.
    pub fn name_of(&self, id: TagId) -> Option<&str> {
        if id.0 >= TagId::DYNAMIC_BASE {
            let idx = (id.0 - TagId::DYNAMIC_BASE) as usize;
            return self.dynamic_names.get(idx).map(String::as_str);
        }
        Self::BUILTIN_NAMES
            .iter()
            .find(|(_, builtin)| *builtin == id)
            .map(|(name, _)| *name)
    }

    /// Apply a tag over a char-offset range.
    pub fn apply(
        &mut self,
        id: TagId,
        range: Range<usize>,
        buffer_len: usize,
    ) -> Result<(), TagError> {
        if range.start > range.end {
            return Err(TagError::InvertedRange {
                start: range.start,
                end: range.end,
            });
        }
        if range.end > buffer_len {
            return Err(TagError::OutOfBounds {
                start: range.start,
                end: range.end,
                buffer_len,
            });
        }
        if range.start == range.end {
            return Ok(());
        }

        let ranges = self.ranges.entry(id).or_default();
        let pos = ranges.partition_point(|r| r.start <= range.start);
        ranges.insert(pos, range);
        Ok(())
    }

    /// Remove all of one tag's coverage within `region`.
    ///
    /// Ranges partially overlapping the region are truncated; ranges fully inside it are
    /// dropped; a range straddling the whole region is split in two.
    pub fn remove_in(&mut self, id: TagId, region: Range<usize>) {
        let Some(ranges) = self.ranges.get_mut(&id) else {
            return;
        };

        let mut kept = Vec::with_capacity(ranges.len());
        for range in ranges.drain(..) {
            if range.end <= region.start || range.start >= region.end {
                kept.push(range);
                continue;
            }
            if range.start < region.start {
                kept.push(range.start..region.start);
            }
            if range.end > region.end {
                kept.push(region.end..range.end);
            }
        }
        *ranges = kept;
    }

    /// Remove every range of one tag.
    pub fn clear(&mut self, id: TagId) {
        self.ranges.remove(&id);
    }

    /// Remove every range of every tag.
    pub fn clear_all(&mut self) {
        self.ranges.clear();
    }

    /// All ranges currently applied for a tag, sorted by start offset.
    pub fn ranges(&self, id: TagId) -> &[Range<usize>] {
        self.ranges.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every `(tag, range)` pair overlapping `region`, for renderers.
    pub fn tags_in(&self, region: Range<usize>) -> Vec<(TagId, Range<usize>)> {
        let mut result = Vec::new();
        for (&id, ranges) in &self.ranges {
            for range in ranges {
                if range.start < region.end && range.end > region.start {
                    result.push((id, range.clone()));
                }
            }
        }
        result.sort_by_key(|(id, range)| (range.start, range.end, id.0));
        result
    }
}
