#![warn(missing_docs)]
//! Notepad Core - Headless Text Buffer Kernel
//!
//! # Overview
//!
//! `notepad-core` is the buffer kernel underneath a desktop text editor. It owns the mutable
//! document text and the derived state that must never desynchronize from it: named visual
//! tags, search matches, and the occurrence-highlight index. It does not render anything;
//! the hosting view layer is expected to draw the buffer and to map tag names to visual
//! styles.
//!
//! # Core Features
//!
//! - **Text Storage**: rope-backed buffer, O(log n) line access
//! - **Coordinates**: 1-indexed lines, 0-indexed character columns, plus flat char offsets
//! - **Named Tags**: interned tag ids over half-open char ranges, per-region removal
//! - **Search**: plain/regex/whole-word queries with wraparound navigation
//! - **Occurrence Tracking**: all-matches index with next/previous cursor, invalidated on
//!   every edit
//! - **Change Notifications**: version-numbered change records broadcast to subscribers
//! - **Debounce Timers**: cancel-and-reschedule deadlines for deferred work
//!
//! # Module Description
//!
//! - [`buffer`] - text storage, coordinates, caret/selection, change notifications
//! - [`tags`] - named visual tag table
//! - [`search`] - text search queries
//! - [`find`] - find/replace navigation over the buffer
//! - [`occurrences`] - occurrence-highlight index
//! - [`timer`] - debounce timer primitive
//!
//! # Quick Start
//!
//! ```rust
//! use notepad_core::{Position, TextBuffer};
//!
//! let mut buffer = TextBuffer::new("fn main() {\n    println!(\"Hello\");\n}\n");
//!
//! buffer.subscribe(|change| {
//!     println!("version {} -> {}", change.old_version, change.new_version);
//! });
//!
//! let offset = buffer.position_to_offset(Position::new(2, 4));
//! buffer.insert(offset, "// ");
//! assert_eq!(buffer.line_text(2).unwrap(), "    // println!(\"Hello\");");
//! ```

pub mod buffer;
pub mod find;
pub mod occurrences;
pub mod search;
pub mod tags;
pub mod timer;

mod coords;

pub use buffer::{BufferChange, ChangeCallback, TextBuffer};
pub use coords::Position;
pub use find::FindReplace;
pub use occurrences::OccurrenceIndex;
pub use search::{Query, SearchError, SearchMatch, SearchOptions};
pub use tags::{TagError, TagId, TagTable};
pub use timer::Debouncer;
