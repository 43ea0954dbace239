#![warn(missing_docs)]
//! `notepad-session` - the single-document composition root for `notepad-core`.
//!
//! # Overview
//!
//! A [`DocumentSession`] wires one buffer to every derived subsystem in the workspace:
//!
//! - syntax highlighting (`notepad-core-syntax`), debounced per keystroke, immediate on
//!   language and theme switches
//! - occurrence tracking (`notepad-core`), invalidated on every edit, with a debounced
//!   selection-driven scan
//! - autocomplete (`notepad-core-complete`), rebuilt on its own debounce
//! - external linting (`notepad-core-lint`), run off-thread and applied as lint tags
//!   when results land
//!
//! The scheduling model is single-threaded cooperative: the host calls
//! [`DocumentSession::tick`] from its event loop, and every deferred piece of work fires
//! there. Only the lint worker leaves the thread, and its results are still consumed
//! inside `tick`.
//!
//! # Quick Start
//!
//! ```rust
//! use notepad_session::DocumentSession;
//! use notepad_core_lang::LanguageId;
//!
//! let mut session = DocumentSession::new("def greet():\n    return 'hi'\n");
//! session.set_language(LanguageId::new("python"));
//! session.set_viewport(1..3);
//!
//! session.insert(0, "# demo\n");
//! session.tick(); // fires due debounces
//!
//! assert_eq!(session.highlight_occurrences("greet"), 1);
//! ```

mod session;

pub use session::{DocumentSession, MIN_SELECTION_CHARS, SELECTION_SCAN_DEBOUNCE, SessionConfig};

pub use notepad_core::{
    BufferChange, Position, SearchMatch, SearchOptions, TagId, TagTable, TextBuffer,
};
pub use notepad_core_lang::LanguageId;
pub use notepad_core_lint::{LintReport, Severity, SeverityCounts};
pub use notepad_core_syntax::{Color, Theme, TokenKind};
