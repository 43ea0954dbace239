#![warn(missing_docs)]
//! `notepad-core-lang` - language identification and lexical profiles for `notepad-core`.
//!
//! This crate intentionally stays lightweight and does **not** depend on the buffer kernel or
//! the highlighting engine. It provides:
//!
//! - [`LanguageId`] - an open, string-backed language identifier
//! - language detection from file names and shebang lines
//! - [`LexicalProfile`] - data-driven lexical configuration (keywords, comment markers,
//!   string delimiters) consumed by the rule lexer in `notepad-core-syntax`, loadable
//!   from YAML

mod detect;
mod profile;

pub use detect::{
    detect_language, language_for_extension, language_from_shebang, primary_extension,
    supported_languages,
};
pub use profile::{LexicalProfile, ProfileError};

use std::fmt;

/// An open language identifier (e.g. `"python"`, `"rust"`, `"text"`).
///
/// Identifiers are plain lowercase strings so hosts can register languages this crate has
/// never heard of. Unknown identifiers degrade to plain-text behavior downstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguageId(String);

impl LanguageId {
    /// The fallback identifier for unrecognized files.
    pub const PLAIN_TEXT: &'static str = "text";

    /// Create a language id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The plain-text fallback language.
    pub fn plain_text() -> Self {
        Self(Self::PLAIN_TEXT.to_string())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this is the plain-text fallback language.
    pub fn is_plain_text(&self) -> bool {
        self.0 == Self::PLAIN_TEXT
    }
}

impl From<&str> for LanguageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for LanguageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for LanguageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Default for LanguageId {
    fn default() -> Self {
        Self::plain_text()
    }
}
