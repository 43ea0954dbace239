//! Data-driven lexical profiles.
//!
//! A [`LexicalProfile`] describes the lexical surface of a language: keyword classes,
//! comment markers, and string delimiters. The rule lexer in `notepad-core-syntax` turns a
//! profile into a total tokenizer. Profiles are plain data and can be loaded from YAML, so
//! hosts can add languages without recompiling.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors produced when loading a lexical profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// YAML parsing failed.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Filesystem I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required field was missing or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Lexical configuration for one language.
///
/// All fields except `language` are optional; an empty profile lexes everything as plain
/// text, identifiers, numbers, and punctuation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalProfile {
    /// The language identifier this profile applies to.
    pub language: String,
    /// General keywords (e.g. `if`, `while`, `return`).
    pub keywords: Vec<String>,
    /// Declaration keywords (e.g. `fn`, `def`, `class`).
    pub declaration_keywords: Vec<String>,
    /// Constant keywords (e.g. `true`, `None`).
    pub constant_keywords: Vec<String>,
    /// Namespace keywords (e.g. `import`, `use`).
    pub namespace_keywords: Vec<String>,
    /// Type keywords (e.g. `int`, `u32`).
    pub type_keywords: Vec<String>,
    /// Builtin names (e.g. `print`, `len`).
    pub builtins: Vec<String>,
    /// Declaration keywords whose following identifier names a function (e.g. `def`, `fn`).
    pub function_definers: Vec<String>,
    /// Declaration keywords whose following identifier names a type (e.g. `class`, `struct`).
    pub type_definers: Vec<String>,
    /// Line comment marker (e.g. `//`, `#`).
    pub line_comment: Option<String>,
    /// Block comment start marker (e.g. `/*`).
    pub block_comment_start: Option<String>,
    /// Block comment end marker (e.g. `*/`).
    pub block_comment_end: Option<String>,
    /// Documentation string delimiter (e.g. `"""`); scanned across lines.
    pub doc_string_delimiter: Option<String>,
    /// Quote characters for single-line strings.
    pub string_quotes: Vec<char>,
    /// Escape character recognized inside strings.
    pub string_escape: Option<char>,
    /// Prefix character introducing a decorator/attribute name (e.g. `@`).
    pub decorator_prefix: Option<char>,
}

impl LexicalProfile {
    /// Parse a profile from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self, ProfileError> {
        let profile: Self = serde_yaml::from_str(yaml)?;
        if profile.language.is_empty() {
            return Err(ProfileError::MissingField("language"));
        }
        Ok(profile)
    }

    /// Load a profile from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ProfileError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Returns `true` if both block comment markers are configured.
    pub fn has_block_comment(&self) -> bool {
        self.block_comment_start.as_deref().is_some_and(|s| !s.is_empty())
            && self.block_comment_end.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// The compiled-in Python profile.
    pub fn python() -> Self {
        Self {
            language: "python".to_string(),
            keywords: strings(&[
                "and", "assert", "async", "await", "break", "continue", "del", "elif", "else",
                "except", "finally", "for", "if", "in", "is", "not", "or", "pass", "raise",
                "return", "try", "while", "with", "yield",
            ]),
            declaration_keywords: strings(&["class", "def", "global", "lambda", "nonlocal"]),
            constant_keywords: strings(&["False", "None", "True"]),
            namespace_keywords: strings(&["as", "from", "import"]),
            type_keywords: strings(&["bool", "bytes", "dict", "float", "int", "list", "set",
                "str", "tuple"]),
            builtins: strings(&[
                "abs", "enumerate", "filter", "isinstance", "len", "map", "max", "min", "open",
                "print", "range", "repr", "sorted", "sum", "super", "type", "zip",
            ]),
            function_definers: strings(&["def", "lambda"]),
            type_definers: strings(&["class"]),
            line_comment: Some("#".to_string()),
            block_comment_start: None,
            block_comment_end: None,
            doc_string_delimiter: Some("\"\"\"".to_string()),
            string_quotes: vec!['"', '\''],
            string_escape: Some('\\'),
            decorator_prefix: Some('@'),
        }
    }

    /// The compiled-in Rust profile.
    pub fn rust() -> Self {
        Self {
            language: "rust".to_string(),
            keywords: strings(&[
                "as", "async", "await", "break", "continue", "dyn", "else", "for", "if", "in",
                "loop", "match", "move", "ref", "return", "unsafe", "where", "while",
            ]),
            declaration_keywords: strings(&[
                "const", "enum", "fn", "impl", "let", "mod", "mut", "pub", "static", "struct",
                "trait", "type",
            ]),
            constant_keywords: strings(&["false", "true"]),
            namespace_keywords: strings(&["crate", "extern", "self", "super", "use"]),
            type_keywords: strings(&[
                "bool", "char", "f32", "f64", "i8", "i16", "i32", "i64", "i128", "isize", "str",
                "u8", "u16", "u32", "u64", "u128", "usize",
            ]),
            builtins: strings(&["Box", "Err", "None", "Ok", "Option", "Result", "Some", "String",
                "Vec"]),
            function_definers: strings(&["fn"]),
            type_definers: strings(&["enum", "struct", "trait", "type"]),
            line_comment: Some("//".to_string()),
            block_comment_start: Some("/*".to_string()),
            block_comment_end: Some("*/".to_string()),
            doc_string_delimiter: None,
            string_quotes: vec!['"'],
            string_escape: Some('\\'),
            decorator_prefix: None,
        }
    }

    /// The compiled-in JavaScript profile.
    pub fn javascript() -> Self {
        Self {
            language: "javascript".to_string(),
            keywords: strings(&[
                "await", "break", "case", "catch", "continue", "default", "delete", "do", "else",
                "finally", "for", "if", "in", "instanceof", "new", "of", "return", "switch",
                "throw", "try", "typeof", "while", "yield",
            ]),
            declaration_keywords: strings(&["async", "class", "const", "function", "let",
                "static", "var"]),
            constant_keywords: strings(&["false", "null", "true", "undefined"]),
            namespace_keywords: strings(&["export", "from", "import"]),
            type_keywords: Vec::new(),
            builtins: strings(&["Array", "JSON", "Math", "Object", "Promise", "console",
                "document", "window"]),
            function_definers: strings(&["function"]),
            type_definers: strings(&["class"]),
            line_comment: Some("//".to_string()),
            block_comment_start: Some("/*".to_string()),
            block_comment_end: Some("*/".to_string()),
            doc_string_delimiter: None,
            string_quotes: vec!['"', '\'', '`'],
            string_escape: Some('\\'),
            decorator_prefix: None,
        }
    }

    /// The compiled-in JSON profile.
    pub fn json() -> Self {
        Self {
            language: "json".to_string(),
            constant_keywords: strings(&["false", "null", "true"]),
            string_quotes: vec!['"'],
            string_escape: Some('\\'),
            ..Default::default()
        }
    }

    /// The compiled-in INI profile.
    pub fn ini() -> Self {
        Self {
            language: "ini".to_string(),
            line_comment: Some(";".to_string()),
            string_quotes: vec!['"'],
            string_escape: Some('\\'),
            ..Default::default()
        }
    }

    /// All compiled-in profiles.
    pub fn builtin_profiles() -> Vec<Self> {
        vec![
            Self::python(),
            Self::rust(),
            Self::javascript(),
            Self::json(),
            Self::ini(),
        ]
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_yaml_minimal() {
        let profile = LexicalProfile::from_yaml("language: ini\nline_comment: \";\"\n").unwrap();
        assert_eq!(profile.language, "ini");
        assert_eq!(profile.line_comment.as_deref(), Some(";"));
        assert!(profile.keywords.is_empty());
    }

    #[test]
    fn test_from_yaml_requires_language() {
        let err = LexicalProfile::from_yaml("line_comment: \"#\"\n").unwrap_err();
        assert!(matches!(err, ProfileError::MissingField("language")));
    }

    #[test]
    fn test_yaml_round_trip() {
        let python = LexicalProfile::python();
        let yaml = serde_yaml::to_string(&python).unwrap();
        let reparsed = LexicalProfile::from_yaml(&yaml).unwrap();
        assert_eq!(python, reparsed);
    }

    #[test]
    fn test_builtin_profiles_have_distinct_languages() {
        let profiles = LexicalProfile::builtin_profiles();
        let mut languages: Vec<&str> = profiles.iter().map(|p| p.language.as_str()).collect();
        languages.sort_unstable();
        languages.dedup();
        assert_eq!(languages.len(), profiles.len());
    }

    #[test]
    fn test_block_comment_detection() {
        assert!(LexicalProfile::rust().has_block_comment());
        assert!(!LexicalProfile::python().has_block_comment());
    }
}
