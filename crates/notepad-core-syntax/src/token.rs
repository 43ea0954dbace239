//! Token model.

use std::fmt;

/// The hierarchical category of a token.
///
/// Kinds form a fixed two-level hierarchy (e.g. `KeywordDeclaration` is a child of
/// `Keyword`); [`parent`](TokenKind::parent) exposes the explicit parent pointer that theme
/// lookup walks when a specific kind has no color of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Plain text with no lexical category.
    Text,
    /// Whitespace, including newlines.
    Whitespace,
    /// Text the lexer recognized as erroneous.
    Error,
    /// General keyword.
    Keyword,
    /// Constant keyword (`true`, `None`, ...).
    KeywordConstant,
    /// Declaration keyword (`fn`, `def`, `class`, ...).
    KeywordDeclaration,
    /// Namespace keyword (`import`, `use`, ...).
    KeywordNamespace,
    /// Type keyword (`int`, `u32`, ...).
    KeywordType,
    /// General identifier.
    Name,
    /// Builtin name (`print`, `len`, ...).
    NameBuiltin,
    /// Function name at its definition site.
    NameFunction,
    /// Type name at its definition site.
    NameClass,
    /// Decorator/attribute name.
    NameDecorator,
    /// Exception name.
    NameException,
    /// Variable name.
    NameVariable,
    /// String literal.
    Str,
    /// Documentation string.
    StrDoc,
    /// Escape sequence inside a string.
    StrEscape,
    /// Regex literal.
    StrRegex,
    /// Numeric literal.
    Number,
    /// Operator characters.
    Operator,
    /// Punctuation and brackets.
    Punctuation,
    /// General comment.
    Comment,
    /// Line comment.
    CommentSingle,
    /// Block comment.
    CommentMultiline,
}

impl TokenKind {
    /// Every kind, root kinds first.
    pub const ALL: [TokenKind; 26] = [
        Self::Text,
        Self::Whitespace,
        Self::Error,
        Self::Keyword,
        Self::KeywordConstant,
        Self::KeywordDeclaration,
        Self::KeywordNamespace,
        Self::KeywordType,
        Self::Name,
        Self::NameBuiltin,
        Self::NameFunction,
        Self::NameClass,
        Self::NameDecorator,
        Self::NameException,
        Self::NameVariable,
        Self::Str,
        Self::StrDoc,
        Self::StrEscape,
        Self::StrRegex,
        Self::Number,
        Self::Operator,
        Self::Punctuation,
        Self::Comment,
        Self::CommentSingle,
        Self::CommentMultiline,
    ];

    /// The parent kind in the hierarchy, or `None` for root kinds.
    pub fn parent(self) -> Option<TokenKind> {
        match self {
            Self::KeywordConstant
            | Self::KeywordDeclaration
            | Self::KeywordNamespace
            | Self::KeywordType => Some(Self::Keyword),
            Self::NameBuiltin
            | Self::NameFunction
            | Self::NameClass
            | Self::NameDecorator
            | Self::NameException
            | Self::NameVariable => Some(Self::Name),
            Self::StrDoc | Self::StrEscape | Self::StrRegex => Some(Self::Str),
            Self::CommentSingle | Self::CommentMultiline => Some(Self::Comment),
            _ => None,
        }
    }

    /// The stable tag name this kind is applied under.
    pub fn tag_name(self) -> &'static str {
        match self {
            Self::Text => "syntax.text",
            Self::Whitespace => "syntax.whitespace",
            Self::Error => "syntax.error",
            Self::Keyword => "syntax.keyword",
            Self::KeywordConstant => "syntax.keyword.constant",
            Self::KeywordDeclaration => "syntax.keyword.declaration",
            Self::KeywordNamespace => "syntax.keyword.namespace",
            Self::KeywordType => "syntax.keyword.type",
            Self::Name => "syntax.name",
            Self::NameBuiltin => "syntax.name.builtin",
            Self::NameFunction => "syntax.name.function",
            Self::NameClass => "syntax.name.class",
            Self::NameDecorator => "syntax.name.decorator",
            Self::NameException => "syntax.name.exception",
            Self::NameVariable => "syntax.name.variable",
            Self::Str => "syntax.string",
            Self::StrDoc => "syntax.string.doc",
            Self::StrEscape => "syntax.string.escape",
            Self::StrRegex => "syntax.string.regex",
            Self::Number => "syntax.number",
            Self::Operator => "syntax.operator",
            Self::Punctuation => "syntax.punctuation",
            Self::Comment => "syntax.comment",
            Self::CommentSingle => "syntax.comment.single",
            Self::CommentMultiline => "syntax.comment.multiline",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

/// The atomic output of tokenization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token's category.
    pub kind: TokenKind,
    /// The exact source text of the token.
    pub text: String,
}

impl Token {
    /// Create a token.
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Length of the token in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_chain() {
        assert_eq!(
            TokenKind::KeywordDeclaration.parent(),
            Some(TokenKind::Keyword)
        );
        assert_eq!(TokenKind::Keyword.parent(), None);
        assert_eq!(TokenKind::StrDoc.parent(), Some(TokenKind::Str));
        assert_eq!(TokenKind::Text.parent(), None);
    }

    #[test]
    fn test_every_kind_has_a_distinct_tag_name() {
        let mut names: Vec<&str> = TokenKind::ALL.iter().map(|k| k.tag_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TokenKind::ALL.len());
    }

    #[test]
    fn test_parents_are_root_kinds() {
        for kind in TokenKind::ALL {
            if let Some(parent) = kind.parent() {
                assert_eq!(parent.parent(), None, "{kind:?} parent is not a root");
            }
        }
    }
}
