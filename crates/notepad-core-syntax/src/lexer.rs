//! Tokenizers and the tokenizer registry.
//!
//! Tokenization is **total**: any input, including malformed or half-typed code, yields
//! some token stream, and concatenating the stream's texts reproduces the input exactly.
//! The registry enforces the lossless contract at the seam - a lexer that violates it
//! degrades to a single plain-text token for the whole input rather than corrupting
//! downstream span mapping.

use crate::token::{Token, TokenKind};
use notepad_core_lang::{LanguageId, LexicalProfile};
use std::collections::HashMap;

/// A pluggable lexical analyzer for one language.
pub trait Lexer {
    /// Tokenize `text` into an ordered, lossless token stream.
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

/// The no-op lexer used for unknown languages.
///
/// Emits one plain-text token per line, with each newline as its own whitespace token.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextLexer;

impl Lexer for PlainTextLexer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut line = String::new();
        for ch in text.chars() {
            if ch == '\n' {
                if !line.is_empty() {
                    tokens.push(Token::new(TokenKind::Text, std::mem::take(&mut line)));
                }
                tokens.push(Token::new(TokenKind::Whitespace, "\n"));
            } else {
                line.push(ch);
            }
        }
        if !line.is_empty() {
            tokens.push(Token::new(TokenKind::Text, line));
        }
        tokens
    }
}

/// Identifier classification after keyword lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DefinerContext {
    None,
    Function,
    Type,
}

/// A scanner-based lexer driven by a [`LexicalProfile`].
///
/// The scanner consumes every character exactly once, so its output is lossless by
/// construction. It is intentionally a display lexer, not a parser: good enough for
/// coloring, resilient to incomplete code.
#[derive(Debug, Clone)]
pub struct RuleLexer {
    profile: LexicalProfile,
    keyword_kinds: HashMap<String, TokenKind>,
}

impl RuleLexer {
    /// Build a lexer from a lexical profile.
    pub fn new(profile: LexicalProfile) -> Self {
        let mut keyword_kinds = HashMap::new();
        let classes: [(&[String], TokenKind); 6] = [
            (&profile.keywords, TokenKind::Keyword),
            (&profile.builtins, TokenKind::NameBuiltin),
            (&profile.declaration_keywords, TokenKind::KeywordDeclaration),
            (&profile.constant_keywords, TokenKind::KeywordConstant),
            (&profile.namespace_keywords, TokenKind::KeywordNamespace),
            (&profile.type_keywords, TokenKind::KeywordType),
        ];
        // Later classes win on overlap, so the specific kinds take precedence.
        for (words, kind) in classes {
            for word in words {
                keyword_kinds.insert(word.clone(), kind);
            }
        }

        Self {
            profile,
            keyword_kinds,
        }
    }

    /// The profile this lexer was built from.
    pub fn profile(&self) -> &LexicalProfile {
        &self.profile
    }

    fn definer_context(&self, word: &str) -> DefinerContext {
        if self.profile.function_definers.iter().any(|w| w == word) {
            DefinerContext::Function
        } else if self.profile.type_definers.iter().any(|w| w == word) {
            DefinerContext::Type
        } else {
            DefinerContext::None
        }
    }
}

impl Lexer for RuleLexer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        Scanner::new(self, text).run()
    }
}

const OPERATOR_CHARS: &str = "+-*/%=<>!&|^~?";
const PUNCTUATION_CHARS: &str = "()[]{},.:;";

/// One tokenization pass over a char slice.
struct Scanner<'a> {
    lexer: &'a RuleLexer,
    chars: Vec<char>,
    pos: usize,
    tokens: Vec<Token>,
    definer: DefinerContext,
}

impl<'a> Scanner<'a> {
    fn new(lexer: &'a RuleLexer, text: &str) -> Self {
        Self {
            lexer,
            chars: text.chars().collect(),
            pos: 0,
            tokens: Vec::new(),
            definer: DefinerContext::None,
        }
    }

    fn run(mut self) -> Vec<Token> {
        while self.pos < self.chars.len() {
            let ch = self.chars[self.pos];
            let profile = &self.lexer.profile;

            if ch == '\n' || ch == '\r' {
                self.scan_newline();
            } else if ch.is_whitespace() {
                self.scan_whitespace_run();
            } else if self.marker_ahead(profile.line_comment.as_deref()) {
                self.scan_line_comment();
            } else if profile.has_block_comment()
                && self.marker_ahead(profile.block_comment_start.as_deref())
            {
                self.scan_block_comment();
            } else if self.marker_ahead(profile.doc_string_delimiter.as_deref()) {
                self.scan_doc_string();
            } else if profile.string_quotes.contains(&ch) {
                self.scan_string(ch);
            } else if ch.is_ascii_digit() {
                self.scan_number();
            } else if ch == '_' || ch.is_alphabetic() {
                self.scan_identifier();
            } else if profile.decorator_prefix == Some(ch) && self.ident_starts_after(1) {
                self.scan_decorator();
            } else if OPERATOR_CHARS.contains(ch) {
                self.scan_operator_run();
            } else if PUNCTUATION_CHARS.contains(ch) {
                self.push_range(TokenKind::Punctuation, self.pos, self.pos + 1);
            } else {
                self.push_range(TokenKind::Text, self.pos, self.pos + 1);
            }
        }
        self.tokens
    }

    fn marker_ahead(&self, marker: Option<&str>) -> bool {
        let Some(marker) = marker else {
            return false;
        };
        !marker.is_empty() && self.starts_with_at(self.pos, marker)
    }

    fn starts_with_at(&self, pos: usize, marker: &str) -> bool {
        let mut idx = pos;
        for ch in marker.chars() {
            if self.chars.get(idx) != Some(&ch) {
                return false;
            }
            idx += 1;
        }
        true
    }

    fn ident_starts_after(&self, offset: usize) -> bool {
        self.chars
            .get(self.pos + offset)
            .is_some_and(|&c| c == '_' || c.is_alphabetic())
    }

    fn push_range(&mut self, kind: TokenKind, start: usize, end: usize) {
        let text: String = self.chars[start..end].iter().collect();
        if kind != TokenKind::Whitespace {
            self.definer = DefinerContext::None;
        }
        self.tokens.push(Token::new(kind, text));
        self.pos = end;
    }

    fn scan_newline(&mut self) {
        let start = self.pos;
        let end = if self.chars[start] == '\r' && self.chars.get(start + 1) == Some(&'\n') {
            start + 2
        } else {
            start + 1
        };
        self.push_range(TokenKind::Whitespace, start, end);
        // A newline ends any pending definition context.
        self.definer = DefinerContext::None;
    }

    fn scan_whitespace_run(&mut self) {
        let start = self.pos;
        let mut end = start;
        while end < self.chars.len() {
            let ch = self.chars[end];
            if ch == '\n' || ch == '\r' || !ch.is_whitespace() {
                break;
            }
            end += 1;
        }
        self.push_range(TokenKind::Whitespace, start, end);
    }

    fn scan_line_comment(&mut self) {
        let start = self.pos;
        let mut end = start;
        while end < self.chars.len() && self.chars[end] != '\n' && self.chars[end] != '\r' {
            end += 1;
        }
        self.push_range(TokenKind::CommentSingle, start, end);
    }

    fn scan_block_comment(&mut self) {
        // Only reached when both markers are configured.
        let open_len = self
            .lexer
            .profile
            .block_comment_start
            .as_deref()
            .map_or(0, |m| m.chars().count());
        let close = self.lexer.profile.block_comment_end.clone().unwrap_or_default();

        let start = self.pos;
        let mut end = start + open_len;
        loop {
            if end >= self.chars.len() {
                // Unterminated block comment runs to end of input.
                break;
            }
            if !close.is_empty() && self.starts_with_at(end, &close) {
                end += close.chars().count();
                break;
            }
            end += 1;
        }
        self.push_range(TokenKind::CommentMultiline, start, end);
    }

    fn scan_doc_string(&mut self) {
        let delim = self
            .lexer
            .profile
            .doc_string_delimiter
            .clone()
            .unwrap_or_default();
        let delim_len = delim.chars().count();

        let start = self.pos;
        let mut end = start + delim_len;
        loop {
            if end >= self.chars.len() {
                break;
            }
            if self.starts_with_at(end, &delim) {
                end += delim_len;
                break;
            }
            if self.chars[end] == '\\' && self.lexer.profile.string_escape == Some('\\') {
                end += 1;
            }
            end += 1;
        }
        self.push_range(TokenKind::StrDoc, start, end.min(self.chars.len()));
    }

    fn scan_string(&mut self, quote: char) {
        let escape = self.lexer.profile.string_escape;
        let start = self.pos;
        let mut end = start + 1;
        loop {
            match self.chars.get(end) {
                // Unterminated strings stop at the line end.
                None => break,
                Some(&ch) if ch == '\n' || ch == '\r' => break,
                Some(&ch) if Some(ch) == escape => {
                    end += if end + 1 < self.chars.len() { 2 } else { 1 };
                }
                Some(&ch) if ch == quote => {
                    end += 1;
                    break;
                }
                Some(_) => end += 1,
            }
        }
        self.push_range(TokenKind::Str, start, end.min(self.chars.len()));
    }

    fn scan_number(&mut self) {
        let start = self.pos;
        let mut end = start;
        while end < self.chars.len() {
            let ch = self.chars[end];
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' {
                end += 1;
            } else {
                break;
            }
        }
        self.push_range(TokenKind::Number, start, end);
    }

    fn scan_identifier(&mut self) {
        let start = self.pos;
        let mut end = start;
        while end < self.chars.len() {
            let ch = self.chars[end];
            if ch == '_' || ch.is_alphanumeric() {
                end += 1;
            } else {
                break;
            }
        }

        let word: String = self.chars[start..end].iter().collect();
        let pending = self.definer;
        let kind = match self.lexer.keyword_kinds.get(&word) {
            Some(&kind) => kind,
            None => match pending {
                DefinerContext::Function => TokenKind::NameFunction,
                DefinerContext::Type => TokenKind::NameClass,
                DefinerContext::None => TokenKind::Name,
            },
        };

        self.push_range(kind, start, end);
        self.definer = self.lexer.definer_context(&word);
    }

    fn scan_decorator(&mut self) {
        let start = self.pos;
        let mut end = start + 1;
        while end < self.chars.len() {
            let ch = self.chars[end];
            if ch == '_' || ch == '.' || ch.is_alphanumeric() {
                end += 1;
            } else {
                break;
            }
        }
        self.push_range(TokenKind::NameDecorator, start, end);
    }

    fn scan_operator_run(&mut self) {
        let start = self.pos;
        let mut end = start;
        while end < self.chars.len() && OPERATOR_CHARS.contains(self.chars[end]) {
            end += 1;
        }
        self.push_range(TokenKind::Operator, start, end);
    }
}

/// The open registry of lexers, keyed by language id.
///
/// This is the tokenizer adapter: `tokenize` is total for every `(text, language)` pair.
pub struct LexerRegistry {
    lexers: HashMap<LanguageId, Box<dyn Lexer>>,
    plain: PlainTextLexer,
}

impl LexerRegistry {
    /// Create an empty registry (every language degrades to plain text).
    pub fn new() -> Self {
        Self {
            lexers: HashMap::new(),
            plain: PlainTextLexer,
        }
    }

    /// Create a registry with all compiled-in lexical profiles registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for profile in LexicalProfile::builtin_profiles() {
            registry.register_profile(profile);
        }
        registry
    }

    /// Register a custom lexer for a language, replacing any existing one.
    pub fn register(&mut self, language: LanguageId, lexer: Box<dyn Lexer>) {
        self.lexers.insert(language, lexer);
    }

    /// Register a rule lexer built from a lexical profile.
    pub fn register_profile(&mut self, profile: LexicalProfile) {
        let language = LanguageId::new(profile.language.clone());
        self.register(language, Box::new(RuleLexer::new(profile)));
    }

    /// Returns `true` if a lexer is registered for `language`.
    pub fn contains(&self, language: &LanguageId) -> bool {
        self.lexers.contains_key(language)
    }

    /// The registered language ids, unordered.
    pub fn languages(&self) -> Vec<&LanguageId> {
        self.lexers.keys().collect()
    }

    /// Tokenize `text` for `language`.
    ///
    /// Unknown languages use the plain-text lexer. A registered lexer whose output fails
    /// the lossless check degrades to a single plain-text token covering the whole input.
    pub fn tokenize(&self, text: &str, language: &LanguageId) -> Vec<Token> {
        if text.is_empty() {
            return Vec::new();
        }

        let Some(lexer) = self.lexers.get(language) else {
            return self.plain.tokenize(text);
        };

        let tokens = lexer.tokenize(text);
        if !is_lossless(text, &tokens) {
            tracing::debug!(
                language = language.as_str(),
                "lexer output failed the lossless check; degrading to plain text"
            );
            return vec![Token::new(TokenKind::Text, text)];
        }
        tokens
    }
}

impl Default for LexerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for LexerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LexerRegistry")
            .field("languages", &self.lexers.len())
            .finish_non_exhaustive()
    }
}

fn is_lossless(text: &str, tokens: &[Token]) -> bool {
    let mut rest = text;
    for token in tokens {
        let Some(tail) = rest.strip_prefix(token.text.as_str()) else {
            return false;
        };
        rest = tail;
    }
    rest.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concat(tokens: &[Token]) -> String {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_plain_text_one_token_per_line() {
        let tokens = PlainTextLexer.tokenize("first\nsecond\n");
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenKind::Text, "first"),
                Token::new(TokenKind::Whitespace, "\n"),
                Token::new(TokenKind::Text, "second"),
                Token::new(TokenKind::Whitespace, "\n"),
            ]
        );
    }

    #[test]
    fn test_rule_lexer_python_snippet() {
        let lexer = RuleLexer::new(LexicalProfile::python());
        let tokens = lexer.tokenize("def greet(name):\n    # say hi\n    return 'hi'\n");

        assert_eq!(concat(&tokens), "def greet(name):\n    # say hi\n    return 'hi'\n");
        assert!(tokens.contains(&Token::new(TokenKind::KeywordDeclaration, "def")));
        assert!(tokens.contains(&Token::new(TokenKind::NameFunction, "greet")));
        assert!(tokens.contains(&Token::new(TokenKind::CommentSingle, "# say hi")));
        assert!(tokens.contains(&Token::new(TokenKind::Str, "'hi'")));
        assert!(tokens.contains(&Token::new(TokenKind::Keyword, "return")));
    }

    #[test]
    fn test_rule_lexer_block_comment_spans_lines() {
        let lexer = RuleLexer::new(LexicalProfile::rust());
        let tokens = lexer.tokenize("a /* one\ntwo */ b");

        assert!(tokens.contains(&Token::new(TokenKind::CommentMultiline, "/* one\ntwo */")));
        assert_eq!(concat(&tokens), "a /* one\ntwo */ b");
    }

    #[test]
    fn test_rule_lexer_unterminated_constructs() {
        let lexer = RuleLexer::new(LexicalProfile::rust());

        // Unterminated string stops at the line end.
        let tokens = lexer.tokenize("let s = \"oops\nnext");
        assert!(tokens.contains(&Token::new(TokenKind::Str, "\"oops")));
        assert_eq!(concat(&tokens), "let s = \"oops\nnext");

        // Unterminated block comment runs to end of input.
        let tokens = lexer.tokenize("/* never closed");
        assert_eq!(tokens, vec![Token::new(TokenKind::CommentMultiline, "/* never closed")]);
    }

    #[test]
    fn test_rule_lexer_doc_string() {
        let lexer = RuleLexer::new(LexicalProfile::python());
        let tokens = lexer.tokenize("\"\"\"doc\nstring\"\"\" x");
        assert!(tokens.contains(&Token::new(TokenKind::StrDoc, "\"\"\"doc\nstring\"\"\"")));
    }

    #[test]
    fn test_rule_lexer_decorator_and_escape() {
        let lexer = RuleLexer::new(LexicalProfile::python());

        let tokens = lexer.tokenize("@app.route\n");
        assert!(tokens.contains(&Token::new(TokenKind::NameDecorator, "@app.route")));

        let tokens = lexer.tokenize(r#"'it\'s'"#);
        assert_eq!(tokens, vec![Token::new(TokenKind::Str, r#"'it\'s'"#)]);
    }

    #[test]
    fn test_lossless_over_odd_input() {
        let lexer = RuleLexer::new(LexicalProfile::rust());
        let input = "émoji 🦀 \t ===->> 0xFF_u8 \r\n weird§chars";
        assert_eq!(concat(&lexer.tokenize(input)), input);
    }

    #[test]
    fn test_registry_unknown_language_is_plain_per_line() {
        let registry = LexerRegistry::with_defaults();
        let tokens = registry.tokenize("a\nb", &LanguageId::new("klingon"));
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenKind::Text, "a"),
                Token::new(TokenKind::Whitespace, "\n"),
                Token::new(TokenKind::Text, "b"),
            ]
        );
    }

    #[test]
    fn test_registry_lossless_degradation() {
        struct BrokenLexer;
        impl Lexer for BrokenLexer {
            fn tokenize(&self, _text: &str) -> Vec<Token> {
                vec![Token::new(TokenKind::Keyword, "wrong")]
            }
        }

        let mut registry = LexerRegistry::new();
        registry.register(LanguageId::new("broken"), Box::new(BrokenLexer));

        let tokens = registry.tokenize("original text", &LanguageId::new("broken"));
        assert_eq!(tokens, vec![Token::new(TokenKind::Text, "original text")]);
    }

    #[test]
    fn test_registry_empty_input() {
        let registry = LexerRegistry::with_defaults();
        assert!(registry.tokenize("", &LanguageId::new("python")).is_empty());
    }
}
