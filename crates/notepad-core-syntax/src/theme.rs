//! Color themes.
//!
//! A [`Theme`] maps token kinds to display colors and carries the named slots a renderer
//! needs (background, selection, gutter, ...). Lookup walks from a specific kind up its
//! parent chain to the nearest kind with a defined color, falling back to the default
//! foreground; themes therefore only need entries where a child's color differs from its
//! parent's.

use crate::token::TokenKind;
use std::collections::HashMap;
use std::fmt;

/// An RGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Create a color from channel values.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` hex string.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
        let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
        let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// An immutable mapping from token kinds and named slots to display colors.
///
/// Exactly one theme is active at a time; switching themes requires re-tagging the entire
/// buffer, which the session does with an immediate full highlight pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Theme name (`"dark"`, `"light"`, or host-defined).
    pub name: String,
    /// Editor background.
    pub background: Color,
    /// Default text color, and the final fallback for token lookup.
    pub foreground: Color,
    /// Selection background.
    pub selection: Color,
    /// Background of the line containing the caret.
    pub current_line: Color,
    /// Gutter (line number) text color.
    pub gutter_foreground: Color,
    /// Gutter background.
    pub gutter_background: Color,
    token_colors: HashMap<TokenKind, Color>,
}

impl Theme {
    /// The color for a token kind.
    ///
    /// Walks from `kind` up the parent chain to the nearest kind with a defined color,
    /// then falls back to the default foreground.
    pub fn color_for(&self, kind: TokenKind) -> Color {
        let mut cursor = Some(kind);
        while let Some(kind) = cursor {
            if let Some(&color) = self.token_colors.get(&kind) {
                return color;
            }
            cursor = kind.parent();
        }
        self.foreground
    }

    /// Returns `true` if `kind` or one of its ancestors has a defined color.
    pub fn defines(&self, kind: TokenKind) -> bool {
        let mut cursor = Some(kind);
        while let Some(kind) = cursor {
            if self.token_colors.contains_key(&kind) {
                return true;
            }
            cursor = kind.parent();
        }
        false
    }

    /// Add or replace a token color, consuming and returning the theme.
    pub fn with_token_color(mut self, kind: TokenKind, color: Color) -> Self {
        self.token_colors.insert(kind, color);
        self
    }

    /// The built-in dark theme.
    pub fn dark() -> Self {
        let token_colors = HashMap::from([
            (TokenKind::Keyword, Color::rgb(0x56, 0x9c, 0xd6)),
            (TokenKind::KeywordNamespace, Color::rgb(0xc5, 0x86, 0xc0)),
            (TokenKind::KeywordType, Color::rgb(0x4e, 0xc9, 0xb0)),
            (TokenKind::Name, Color::rgb(0x9c, 0xdc, 0xfe)),
            (TokenKind::NameBuiltin, Color::rgb(0x4e, 0xc9, 0xb0)),
            (TokenKind::NameFunction, Color::rgb(0xdc, 0xdc, 0xaa)),
            (TokenKind::NameClass, Color::rgb(0x4e, 0xc9, 0xb0)),
            (TokenKind::NameDecorator, Color::rgb(0xdc, 0xdc, 0xaa)),
            (TokenKind::NameException, Color::rgb(0x4e, 0xc9, 0xb0)),
            (TokenKind::Str, Color::rgb(0xce, 0x91, 0x78)),
            (TokenKind::StrDoc, Color::rgb(0x6a, 0x99, 0x55)),
            (TokenKind::StrEscape, Color::rgb(0xd7, 0xba, 0x7d)),
            (TokenKind::StrRegex, Color::rgb(0xd1, 0x69, 0x69)),
            (TokenKind::Number, Color::rgb(0xb5, 0xce, 0xa8)),
            (TokenKind::Operator, Color::rgb(0xd4, 0xd4, 0xd4)),
            (TokenKind::Punctuation, Color::rgb(0xd4, 0xd4, 0xd4)),
            (TokenKind::Comment, Color::rgb(0x6a, 0x99, 0x55)),
            (TokenKind::Error, Color::rgb(0xf4, 0x47, 0x47)),
        ]);

        Self {
            name: "dark".to_string(),
            background: Color::rgb(0x1e, 0x1e, 0x1e),
            foreground: Color::rgb(0xd4, 0xd4, 0xd4),
            selection: Color::rgb(0x26, 0x4f, 0x78),
            current_line: Color::rgb(0x2a, 0x2d, 0x2e),
            gutter_foreground: Color::rgb(0x85, 0x85, 0x85),
            gutter_background: Color::rgb(0x1e, 0x1e, 0x1e),
            token_colors,
        }
    }

    /// The built-in light theme.
    pub fn light() -> Self {
        let token_colors = HashMap::from([
            (TokenKind::Keyword, Color::rgb(0x00, 0x00, 0xff)),
            (TokenKind::KeywordNamespace, Color::rgb(0xaf, 0x00, 0xdb)),
            (TokenKind::KeywordType, Color::rgb(0x26, 0x7f, 0x99)),
            (TokenKind::Name, Color::rgb(0x00, 0x10, 0x80)),
            (TokenKind::NameBuiltin, Color::rgb(0x26, 0x7f, 0x99)),
            (TokenKind::NameFunction, Color::rgb(0x79, 0x5e, 0x26)),
            (TokenKind::NameClass, Color::rgb(0x26, 0x7f, 0x99)),
            (TokenKind::NameDecorator, Color::rgb(0x79, 0x5e, 0x26)),
            (TokenKind::NameException, Color::rgb(0x26, 0x7f, 0x99)),
            (TokenKind::Str, Color::rgb(0xa3, 0x15, 0x15)),
            (TokenKind::StrDoc, Color::rgb(0x00, 0x80, 0x00)),
            (TokenKind::StrEscape, Color::rgb(0xee, 0x00, 0x00)),
            (TokenKind::StrRegex, Color::rgb(0x81, 0x1f, 0x3f)),
            (TokenKind::Number, Color::rgb(0x09, 0x86, 0x58)),
            (TokenKind::Operator, Color::rgb(0x00, 0x00, 0x00)),
            (TokenKind::Punctuation, Color::rgb(0x00, 0x00, 0x00)),
            (TokenKind::Comment, Color::rgb(0x00, 0x80, 0x00)),
            (TokenKind::Error, Color::rgb(0xff, 0x00, 0x00)),
        ]);

        Self {
            name: "light".to_string(),
            background: Color::rgb(0xff, 0xff, 0xff),
            foreground: Color::rgb(0x00, 0x00, 0x00),
            selection: Color::rgb(0xad, 0xd6, 0xff),
            current_line: Color::rgb(0xff, 0xfb, 0xdd),
            gutter_foreground: Color::rgb(0x23, 0x78, 0x93),
            gutter_background: Color::rgb(0xf3, 0xf3, 0xf3),
            token_colors,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}
