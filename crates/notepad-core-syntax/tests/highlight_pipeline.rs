//! End-to-end checks of the tokenize -> map -> tag pipeline against a live buffer.

use notepad_core::{Position, TagTable, TextBuffer};
use notepad_core_lang::{LanguageId, LexicalProfile};
use notepad_core_syntax::{
    HighlightScheduler, LexerRegistry, SyntaxHighlighter, Theme, TokenKind, map_spans,
};
use std::time::{Duration, Instant};

const SNIPPETS: &[(&str, &str)] = &[
    (
        "python",
        "import os\n\n@cache\ndef walk(root):\n    \"\"\"Yield files.\n\n    Depth first.\"\"\"\n    for name in os.listdir(root):\n        yield name  # one entry\n",
    ),
    (
        "rust",
        "use std::fmt;\n\n/* block\ncomment */\nfn main() {\n    let greeting = \"hello \\\"world\\\"\";\n    println!(\"{greeting}\");\n}\n",
    ),
    ("javascript", "const x = `template\nliteral`;\nif (x !== undefined) {\n  console.log(x);\n}\n"),
    ("json", "{\n  \"name\": \"demo\",\n  \"count\": 3,\n  \"ok\": true\n}\n"),
    ("klingon", "completely unknown language\n\twith tabs\nand three lines\n"),
];

#[test]
fn tokenization_is_lossless_for_every_builtin_language() {
    let registry = LexerRegistry::with_defaults();

    for (language, text) in SNIPPETS {
        let tokens = registry.tokenize(text, &LanguageId::new(*language));
        let concatenated: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(&concatenated, text, "lossless check failed for {language}");
    }
}

#[test]
fn spans_tile_the_tokenized_range_for_every_snippet() {
    let registry = LexerRegistry::with_defaults();

    for (language, text) in SNIPPETS {
        let tokens = registry.tokenize(text, &LanguageId::new(*language));
        let spans = map_spans(&tokens, Position::origin());

        let mut cursor = Position::origin();
        for span in &spans {
            assert_eq!(span.start, cursor, "gap or overlap in {language} spans");
            cursor = span.end;
        }

        // The walk must land exactly on the buffer's end coordinate.
        let buffer = TextBuffer::new(text);
        assert_eq!(
            cursor,
            buffer.offset_to_position(buffer.char_count()),
            "span union does not cover the {language} snippet"
        );
    }
}

#[test]
fn tagged_ranges_carry_the_exact_source_text() {
    let buffer = TextBuffer::new(
        "def fib(n):\n    '''doc\n    string'''\n    return n if n < 2 else fib(n - 1)\n",
    );
    let mut tags = TagTable::new();
    let mut highlighter = SyntaxHighlighter::new(LexerRegistry::with_defaults());
    highlighter.set_language(LanguageId::new("python"));

    assert!(highlighter.highlight_all(&buffer, &mut tags));

    let doc_id = tags.intern(TokenKind::StrDoc.tag_name());
    let doc_ranges = tags.ranges(doc_id).to_vec();
    assert_eq!(doc_ranges.len(), 1);
    assert_eq!(buffer.text_in(doc_ranges[0].clone()), "'''doc\n    string'''");

    let def_id = tags.intern(TokenKind::KeywordDeclaration.tag_name());
    let def_ranges = tags.ranges(def_id).to_vec();
    assert_eq!(def_ranges.len(), 1);
    assert_eq!(buffer.text_in(def_ranges[0].clone()), "def");
}

#[test]
fn edits_followed_by_a_debounced_pass_converge_to_current_content() {
    let mut buffer = TextBuffer::new("x = 1\n");
    let mut tags = TagTable::new();
    let mut highlighter = SyntaxHighlighter::new(LexerRegistry::with_defaults());
    highlighter.set_language(LanguageId::new("python"));
    let mut scheduler = HighlightScheduler::with_delay(Duration::from_millis(100));

    let start = Instant::now();
    highlighter.highlight_all(&buffer, &mut tags);

    // A burst of keystrokes: each change reschedules; none fires mid-burst.
    for (i, ch) in "def f():".chars().enumerate() {
        buffer.insert(6 + i, &ch.to_string());
        scheduler.note_change(start + Duration::from_millis(10 * i as u64));
    }
    assert_eq!(scheduler.poll(start + Duration::from_millis(120)), None);

    let pass = scheduler.poll(start + Duration::from_secs(1));
    assert!(pass.is_some());
    highlighter.highlight_all(&buffer, &mut tags);

    // The final tag state equals a fresh pass over the final content.
    let mut fresh_tags = TagTable::new();
    highlighter.highlight_all(&buffer, &mut fresh_tags);
    for kind in TokenKind::ALL {
        let id = tags.intern(kind.tag_name());
        let fresh_id = fresh_tags.intern(kind.tag_name());
        assert_eq!(tags.ranges(id), fresh_tags.ranges(fresh_id));
    }
}

#[test]
fn custom_profile_registers_and_highlights() {
    let yaml = r#"
language: fakelang
keywords: [when, otherwise]
line_comment: '--'
string_quotes: ['"']
"#;
    let profile = LexicalProfile::from_yaml(yaml).expect("profile parses");

    let mut highlighter = SyntaxHighlighter::new(LexerRegistry::new());
    highlighter.registry_mut().register_profile(profile);
    highlighter.set_language(LanguageId::new("fakelang"));

    let buffer = TextBuffer::new("when ready -- note\n");
    let mut tags = TagTable::new();
    highlighter.highlight_all(&buffer, &mut tags);

    let keyword_id = tags.intern(TokenKind::Keyword.tag_name());
    assert_eq!(tags.ranges(keyword_id), &[0..4]);
    let comment_id = tags.intern(TokenKind::CommentSingle.tag_name());
    assert_eq!(tags.ranges(comment_id), &[11..18]);
}

#[test]
fn theme_resolves_a_color_for_every_kind() {
    for theme in [Theme::dark(), Theme::light()] {
        for kind in TokenKind::ALL {
            // Never panics, never transparent: worst case is the default foreground.
            let _ = theme.color_for(kind);
        }
        assert_ne!(theme.background, theme.color_for(TokenKind::Keyword));
    }
}
