//! Cross-subsystem checks of a full editing session.
//!
//! Timers are configured with zero delay so a single `tick` fires every due debounce
//! deterministically, without sleeping.

use notepad_core_lang::LanguageId;
use notepad_session::{
    DocumentSession, SearchOptions, SessionConfig, TagId, TokenKind,
};
use std::time::Duration;

fn instant_config() -> SessionConfig {
    SessionConfig {
        highlight_delay: Duration::ZERO,
        word_rebuild_delay: Duration::ZERO,
        selection_scan_delay: Duration::ZERO,
        lint_timeout: Duration::from_secs(5),
    }
}

fn python_session(text: &str) -> DocumentSession {
    let mut session = DocumentSession::with_config(text, instant_config());
    session.set_language(LanguageId::new("python"));
    session
}

fn keyword_ranges(session: &DocumentSession) -> Vec<std::ops::Range<usize>> {
    let name = TokenKind::KeywordDeclaration.tag_name();
    session
        .tags()
        .tags_in(0..session.buffer().char_count())
        .into_iter()
        .filter(|(tag, _)| session.tags().name_of(*tag) == Some(name))
        .map(|(_, range)| range)
        .collect()
}

#[test]
fn typing_then_tick_highlights_the_buffer() {
    let mut session = python_session("");
    for (i, ch) in "def f():".chars().enumerate() {
        session.insert(i, &ch.to_string());
    }

    // The burst has not been highlighted yet; one tick settles it.
    session.tick();
    assert_eq!(keyword_ranges(&session), vec![0..3]);
}

#[test]
fn a_burst_of_edits_converges_to_the_state_of_a_fresh_pass() {
    let mut session = python_session("x = 1\n");
    session.insert(6, "def g():\n    return 'hi'\n");
    session.delete(0..2);
    session.insert(0, "y");
    session.tick();

    let fresh = python_session(&session.text());
    // set_language already ran a full pass on `fresh`.
    let len = session.buffer().char_count();
    let mut tagged: Vec<_> = session
        .tags()
        .tags_in(0..len)
        .into_iter()
        .map(|(tag, range)| (session.tags().name_of(tag).unwrap_or("").to_string(), range))
        .collect();
    let mut expected: Vec<_> = fresh
        .tags()
        .tags_in(0..len)
        .into_iter()
        .map(|(tag, range)| (fresh.tags().name_of(tag).unwrap_or("").to_string(), range))
        .collect();
    tagged.sort();
    expected.sort();
    assert_eq!(tagged, expected);
}

#[test]
fn viewport_limits_the_debounced_pass_region() {
    let mut lines = String::new();
    for _ in 0..100 {
        lines.push_str("def f():\n");
    }
    let mut session = DocumentSession::with_config(&lines, instant_config());
    session.set_viewport(1..3);
    session.set_language(LanguageId::new("python"));

    // The language switch highlighted everything; an edit plus tick must only re-cover
    // the viewport, leaving distant lines' tags intact from the full pass.
    session.replace(0..3, "xyz");
    session.tick();

    let ranges = keyword_ranges(&session);
    // Line 1's "def" is gone, the other 99 remain.
    assert_eq!(ranges.len(), 99);
    assert!(!ranges.contains(&(0..3)));
}

#[test]
fn language_switch_highlights_immediately_without_a_tick() {
    let mut session = DocumentSession::with_config("def f():\n", instant_config());
    assert!(keyword_ranges(&session).is_empty());

    session.set_language(LanguageId::new("python"));
    assert_eq!(keyword_ranges(&session), vec![0..3]);
}

#[test]
fn theme_switch_highlights_immediately_without_a_tick() {
    let mut session = python_session("def f():\n");
    session.insert(0, "\n");
    // The pending debounced pass is superseded by the theme switch's immediate one.
    session.set_theme(notepad_session::Theme::light());
    assert_eq!(keyword_ranges(&session), vec![1..4]);
}

#[test]
fn selection_drives_a_debounced_occurrence_scan() {
    let mut session = python_session("total = 1\ntotal += 2\nprint(total)\n");

    session.select(0..5);
    assert_eq!(session.occurrence_count(), 0);
    session.tick();
    assert_eq!(session.occurrence_count(), 3);
    assert_eq!(session.tags().ranges(TagId::OCCURRENCE).len(), 3);
    // The selection coincides with the first match.
    assert_eq!(session.occurrence_cursor(), Some(0));

    // Navigation wraps in both directions.
    assert_eq!(session.next_occurrence(), Some(10..15));
    assert_eq!(session.next_occurrence(), Some(27..32));
    assert_eq!(session.next_occurrence(), Some(0..5));
    assert_eq!(session.previous_occurrence(), Some(27..32));
}

#[test]
fn edits_invalidate_occurrences_until_the_next_scan() {
    let mut session = python_session("foo foo foo");
    assert_eq!(session.highlight_occurrences("foo"), 3);

    session.delete(0..4);
    assert_eq!(session.occurrence_count(), 0);
    assert_eq!(session.occurrence_cursor(), None);
    assert!(session.tags().ranges(TagId::OCCURRENCE).is_empty());
    assert!(session.next_occurrence().is_none());
}

#[test]
fn word_index_rebuilds_on_tick_and_feeds_suggestions() {
    let mut session = python_session("");
    session.set_text("keyword keys sandbox\nkey");
    session.tick();

    // Caret at the end of "key" on line 2.
    session.set_caret(24);
    assert_eq!(session.suggestions(), vec!["keys", "keyword"]);
    assert_eq!(session.suggest("san"), vec!["sandbox"]);

    // Accepting a suggestion replaces the typed prefix.
    session.accept_suggestion("keyword");
    assert_eq!(session.buffer().line_text(2).unwrap(), "keyword");
}

#[test]
fn find_replace_round_trip_updates_derived_state() {
    let mut session = python_session("alpha beta alpha\n");
    session.highlight_occurrences("alpha");

    session
        .start_find("alpha", SearchOptions::default())
        .unwrap();
    assert!(session.find_next().is_some());
    assert_eq!(session.tags().ranges(TagId::SEARCH).len(), 1);

    assert_eq!(session.replace_all("gamma"), 2);
    assert_eq!(session.text(), "gamma beta gamma\n");
    // The replacement is a mutation: occurrence state is gone.
    assert_eq!(session.occurrence_count(), 0);

    session.stop_find();
    assert!(session.tags().ranges(TagId::SEARCH).is_empty());
}

#[cfg(unix)]
mod lint {
    use super::*;
    use notepad_core_lint::{LinterConfig, Severity};
    use std::collections::HashMap;
    use std::io::Write;
    use std::time::Instant;

    /// Register a `cat`-backed "linter" whose output is the fixture file's own content.
    fn register_cat_linter(session: &mut DocumentSession, language: &str) {
        let config = LinterConfig::new(
            language,
            vec!["cat".to_string()],
            r"(?m)^(\d+):(\d+): ([A-Z]\d+): (.+)$",
            HashMap::from([('E', Severity::Error), ('W', Severity::Warning)]),
        )
        .expect("valid config");
        session.lint_runner_mut().registry_mut().register(config);
    }

    fn tick_until_reports(session: &mut DocumentSession, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            session.tick();
            if !session.lint_reports().is_empty() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        false
    }

    #[test]
    fn lint_results_become_tags_markers_and_tooltips() {
        let mut fixture = tempfile::NamedTempFile::new().expect("temp file");
        fixture
            .write_all(b"1:0: E900: broken line\n2:6: W100: dubious line\n")
            .expect("write fixture");

        let mut session =
            DocumentSession::with_config("first line\nsecond line\n", instant_config());
        register_cat_linter(&mut session, "fixture");
        session.set_file(fixture.path());
        session.set_language(LanguageId::new("fixture"));

        assert!(session.request_lint().is_some());
        assert!(tick_until_reports(&mut session, Duration::from_secs(5)));

        assert_eq!(session.tags().ranges(TagId::LINT_ERROR), &[0..10]);
        assert_eq!(session.tags().ranges(TagId::LINT_WARNING), &[17..22]);
        assert_eq!(
            session.lint_markers(),
            vec![(1, Severity::Error), (2, Severity::Warning)]
        );
        assert_eq!(session.lint_counts().errors, 1);
        assert!(
            session
                .lint_tooltip(1)
                .unwrap()
                .contains("broken line")
        );
        assert!(session.lint_tooltip(3).is_none());

        // Disabling clears results and tags.
        session.set_lint_enabled(false);
        assert!(session.lint_reports().is_empty());
        assert!(session.tags().ranges(TagId::LINT_ERROR).is_empty());
    }

    #[test]
    fn a_timed_out_linter_yields_no_reports_and_no_error() {
        let mut session = DocumentSession::with_config(
            "content\n",
            SessionConfig {
                lint_timeout: Duration::from_millis(150),
                ..instant_config()
            },
        );
        let config = LinterConfig::new(
            "fixture",
            vec!["sleep".to_string(), "10".to_string()],
            r"(?m)^(\d+):(\d+): ([A-Z]\d+): (.+)$",
            HashMap::new(),
        )
        .expect("valid config");
        session.lint_runner_mut().registry_mut().register(config);

        let fixture = tempfile::NamedTempFile::new().expect("temp file");
        session.set_file(fixture.path());
        session.set_language(LanguageId::new("fixture"));

        assert!(session.request_lint().is_some());
        // The run is killed at the timeout and lands as an empty result set.
        assert!(!tick_until_reports(&mut session, Duration::from_secs(2)));
        assert!(session.lint_reports().is_empty());
        assert!(session.tags().ranges(TagId::LINT_ERROR).is_empty());
    }
}
