//! The single-document session.

use notepad_core::{
    BufferChange, Debouncer, FindReplace, OccurrenceIndex, SearchError, SearchMatch,
    SearchOptions, TagId, TagTable, TextBuffer,
};
use notepad_core_complete::{WordIndex, current_word_at, word_bounds_at};
use notepad_core_lang::{LanguageId, detect_language};
use notepad_core_lint::{LintReport, LintRunner, LinterRegistry, Severity, SeverityCounts, gutter};
use notepad_core_syntax::{
    HighlightPass, HighlightScheduler, LexerRegistry, SyntaxHighlighter, Theme,
};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Delay between a selection change and the occurrence scan it triggers.
pub const SELECTION_SCAN_DEBOUNCE: Duration = Duration::from_millis(150);

/// Minimum trimmed selection length that triggers an occurrence scan.
pub const MIN_SELECTION_CHARS: usize = 2;

/// Timing knobs for a session's debounce timers and the lint timeout.
///
/// The defaults are the production constants; tests shrink them (usually to zero) to make
/// [`DocumentSession::tick`] fire deterministically without sleeping.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Delay between the last buffer change and the highlight pass.
    pub highlight_delay: Duration,
    /// Delay between the last buffer change and the word-index rebuild.
    pub word_rebuild_delay: Duration,
    /// Delay between a selection change and the occurrence scan.
    pub selection_scan_delay: Duration,
    /// Hard ceiling on external linter wall-clock time.
    pub lint_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            highlight_delay: notepad_core_syntax::HIGHLIGHT_DEBOUNCE,
            word_rebuild_delay: notepad_core_complete::REBUILD_DEBOUNCE,
            selection_scan_delay: SELECTION_SCAN_DEBOUNCE,
            lint_timeout: notepad_core_lint::LINT_TIMEOUT,
        }
    }
}

/// One open document and every subsystem derived from it.
///
/// The session owns the buffer; the highlighter, occurrence index, word index, and lint
/// runner are observers that the session re-synchronizes on every mutation. All work runs
/// on the caller's thread except linting, which the runner executes on workers and
/// delivers back through [`tick`](Self::tick).
///
/// Hosts drive the session from their event loop: call mutation and query methods as the
/// user acts, report the visible line range with [`set_viewport`](Self::set_viewport),
/// and call [`tick`](Self::tick) periodically (or on a timer) to fire due debounces.
pub struct DocumentSession {
    buffer: TextBuffer,
    tags: TagTable,
    theme: Theme,
    highlighter: SyntaxHighlighter,
    scheduler: HighlightScheduler,
    occurrences: OccurrenceIndex,
    selection_timer: Debouncer,
    words: WordIndex,
    word_timer: Debouncer,
    find: Option<FindReplace>,
    linter: LintRunner,
    file_path: Option<PathBuf>,
}

impl DocumentSession {
    /// Create a session holding `text`, with production timing and the built-in language
    /// and linter registries. The language starts as plain text.
    pub fn new(text: &str) -> Self {
        Self::with_config(text, SessionConfig::default())
    }

    /// Create a session with custom timing (mainly for tests).
    pub fn with_config(text: &str, config: SessionConfig) -> Self {
        Self {
            buffer: TextBuffer::new(text),
            tags: TagTable::new(),
            theme: Theme::dark(),
            highlighter: SyntaxHighlighter::new(LexerRegistry::with_defaults()),
            scheduler: HighlightScheduler::with_delay(config.highlight_delay),
            occurrences: OccurrenceIndex::new(),
            selection_timer: Debouncer::new(config.selection_scan_delay),
            words: WordIndex::new(),
            word_timer: Debouncer::new(config.word_rebuild_delay),
            find: None,
            linter: LintRunner::with_timeout(
                LinterRegistry::with_defaults(),
                config.lint_timeout,
            ),
            file_path: None,
        }
    }

    // --- buffer access ---------------------------------------------------------------

    /// The document buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// The tag table the host renders from.
    pub fn tags(&self) -> &TagTable {
        &self.tags
    }

    /// The complete document text.
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Register a host-side change observer on the buffer.
    ///
    /// The session's own subsystems are re-synchronized directly by its mutation methods;
    /// this hook is for the view layer (line-number gutters, modified indicators).
    pub fn subscribe(&mut self, callback: impl FnMut(&BufferChange) + 'static) {
        self.buffer.subscribe(callback);
    }

    /// Caret location as a char offset.
    pub fn caret(&self) -> usize {
        self.buffer.caret()
    }

    /// Move the caret to a char offset (clamped).
    pub fn set_caret(&mut self, offset: usize) {
        self.buffer.set_caret(offset);
    }

    // --- mutations -------------------------------------------------------------------

    /// Insert `text` at a char offset.
    pub fn insert(&mut self, offset: usize, text: &str) -> BufferChange {
        let change = self.buffer.insert(offset, text);
        self.after_mutation();
        change
    }

    /// Delete a char-offset range.
    pub fn delete(&mut self, range: Range<usize>) -> BufferChange {
        let change = self.buffer.delete(range);
        self.after_mutation();
        change
    }

    /// Replace a char-offset range with `text`.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> BufferChange {
        let change = self.buffer.replace(range, text);
        self.after_mutation();
        change
    }

    /// Replace the entire document.
    pub fn set_text(&mut self, text: &str) -> BufferChange {
        let change = self.buffer.set_text(text);
        self.after_mutation();
        change
    }

    /// Derived-state bookkeeping after any buffer mutation: the occurrence index is
    /// invalidated unconditionally (stale offsets must never survive an edit), and the
    /// highlight and word-index debounces are rescheduled.
    fn after_mutation(&mut self) {
        let now = Instant::now();
        self.occurrences.clear(&mut self.tags);
        // The mutation cleared the selection, so any pending selection scan is moot.
        self.selection_timer.cancel();
        self.scheduler.note_change(now);
        self.word_timer.schedule(now);
    }

    // --- language, theme, file -------------------------------------------------------

    /// The active language.
    pub fn language(&self) -> &LanguageId {
        self.highlighter.language()
    }

    /// Switch the active language and immediately re-highlight the whole document.
    ///
    /// Language switches bypass the debounce: they are rare, deliberate actions where
    /// stale coloring would be worse than the latency of a full pass.
    pub fn set_language(&mut self, language: LanguageId) {
        self.highlighter.set_language(language);
        let pass = self.scheduler.request_full();
        self.run_highlight_pass(pass);
    }

    /// The active theme.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Switch the active theme and immediately re-highlight the whole document, so every
    /// tagged range reflects the new palette at once.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        let pass = self.scheduler.request_full();
        self.run_highlight_pass(pass);
    }

    /// The file this document was opened from, if any.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Associate the document with a file path and switch to the detected language.
    ///
    /// Detection prefers a shebang in the current content over the file extension.
    pub fn set_file(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        let content = self.buffer.text();
        let language = detect_language(Some(&path), Some(&content));
        self.file_path = Some(path);
        self.set_language(language);
    }

    /// The lexer registry, for registering host languages.
    pub fn lexer_registry_mut(&mut self) -> &mut LexerRegistry {
        self.highlighter.registry_mut()
    }

    // --- highlighting ----------------------------------------------------------------

    /// Record the visible 1-indexed line range; debounced passes cover it.
    pub fn set_viewport(&mut self, lines: Range<usize>) {
        self.scheduler.set_viewport(lines);
    }

    /// Fire every due debounce and collect delivered lint results.
    ///
    /// This is the cooperative scheduling point: the host calls it from its event loop,
    /// and however many times a debounce has been superseded, the state after a tick
    /// equals the state computed from the buffer's current content.
    pub fn tick(&mut self) {
        let now = Instant::now();

        if let Some(pass) = self.scheduler.poll(now) {
            self.run_highlight_pass(pass);
        }
        if self.word_timer.poll(now) {
            let text = self.buffer.text();
            self.words.rebuild(&text);
        }
        if self.selection_timer.poll(now) {
            self.scan_selected_occurrences();
        }
        if self.linter.poll().is_some() {
            self.apply_lint_tags();
        }
    }

    fn run_highlight_pass(&mut self, pass: HighlightPass) {
        match pass {
            HighlightPass::Full => {
                self.highlighter.highlight_all(&self.buffer, &mut self.tags);
            }
            HighlightPass::Lines(lines) => {
                let start = self.buffer.line_range(lines.start).map_or(0, |r| r.start);
                let last_line = lines.end.saturating_sub(1).max(lines.start);
                let end = self
                    .buffer
                    .line_range(last_line)
                    .map_or(self.buffer.char_count(), |r| r.end);
                self.highlighter.highlight(&self.buffer, &mut self.tags, start..end);
            }
        }
    }

    // --- selection and occurrences ---------------------------------------------------

    /// Set the selection and, when it looks like a deliberate term, schedule a debounced
    /// occurrence scan.
    ///
    /// A selection whose trimmed text is at least [`MIN_SELECTION_CHARS`] chars schedules
    /// the scan; anything shorter (or an empty range) cancels it and clears the current
    /// occurrence highlights.
    pub fn select(&mut self, range: Range<usize>) {
        self.buffer.set_selection(range);
        if self.selection_scan_term().is_some() {
            self.selection_timer.schedule(Instant::now());
        } else {
            self.selection_timer.cancel();
            self.occurrences.clear(&mut self.tags);
        }
    }

    /// Clear the selection, cancel any pending scan, and drop occurrence highlights.
    pub fn clear_selection(&mut self) {
        self.buffer.clear_selection();
        self.selection_timer.cancel();
        self.occurrences.clear(&mut self.tags);
    }

    fn selection_scan_term(&self) -> Option<String> {
        let text = self.buffer.selected_text()?;
        let trimmed = text.trim();
        if trimmed.chars().count() < MIN_SELECTION_CHARS {
            return None;
        }
        Some(trimmed.to_string())
    }

    fn scan_selected_occurrences(&mut self) {
        if let Some(term) = self.selection_scan_term() {
            self.occurrences.set_term(&self.buffer, &mut self.tags, &term);
        }
    }

    /// Highlight every occurrence of `term` and return the match count.
    pub fn highlight_occurrences(&mut self, term: &str) -> usize {
        self.occurrences.set_term(&self.buffer, &mut self.tags, term)
    }

    /// Number of occurrence matches currently tracked.
    pub fn occurrence_count(&self) -> usize {
        self.occurrences.match_count()
    }

    /// Index of the current occurrence match, if navigation has selected one.
    pub fn occurrence_cursor(&self) -> Option<usize> {
        self.occurrences.cursor()
    }

    /// Advance to the next occurrence, wrapping past the end. Returns the match range for
    /// the host to scroll into view.
    pub fn next_occurrence(&mut self) -> Option<Range<usize>> {
        self.occurrences.next(&mut self.buffer)
    }

    /// Retreat to the previous occurrence, wrapping past the start.
    pub fn previous_occurrence(&mut self) -> Option<Range<usize>> {
        self.occurrences.previous(&mut self.buffer)
    }

    /// A status summary for the host's navigation bar: `"term" - current/total`.
    pub fn occurrence_summary(&self) -> Option<String> {
        self.occurrences.summary()
    }

    /// Enable or disable occurrence highlighting. Disabling clears all occurrence state.
    pub fn set_occurrences_enabled(&mut self, enabled: bool) {
        self.occurrences.set_enabled(enabled, &mut self.tags);
        if !enabled {
            self.selection_timer.cancel();
        }
    }

    // --- find/replace ----------------------------------------------------------------

    /// Start a find session for `term` under `options`.
    pub fn start_find(&mut self, term: &str, options: SearchOptions) -> Result<(), SearchError> {
        self.find = Some(FindReplace::new(term, options)?);
        Ok(())
    }

    /// End the find session and remove the search highlight.
    pub fn stop_find(&mut self) {
        self.find = None;
        FindReplace::clear_highlight(&mut self.tags);
    }

    /// Find the next match after the caret, wrapping past the end.
    pub fn find_next(&mut self) -> Option<SearchMatch> {
        let find = self.find.clone()?;
        find.find_next(&mut self.buffer, &mut self.tags)
    }

    /// Find the nearest match before the caret, wrapping past the start.
    pub fn find_prev(&mut self) -> Option<SearchMatch> {
        let find = self.find.clone()?;
        find.find_prev(&mut self.buffer, &mut self.tags)
    }

    /// Replace the current hit, or advance to the next match when nothing is positioned.
    pub fn replace_current(&mut self, replacement: &str) -> bool {
        let Some(find) = self.find.clone() else {
            return false;
        };
        let version = self.buffer.version();
        let replaced = find.replace_current(&mut self.buffer, &mut self.tags, replacement);
        if self.buffer.version() != version {
            self.after_mutation();
        }
        replaced
    }

    /// Replace every match in the document. Returns the replacement count.
    pub fn replace_all(&mut self, replacement: &str) -> usize {
        let Some(find) = self.find.clone() else {
            return 0;
        };
        let count = find.replace_all(&mut self.buffer, &mut self.tags, replacement);
        if count > 0 {
            self.after_mutation();
        }
        count
    }

    // --- autocomplete ----------------------------------------------------------------

    /// Suggestions for the identifier being typed at the caret, best first.
    pub fn suggestions(&self) -> Vec<String> {
        let position = self.buffer.caret_position();
        let Some(line_text) = self.buffer.line_text(position.line) else {
            return Vec::new();
        };
        match current_word_at(&line_text, position.column) {
            Some(prefix) => self.words.suggest(&prefix),
            None => Vec::new(),
        }
    }

    /// Suggestions for an explicit prefix, best first.
    pub fn suggest(&self, prefix: &str) -> Vec<String> {
        self.words.suggest(prefix)
    }

    /// Replace the identifier around the caret with an accepted suggestion.
    ///
    /// Returns `None` when the caret line cannot be resolved; a caret in the middle of a
    /// word replaces the whole word.
    pub fn accept_suggestion(&mut self, word: &str) -> Option<BufferChange> {
        let position = self.buffer.caret_position();
        let line_text = self.buffer.line_text(position.line)?;
        let line_start = self.buffer.line_range(position.line)?.start;

        let bounds = word_bounds_at(&line_text, position.column);
        let range = line_start + bounds.start..line_start + bounds.end;
        let change = self.buffer.replace(range.clone(), word);
        self.buffer.set_caret(range.start + word.chars().count());
        self.after_mutation();
        Some(change)
    }

    /// Merge host-supplied vocabulary (language keywords, snippet names) into the index.
    pub fn add_vocabulary<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.words.add_words(words);
    }

    /// Enable or disable autocomplete. Disabling clears the word index.
    pub fn set_completion_enabled(&mut self, enabled: bool) {
        self.words.set_enabled(enabled);
        if !enabled {
            self.word_timer.cancel();
        }
    }

    // --- linting ---------------------------------------------------------------------

    /// Start a lint run for the associated file. Returns the request generation, or
    /// `None` when no file is set or linting is disabled.
    ///
    /// Results arrive asynchronously; [`tick`](Self::tick) applies them as lint tags when
    /// they land. A newer request supersedes any still in flight.
    pub fn request_lint(&mut self) -> Option<u64> {
        let path = self.file_path.clone()?;
        let language = self.highlighter.language().as_str().to_string();
        self.linter.request(&path, &language, None)
    }

    /// The current lint result set.
    pub fn lint_reports(&self) -> &[LintReport] {
        self.linter.reports()
    }

    /// Lint report counts by severity, for the status bar.
    pub fn lint_counts(&self) -> SeverityCounts {
        gutter::count_by_severity(self.linter.reports())
    }

    /// The gutter marker per line: the worst severity among that line's reports.
    pub fn lint_markers(&self) -> Vec<(usize, Severity)> {
        gutter::markers_by_line(self.linter.reports())
    }

    /// Tooltip text for a 1-indexed line, or `None` when the line is clean.
    pub fn lint_tooltip(&self, line: usize) -> Option<String> {
        gutter::tooltip_for_line(self.linter.reports(), line)
    }

    /// Enable or disable linting. Disabling clears lint results and tags.
    pub fn set_lint_enabled(&mut self, enabled: bool) {
        self.linter.set_enabled(enabled);
        if !enabled {
            self.clear_lint_tags();
        }
    }

    /// The lint runner, for registering host linter configurations.
    pub fn lint_runner_mut(&mut self) -> &mut LintRunner {
        &mut self.linter
    }

    fn clear_lint_tags(&mut self) {
        for id in [TagId::LINT_ERROR, TagId::LINT_WARNING, TagId::LINT_INFO] {
            self.tags.clear(id);
        }
    }

    /// Re-tag the buffer from the current lint result set: each report underlines from
    /// its column to the end of its line. Reports pointing past the end of the document
    /// (the buffer changed while the linter ran) are dropped silently.
    fn apply_lint_tags(&mut self) {
        self.clear_lint_tags();
        let buffer_len = self.buffer.char_count();

        for report in self.linter.reports() {
            let Some(line_range) = self.buffer.line_range(report.line) else {
                continue;
            };
            let id = match report.severity {
                Severity::Error => TagId::LINT_ERROR,
                Severity::Warning => TagId::LINT_WARNING,
                Severity::Info => TagId::LINT_INFO,
            };
            let start = (line_range.start + report.column).min(line_range.end);
            if let Err(err) = self.tags.apply(id, start..line_range.end, buffer_len) {
                tracing::debug!(line = report.line, %err, "skipping untaggable lint report");
            }
        }
    }
}

impl std::fmt::Debug for DocumentSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentSession")
            .field("buffer", &self.buffer)
            .field("language", self.highlighter.language())
            .field("file_path", &self.file_path)
            .field("occurrences", &self.occurrences.match_count())
            .field("words", &self.words.len())
            .field("lint_reports", &self.linter.reports().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant_session(text: &str) -> DocumentSession {
        DocumentSession::with_config(
            text,
            SessionConfig {
                highlight_delay: Duration::ZERO,
                word_rebuild_delay: Duration::ZERO,
                selection_scan_delay: Duration::ZERO,
                lint_timeout: Duration::from_secs(5),
            },
        )
    }

    #[test]
    fn test_mutations_invalidate_occurrences() {
        let mut session = instant_session("foo bar foo");
        assert_eq!(session.highlight_occurrences("foo"), 2);

        session.insert(0, "x");
        assert_eq!(session.occurrence_count(), 0);
        assert_eq!(session.occurrence_cursor(), None);
        assert!(session.tags().ranges(TagId::OCCURRENCE).is_empty());
    }

    #[test]
    fn test_accept_suggestion_replaces_the_whole_word() {
        let mut session = instant_session("let val = 1");
        // Caret inside "val".
        session.set_caret(5);

        session.accept_suggestion("value");
        assert_eq!(session.text(), "let value = 1");
        assert_eq!(session.caret(), 9);
    }

    #[test]
    fn test_short_selection_clears_occurrences() {
        let mut session = instant_session("abc abc abc");
        session.select(0..3);
        session.tick();
        assert_eq!(session.occurrence_count(), 3);

        // A one-char selection is below the trigger length.
        session.select(0..1);
        assert_eq!(session.occurrence_count(), 0);
    }
}
