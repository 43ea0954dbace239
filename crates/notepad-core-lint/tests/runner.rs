//! End-to-end checks of the lint runner against real child processes.
//!
//! The "linters" here are stand-ins (`cat` over a fixture file, `sleep` for the timeout
//! path) so the tests exercise spawning, timeout enforcement, and generation handling
//! without requiring pylint on the machine.

#![cfg(unix)]

use notepad_core_lint::{LintRunner, LinterConfig, LinterRegistry, Severity};
use std::collections::HashMap;
use std::io::Write;
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;

const DEFAULT_PATTERN: &str = r"(?m)^(\d+):(\d+): ([A-Z]\d+): (.+)$";

fn severity_map() -> HashMap<char, Severity> {
    HashMap::from([
        ('E', Severity::Error),
        ('W', Severity::Warning),
        ('C', Severity::Info),
    ])
}

/// A "linter" that just prints the file it is given, so the fixture file's content
/// becomes the linter output.
fn cat_config(language: &str) -> LinterConfig {
    LinterConfig::new(
        language,
        vec!["cat".to_string()],
        DEFAULT_PATTERN,
        severity_map(),
    )
    .expect("valid config")
}

fn fixture(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write fixture");
    file
}

/// Poll until the runner accepts a result set or the deadline passes.
fn poll_until_update(runner: &mut LintRunner, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if runner.poll().is_some() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    false
}

#[test]
fn reports_are_parsed_from_a_real_child_process() {
    let file = fixture("1:0: E101: first problem\n3:4: W200: second problem\n");
    let mut registry = LinterRegistry::new();
    registry.register(cat_config("fixture"));
    let mut runner = LintRunner::new(registry);

    assert!(runner.request(file.path(), "fixture", None).is_some());
    assert!(poll_until_update(&mut runner, Duration::from_secs(5)));

    let reports = runner.reports();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].line, 1);
    assert_eq!(reports[0].severity, Severity::Error);
    assert_eq!(reports[0].code.as_deref(), Some("E101"));
    assert_eq!(reports[1].line, 3);
    assert_eq!(reports[1].column, 4);
    assert_eq!(reports[1].severity, Severity::Warning);
}

#[test]
fn a_missing_tool_degrades_to_empty_results() {
    let file = fixture("1:0: E101: unreachable\n");
    let mut registry = LinterRegistry::new();
    registry.register(
        LinterConfig::new(
            "fixture",
            vec!["definitely-not-an-installed-linter".to_string()],
            DEFAULT_PATTERN,
            severity_map(),
        )
        .expect("valid config"),
    );
    let mut runner = LintRunner::new(registry);

    assert!(runner.request(file.path(), "fixture", None).is_some());
    assert!(poll_until_update(&mut runner, Duration::from_secs(5)));
    assert!(runner.reports().is_empty());
}

#[test]
fn a_timed_out_linter_is_killed_and_yields_empty_results() {
    let file = fixture("ignored");
    let mut registry = LinterRegistry::new();
    registry.register(
        LinterConfig::new(
            "fixture",
            vec!["sleep".to_string(), "10".to_string()],
            DEFAULT_PATTERN,
            severity_map(),
        )
        .expect("valid config"),
    );
    let mut runner = LintRunner::with_timeout(registry, Duration::from_millis(150));

    let started = Instant::now();
    assert!(runner.request(file.path(), "fixture", None).is_some());
    assert!(poll_until_update(&mut runner, Duration::from_secs(5)));

    assert!(runner.reports().is_empty());
    // The kill happened at the timeout, not after the child's full 10 seconds.
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn stale_generations_never_overwrite_newer_results() {
    let slow_file = fixture("1:0: E101: stale result\n");
    let fast_file = fixture("2:0: W200: current result\n");

    let mut registry = LinterRegistry::new();
    // The slow linter delays before printing, so its result arrives after it has
    // already been superseded.
    registry.register(
        LinterConfig::new(
            "slow",
            vec![
                "sh".to_string(),
                "-c".to_string(),
                "sleep 0.3; cat \"$0\"".to_string(),
            ],
            DEFAULT_PATTERN,
            severity_map(),
        )
        .expect("valid config"),
    );
    registry.register(cat_config("fast"));
    let mut runner = LintRunner::new(registry);

    assert!(runner.request(slow_file.path(), "slow", None).is_some());
    assert!(runner.request(fast_file.path(), "fast", None).is_some());

    // Wait long enough for both children to have finished, polling throughout.
    let deadline = Instant::now() + Duration::from_secs(3);
    while Instant::now() < deadline {
        runner.poll();
        std::thread::sleep(Duration::from_millis(20));
    }

    let reports = runner.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].message, "current result");
}

#[test]
fn disabling_clears_results_and_discards_in_flight_runs() {
    let file = fixture("1:0: E101: finding\n");
    let mut registry = LinterRegistry::new();
    registry.register(cat_config("fixture"));
    let mut runner = LintRunner::new(registry);

    assert!(runner.request(file.path(), "fixture", None).is_some());
    assert!(poll_until_update(&mut runner, Duration::from_secs(5)));
    assert_eq!(runner.reports().len(), 1);

    // Start another run, then disable before it lands.
    assert!(runner.request(file.path(), "fixture", None).is_some());
    runner.set_enabled(false);
    assert!(runner.reports().is_empty());

    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        runner.poll();
        std::thread::sleep(Duration::from_millis(20));
    }
    assert!(runner.reports().is_empty());
}

#[test]
fn working_dir_defaults_to_the_file_parent() {
    // `cat lint.txt` resolves relative to the working directory, which the runner
    // derives from the lint target's parent when none is passed.
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("lint.txt"), "5:1: C300: relative finding\n")
        .expect("write fixture");

    let mut registry = LinterRegistry::new();
    registry.register(
        LinterConfig::new(
            "fixture",
            vec!["sh".to_string(), "-c".to_string(), "cat lint.txt".to_string()],
            DEFAULT_PATTERN,
            severity_map(),
        )
        .expect("valid config"),
    );
    let mut runner = LintRunner::new(registry);

    let target = dir.path().join("module.py");
    std::fs::write(&target, "x = 1\n").expect("write target");
    assert!(runner.request(&target, "fixture", None).is_some());
    assert!(poll_until_update(&mut runner, Duration::from_secs(5)));

    let reports = runner.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].line, 5);
    assert_eq!(reports[0].message, "relative finding");
}
