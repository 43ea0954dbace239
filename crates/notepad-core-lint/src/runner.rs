//! Off-thread linter execution.
//!
//! Linting shells out to an external process with unbounded latency, so it is the one
//! piece of this workspace that leaves the UI thread. [`LintRunner`] spawns one worker
//! thread per request, enforces a hard timeout with a forced kill, and delivers results
//! through a polled single-consumer channel. Every request carries a generation number;
//! results from a superseded generation are discarded so an out-of-order delivery can
//! never clobber newer results.

use crate::config::{LinterConfig, LinterRegistry};
use crate::report::LintReport;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Hard ceiling on linter wall-clock time; on expiry the process is killed and the run
/// counts as "no results".
pub const LINT_TIMEOUT: Duration = Duration::from_secs(30);

/// How often the worker checks whether the child has exited.
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(25);

#[derive(Debug)]
struct LintOutcome {
    generation: u64,
    reports: Vec<LintReport>,
}

/// Runs configured linters off-thread and holds the current result set.
///
/// Single-threaded consumers call [`request`](Self::request) on edit-driven triggers and
/// [`poll`](Self::poll) from their event loop; the runner never blocks either call on the
/// external process.
#[derive(Debug)]
pub struct LintRunner {
    registry: LinterRegistry,
    timeout: Duration,
    disabled: bool,
    newest: u64,
    reports: Vec<LintReport>,
    tx: mpsc::Sender<LintOutcome>,
    rx: mpsc::Receiver<LintOutcome>,
}

impl LintRunner {
    /// Create a runner over a linter registry with the standard timeout.
    pub fn new(registry: LinterRegistry) -> Self {
        Self::with_timeout(registry, LINT_TIMEOUT)
    }

    /// Create a runner with a custom timeout (mainly for tests).
    pub fn with_timeout(registry: LinterRegistry, timeout: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            registry,
            timeout,
            disabled: false,
            newest: 0,
            reports: Vec::new(),
            tx,
            rx,
        }
    }

    /// The linter registry, for registering host configurations.
    pub fn registry_mut(&mut self) -> &mut LinterRegistry {
        &mut self.registry
    }

    /// Returns `true` if linting is enabled.
    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    /// Enable or disable linting. Disabling clears the current results and discards any
    /// in-flight run.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
        if !enabled {
            self.newest += 1;
            self.reports.clear();
        }
    }

    /// Discard any in-flight run without clearing the current results.
    pub fn cancel(&mut self) {
        self.newest += 1;
    }

    /// The current result set, in delivery order.
    pub fn reports(&self) -> &[LintReport] {
        &self.reports
    }

    /// Start a lint run for `file_path` and return its generation number.
    ///
    /// A language with no registered linter yields an (immediate) empty result set, the
    /// same as a linter that fails; the distinction matters to nobody downstream. Returns
    /// `None` without starting anything when linting is disabled.
    pub fn request(
        &mut self,
        file_path: &Path,
        language: &str,
        working_dir: Option<&Path>,
    ) -> Option<u64> {
        if self.disabled {
            return None;
        }

        self.newest += 1;
        let generation = self.newest;

        let Some(config) = self.registry.get(language) else {
            let _ = self.tx.send(LintOutcome {
                generation,
                reports: Vec::new(),
            });
            return Some(generation);
        };

        let config = config.clone();
        let file_path = file_path.to_path_buf();
        let working_dir = working_dir.map(Path::to_path_buf);
        let timeout = self.timeout;
        let tx = self.tx.clone();

        thread::spawn(move || {
            let reports = run_linter(&config, &file_path, working_dir.as_deref(), timeout);
            let _ = tx.send(LintOutcome {
                generation,
                reports,
            });
        });
        Some(generation)
    }

    /// Drain delivered outcomes, keeping only the newest generation's.
    ///
    /// Returns the fresh result set when this call accepted one, `None` when nothing new
    /// arrived. Stale outcomes are logged and dropped.
    pub fn poll(&mut self) -> Option<&[LintReport]> {
        let mut accepted = None;
        while let Ok(outcome) = self.rx.try_recv() {
            if outcome.generation < self.newest {
                tracing::debug!(
                    generation = outcome.generation,
                    newest = self.newest,
                    "discarding stale lint results"
                );
                continue;
            }
            accepted = Some(outcome.reports);
        }

        let reports = accepted?;
        self.reports = reports;
        Some(&self.reports)
    }
}

/// Run one configured linter to completion, within the timeout.
///
/// Every failure mode (missing executable, timeout, crash, unparseable output) degrades
/// to an empty report list; none of them is an error the editing flow should see.
fn run_linter(
    config: &LinterConfig,
    file_path: &Path,
    working_dir: Option<&Path>,
    timeout: Duration,
) -> Vec<LintReport> {
    let mut command = Command::new(&config.command[0]);
    command
        .args(&config.command[1..])
        .arg(file_path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());

    let cwd = working_dir
        .map(Path::to_path_buf)
        .or_else(|| parent_dir(file_path));
    if let Some(cwd) = cwd {
        command.current_dir(cwd);
    }

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(err) => {
            tracing::warn!(
                linter = config.command[0],
                %err,
                "failed to spawn linter"
            );
            return Vec::new();
        }
    };

    // Drain stdout on its own thread so a chatty linter never fills the pipe and
    // deadlocks against our exit polling.
    let stdout = child.stdout.take();
    let reader = thread::spawn(move || {
        let mut output = String::new();
        if let Some(mut stdout) = stdout {
            let _ = stdout.read_to_string(&mut output);
        }
        output
    });

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(_status)) => break,
            Ok(None) => {
                if Instant::now() >= deadline {
                    tracing::warn!(
                        linter = config.command[0],
                        file = %file_path.display(),
                        "linter exceeded its timeout; killing it"
                    );
                    let _ = child.kill();
                    let _ = child.wait();
                    return Vec::new();
                }
                thread::sleep(WAIT_POLL_INTERVAL);
            }
            Err(err) => {
                tracing::warn!(linter = config.command[0], %err, "failed to wait on linter");
                let _ = child.kill();
                let _ = child.wait();
                return Vec::new();
            }
        }
    }

    let output = reader.join().unwrap_or_default();
    config.parse_output(&output)
}

fn parent_dir(file_path: &Path) -> Option<PathBuf> {
    file_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
}
