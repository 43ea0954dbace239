//! Linter configuration and output parsing.
//!
//! A [`LinterConfig`] describes how to invoke one external linter and how to read its
//! output back: either a line-oriented regex with `(line, column, code, message)` capture
//! groups, or a JSON array of finding objects. Configurations live in a [`LinterRegistry`]
//! keyed by language id; the built-ins cover pylint and flake8.

use crate::report::{LintReport, Severity};
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

/// The `line:column: CODE: message` shape pylint and flake8 are configured to emit.
static LINE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(\d+):(\d+): ([A-Z]\d+): (.+)$").expect("valid regex"));

/// Linter configuration errors.
#[derive(Debug, Error)]
pub enum LintConfigError {
    /// The output pattern is not a valid regex.
    #[error("invalid lint output pattern {pattern:?}")]
    InvalidPattern {
        /// The offending pattern source.
        pattern: String,
        /// The regex compile error.
        #[source]
        source: Box<regex::Error>,
    },

    /// The command template is empty.
    #[error("lint command for {language:?} is empty")]
    EmptyCommand {
        /// Language the configuration was registered for.
        language: String,
    },
}

/// How a linter's stdout is turned into reports.
#[derive(Debug, Clone)]
pub enum OutputFormat {
    /// A line-oriented regex with capture groups `(line, column, code, message)`.
    Pattern(Regex),
    /// A JSON array of objects with `line`, `column`, `message`, and optionally
    /// `code`/`message-id` and `severity`/`type` fields (pylint's `--output-format=json`
    /// shape).
    Json,
}

/// Configuration for one external linter.
#[derive(Debug, Clone)]
pub struct LinterConfig {
    /// Language id this linter applies to.
    pub language: String,
    /// Command template; the file path is appended as the final argument.
    pub command: Vec<String>,
    /// How stdout is parsed.
    pub format: OutputFormat,
    /// Severity by code prefix (`'E'`, `'W'`, ...). Codes with no mapped prefix fall back
    /// to [`Severity::Info`].
    pub severity_map: HashMap<char, Severity>,
}

impl LinterConfig {
    /// Create a configuration with a custom output pattern.
    ///
    /// The pattern must capture `(line, column, code, message)` in that order and is
    /// matched per line of output.
    pub fn new(
        language: impl Into<String>,
        command: Vec<String>,
        pattern: &str,
        severity_map: HashMap<char, Severity>,
    ) -> Result<Self, LintConfigError> {
        let language = language.into();
        if command.is_empty() {
            return Err(LintConfigError::EmptyCommand { language });
        }
        let pattern = Regex::new(pattern).map_err(|source| LintConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source: Box::new(source),
        })?;

        Ok(Self {
            language,
            command,
            format: OutputFormat::Pattern(pattern),
            severity_map,
        })
    }

    /// Create a configuration whose linter emits JSON findings.
    pub fn json(
        language: impl Into<String>,
        command: Vec<String>,
        severity_map: HashMap<char, Severity>,
    ) -> Result<Self, LintConfigError> {
        let language = language.into();
        if command.is_empty() {
            return Err(LintConfigError::EmptyCommand { language });
        }
        Ok(Self {
            language,
            command,
            format: OutputFormat::Json,
            severity_map,
        })
    }

    /// The pylint configuration used for Python buffers.
    pub fn pylint() -> Self {
        Self {
            language: "python".to_string(),
            command: [
                "python",
                "-m",
                "pylint",
                "--output-format=text",
                "--msg-template={line}:{column}: {msg_id}: {msg}",
            ]
            .map(String::from)
            .to_vec(),
            format: OutputFormat::Pattern(LINE_PATTERN.clone()),
            severity_map: HashMap::from([
                ('E', Severity::Error),
                ('F', Severity::Error),
                ('W', Severity::Warning),
                ('C', Severity::Info),
                ('R', Severity::Info),
            ]),
        }
    }

    /// The flake8 alternative for Python buffers.
    pub fn flake8() -> Self {
        Self {
            language: "python_flake8".to_string(),
            command: [
                "python",
                "-m",
                "flake8",
                "--format=%(row)d:%(col)d: %(code)s: %(text)s",
            ]
            .map(String::from)
            .to_vec(),
            format: OutputFormat::Pattern(LINE_PATTERN.clone()),
            severity_map: HashMap::from([
                ('E', Severity::Error),
                ('W', Severity::Warning),
                ('F', Severity::Error),
            ]),
        }
    }

    /// Parse linter stdout into reports.
    ///
    /// Lines (or JSON entries) that do not fit the expected shape are skipped; a linter
    /// that prints nothing usable simply yields no reports.
    pub fn parse_output(&self, output: &str) -> Vec<LintReport> {
        match &self.format {
            OutputFormat::Pattern(pattern) => self.parse_pattern(pattern, output),
            OutputFormat::Json => self.parse_json(output),
        }
    }

    fn parse_pattern(&self, pattern: &Regex, output: &str) -> Vec<LintReport> {
        let mut reports = Vec::new();
        for captures in pattern.captures_iter(output) {
            let (Some(line), Some(column), Some(code), Some(message)) = (
                captures.get(1).and_then(|m| m.as_str().parse().ok()),
                captures.get(2).and_then(|m| m.as_str().parse().ok()),
                captures.get(3).map(|m| m.as_str()),
                captures.get(4).map(|m| m.as_str()),
            ) else {
                continue;
            };

            reports.push(LintReport {
                line,
                column,
                message: message.to_string(),
                severity: self.severity_for_code(code),
                code: Some(code.to_string()),
            });
        }
        reports
    }

    fn parse_json(&self, output: &str) -> Vec<LintReport> {
        let Ok(Value::Array(entries)) = serde_json::from_str(output) else {
            tracing::debug!(language = self.language, "lint output is not a JSON array");
            return Vec::new();
        };

        let mut reports = Vec::new();
        for entry in &entries {
            let Some(line) = entry.get("line").and_then(Value::as_u64) else {
                continue;
            };
            let Some(message) = entry.get("message").and_then(Value::as_str) else {
                continue;
            };
            let column = entry.get("column").and_then(Value::as_u64).unwrap_or(0);
            let code = entry
                .get("code")
                .or_else(|| entry.get("message-id"))
                .and_then(Value::as_str)
                .map(String::from);

            let severity = match entry
                .get("severity")
                .or_else(|| entry.get("type"))
                .and_then(Value::as_str)
            {
                Some(name) => Severity::from_name(name),
                None => code
                    .as_deref()
                    .map(|code| self.severity_for_code(code))
                    .unwrap_or(Severity::Info),
            };

            reports.push(LintReport {
                line: line as usize,
                column: column as usize,
                message: message.to_string(),
                severity,
                code,
            });
        }
        reports
    }

    fn severity_for_code(&self, code: &str) -> Severity {
        code.chars()
            .next()
            .and_then(|prefix| self.severity_map.get(&prefix).copied())
            .unwrap_or(Severity::Info)
    }
}

/// The table of configured linters, keyed by language id.
#[derive(Debug, Clone, Default)]
pub struct LinterRegistry {
    configs: HashMap<String, LinterConfig>,
}

impl LinterRegistry {
    /// Create an empty registry (every language is unlinted).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in pylint and flake8 configurations.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(LinterConfig::pylint());
        registry.register(LinterConfig::flake8());
        registry
    }

    /// Register a configuration under its language id, replacing any existing one.
    pub fn register(&mut self, config: LinterConfig) {
        self.configs.insert(config.language.clone(), config);
    }

    /// The configuration for a language, if one is registered.
    pub fn get(&self, language: &str) -> Option<&LinterConfig> {
        self.configs.get(language)
    }

    /// The registered language ids, unordered.
    pub fn languages(&self) -> Vec<&str> {
        self.configs.keys().map(String::as_str).collect()
    }
}
