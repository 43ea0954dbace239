//! Language detection from file names and shebang lines.
//!
//! Detection order: shebang (when content is available) first, then file name. Everything
//! unrecognized falls back to [`LanguageId::PLAIN_TEXT`].

use crate::LanguageId;
use std::path::Path;

/// Map a lowercase file extension (without the leading dot) to a language identifier.
pub fn language_for_extension(ext: &str) -> Option<&'static str> {
    let language = match ext {
        "py" | "pyw" | "pyi" => "python",
        "js" | "mjs" | "cjs" => "javascript",
        "jsx" => "jsx",
        "ts" => "typescript",
        "tsx" => "tsx",
        "html" | "htm" => "html",
        "css" => "css",
        "scss" => "scss",
        "sass" => "sass",
        "less" => "less",
        "json" => "json",
        "xml" => "xml",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "ini" | "cfg" => "ini",
        "c" | "h" => "c",
        "cpp" | "hpp" | "cc" | "cxx" => "cpp",
        "cs" => "csharp",
        "java" => "java",
        "kt" => "kotlin",
        "scala" => "scala",
        "groovy" => "groovy",
        "rb" => "ruby",
        "erb" => "erb",
        "php" => "php",
        "go" => "go",
        "rs" => "rust",
        "swift" => "swift",
        "sh" | "bash" => "bash",
        "zsh" => "zsh",
        "fish" => "fish",
        "ps1" | "psm1" => "powershell",
        "bat" | "cmd" => "batch",
        "sql" => "sql",
        "md" | "markdown" => "markdown",
        "rst" => "rst",
        "txt" => "text",
        "lua" => "lua",
        "pl" | "pm" => "perl",
        "r" => "r",
        _ => return None,
    };
    Some(language)
}

/// The primary file extension (with leading dot) for a language identifier, if known.
///
/// Hosts use this for save-as suggestions and for naming scratch files handed to
/// language-aware tools.
pub fn primary_extension(language: &str) -> Option<&'static str> {
    let ext = match language {
        "python" => ".py",
        "javascript" => ".js",
        "jsx" => ".jsx",
        "typescript" => ".ts",
        "tsx" => ".tsx",
        "html" => ".html",
        "css" => ".css",
        "scss" => ".scss",
        "sass" => ".sass",
        "less" => ".less",
        "json" => ".json",
        "xml" => ".xml",
        "yaml" => ".yaml",
        "toml" => ".toml",
        "ini" => ".ini",
        "c" => ".c",
        "cpp" => ".cpp",
        "csharp" => ".cs",
        "java" => ".java",
        "kotlin" => ".kt",
        "scala" => ".scala",
        "groovy" => ".groovy",
        "ruby" => ".rb",
        "erb" => ".erb",
        "php" => ".php",
        "go" => ".go",
        "rust" => ".rs",
        "swift" => ".swift",
        "bash" => ".sh",
        "zsh" => ".zsh",
        "fish" => ".fish",
        "powershell" => ".ps1",
        "batch" => ".bat",
        "sql" => ".sql",
        "markdown" => ".md",
        "rst" => ".rst",
        "lua" => ".lua",
        "perl" => ".pl",
        "r" => ".r",
        "text" => ".txt",
        _ => return None,
    };
    Some(ext)
}

/// Languages with a known extension mapping, for manual-selection menus.
pub fn supported_languages() -> Vec<&'static str> {
    let mut languages = vec![
        "bash",
        "batch",
        "c",
        "cpp",
        "csharp",
        "css",
        "erb",
        "fish",
        "go",
        "groovy",
        "html",
        "ini",
        "java",
        "javascript",
        "json",
        "jsx",
        "kotlin",
        "less",
        "lua",
        "markdown",
        "perl",
        "php",
        "powershell",
        "python",
        "r",
        "rst",
        "ruby",
        "rust",
        "sass",
        "scala",
        "scss",
        "sql",
        "swift",
        "text",
        "toml",
        "tsx",
        "typescript",
        "xml",
        "yaml",
        "zsh",
    ];
    languages.sort_unstable();
    languages
}

/// Interpreter names (as they appear in a shebang) mapped to language identifiers.
fn language_for_interpreter(interpreter: &str) -> Option<&'static str> {
    let language = match interpreter {
        "python" | "python2" | "python3" => "python",
        "node" => "javascript",
        "bash" | "sh" => "bash",
        "zsh" => "zsh",
        "ruby" => "ruby",
        "perl" => "perl",
        "php" => "php",
        _ => return None,
    };
    Some(language)
}

/// Detect the language from a shebang line, if the content starts with one.
///
/// Handles both direct interpreter paths (`#!/usr/bin/python3`) and the
/// `#!/usr/bin/env python3` indirection.
pub fn language_from_shebang(content: &str) -> Option<LanguageId> {
    let first_line = content.lines().next()?.trim();
    let shebang = first_line.strip_prefix("#!")?.trim();
    if shebang.is_empty() {
        return None;
    }

    let mut parts = shebang.split_whitespace();
    let program = parts.next()?;
    let program_name = Path::new(program).file_name()?.to_str()?;

    let interpreter = if program_name == "env" {
        parts.last()?
    } else {
        program_name
    };

    language_for_interpreter(interpreter).map(LanguageId::from)
}

/// File names that carry a language without any extension.
fn language_for_special_name(name: &str) -> Option<&'static str> {
    let language = match name {
        "dockerfile" => "docker",
        "makefile" => "make",
        ".gitignore" => "gitignore",
        ".env" => "bash",
        _ => return None,
    };
    Some(language)
}

/// Detect the language for a file, preferring shebang content over the file name.
///
/// Always returns a language; unrecognized files are [`LanguageId::PLAIN_TEXT`].
pub fn detect_language(path: Option<&Path>, content: Option<&str>) -> LanguageId {
    if let Some(content) = content
        && let Some(language) = language_from_shebang(content)
    {
        return language;
    }

    let Some(path) = path else {
        return LanguageId::plain_text();
    };

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if let Some(language) = language_for_special_name(&name) {
        return LanguageId::from(language);
    }

    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .and_then(|ext| language_for_extension(&ext))
        .map(LanguageId::from)
        .unwrap_or_else(LanguageId::plain_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_from_extension() {
        assert_eq!(
            detect_language(Some(Path::new("src/main.rs")), None).as_str(),
            "rust"
        );
        assert_eq!(
            detect_language(Some(Path::new("script.PY")), None).as_str(),
            "python"
        );
        assert_eq!(
            detect_language(Some(Path::new("notes.unknown")), None).as_str(),
            "text"
        );
    }

    #[test]
    fn test_detect_special_names() {
        assert_eq!(
            detect_language(Some(Path::new("project/Dockerfile")), None).as_str(),
            "docker"
        );
        assert_eq!(
            detect_language(Some(Path::new("Makefile")), None).as_str(),
            "make"
        );
        assert_eq!(
            detect_language(Some(Path::new(".env")), None).as_str(),
            "bash"
        );
    }

    #[test]
    fn test_shebang_beats_extension() {
        let content = "#!/usr/bin/env python3\nprint('hi')\n";
        assert_eq!(
            detect_language(Some(Path::new("tool.txt")), Some(content)).as_str(),
            "python"
        );
    }

    #[test]
    fn test_shebang_direct_path() {
        assert_eq!(
            language_from_shebang("#!/bin/bash\necho hi").unwrap().as_str(),
            "bash"
        );
        assert!(language_from_shebang("no shebang here").is_none());
        assert!(language_from_shebang("#!/usr/bin/unknown-tool").is_none());
    }

    #[test]
    fn test_no_inputs_is_plain_text() {
        assert!(detect_language(None, None).is_plain_text());
    }
}
