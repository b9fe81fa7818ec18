//! Advisory lints over install script text.
//!
//! These are pattern heuristics: a script can satisfy a lint by mentioning
//! the right words in a comment, and can miss one while being perfectly
//! careful in a way the pattern does not recognise. Findings are therefore
//! always warnings.

use regex::Regex;

/// A best-effort predicate over script text.
pub trait ScriptLint: Send + Sync {
    /// Short identifier of the lint (e.g. `"errexit"`).
    fn name(&self) -> &str;

    /// Return advice when `script` does not show the expected pattern.
    fn check(&self, script: &str) -> Option<String>;
}

/// A lint satisfied when `pattern` matches anywhere in the script.
#[derive(Debug, Clone)]
pub struct RegexLint {
    name: String,
    pattern: Regex,
    advice: String,
}

impl RegexLint {
    /// Create a lint from an already compiled pattern.
    #[must_use]
    pub fn new(name: impl Into<String>, pattern: Regex, advice: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern,
            advice: advice.into(),
        }
    }

    /// Compile `pattern` and create a lint from it.
    ///
    /// # Errors
    ///
    /// Returns the regex compile error for an invalid pattern.
    pub fn from_pattern(
        name: impl Into<String>,
        pattern: &str,
        advice: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        Ok(Self::new(name, Regex::new(pattern)?, advice))
    }
}

impl ScriptLint for RegexLint {
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, script: &str) -> Option<String> {
        if self.pattern.is_match(script) {
            None
        } else {
            Some(self.advice.clone())
        }
    }
}

/// The lints applied to `install.sh` by default.
///
/// - `errexit`: the script stops on the first failing command.
/// - `superuser`: the script checks it runs as root.
/// - `idempotency`: the script tests whether its tool is already installed.
#[must_use]
pub fn default_install_lints() -> Vec<Box<dyn ScriptLint>> {
    let specs: [(&str, &str, &str); 3] = [
        (
            "errexit",
            r"(?m)^\s*set\s+(-[A-Za-z]*e[A-Za-z]*\b|-o\s+errexit\b)",
            "install script does not stop on first failure (add `set -e`)",
        ),
        (
            "superuser",
            r#"id\s+-u|\$\{?EUID\b|\$\{?UID\b"#,
            "install script does not check for superuser privileges (e.g. `[ \"$(id -u)\" -ne 0 ]`)",
        ),
        (
            "idempotency",
            r"command\s+-v\s+\S|\bwhich\s+\S|\btype\s+(-[A-Za-z]+\s+)?\S|\bhash\s+\S",
            "install script has no idempotency check (e.g. `command -v <tool>` before installing)",
        ),
    ];

    specs
        .into_iter()
        .filter_map(|(name, pattern, advice)| {
            RegexLint::from_pattern(name, pattern, advice)
                .ok()
                .map(|lint| Box::new(lint) as Box<dyn ScriptLint>)
        })
        .collect()
}
