//! Script syntax checking.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

/// Outcome of a syntax check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxVerdict {
    /// The script parses.
    Valid,
    /// The script does not parse; carries the parser's message.
    Invalid(String),
    /// The check could not be run; carries the reason.
    Unavailable(String),
}

/// Decides whether a script parses.
pub trait SyntaxChecker: Send + Sync {
    /// Check the script at `script`. Must not execute it.
    fn check(&self, script: &Path) -> SyntaxVerdict;
}

/// Runs the shell in no-exec mode (`-n`), which parses without running.
#[derive(Debug, Clone)]
pub struct ShellSyntaxChecker {
    shell: Option<PathBuf>,
}

impl ShellSyntaxChecker {
    /// Locate `bash` (falling back to `sh`) on `PATH`.
    #[must_use]
    pub fn new() -> Self {
        let shell = which::which("bash").or_else(|_| which::which("sh")).ok();
        debug!(shell = ?shell, "Resolved shell for syntax checks");
        Self { shell }
    }

    /// Use a specific shell binary.
    #[must_use]
    pub fn with_shell(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: Some(shell.into()),
        }
    }
}

impl Default for ShellSyntaxChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxChecker for ShellSyntaxChecker {
    fn check(&self, script: &Path) -> SyntaxVerdict {
        let Some(shell) = &self.shell else {
            return SyntaxVerdict::Unavailable("no shell found on PATH".into());
        };

        match Command::new(shell).arg("-n").arg(script).output() {
            Ok(output) if output.status.success() => SyntaxVerdict::Valid,
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let message = stderr
                    .lines()
                    .find(|l| !l.trim().is_empty())
                    .unwrap_or("syntax error")
                    .trim()
                    .to_owned();
                SyntaxVerdict::Invalid(message)
            },
            Err(e) => SyntaxVerdict::Unavailable(format!(
                "failed to run {}: {e}",
                shell.display()
            )),
        }
    }
}
