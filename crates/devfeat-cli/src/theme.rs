//! Terminal styling for command output.

use colored::Colorize;

/// Styles shared by every subcommand.
pub(crate) struct Theme;

impl Theme {
    /// Section or phase label.
    pub(crate) fn header(text: &str) -> String {
        text.bold().cyan().to_string()
    }

    /// A feature or step that passed.
    pub(crate) fn success(text: &str) -> String {
        format!("{} {text}", "✓".green().bold())
    }

    /// A feature or step that failed.
    pub(crate) fn error(text: &str) -> String {
        format!("{} {}", "✗".red().bold(), text.red())
    }

    /// Advisory finding.
    pub(crate) fn warning(text: &str) -> String {
        text.yellow().to_string()
    }

    /// Neutral note.
    pub(crate) fn info(text: &str) -> String {
        format!("{} {text}", "›".blue())
    }

    /// Secondary detail such as paths and versions.
    pub(crate) fn dimmed(text: &str) -> String {
        text.dimmed().to_string()
    }

    /// Rule printed above a run summary.
    pub(crate) fn separator() -> String {
        "─".repeat(60).dimmed().to_string()
    }

    /// `N error(s), M warning(s)`, colored by severity.
    pub(crate) fn counts(errors: usize, warnings: usize) -> String {
        let error_text = format!("{errors} error(s)");
        let warning_text = format!("{warnings} warning(s)");
        let error_text = if errors == 0 {
            error_text.dimmed()
        } else {
            error_text.red().bold()
        };
        let warning_text = if warnings == 0 {
            warning_text.dimmed()
        } else {
            warning_text.yellow()
        };
        format!("{error_text}, {warning_text}")
    }
}
