//! Feature directory validation.
//!
//! Checks run in a fixed order and append to one report instead of stopping
//! at the first problem, so a single run surfaces everything:
//! 1. Directory existence (the only check that returns early)
//! 2. Required and recommended files
//! 3. Manifest parseability
//! 4. Manifest fields
//! 5. Install script syntax and lints
//! 6. Test directory contents
//! 7. Option to environment variable cross-references
//!
//! Validation is read-only.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use devfeat_manifest::{
    FeatureManifest, INSTALL_SCRIPT_NAME, MANIFEST_FILE_NAME, README_FILE_NAME,
    SCENARIOS_FILE_NAME, TEST_DIR_NAME, TEST_SCRIPT_NAME, load_manifest, option_env_name,
};

use crate::lint::{ScriptLint, default_install_lints};
use crate::report::{FindingKind, ValidationReport};
use crate::syntax::{ShellSyntaxChecker, SyntaxChecker, SyntaxVerdict};

/// Where the validator looks for things outside the feature directory.
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// Root holding one test directory per feature (`<root>/<feature>/`).
    /// When unset, the test directory is `<featureDir>/test/`.
    pub tests_root: Option<PathBuf>,
}

impl ValidateOptions {
    /// Resolve a per-feature test directory under `root`.
    #[must_use]
    pub fn with_tests_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.tests_root = Some(root.into());
        self
    }

    fn test_dir(&self, feature_dir: &Path, feature_name: &str) -> PathBuf {
        match &self.tests_root {
            Some(root) => root.join(feature_name),
            None => feature_dir.join(TEST_DIR_NAME),
        }
    }
}

/// Validates feature directories.
///
/// Holds no per-run state; one validator can check any number of features,
/// including from several threads.
pub struct Validator {
    options: ValidateOptions,
    lints: Vec<Box<dyn ScriptLint>>,
    syntax: Box<dyn SyntaxChecker>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// A validator with the default lints and the shell syntax checker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: ValidateOptions::default(),
            lints: default_install_lints(),
            syntax: Box::new(ShellSyntaxChecker::new()),
        }
    }

    /// Replace the options.
    #[must_use]
    pub fn with_options(mut self, options: ValidateOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the syntax checker.
    #[must_use]
    pub fn with_syntax_checker(mut self, checker: impl SyntaxChecker + 'static) -> Self {
        self.syntax = Box::new(checker);
        self
    }

    /// Replace the install script lints.
    #[must_use]
    pub fn with_lints(mut self, lints: Vec<Box<dyn ScriptLint>>) -> Self {
        self.lints = lints;
        self
    }

    /// Add one install script lint.
    #[must_use]
    pub fn with_lint(mut self, lint: impl ScriptLint + 'static) -> Self {
        self.lints.push(Box::new(lint));
        self
    }

    /// Validate `feature_dir`, expecting its manifest to declare `feature_name`.
    #[must_use]
    pub fn validate(&self, feature_dir: &Path, feature_name: &str) -> ValidationReport {
        let mut report = ValidationReport::new(feature_name);
        debug!(feature = feature_name, dir = %feature_dir.display(), "Validating feature");

        if !feature_dir.is_dir() {
            report.error(
                FindingKind::Structural,
                format!("feature directory not found: {}", feature_dir.display()),
            );
            return report;
        }

        let manifest_path = feature_dir.join(MANIFEST_FILE_NAME);
        let install_path = feature_dir.join(INSTALL_SCRIPT_NAME);
        check_files(feature_dir, &manifest_path, &install_path, &mut report);

        let manifest = if manifest_path.is_file() {
            match load_manifest(&manifest_path) {
                Ok(manifest) => Some(manifest),
                Err(e) => {
                    report.error(FindingKind::Schema, format!("{MANIFEST_FILE_NAME}: {e}"));
                    None
                },
            }
        } else {
            None
        };

        if let Some(manifest) = &manifest {
            check_manifest_fields(manifest, feature_name, &mut report);
        }

        let script = if install_path.is_file() {
            Some(self.check_install_script(&install_path, &mut report))
        } else {
            None
        };

        self.check_tests(&self.options.test_dir(feature_dir, feature_name), &mut report);

        if let (Some(manifest), Some(script)) = (&manifest, &script) {
            check_option_references(manifest, script, &mut report);
        }

        info!(
            feature = feature_name,
            errors = report.error_count(),
            warnings = report.warning_count(),
            "Validated feature"
        );
        report
    }

    /// Syntax-check and lint the install script, returning its text.
    fn check_install_script(&self, install_path: &Path, report: &mut ValidationReport) -> String {
        self.check_syntax(install_path, INSTALL_SCRIPT_NAME, report);

        let script = read_lossy(install_path);
        for lint in &self.lints {
            if let Some(advice) = lint.check(&script) {
                debug!(lint = lint.name(), "Install script lint not satisfied");
                report.warning(advice);
            }
        }
        script
    }

    fn check_tests(&self, test_dir: &Path, report: &mut ValidationReport) {
        if !test_dir.is_dir() {
            debug!(dir = %test_dir.display(), "No test directory");
            return;
        }

        let test_script = test_dir.join(TEST_SCRIPT_NAME);
        if test_script.is_file() {
            self.check_syntax(&test_script, TEST_SCRIPT_NAME, report);
        } else {
            report.warning(format!(
                "test directory has no {TEST_SCRIPT_NAME}: {}",
                test_dir.display()
            ));
        }

        let scenarios = test_dir.join(SCENARIOS_FILE_NAME);
        if scenarios.is_file() {
            let text = read_lossy(&scenarios);
            if let Err(e) = serde_json::from_str::<serde_json::Value>(&text) {
                report.error(
                    FindingKind::Schema,
                    format!("{SCENARIOS_FILE_NAME} is not valid JSON: {e}"),
                );
            }
        } else {
            report.warning(format!(
                "test directory has no {SCENARIOS_FILE_NAME}: {}",
                test_dir.display()
            ));
        }
    }

    fn check_syntax(&self, script: &Path, label: &str, report: &mut ValidationReport) {
        match self.syntax.check(script) {
            SyntaxVerdict::Valid => {},
            SyntaxVerdict::Invalid(message) => {
                report.error(
                    FindingKind::Schema,
                    format!("{label} has a syntax error: {message}"),
                );
            },
            SyntaxVerdict::Unavailable(reason) => {
                report.warning(format!("{label} syntax not checked: {reason}"));
            },
        }
    }
}

fn check_files(
    feature_dir: &Path,
    manifest_path: &Path,
    install_path: &Path,
    report: &mut ValidationReport,
) {
    if !manifest_path.is_file() {
        report.error(
            FindingKind::Structural,
            format!("missing required file {MANIFEST_FILE_NAME}"),
        );
    }

    if !install_path.is_file() {
        report.error(
            FindingKind::Structural,
            format!("missing required file {INSTALL_SCRIPT_NAME}"),
        );
    } else if !is_executable(install_path) {
        report.warning(format!("{INSTALL_SCRIPT_NAME} is not executable"));
    }

    if !feature_dir.join(README_FILE_NAME).is_file() {
        report.warning(format!("missing documentation file {README_FILE_NAME}"));
    }
}

fn check_manifest_fields(
    manifest: &FeatureManifest,
    feature_name: &str,
    report: &mut ValidationReport,
) {
    if manifest.id != feature_name {
        report.error(
            FindingKind::Schema,
            format!(
                "id mismatch: manifest declares '{}' but the directory is '{feature_name}'",
                manifest.id
            ),
        );
    }

    if manifest.version.trim().is_empty() {
        report.error(FindingKind::Schema, "missing required field 'version'");
    } else if !manifest.has_semver_version() {
        report.warning(format!(
            "version '{}' is not in MAJOR.MINOR.PATCH form",
            manifest.version
        ));
    }

    if manifest.name.trim().is_empty() {
        report.error(FindingKind::Schema, "missing required field 'name'");
    }

    if manifest
        .description
        .as_deref()
        .is_none_or(|d| d.trim().is_empty())
    {
        report.warning("missing field 'description'");
    }

    for (key, option) in &manifest.options {
        match &option.kind {
            None => report.warning(format!("option '{key}' has no type")),
            Some(kind) if !kind.is_known() => report.warning(format!(
                "option '{key}' has unsupported type '{kind}' (expected string or boolean)"
            )),
            Some(_) => {},
        }
        if option.description.is_none() {
            report.warning(format!("option '{key}' has no description"));
        }
    }
}

fn check_option_references(manifest: &FeatureManifest, script: &str, report: &mut ValidationReport) {
    for key in manifest.options.keys() {
        let var = option_env_name(key);
        let referenced = script.contains(&format!("${var}")) || script.contains(&format!("${{{var}"));
        if !referenced {
            report.warning(format!(
                "option '{key}' is never read by {INSTALL_SCRIPT_NAME} (expected ${var})"
            ));
        }
    }
}

fn read_lossy(path: &Path) -> String {
    std::fs::read(path)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).is_ok_and(|m| m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}
