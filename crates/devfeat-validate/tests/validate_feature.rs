//! End-to-end validation of feature directories on disk.

use std::path::{Path, PathBuf};

use devfeat_validate::{
    FindingKind, RegexLint, SyntaxChecker, SyntaxVerdict, ValidateOptions, ValidationReport,
    ValidationSummary, Validator,
};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

const GOOD_INSTALL: &str = r#"#!/usr/bin/env bash
set -e

if [ "$(id -u)" -ne 0 ]; then
    echo "Script must be run as root." >&2
    exit 1
fi

if command -v hello >/dev/null 2>&1; then
    echo "hello already installed"
    exit 0
fi

echo "${GREETING:-hey}" > /usr/local/share/greeting
"#;

/// Syntax checker that accepts everything except scripts containing `SYNTAX_ERROR`.
struct FakeSyntax;

impl SyntaxChecker for FakeSyntax {
    fn check(&self, script: &Path) -> SyntaxVerdict {
        let text = std::fs::read_to_string(script).unwrap_or_default();
        if text.contains("SYNTAX_ERROR") {
            SyntaxVerdict::Invalid("unexpected end of file".into())
        } else {
            SyntaxVerdict::Valid
        }
    }
}

fn validator() -> Validator {
    Validator::new().with_syntax_checker(FakeSyntax)
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}

/// Create `<root>/<name>/` with a manifest and an executable install script.
fn feature(root: &Path, name: &str, manifest: &str, install: &str) -> PathBuf {
    let dir = root.join(name);
    write(&dir.join("devcontainer-feature.json"), manifest);
    write(&dir.join("install.sh"), install);
    make_executable(&dir.join("install.sh"));
    dir
}

fn hello_world(root: &Path) -> PathBuf {
    feature(
        root,
        "hello-world",
        r#"{"id": "hello-world", "version": "1.0.0", "name": "Hello World",
            "description": "Prints a greeting",
            "options": {"greeting": {"type": "string", "description": "Greeting", "default": "hey"}}}"#,
        GOOD_INSTALL,
    )
}

fn messages(findings: &[devfeat_validate::Finding]) -> Vec<&str> {
    findings.iter().map(|f| f.message.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_hello_world_is_valid_with_only_readme_warning() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = hello_world(tmp.path());

    let report = validator().validate(&dir, "hello-world");

    assert!(report.errors.is_empty(), "{:?}", report.errors);
    assert_eq!(messages(&report.warnings), vec![
        "missing documentation file README.md"
    ]);
}

#[test]
fn test_hello_world_with_readme_is_clean() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = hello_world(tmp.path());
    write(&dir.join("README.md"), "# Hello World\n");

    let report = validator().validate(&dir, "hello-world");
    assert_eq!(report, ValidationReport::new("hello-world"));
}

#[test]
fn test_broken_manifest_reports_every_field_error() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = feature(
        tmp.path(),
        "broken",
        r#"{"id": "wrong-id", "version": "", "name": ""}"#,
        GOOD_INSTALL,
    );

    let report = validator().validate(&dir, "broken");
    let errors = messages(&report.errors);

    assert_eq!(errors.len(), 3, "{errors:?}");
    assert!(errors.iter().any(|e| e.contains("mismatch") && e.contains("wrong-id")));
    assert!(errors.iter().any(|e| e.contains("'version'")));
    assert!(errors.iter().any(|e| e.contains("'name'")));
}

#[test]
fn test_missing_directory_short_circuits() {
    let tmp = tempfile::tempdir().unwrap();
    let report = validator().validate(&tmp.path().join("nope"), "nope");

    assert_eq!(report.error_count(), 1);
    assert_eq!(report.errors[0].kind, FindingKind::Structural);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_missing_files_are_structural_errors() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("empty");
    std::fs::create_dir(&dir).unwrap();

    let report = validator().validate(&dir, "empty");
    assert_eq!(report.error_count(), 2);
    assert!(report.errors.iter().all(|f| f.kind == FindingKind::Structural));
    assert!(messages(&report.warnings).contains(&"missing documentation file README.md"));
}

#[test]
fn test_malformed_manifest_skips_field_checks() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = feature(tmp.path(), "bad-json", r#"{"id": "bad-json", "#, GOOD_INSTALL);

    let report = validator().validate(&dir, "bad-json");
    assert_eq!(report.error_count(), 1);
    assert_eq!(report.errors[0].kind, FindingKind::Schema);
    assert!(report.errors[0].message.contains("malformed"));
    assert!(!messages(&report.warnings).iter().any(|w| w.contains("description")));
}

#[test]
fn test_non_semver_version_is_a_warning() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = feature(
        tmp.path(),
        "twoish",
        r#"{"id": "twoish", "version": "2", "name": "Two", "description": "d"}"#,
        GOOD_INSTALL,
    );

    let report = validator().validate(&dir, "twoish");
    assert!(report.is_valid(), "{:?}", report.errors);
    assert!(messages(&report.warnings).iter().any(|w| w.contains("'2'")));
}

#[test]
fn test_missing_version_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = feature(
        tmp.path(),
        "noversion",
        r#"{"id": "noversion", "name": "No Version"}"#,
        GOOD_INSTALL,
    );

    let report = validator().validate(&dir, "noversion");
    assert_eq!(messages(&report.errors), vec!["missing required field 'version'"]);
}

#[cfg(unix)]
#[test]
fn test_non_executable_install_script_is_a_warning() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempfile::tempdir().unwrap();
    let dir = hello_world(tmp.path());
    std::fs::set_permissions(dir.join("install.sh"), std::fs::Permissions::from_mode(0o644))
        .unwrap();

    let report = validator().validate(&dir, "hello-world");
    assert!(report.is_valid());
    assert!(messages(&report.warnings).contains(&"install.sh is not executable"));
}

#[test]
fn test_install_script_lints_are_advisory() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = feature(
        tmp.path(),
        "sloppy",
        r#"{"id": "sloppy", "version": "1.0.0", "name": "Sloppy", "description": "d"}"#,
        "#!/bin/sh\napt-get install -y jq\n",
    );

    let report = validator().validate(&dir, "sloppy");
    assert!(report.is_valid());
    let warnings = messages(&report.warnings);
    assert!(warnings.iter().any(|w| w.contains("set -e")));
    assert!(warnings.iter().any(|w| w.contains("superuser")));
    assert!(warnings.iter().any(|w| w.contains("idempotency")));
}

#[test]
fn test_custom_lints_replace_and_extend_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = feature(
        tmp.path(),
        "sloppy",
        r#"{"id": "sloppy", "version": "1.0.0", "name": "Sloppy", "description": "d"}"#,
        "#!/bin/sh\napt-get install -y jq\n",
    );

    let cleanup = RegexLint::from_pattern(
        "apt-cleanup",
        r"rm -rf /var/lib/apt/lists",
        "install.sh does not clean the apt lists",
    )
    .unwrap();
    let pipefail = RegexLint::from_pattern(
        "pipefail",
        r"set -o pipefail",
        "install.sh does not set pipefail",
    )
    .unwrap();
    let v = validator()
        .with_lints(vec![Box::new(cleanup)])
        .with_lint(pipefail);

    let report = v.validate(&dir, "sloppy");
    let warnings = messages(&report.warnings);
    assert!(warnings.contains(&"install.sh does not clean the apt lists"));
    assert!(warnings.contains(&"install.sh does not set pipefail"));
    assert!(!warnings.iter().any(|w| w.contains("set -e")));
}

#[test]
fn test_install_script_syntax_error_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = feature(
        tmp.path(),
        "typo",
        r#"{"id": "typo", "version": "1.0.0", "name": "Typo", "description": "d"}"#,
        &format!("{GOOD_INSTALL}\nSYNTAX_ERROR\n"),
    );

    let report = validator().validate(&dir, "typo");
    assert_eq!(report.error_count(), 1);
    assert!(report.errors[0].message.starts_with("install.sh has a syntax error"));
}

#[test]
fn test_unreferenced_option_is_a_warning() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = feature(
        tmp.path(),
        "opts",
        r#"{"id": "opts", "version": "1.0.0", "name": "Opts", "description": "d",
            "options": {
                "greeting": {"type": "string", "description": "used"},
                "silent": {"type": "boolean", "description": "never read"}
            }}"#,
        GOOD_INSTALL,
    );

    let report = validator().validate(&dir, "opts");
    let warnings = messages(&report.warnings);
    assert!(warnings.iter().any(|w| w.contains("'silent'") && w.contains("$SILENT")));
    assert!(!warnings.iter().any(|w| w.contains("'greeting'")));
}

#[test]
fn test_test_directory_contents_are_checked() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = hello_world(tmp.path());
    write(&dir.join("README.md"), "# Hello\n");
    write(&dir.join("test/test.sh"), "#!/bin/bash\nSYNTAX_ERROR\n");
    write(&dir.join("test/scenarios.json"), "{ not json");

    let report = validator().validate(&dir, "hello-world");
    let errors = messages(&report.errors);
    assert_eq!(errors.len(), 2, "{errors:?}");
    assert!(errors[0].starts_with("test.sh has a syntax error"));
    assert!(errors[1].starts_with("scenarios.json is not valid JSON"));
}

#[test]
fn test_empty_test_directory_only_warns() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = hello_world(tmp.path());
    write(&dir.join("README.md"), "# Hello\n");
    std::fs::create_dir(dir.join("test")).unwrap();

    let report = validator().validate(&dir, "hello-world");
    assert!(report.is_valid());
    assert_eq!(report.warning_count(), 2);
}

#[test]
fn test_tests_root_resolves_per_feature_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("src");
    let tests = tmp.path().join("test");
    let dir = hello_world(&src);
    write(&dir.join("README.md"), "# Hello\n");
    write(&tests.join("hello-world/test.sh"), "#!/bin/bash\necho ok\n");
    write(&tests.join("hello-world/scenarios.json"), r#"{"default": {"image": "debian"}}"#);

    let report = validator()
        .with_options(ValidateOptions::default().with_tests_root(&tests))
        .validate(&dir, "hello-world");
    assert_eq!(report, ValidationReport::new("hello-world"));
}

#[test]
fn test_validation_is_deterministic_and_read_only() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = feature(
        tmp.path(),
        "broken",
        r#"{"id": "wrong-id", "version": "2", "name": ""}"#,
        "#!/bin/sh\n",
    );
    let before: Vec<_> = walk(&dir);

    let v = validator();
    let first = v.validate(&dir, "broken");
    let second = v.validate(&dir, "broken");

    assert_eq!(first, second);
    assert_eq!(walk(&dir), before);
}

#[test]
fn test_summary_folds_many_reports() {
    let tmp = tempfile::tempdir().unwrap();
    let good = hello_world(tmp.path());
    let bad = feature(tmp.path(), "broken", r#"{"id": "x"}"#, GOOD_INSTALL);

    let v = validator();
    let reports = [v.validate(&good, "hello-world"), v.validate(&bad, "broken")];
    let summary = ValidationSummary::fold(&reports);

    assert_eq!(summary.features, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.errors, reports[1].error_count());
    assert!(!summary.is_success());
}

fn walk(dir: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut out = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(d) = stack.pop() {
        for entry in std::fs::read_dir(&d).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                let bytes = std::fs::read(&path).unwrap();
                out.push((path, bytes));
            }
        }
    }
    out.sort();
    out
}
