//! Runs the `devfeat` binary against throwaway workspaces.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

struct Workspace {
    root: tempfile::TempDir,
    home: tempfile::TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
            home: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    fn feature(&self, id: &str) {
        self.write(
            &format!("src/{id}/devcontainer-feature.json"),
            &format!(r#"{{"id": "{id}", "version": "1.2.3", "name": "Feature {id}"}}"#),
        );
        let install = self.write(
            &format!("src/{id}/install.sh"),
            "#!/bin/sh\nset -e\necho installing\n",
        );
        make_executable(&install);
        self.write(&format!("src/{id}/README.md"), &format!("# {id}\n"));
    }

    fn run(&self, args: &[&str]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_devfeat"));
        cmd.arg("-C").arg(self.path()).args(args);
        cmd.env("HOME", self.home.path());
        for var in [
            "DEVFEAT_OUTPUT_DIR",
            "DEVFEAT_REGISTRY",
            "DEVFEAT_NAMESPACE",
            "DEVFEAT_LOG_LEVEL",
            "RUST_LOG",
        ] {
            cmd.env_remove(var);
        }
        cmd.output().unwrap()
    }

    fn run_json(&self, args: &[&str]) -> (Output, serde_json::Value) {
        let mut full = vec!["--format", "json"];
        full.extend_from_slice(args);
        let output = self.run(&full);
        let value = serde_json::from_slice(&output.stdout).unwrap();
        (output, value)
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

#[test]
fn test_validate_valid_feature_exits_zero() {
    let ws = Workspace::new();
    ws.feature("hello");

    let (output, json) = ws.run_json(&["validate", "hello"]);
    assert!(output.status.success());
    assert_eq!(json["summary"]["features"], 1);
    assert_eq!(json["summary"]["failed"], 0);
    assert_eq!(json["reports"][0]["feature"], "hello");
}

#[test]
fn test_validate_reports_every_error_and_exits_one() {
    let ws = Workspace::new();
    ws.write(
        "src/broken/devcontainer-feature.json",
        r#"{"id": "other", "version": "1.0.0", "name": "Broken"}"#,
    );

    let (output, json) = ws.run_json(&["validate", "broken"]);
    assert_eq!(output.status.code(), Some(1));
    let errors = json["reports"][0]["errors"].as_array().unwrap();
    // Missing install.sh and the id mismatch are both reported.
    assert!(errors.len() >= 2, "{errors:?}");
}

#[test]
fn test_validate_all_covers_every_feature() {
    let ws = Workspace::new();
    ws.feature("b");
    ws.feature("a");

    let (output, json) = ws.run_json(&["validate", "--all"]);
    assert!(output.status.success());
    let names: Vec<_> = json["reports"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["feature"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(names, vec!["a", "b"]);
}

// ---------------------------------------------------------------------------
// package
// ---------------------------------------------------------------------------

#[test]
fn test_package_writes_artifacts_and_summary() {
    let ws = Workspace::new();
    ws.feature("hello");

    let (output, json) = ws.run_json(&["package", "hello", "--namespace", "acme/features"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let dist = ws.path().join("dist");
    assert!(dist.join("feature-hello.tgz").is_file());
    assert!(dist.join("hello-metadata.json").is_file());
    assert!(dist.join("build-summary.json").is_file());

    let package = &json["packages"][0];
    assert_eq!(package["status"], "built");
    assert_eq!(package["reference"], "ghcr.io/acme/features/hello:1.2.3");

    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dist.join("build-summary.json")).unwrap())
            .unwrap();
    assert_eq!(summary["feature"]["id"], "hello");
    assert_eq!(summary["registry"]["push_requested"], false);
}

#[test]
fn test_package_refuses_invalid_feature() {
    let ws = Workspace::new();
    ws.write(
        "src/broken/devcontainer-feature.json",
        r#"{"id": "broken", "version": "1.0.0", "name": "Broken"}"#,
    );

    let (output, json) = ws.run_json(&["package", "broken"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(json["packages"].as_array().unwrap().is_empty());
    assert_eq!(json["refused"][0]["feature"], "broken");
    assert!(!ws.path().join("dist").exists());
}

#[test]
fn test_package_dry_run_writes_nothing() {
    let ws = Workspace::new();
    ws.feature("hello");

    let (output, json) = ws.run_json(&["package", "hello", "--dry-run"]);
    assert!(output.status.success());
    assert_eq!(json["packages"][0]["status"], "planned");
    assert!(json.get("summary").is_none());
    assert!(!ws.path().join("dist").exists());
}

#[test]
fn test_workspace_config_sets_output_dir() {
    let ws = Workspace::new();
    ws.feature("hello");
    ws.write(".devfeat/config.toml", "[build]\noutput_dir = \"out\"\n");

    let output = ws.run(&["package", "hello"]);
    assert!(output.status.success());
    assert!(ws.path().join("out/feature-hello.tgz").is_file());
    assert!(!ws.path().join("dist").exists());
}

// ---------------------------------------------------------------------------
// collect / list / config
// ---------------------------------------------------------------------------

#[test]
fn test_collect_writes_sorted_collection() {
    let ws = Workspace::new();
    ws.feature("zeta");
    ws.feature("alpha");

    let (output, json) = ws.run_json(&["collect", "--ref", "main", "--sha", "abc123"]);
    assert!(output.status.success());

    let path = ws.path().join("dist/devcontainer-collection.json");
    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let ids: Vec<_> = doc["features"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(ids, vec!["alpha", "zeta"]);
    assert_eq!(doc["sourceInformation"]["ref"], "main");
    assert_eq!(doc["sourceInformation"]["sha"], "abc123");
    assert_eq!(json["collection"], doc);
}

#[test]
fn test_list_reports_unreadable_manifest() {
    let ws = Workspace::new();
    ws.feature("good");
    ws.write("src/bad/devcontainer-feature.json", "{ not json");

    let (output, json) = ws.run_json(&["list"]);
    assert_eq!(output.status.code(), Some(1));
    let listed = json.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed[0]["error"].is_string());
    assert_eq!(listed[1]["id"], "good");
}

#[test]
fn test_config_shows_field_sources() {
    let ws = Workspace::new();
    ws.write(".devfeat/config.toml", "[registry]\nnamespace = \"acme\"\n");

    let (output, json) = ws.run_json(&["config"]);
    assert!(output.status.success());
    assert_eq!(json["config"]["registry"]["namespace"], "acme");
    assert_eq!(json["field_sources"]["registry.namespace"], "workspace");
    assert_eq!(json["field_sources"]["build.output_dir"], "defaults");
}

#[test]
fn test_file_log_target_writes_under_workspace() {
    let ws = Workspace::new();
    ws.feature("hello");
    ws.write(
        ".devfeat/config.toml",
        "[logging]\nlevel = \"debug\"\ntarget = \"file\"\ndirectory = \"logs\"\nrotation = \"never\"\n",
    );

    let output = ws.run(&["validate", "hello"]);
    assert!(output.status.success());
    let log = std::fs::read_to_string(ws.path().join("logs/devfeat.log")).unwrap();
    assert!(log.contains("Loaded configuration"), "{log}");
}

#[test]
fn test_invalid_config_exits_one() {
    let ws = Workspace::new();
    ws.write(".devfeat/config.toml", "[logging]\nlevel = \"loud\"\n");

    let output = ws.run(&["list"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("configuration"));
}
