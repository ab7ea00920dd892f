//! CLI integration tests for Multitarget.
//!
//! These tests run the binary against projects written to temporary
//! directories.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the multitarget binary command, isolated from the user's global config.
fn multitarget(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("multitarget").unwrap();
    cmd.env("HOME", home).env_remove("MULTITARGET_MANIFEST");
    cmd
}

/// Create a project with the given manifest and a Linux host override.
fn project(manifest: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("Multitarget.toml"), manifest).unwrap();
    fs::create_dir_all(tmp.path().join(".multitarget")).unwrap();
    fs::write(
        tmp.path().join(".multitarget/config.toml"),
        "[host]\nos = \"linux\"\n",
    )
    .unwrap();
    tmp
}

const LIB: &str = r#"
[project]
group = "com.acme"
name = "lib"
version = "1.0"
plugins = ["maven-publish"]

[targets.jvm]

[targets.js]
publishable = false
"#;

// ============================================================================
// multitarget init
// ============================================================================

#[test]
fn test_init_creates_manifest() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("demo");
    fs::create_dir(&dir).unwrap();

    multitarget(tmp.path())
        .args(["init"])
        .current_dir(&dir)
        .assert()
        .success();

    let manifest = fs::read_to_string(dir.join("Multitarget.toml")).unwrap();
    assert!(manifest.contains("name = \"demo\""));
    assert!(dir.join("src/commonMain/kotlin").is_dir());
}

#[test]
fn test_init_refuses_existing_manifest() {
    let tmp = project(LIB);

    multitarget(tmp.path())
        .args(["init"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

// ============================================================================
// multitarget targets / presets
// ============================================================================

#[test]
fn test_targets_lists_metadata_first() {
    let tmp = project(LIB);

    multitarget(tmp.path())
        .args(["targets"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("metadata [common"))
        .stdout(predicate::str::contains("js [js, preset js] (not published)"))
        .stdout(predicate::str::contains("main -> jvmMain"));
}

#[test]
fn test_targets_json() {
    let tmp = project(LIB);

    let output = multitarget(tmp.path())
        .args(["--format", "json", "targets", "jvm"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["name"], "jvm");
    assert_eq!(json[0]["compilations"][0]["default_source_set"], "jvmMain");
}

#[test]
fn test_unknown_target_suggests_listing() {
    let tmp = project(LIB);

    multitarget(tmp.path())
        .args(["targets", "ios"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("target `ios` does not exist"))
        .stderr(predicate::str::contains("multitarget targets"));
}

#[test]
fn test_presets_follow_host_override() {
    let tmp = project(LIB);

    multitarget(tmp.path())
        .args(["presets"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("jvmWithJava"))
        .stdout(predicate::str::contains("linuxX64"))
        .stdout(predicate::str::contains("iosArm64").not());
}

// ============================================================================
// multitarget source-sets / publications / tasks
// ============================================================================

#[test]
fn test_source_sets_graph() {
    let tmp = project(LIB);

    multitarget(tmp.path())
        .args(["source-sets"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("jvmMain -> commonMain"))
        .stdout(predicate::str::contains("jsTest -> commonTest"));
}

#[test]
fn test_publications() {
    let tmp = project(LIB);

    multitarget(tmp.path())
        .args(["publications"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("kotlinMultiplatform (com.acme:lib:1.0)"))
        .stdout(predicate::str::contains("jvm (com.acme:lib-jvm:1.0)"))
        .stdout(predicate::str::contains("js (").not());
}

#[test]
fn test_tasks_skipped_when_metadata_publishing_disabled() {
    let tmp = project(LIB);
    fs::write(
        tmp.path().join(".multitarget/config.toml"),
        "[features]\nmetadata-publishing = false\n\n[host]\nos = \"linux\"\n",
    )
    .unwrap();

    multitarget(tmp.path())
        .args(["tasks", "--skipped"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "publishKotlinMultiplatformPublicationToMavenLocal",
        ))
        .stdout(predicate::str::contains("publishJvmPublicationToMavenLocal").not());
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_manifest() {
    let tmp = TempDir::new().unwrap();

    multitarget(tmp.path())
        .args(["targets"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not find Multitarget.toml"));
}

#[test]
fn test_cycle_reported_as_diagnostic() {
    let tmp = project(
        r#"
[project]
name = "lib"

[targets.jvm]

[source-sets.commonMain]
depends-on = ["jvmMain"]
"#,
    );

    multitarget(tmp.path())
        .args(["--no-color", "source-sets"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("would create a cycle"))
        .stderr(predicate::str::contains("commonMain -> jvmMain -> commonMain"));
}

#[test]
fn test_manifest_path_flag() {
    let tmp = project(LIB);
    let elsewhere = TempDir::new().unwrap();

    multitarget(tmp.path())
        .args(["--manifest-path"])
        .arg(tmp.path().join("Multitarget.toml"))
        .arg("publications")
        .current_dir(elsewhere.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("kotlinMultiplatform"));
}

#[test]
fn test_completions() {
    let tmp = TempDir::new().unwrap();

    multitarget(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("multitarget"));
}
