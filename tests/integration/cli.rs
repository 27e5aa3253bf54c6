use predicates::prelude::*;
use serde_json::Value;

use crate::common::{ProjectFixture, git, git_tag};

fn project_with_libx_and_liby() -> ProjectFixture {
    let fixture = ProjectFixture::new().unwrap();
    ProjectFixture::write_lockfile(
        fixture.project_path(),
        &[("libx", git_tag("https://x", "v1.0")), ("liby", git("https://y"))],
    )
    .unwrap();
    fixture.create_global_cache("libx").unwrap();
    fixture
}

#[test]
fn test_list_text() {
    let fixture = project_with_libx_and_liby();

    fixture
        .ckdeps()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("libx v1.0"))
        .stdout(predicate::str::contains("No local checkout found"));
}

#[test]
fn test_list_json() {
    let fixture = project_with_libx_and_liby();

    let output = fixture.ckdeps().args(["list", "--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let deps: Value = serde_json::from_slice(&output.stdout).unwrap();
    let deps = deps.as_array().unwrap();
    assert_eq!(deps.len(), 2);
    assert_eq!(deps[0]["id"], "libx");
    assert_eq!(deps[0]["tag"], "v1.0");
    assert!(deps[0]["content_root"].is_string());
    assert!(deps[1]["content_root"].is_null());
}

#[test]
fn test_list_unresolved_only() {
    let fixture = project_with_libx_and_liby();

    fixture
        .ckdeps()
        .args(["list", "--unresolved"])
        .assert()
        .success()
        .stdout(predicate::str::contains("liby"))
        .stdout(predicate::str::contains("libx").not());
}

#[test]
fn test_list_empty_project() {
    let fixture = ProjectFixture::new().unwrap();

    fixture
        .ckdeps()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No CuteKit dependencies detected"));
}

#[test]
fn test_tree_output() {
    let fixture = project_with_libx_and_liby();

    fixture
        .ckdeps()
        .arg("tree")
        .assert()
        .success()
        .stdout(predicate::str::contains("libx\n└── README.md"))
        .stdout(predicate::str::contains("liby\n└── No local checkout found"));
}

#[test]
fn test_tree_rejects_zero_depth() {
    let fixture = project_with_libx_and_liby();

    fixture
        .ckdeps()
        .args(["tree", "--depth", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Depth must be at least 1"));
}

#[test]
fn test_check_reports_malformed_lockfile() {
    let fixture = ProjectFixture::new().unwrap();
    fixture.write_file("project.lock", "{ nope").unwrap();

    fixture
        .ckdeps()
        .arg("check")
        .assert()
        .failure()
        .stdout(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("manifest problem"));
}

#[test]
fn test_check_strict_fails_on_missing_checkout() {
    let fixture = project_with_libx_and_liby();

    fixture.ckdeps().arg("check").assert().success().stdout(predicate::str::contains("warning: liby"));
    fixture.ckdeps().args(["check", "--strict"]).assert().failure();
}

#[test]
fn test_missing_project_root() {
    let fixture = ProjectFixture::new().unwrap();
    let missing = fixture.project_path().join("nope");

    let mut cmd = assert_cmd::Command::cargo_bin("ckdeps").unwrap();
    cmd.args(["list", "--config"])
        .arg(fixture.config_path())
        .arg("--project")
        .arg(&missing)
        .env("NO_COLOR", "1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Project root is not a directory"));
}

#[test]
fn test_invalid_config_is_reported() {
    let fixture = ProjectFixture::new().unwrap();
    std::fs::write(fixture.config_path(), "debounce_ms = \"soon\"\n").unwrap();

    fixture.ckdeps().arg("list").assert().failure().stderr(predicate::str::contains("configuration"));
}
