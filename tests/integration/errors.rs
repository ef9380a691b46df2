use crate::common::{TestProject, cloned_entry, linked_entry};
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;

#[test]
fn test_missing_manifest_exits_nonzero() {
    let project = TestProject::new().unwrap();

    Command::cargo_bin("gitlink")
        .unwrap()
        .current_dir(project.project_path())
        .env("NO_COLOR", "1")
        .env_remove("GITLINK_CONFIG")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("GitLink Error"))
        .stderr(predicate::str::contains("No file found at:"))
        .stdout(predicate::str::contains("GitLinking").not());
}

#[test]
fn test_invalid_manifest_json() {
    let project = TestProject::new().unwrap();
    std::fs::write(project.project_path().join("git.link.json"), "{ \"lib-a\": ").unwrap();

    Command::cargo_bin("gitlink")
        .unwrap()
        .current_dir(project.project_path())
        .env("NO_COLOR", "1")
        .env_remove("GITLINK_CONFIG")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid manifest file syntax"));
}

#[test]
fn test_config_from_environment() {
    let project = TestProject::new().unwrap();
    let source = project.create_source_repo("lib-a").unwrap();
    project
        .env
        .write_manifest("from-env.json", &json!({ "lib-a": cloned_entry("lib-a", &source) }))
        .unwrap();

    Command::cargo_bin("gitlink")
        .unwrap()
        .current_dir(project.project_path())
        .env("NO_COLOR", "1")
        .env("GITLINK_CONFIG", "from-env.json")
        .assert()
        .success();
    assert!(project.package("lib-a").join("README.md").exists());
}

#[test]
fn test_one_failed_entry_fails_run_but_not_others() {
    let project = TestProject::new().unwrap();
    let source = project.create_source_repo("lib-a").unwrap();
    let missing = project.env.sources_dir.join("missing");

    project
        .write_manifest(&json!({
            "broken": cloned_entry("broken", &missing),
            "lib-a": cloned_entry("lib-a", &source),
        }))
        .unwrap();

    project
        .run_gitlink(&[])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("Failed to resolve package: broken")
        .assert_stderr_contains("0 linked, 1 cloned, 1 failed");
    assert!(project.package("lib-a").join("README.md").exists());
    assert!(!project.package("broken").exists());
}

#[test]
fn test_unknown_revision_leaves_no_target() {
    let project = TestProject::new().unwrap();
    let source = project.create_source_repo("lib-a").unwrap();

    let mut entry = cloned_entry("lib-a", &source);
    entry["branch"] = json!("no-such-branch");
    project.write_manifest(&json!({ "lib-a": entry })).unwrap();

    project
        .run_gitlink(&[])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("Failed to checkout reference 'no-such-branch'");
    assert!(!project.package("lib-a").exists());
}

#[test]
fn test_branch_and_tag_rejected_then_cloned() {
    let project = TestProject::new().unwrap();
    let source = project.create_source_repo("lib-a").unwrap();
    let local = project.create_local_copy("lib-a", &source).unwrap();

    let mut entry = linked_entry("lib-a", &source, &local);
    entry["branch"] = json!("dev");
    entry["tag"] = json!("v1.0.0");
    project.write_manifest(&json!({ "lib-a": entry })).unwrap();

    project
        .run_gitlink(&[])
        .unwrap()
        .assert_success()
        .assert_stderr_contains("Invalid configuration for 'lib-a'")
        .assert_stdout_contains("lib-a : dev successful");
}

#[test]
fn test_quiet_prints_only_failures() {
    let project = TestProject::new().unwrap();
    let source = project.create_source_repo("lib-a").unwrap();
    project.write_manifest(&json!({ "lib-a": cloned_entry("lib-a", &source) })).unwrap();

    let output = project.run_gitlink(&["--quiet"]).unwrap();
    output.assert_success();
    assert!(output.stdout.is_empty(), "unexpected stdout: {}", output.stdout);
}

#[test]
fn test_parent_dir_name_never_removes_outside_target_path() {
    let project = TestProject::new().unwrap();
    let outer = project.project_path().parent().unwrap().to_path_buf();
    let sibling = outer.join("precious");
    std::fs::create_dir_all(&sibling).unwrap();
    std::fs::write(sibling.join("data.txt"), "keep").unwrap();
    let missing = project.env.sources_dir.join("missing");

    let mut entry = cloned_entry("..", &missing);
    entry["paths"]["targetPath"] = json!(".");
    project.write_manifest(&json!({ "up": entry })).unwrap();

    project
        .run_gitlink(&[])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("Failed to resolve package: ..")
        .assert_stderr_contains("0 linked, 0 cloned, 1 failed");
    assert!(sibling.join("data.txt").exists());
    assert!(project.project_path().join("git.link.json").exists());
}
