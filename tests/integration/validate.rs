use crate::common::{TestProject, cloned_entry, linked_entry};
use gitlink_cli::test_utils::TestGit;
use serde_json::json;

#[test]
fn test_validate_reports_without_writing() {
    let project = TestProject::new().unwrap();
    let source_a = project.create_source_repo("lib-a").unwrap();
    let source_b = project.create_source_repo("lib-b").unwrap();
    let local_a = project.create_local_copy("lib-a", &source_a).unwrap();
    let local_b = project.create_local_copy("lib-b", &source_b).unwrap();
    TestGit::new(&local_b).checkout("dev").unwrap();

    let mut entry_b = linked_entry("lib-b", &source_b, &local_b);
    entry_b["branch"] = json!("master");
    project
        .write_manifest(&json!({
            "lib-a": linked_entry("lib-a", &source_a, &local_a),
            "lib-b": entry_b,
            "lib-c": cloned_entry("lib-c", &source_a),
        }))
        .unwrap();

    project
        .run_gitlink(&["validate"])
        .unwrap()
        .assert_success()
        .assert_stdout_contains("Package lib-a would link to")
        .assert_stderr_contains("Package lib-b would be cloned: Local branch dev does not match master")
        .assert_stdout_contains("Package lib-c would be cloned (local link not configured)")
        .assert_stdout_contains("1 of 3 package(s) would be linked");

    assert!(!project.project_path().join("packages").exists());
}

#[test]
fn test_validate_detached_tag_matches() {
    let project = TestProject::new().unwrap();
    let source = project.create_source_repo("lib-a").unwrap();
    let local = project.create_local_copy("lib-a", &source).unwrap();
    TestGit::new(&local).checkout("v1.0.0").unwrap();

    let mut entry = linked_entry("lib-a", &source, &local);
    entry["tag"] = json!("v1.0.0");
    project.write_manifest(&json!({ "lib-a": entry })).unwrap();

    project
        .run_gitlink(&["validate"])
        .unwrap()
        .assert_success()
        .assert_stderr_contains("HEAD is detached with label: v1.0.0")
        .assert_stdout_contains("Package lib-a would link to");
}
