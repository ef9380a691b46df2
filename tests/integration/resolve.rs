use crate::common::{TestProject, cloned_entry, is_symlink, linked_entry};
use gitlink_cli::test_utils::TestGit;
use serde_json::json;

#[test]
fn test_matching_local_copy_is_linked() {
    let project = TestProject::new().unwrap();
    let source = project.create_source_repo("lib-a").unwrap();
    let local = project.create_local_copy("lib-a", &source).unwrap();
    std::fs::write(local.join("WIP.md"), "work in progress").unwrap();

    let mut entry = linked_entry("lib-a", &source, &local);
    entry["branch"] = json!("master");
    project.write_manifest(&json!({ "lib-a": entry })).unwrap();

    project
        .run_gitlink(&[])
        .unwrap()
        .assert_success()
        .assert_stdout_contains("GitLinking")
        .assert_stdout_contains("Branch match found: master for GitLink: lib-a")
        .assert_stdout_contains("Linking of package: lib-a from");

    let target = project.package("lib-a");
    assert!(is_symlink(&target));
    assert!(target.join("WIP.md").exists());
    assert!(local.join(".git").exists());
}

#[test]
fn test_branch_mismatch_clones_requested_branch() {
    let project = TestProject::new().unwrap();
    let source = project.create_source_repo("lib-a").unwrap();
    let local = project.create_local_copy("lib-a", &source).unwrap();

    let mut entry = linked_entry("lib-a", &source, &local);
    entry["branch"] = json!("dev");
    project.write_manifest(&json!({ "lib-a": entry })).unwrap();

    let output = project.run_gitlink(&["resolve"]).unwrap();
    output
        .assert_success()
        .assert_stderr_contains("Local branch master does not match dev")
        .assert_stdout_contains("Cloning & checkout of lib-a : dev successful")
        .assert_stdout_contains("Prepping of cloned package: lib-a successful");

    let target = project.package("lib-a");
    assert!(!is_symlink(&target));
    assert!(target.join("DEV.md").exists());
    assert!(!target.join(".git").exists());
}

#[test]
fn test_remote_mismatch_clones() {
    let project = TestProject::new().unwrap();
    let source = project.create_source_repo("lib-a").unwrap();
    let other = project.create_source_repo("lib-other").unwrap();
    let local = project.create_local_copy("lib-other", &other).unwrap();

    project.write_manifest(&json!({ "lib-a": linked_entry("lib-a", &source, &local) })).unwrap();

    project
        .run_gitlink(&[])
        .unwrap()
        .assert_success()
        .assert_stderr_contains("does not match");

    let target = project.package("lib-a");
    assert!(!is_symlink(&target));
    assert_eq!(std::fs::read_to_string(target.join("README.md")).unwrap(), "lib-a master");
}

#[test]
fn test_entry_without_link_clones_tag() {
    let project = TestProject::new().unwrap();
    let source = project.create_source_repo("lib-a").unwrap();
    TestGit::new(&source).checkout("dev").unwrap();

    let mut entry = cloned_entry("lib-a", &source);
    entry["tag"] = json!("v1.0.0");
    project.write_manifest(&json!({ "lib-a": entry })).unwrap();

    project
        .run_gitlink(&[])
        .unwrap()
        .assert_success()
        .assert_stdout_contains("lib-a : v1.0.0 successful");

    let target = project.package("lib-a");
    assert!(target.join("README.md").exists());
    assert!(!target.join("DEV.md").exists());
    assert!(!target.join(".git").exists());
}

#[test]
fn test_use_local_link_without_path_warns_and_clones() {
    let project = TestProject::new().unwrap();
    let source = project.create_source_repo("lib-a").unwrap();

    let mut entry = cloned_entry("lib-a", &source);
    entry["options"] = json!({ "useLocalLink": true });
    project.write_manifest(&json!({ "lib-a": entry })).unwrap();

    project
        .run_gitlink(&[])
        .unwrap()
        .assert_success()
        .assert_stderr_contains("has 'useLocalLink' value but no 'localLinkPath' defined");
    assert!(project.package("lib-a").join("README.md").exists());
}

#[test]
fn test_stale_target_is_replaced() {
    let project = TestProject::new().unwrap();
    let source = project.create_source_repo("lib-a").unwrap();
    let target = project.package("lib-a");
    std::fs::create_dir_all(target.join("old")).unwrap();
    std::fs::write(target.join("old").join("stale.txt"), "stale").unwrap();

    project.write_manifest(&json!({ "lib-a": cloned_entry("lib-a", &source) })).unwrap();
    project.run_gitlink(&[]).unwrap().assert_success();

    assert!(!target.join("old").exists());
    assert!(target.join("README.md").exists());
}

#[test]
fn test_second_run_produces_same_state() {
    let project = TestProject::new().unwrap();
    let source_a = project.create_source_repo("lib-a").unwrap();
    let source_b = project.create_source_repo("lib-b").unwrap();
    let local_a = project.create_local_copy("lib-a", &source_a).unwrap();

    project
        .write_manifest(&json!({
            "lib-a": linked_entry("lib-a", &source_a, &local_a),
            "lib-b": cloned_entry("lib-b", &source_b),
        }))
        .unwrap();

    let first = project.run_gitlink(&[]).unwrap();
    first.assert_success().assert_stdout_contains("1 linked, 1 cloned, 0 failed");
    let second = project.run_gitlink(&[]).unwrap();
    second.assert_success().assert_stdout_contains("1 linked, 1 cloned, 0 failed");

    assert!(is_symlink(&project.package("lib-a")));
    let cloned = project.package("lib-b");
    assert!(cloned.join("README.md").exists());
    assert!(!cloned.join(".git").exists());
}

#[test]
fn test_root_flag_and_custom_config() {
    let project = TestProject::new().unwrap();
    let source = project.create_source_repo("lib-a").unwrap();
    project
        .env
        .write_manifest("deps.json", &json!({ "lib-a": cloned_entry("lib-a", &source) }))
        .unwrap();

    let elsewhere = tempfile::tempdir().unwrap();
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_gitlink"))
        .args(["--config", "deps.json", "--root"])
        .arg(project.project_path())
        .current_dir(elsewhere.path())
        .env("NO_COLOR", "1")
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(project.package("lib-a").join("README.md").exists());
    assert!(!elsewhere.path().join("packages").exists());
}
