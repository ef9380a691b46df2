//! Common test utilities for GitLink integration tests
//!
//! Wraps [`gitlink_cli::test_utils::TestEnvironment`] with helpers that run the
//! built `gitlink` binary inside the project directory.

// Not every helper is used by every test file
#![allow(dead_code)]

use anyhow::{Context, Result};
use gitlink_cli::test_utils::TestEnvironment;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::process::Command;

/// A project directory plus source repositories and local working copies.
pub struct TestProject {
    pub env: TestEnvironment,
}

impl TestProject {
    /// Create an empty project
    pub fn new() -> Result<Self> {
        Ok(Self {
            env: TestEnvironment::new()?,
        })
    }

    /// Project root
    pub fn project_path(&self) -> &Path {
        &self.env.project_dir
    }

    /// Create a source repository (`master` tagged `v1.0.0`, plus `dev`)
    pub fn create_source_repo(&self, name: &str) -> Result<PathBuf> {
        self.env.create_source_repo(name)
    }

    /// Clone `source` into a local working copy
    pub fn create_local_copy(&self, name: &str, source: &Path) -> Result<PathBuf> {
        self.env.clone_local_copy(name, source)
    }

    /// Write `git.link.json` in the project root
    pub fn write_manifest(&self, manifest: &Value) -> Result<PathBuf> {
        self.env.write_manifest("git.link.json", manifest)
    }

    /// Path of a package under `packages/`
    pub fn package(&self, name: &str) -> PathBuf {
        self.env.package_path("packages", name)
    }

    /// Run gitlink in the project directory
    pub fn run_gitlink(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = Command::new(env!("CARGO_BIN_EXE_gitlink"))
            .args(args)
            .current_dir(&self.env.project_dir)
            .env("NO_COLOR", "1")
            .env_remove("GITLINK_CONFIG")
            .env_remove("RUST_LOG")
            .output()
            .context("Failed to run gitlink")?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        })
    }
}

/// Manifest entry that links `local` when it matches, targeting `packages/`.
pub fn linked_entry(name: &str, source: &Path, local: &Path) -> Value {
    json!({
        "name": name,
        "repository": TestEnvironment::url_for(source),
        "options": { "useLocalLink": true },
        "paths": { "localLinkPath": local.display().to_string(), "targetPath": "./packages" }
    })
}

/// Manifest entry that always clones, targeting `packages/`.
pub fn cloned_entry(name: &str, source: &Path) -> Value {
    json!({
        "name": name,
        "repository": TestEnvironment::url_for(source),
        "paths": { "targetPath": "./packages" }
    })
}

/// Returns true if `path` is itself a symlink.
pub fn is_symlink(path: &Path) -> bool {
    std::fs::symlink_metadata(path).map(|m| m.file_type().is_symlink()).unwrap_or(false)
}

/// Command output helper
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutput {
    /// Assert the command succeeded
    pub fn assert_success(&self) -> &Self {
        assert!(
            self.success,
            "Command failed with code {:?}\nStdout: {}\nStderr: {}",
            self.code, self.stdout, self.stderr
        );
        self
    }

    /// Assert the command exited with status 1
    pub fn assert_failure(&self) -> &Self {
        assert_eq!(
            self.code,
            Some(1),
            "Expected exit code 1\nStdout: {}\nStderr: {}",
            self.stdout,
            self.stderr
        );
        self
    }

    /// Assert stdout contains the given text
    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "Expected stdout to contain '{}'\nActual stdout: {}",
            text,
            self.stdout
        );
        self
    }

    /// Assert stderr contains the given text
    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "Expected stderr to contain '{}'\nActual stderr: {}",
            text,
            self.stderr
        );
        self
    }
}
