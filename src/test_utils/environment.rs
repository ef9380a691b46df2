//! Test environment setup and management

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::git_helper::TestGit;

/// A temp directory laid out like a real GitLink setup:
///
/// ```text
/// <tmp>/project   project root, holds git.link.json and packages/
/// <tmp>/sources   "remote" repositories
/// <tmp>/locals    developer working copies cloned from sources
/// ```
pub struct TestEnvironment {
    pub temp_dir: TempDir,
    pub project_dir: PathBuf,
    pub sources_dir: PathBuf,
    pub locals_dir: PathBuf,
}

impl TestEnvironment {
    /// Create a new test environment
    pub fn new() -> Result<Self> {
        super::init_test_logging(None);

        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().join("project");
        let sources_dir = temp_dir.path().join("sources");
        let locals_dir = temp_dir.path().join("locals");

        fs::create_dir_all(&project_dir)?;
        fs::create_dir_all(&sources_dir)?;
        fs::create_dir_all(&locals_dir)?;

        Ok(Self {
            temp_dir,
            project_dir,
            sources_dir,
            locals_dir,
        })
    }

    /// Create a source repository named `name` and return its path.
    ///
    /// History:
    /// - `master`: `README.md` = `"<name> master"`, tagged `v1.0.0`
    /// - `dev`: branched from master, adds `DEV.md`
    ///
    /// HEAD is left on `master`.
    pub fn create_source_repo(&self, name: &str) -> Result<PathBuf> {
        let path = self.sources_dir.join(name);
        fs::create_dir_all(&path)?;

        let git = TestGit::new(&path);
        git.init()?;
        git.config_user()?;

        fs::write(path.join("README.md"), format!("{name} master"))?;
        git.add_all()?;
        git.commit("Initial commit")?;
        git.tag("v1.0.0")?;

        git.create_branch("dev")?;
        fs::write(path.join("DEV.md"), format!("{name} dev"))?;
        git.add_all()?;
        git.commit("Dev work")?;

        git.checkout("master")?;
        Ok(path)
    }

    /// Clone `source` into `locals/<name>` as a developer working copy.
    ///
    /// The clone's origin URL is `source` rendered with `Path::display`, which is
    /// what [`url_for`](Self::url_for) returns for manifests.
    pub fn clone_local_copy(&self, name: &str, source: &Path) -> Result<PathBuf> {
        let dest = self.locals_dir.join(name);
        TestGit::clone_from(&Self::url_for(source), &dest)?;
        Ok(dest)
    }

    /// The repository URL string for a local source path.
    #[must_use]
    pub fn url_for(source: &Path) -> String {
        source.display().to_string()
    }

    /// Write `git.link.json` (or another name) into the project root.
    pub fn write_manifest(&self, file_name: &str, manifest: &serde_json::Value) -> Result<PathBuf> {
        let path = self.project_dir.join(file_name);
        let content = serde_json::to_string_pretty(manifest)?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write manifest to {}", path.display()))?;
        Ok(path)
    }

    /// Absolute path of `targetPath/name` for a target relative to the project.
    #[must_use]
    pub fn package_path(&self, target: &str, name: &str) -> PathBuf {
        self.project_dir.join(target).join(name)
    }
}
