//! Git operations wrapper for GitLink
//!
//! A thin async layer over the system `git` binary. Using the installed git
//! rather than an embedded library means SSH agents, credential helpers and
//! `insteadOf` rewrites configured by the user apply to every clone exactly as
//! they would on the command line.
//!
//! - [`command_builder`] - fluent [`GitCommand`] builder with logging and error mapping
//! - [`inspector`] - the read-only [`RepoInspector`] queries used by link validation
//! - [`GitRepo`] - a handle on one working copy: clone into it, checkout, query
//!
//! # Examples
//!
//! ```rust,no_run
//! use gitlink_cli::git::GitRepo;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let repo = GitRepo::new("/work/app/packages/lib-a").with_context("lib-a");
//! repo.clone_remote("git@host:org/lib-a.git").await?;
//! repo.checkout("v1.2.0").await?;
//! # Ok(())
//! # }
//! ```

pub mod command_builder;
pub mod inspector;

pub use inspector::{GitInspector, RepoInspector};

use crate::core::GitLinkError;
use crate::git::command_builder::GitCommand;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// What a working copy currently has checked out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    /// Branch name, or when detached the exact tag at HEAD (falling back to the
    /// abbreviated commit hash)
    pub name: String,
    /// True when HEAD does not point at a branch
    pub detached: bool,
}

impl Revision {
    /// A revision tracking a named branch.
    pub fn branch(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detached: false,
        }
    }

    /// A detached HEAD labelled by tag or commit.
    pub fn detached(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detached: true,
        }
    }
}

/// A handle on a local working copy, driven through the git CLI.
///
/// Holds only the path plus per-invocation settings (timeout, log context);
/// every query goes to git so the answer always reflects the disk.
#[derive(Debug, Clone)]
pub struct GitRepo {
    path: PathBuf,
    timeout: Option<Duration>,
    context: Option<String>,
}

impl GitRepo {
    /// Creates a handle for `path`. Nothing is checked until a method runs.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            timeout: None,
            context: None,
        }
    }

    /// Applies a timeout to every git invocation made through this handle.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Tags log lines with `context` (usually the manifest entry name).
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    fn prepare(&self, cmd: GitCommand) -> GitCommand {
        let cmd = cmd.with_timeout(self.timeout);
        match &self.context {
            Some(ctx) => cmd.with_context(ctx.clone()),
            None => cmd,
        }
    }

    fn in_repo(&self, cmd: GitCommand) -> GitCommand {
        self.prepare(cmd).current_dir(&self.path)
    }

    /// Clones `url` into this handle's path.
    ///
    /// The path must not exist or must be an empty directory.
    ///
    /// # Errors
    ///
    /// [`GitLinkError::CloneFailed`] carrying git's stderr.
    pub async fn clone_remote(&self, url: &str) -> Result<()> {
        self.prepare(GitCommand::clone(url, &self.path)).execute_success().await
    }

    /// Checks out a branch, tag or commit.
    ///
    /// When `origin/<ref_name>` exists the local branch is created or reset to
    /// it with `checkout -B`, so a branch that is not the clone's default still
    /// ends up as a real local branch. Anything else (tags, commits) is checked
    /// out directly, leaving HEAD detached.
    ///
    /// # Errors
    ///
    /// [`GitLinkError::CheckoutFailed`] if the reference does not exist.
    pub async fn checkout(&self, ref_name: &str) -> Result<()> {
        let remote_ref = format!("origin/{ref_name}");
        let has_remote_branch =
            self.in_repo(GitCommand::verify_ref(&remote_ref)).execute().await.is_ok();

        if has_remote_branch
            && self
                .in_repo(GitCommand::checkout_branch(ref_name, &remote_ref))
                .execute_success()
                .await
                .is_ok()
        {
            return Ok(());
        }

        self.in_repo(GitCommand::checkout(ref_name)).execute_success().await.map_err(|e| {
            if let Some(GitLinkError::CheckoutFailed { .. }) = e.downcast_ref::<GitLinkError>() {
                return e;
            }
            GitLinkError::CheckoutFailed {
                reference: ref_name.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Returns the URL of the `origin` remote.
    pub async fn get_remote_url(&self) -> Result<String> {
        self.in_repo(GitCommand::remote_url()).execute_stdout().await
    }

    /// Reports the checked-out branch, or the tag/commit when HEAD is detached.
    pub async fn current_revision(&self) -> Result<Revision> {
        if let Ok(branch) = self.in_repo(GitCommand::symbolic_head()).execute_stdout().await {
            if !branch.is_empty() {
                return Ok(Revision::branch(branch));
            }
        }

        if let Ok(tag) = self.in_repo(GitCommand::exact_tag()).execute_stdout().await {
            if !tag.is_empty() {
                return Ok(Revision::detached(tag));
            }
        }

        let commit = self
            .in_repo(GitCommand::short_commit())
            .execute_stdout()
            .await
            .context("Failed to determine the current branch or commit")?;
        Ok(Revision::detached(commit))
    }
}

/// Checks if git is installed and answers `--version`.
pub async fn is_git_installed() -> bool {
    if !crate::utils::platform::command_exists(crate::utils::platform::get_git_command()) {
        return false;
    }
    GitCommand::version().execute_success().await.is_ok()
}

/// Fails with [`GitLinkError::GitNotFound`] if git is unavailable.
pub async fn ensure_git_available() -> Result<()> {
    if !is_git_installed().await {
        return Err(GitLinkError::GitNotFound.into());
    }
    Ok(())
}
