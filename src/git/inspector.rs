//! Read-only queries about a candidate local working copy.
//!
//! [`RepoInspector`] is the seam between link validation and git: the
//! validator only ever asks "what remote does this directory track" and "what
//! does it have checked out". [`GitInspector`] answers through the git CLI;
//! tests plug in fakes to exercise every validation branch without touching
//! a real repository.

use super::{GitRepo, Revision};
use crate::core::GitLinkError;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// Reports a local directory's remote URL and checked-out revision.
#[async_trait]
pub trait RepoInspector: Send + Sync {
    /// The configured `origin` URL.
    ///
    /// # Errors
    ///
    /// [`GitLinkError::NotAGitRepository`] when `path` does not exist or has
    /// no retrievable remote URL.
    async fn remote_url(&self, path: &Path) -> Result<String, GitLinkError>;

    /// The current branch name, or tag/commit label with `detached` set.
    async fn current_revision(&self, path: &Path) -> Result<Revision, GitLinkError>;
}

/// [`RepoInspector`] backed by the system git binary.
#[derive(Debug, Clone, Default)]
pub struct GitInspector {
    timeout: Option<Duration>,
}

impl GitInspector {
    /// Create an inspector whose git invocations honor `timeout`.
    #[must_use]
    pub const fn new(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
        }
    }

    fn repo(&self, path: &Path) -> GitRepo {
        GitRepo::new(path).with_timeout(self.timeout)
    }
}

#[async_trait]
impl RepoInspector for GitInspector {
    async fn remote_url(&self, path: &Path) -> Result<String, GitLinkError> {
        let not_a_repo = |reason: String| GitLinkError::NotAGitRepository {
            path: path.display().to_string(),
            reason,
        };

        if tokio::fs::metadata(path).await.is_err() {
            return Err(not_a_repo("path does not exist".to_string()));
        }

        let url = self.repo(path).get_remote_url().await.map_err(|e| {
            let reason = match e.downcast_ref::<GitLinkError>() {
                Some(GitLinkError::GitCommandError { stderr, .. }) => stderr.trim().to_string(),
                _ => e.to_string(),
            };
            not_a_repo(reason)
        })?;

        if url.trim().is_empty() {
            return Err(not_a_repo("origin has an empty URL".to_string()));
        }
        Ok(url)
    }

    async fn current_revision(&self, path: &Path) -> Result<Revision, GitLinkError> {
        self.repo(path).current_revision().await.map_err(|e| match e.downcast::<GitLinkError>() {
            Ok(typed) => typed,
            Err(e) => GitLinkError::GitCommandError {
                operation: "rev-parse".to_string(),
                stderr: format!("{e:#}"),
            },
        })
    }
}
