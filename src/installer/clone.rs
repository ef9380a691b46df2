use super::into_typed;
use crate::constants::GIT_METADATA_DIR;
use crate::core::GitLinkError;
use crate::git::GitRepo;
use crate::manifest::ManifestEntry;
use crate::utils::StatusReporter;
use crate::utils::fs::{ensure_parent_dir, remove_path};
use colored::Colorize;
use std::path::Path;
use std::time::Duration;

/// Produces a fresh, metadata-free copy of a package's repository.
#[derive(Debug, Clone, Default)]
pub struct RepoCloner {
    timeout: Option<Duration>,
    reporter: StatusReporter,
}

impl RepoCloner {
    /// Cloner whose git invocations honor `timeout`.
    #[must_use]
    pub const fn new(timeout: Option<Duration>, reporter: StatusReporter) -> Self {
        Self {
            timeout,
            reporter,
        }
    }

    /// Clone `entry.repository` into `target`, check out
    /// [`ManifestEntry::clone_revision`] and delete `target/.git`.
    ///
    /// Returns the revision that was checked out.
    ///
    /// # Errors
    ///
    /// - [`GitLinkError::CloneFailed`] if the target cannot be cleared or git clone fails
    /// - [`GitLinkError::CheckoutFailed`] if the revision does not exist; the
    ///   partial clone is removed first
    /// - [`GitLinkError::MetadataStripFailed`] if `.git` cannot be removed
    pub async fn clone_entry(
        &self,
        entry: &ManifestEntry,
        target: &Path,
    ) -> Result<String, GitLinkError> {
        let revision = entry.clone_revision();
        let clone_failed = |reason: String| GitLinkError::CloneFailed {
            url: entry.repository.clone(),
            reason,
        };

        remove_path(target).await.map_err(|e| clone_failed(format!("{e:#}")))?;
        ensure_parent_dir(target).await.map_err(|e| clone_failed(format!("{e:#}")))?;

        let repo = GitRepo::new(target).with_timeout(self.timeout).with_context(&entry.name);
        repo.clone_remote(&entry.repository).await.map_err(|e| into_typed(e, clone_failed))?;

        if let Err(e) = repo.checkout(revision).await {
            let err = into_typed(e, |reason| GitLinkError::CheckoutFailed {
                reference: revision.to_string(),
                reason,
            });
            if let Err(cleanup) = remove_path(target).await {
                tracing::warn!(
                    target: "gitlink::resolver",
                    "{}: failed to remove partial clone at {}: {cleanup:#}",
                    entry.name,
                    target.display()
                );
            }
            return Err(err);
        }

        self.reporter.step(format!(
            "{}{} : {}{}",
            "Cloning & checkout of ".magenta(),
            entry.name.yellow(),
            revision.yellow(),
            " successful".magenta()
        ));

        let metadata = target.join(GIT_METADATA_DIR);
        remove_path(&metadata).await.map_err(|e| GitLinkError::MetadataStripFailed {
            path: metadata.display().to_string(),
            reason: format!("{e:#}"),
        })?;

        self.reporter.step(format!(
            "{}{}{}",
            "Prepping of cloned package: ".magenta(),
            entry.name.yellow(),
            " successful".magenta()
        ));
        Ok(revision.to_string())
    }
}
