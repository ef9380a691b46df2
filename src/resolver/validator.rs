//! Link eligibility checks for a manifest entry.
//!
//! [`LinkValidator::validate`] walks the checks in a fixed order and stops at
//! the first failure:
//!
//! 1. linking not configured: [`Validation::NotConfigured`], not an error
//! 2. `localLinkPath` is not a string: [`GitLinkError::InvalidConfig`]
//! 3. both `branch` and `tag` set, or a `name` that is not a single directory
//!    name: [`GitLinkError::InvalidConfig`]
//! 4. local path missing: [`GitLinkError::PathNotFound`]
//! 5. no readable remote: [`GitLinkError::NotAGitRepository`]
//! 6. remote differs from `repository`: [`GitLinkError::RemoteMismatch`]
//! 7. no revision constraint: eligible
//! 8. checked-out label differs from `branch || tag`: [`GitLinkError::RevisionMismatch`]
//!
//! Checks 1-3 only read the entry, so a malformed entry is rejected the same
//! way whatever the state of the disk. Nothing here writes.

use crate::core::GitLinkError;
use crate::git::RepoInspector;
use crate::manifest::{LocalLink, ManifestEntry};
use crate::utils::StatusReporter;
use crate::utils::fs::path_exists;
use crate::utils::platform::resolve_against;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Absolute endpoints of a link that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLink {
    /// The local working copy
    pub source: PathBuf,
    /// Where the link goes (`targetPath/name`)
    pub target: PathBuf,
}

/// Successful validation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// The entry may be linked
    Eligible(ValidatedLink),
    /// The entry does not ask for a link; clone it without complaint
    NotConfigured,
}

impl Validation {
    /// Returns the link if the entry is eligible.
    #[must_use]
    pub const fn link(&self) -> Option<&ValidatedLink> {
        match self {
            Self::Eligible(link) => Some(link),
            Self::NotConfigured => None,
        }
    }
}

/// Decides whether an entry can use its local working copy.
pub struct LinkValidator<'a, I> {
    root: &'a Path,
    inspector: &'a I,
    reporter: StatusReporter,
}

impl<'a, I: RepoInspector> LinkValidator<'a, I> {
    /// Validator resolving relative paths against `root`.
    pub const fn new(root: &'a Path, inspector: &'a I, reporter: StatusReporter) -> Self {
        Self {
            root,
            inspector,
            reporter,
        }
    }

    /// Run every check against `entry`.
    ///
    /// # Errors
    ///
    /// The first failed check, as one of the entry-level [`GitLinkError`] variants.
    pub async fn validate(&self, entry: &ManifestEntry) -> Result<Validation, GitLinkError> {
        let local_path = match entry.local_link() {
            LocalLink::NotConfigured {
                missing_path,
            } => {
                if missing_path {
                    self.reporter.warn(format!(
                        "{}{}{}",
                        "GitLink configuration for: ".yellow(),
                        entry.name.green(),
                        " has 'useLocalLink' value but no 'localLinkPath' defined.".yellow()
                    ));
                }
                tracing::debug!(target: "gitlink::resolver", "{}: local link not configured", entry.name);
                return Ok(Validation::NotConfigured);
            }
            LocalLink::NotAString(kind) => {
                return Err(GitLinkError::InvalidConfig {
                    name: entry.name.clone(),
                    reason: format!("'localLinkPath' must be a string, found {kind}"),
                });
            }
            LocalLink::Path(path) => path,
        };

        if entry.has_conflicting_revisions() {
            return Err(GitLinkError::InvalidConfig {
                name: entry.name.clone(),
                reason: "both 'tag' and 'branch' are defined, only a single id is allowed".to_string(),
            });
        }

        let target = entry.target_dir(self.root)?;

        self.reporter.step(format!(
            "{}{}",
            "Attempting to create symlink for git package: ".blue(),
            entry.name.green()
        ));

        let source = resolve_against(self.root, local_path);
        if !path_exists(&source).await {
            return Err(GitLinkError::PathNotFound {
                name: entry.name.clone(),
                path: source.display().to_string(),
            });
        }

        let remote = self.inspector.remote_url(&source).await?;
        if strip_whitespace(&remote) != strip_whitespace(&entry.repository) {
            return Err(GitLinkError::RemoteMismatch {
                name: entry.name.clone(),
                expected: entry.repository.clone(),
                actual: remote.trim().to_string(),
            });
        }

        let Some(version_id) = entry.version_id() else {
            return Ok(Validation::Eligible(ValidatedLink {
                source,
                target,
            }));
        };

        let revision = self.inspector.current_revision(&source).await?;
        if revision.detached {
            self.reporter.warn(format!(
                "{}{}{}{}",
                "Warning local GitLink repo: ".yellow(),
                entry.repository.green(),
                " HEAD is detached with label: ".yellow(),
                revision.name.green()
            ));
        }

        if revision.name != version_id {
            return Err(GitLinkError::RevisionMismatch {
                name: entry.name.clone(),
                expected: version_id.to_string(),
                actual: revision.name,
            });
        }

        self.reporter.step(format!(
            "{}{}{}{}",
            "Branch match found: ".blue(),
            revision.name.green(),
            " for GitLink: ".blue(),
            entry.name.green()
        ));
        Ok(Validation::Eligible(ValidatedLink {
            source,
            target,
        }))
    }
}

/// Removes every whitespace character; the only normalization applied to URLs.
fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}
