//! Per-entry resolution: link the local working copy, or clone.
//!
//! Every manifest entry runs the same small state machine:
//!
//! ```text
//! Start -> ValidatingLink -> LinkCreated
//!                        \-> CloningFallback -> Cloned | Failed
//! ```
//!
//! Any validation rejection, [`Validation::NotConfigured`] included, moves the
//! entry to the clone path. A link that fails after validation succeeded also
//! falls back to cloning. Clone failures are final for that entry.
//!
//! All entries run concurrently on the current task via
//! [`futures::future::join_all`]; they share no mutable state and one entry's
//! failure never affects another. [`Resolver::resolve`] returns only once every
//! entry has finished.

pub mod validator;

pub use validator::{LinkValidator, ValidatedLink, Validation};

use crate::core::GitLinkError;
use crate::git::{GitInspector, RepoInspector};
use crate::installer::{DirLinker, LinkCreator, RepoCloner};
use crate::manifest::{Manifest, ManifestEntry};
use crate::utils::StatusReporter;
use colored::Colorize;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Values every component of a run needs.
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// Base for relative `localLinkPath` and `targetPath` values
    pub project_root: PathBuf,
    /// Per git invocation; `None` waits indefinitely
    pub git_timeout: Option<Duration>,
    /// Status line sink
    pub reporter: StatusReporter,
}

impl ResolveContext {
    /// Context rooted at `project_root`, no git timeout, status lines on.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            git_timeout: None,
            reporter: StatusReporter::default(),
        }
    }

    /// Sets the git timeout.
    #[must_use]
    pub const fn with_git_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.git_timeout = timeout;
        self
    }

    /// Sets the status reporter.
    #[must_use]
    pub const fn with_reporter(mut self, reporter: StatusReporter) -> Self {
        self.reporter = reporter;
        self
    }
}

/// How an entry ended up.
#[derive(Debug)]
pub enum Resolution {
    /// `targetPath/name` links to this local working copy
    Linked {
        /// Absolute path of the working copy
        source: PathBuf,
    },
    /// `targetPath/name` is a fresh clone at this revision
    Cloned {
        /// Branch, tag or the default revision
        revision: String,
    },
    /// Nothing usable was produced
    Failed(GitLinkError),
}

/// Result of resolving one manifest entry.
#[derive(Debug)]
pub struct EntryOutcome {
    /// Manifest key
    pub key: String,
    /// Entry name
    pub name: String,
    /// `targetPath/name`, absent when `name` cannot be placed there
    pub target: Option<PathBuf>,
    /// Final state
    pub resolution: Resolution,
    /// Why the link path was not taken, if it was configured and rejected
    pub rejection: Option<GitLinkError>,
}

impl EntryOutcome {
    /// Returns true unless the entry failed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self.resolution, Resolution::Failed(_))
    }
}

/// Dry-run verdict for one entry.
#[derive(Debug)]
pub struct ValidationOutcome {
    /// Manifest key
    pub key: String,
    /// Entry name
    pub name: String,
    /// What [`LinkValidator`] decided
    pub result: Result<Validation, GitLinkError>,
}

impl ValidationOutcome {
    /// Returns true if `resolve` would link this entry.
    #[must_use]
    pub fn would_link(&self) -> bool {
        matches!(self.result, Ok(Validation::Eligible(_)))
    }
}

/// Counts over a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveSummary {
    /// Entries linked to a local copy
    pub linked: usize,
    /// Entries cloned
    pub cloned: usize,
    /// Entries that produced nothing
    pub failed: usize,
}

impl ResolveSummary {
    /// Tally `outcomes`.
    #[must_use]
    pub fn from_outcomes(outcomes: &[EntryOutcome]) -> Self {
        outcomes.iter().fold(Self::default(), |mut summary, outcome| {
            match outcome.resolution {
                Resolution::Linked { .. } => summary.linked += 1,
                Resolution::Cloned { .. } => summary.cloned += 1,
                Resolution::Failed(_) => summary.failed += 1,
            }
            summary
        })
    }

    /// Total number of entries.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.linked + self.cloned + self.failed
    }

    /// Returns true if no entry failed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Process exit status for the run.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }

    /// Print the closing status line.
    pub fn report(&self, reporter: &StatusReporter) {
        let line = format!(
            "Resolved {} package(s): {} linked, {} cloned, {} failed",
            self.total(),
            self.linked,
            self.cloned,
            self.failed
        );
        if self.is_success() {
            reporter.step(line.blue().to_string());
        } else {
            reporter.fail(line.red().to_string());
        }
    }
}

/// Drives every manifest entry to a [`Resolution`].
pub struct Resolver<I = GitInspector, L = LinkCreator> {
    ctx: ResolveContext,
    inspector: I,
    linker: L,
    cloner: RepoCloner,
}

impl Resolver<GitInspector> {
    /// Resolver inspecting local copies through the git CLI.
    #[must_use]
    pub fn new(ctx: ResolveContext) -> Self {
        let inspector = GitInspector::new(ctx.git_timeout);
        Self::with_inspector(ctx, inspector)
    }
}

impl<I: RepoInspector> Resolver<I> {
    /// Resolver using `inspector` for link validation.
    pub fn with_inspector(ctx: ResolveContext, inspector: I) -> Self {
        let cloner = RepoCloner::new(ctx.git_timeout, ctx.reporter);
        Self {
            ctx,
            inspector,
            linker: LinkCreator::new(),
            cloner,
        }
    }
}

impl<I: RepoInspector, L: DirLinker> Resolver<I, L> {
    /// Swap the link strategy.
    pub fn with_linker<M: DirLinker>(self, linker: M) -> Resolver<I, M> {
        Resolver {
            ctx: self.ctx,
            inspector: self.inspector,
            linker,
            cloner: self.cloner,
        }
    }

    /// Resolve every entry concurrently, returning outcomes in key order.
    pub async fn resolve(&self, manifest: &Manifest) -> Vec<EntryOutcome> {
        tracing::debug!(target: "gitlink::resolver", "Resolving {} entries", manifest.len());
        join_all(manifest.entries().map(|(key, entry)| self.resolve_entry(key, entry))).await
    }

    /// Validate every entry without touching the filesystem.
    pub async fn validate(&self, manifest: &Manifest) -> Vec<ValidationOutcome> {
        join_all(manifest.entries().map(|(key, entry)| async move {
            let result = match entry.target_dir(self.root()) {
                Ok(_) => self.validator().validate(entry).await,
                Err(e) => Err(e),
            };
            self.report_validation(&entry.name, &result);
            ValidationOutcome {
                key: key.clone(),
                name: entry.name.clone(),
                result,
            }
        }))
        .await
    }

    fn validator(&self) -> LinkValidator<'_, I> {
        LinkValidator::new(&self.ctx.project_root, &self.inspector, self.ctx.reporter)
    }

    fn root(&self) -> &Path {
        &self.ctx.project_root
    }

    async fn resolve_entry(&self, key: &str, entry: &ManifestEntry) -> EntryOutcome {
        let reporter = &self.ctx.reporter;
        let outcome = |target: Option<PathBuf>,
                       resolution: Resolution,
                       rejection: Option<GitLinkError>| EntryOutcome {
            key: key.to_string(),
            name: entry.name.clone(),
            target,
            resolution,
            rejection,
        };

        // Nothing is deleted unless the target sits directly under targetPath
        let target = match entry.target_dir(self.root()) {
            Ok(target) => target,
            Err(e) => {
                self.report_failure(&entry.name, &e);
                return outcome(None, Resolution::Failed(e), None);
            }
        };

        tracing::debug!(target: "gitlink::resolver", "{}: validating link", entry.name);
        let rejection = match self.validator().validate(entry).await {
            Ok(Validation::Eligible(link)) => match self.linker.create(&entry.name, &link).await {
                Ok(()) => {
                    reporter.step(format!(
                        "{}{}{}{}{}",
                        "Linking of package: ".blue(),
                        entry.name.green(),
                        " from ".blue(),
                        link.source.display().to_string().green(),
                        " successful".blue()
                    ));
                    return outcome(
                        Some(target),
                        Resolution::Linked {
                            source: link.source,
                        },
                        None,
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        target: "gitlink::resolver",
                        "{}: link failed, cloning instead: {e}",
                        entry.name
                    );
                    reporter.fail(e.to_string().red().to_string());
                    Some(e)
                }
            },
            Ok(Validation::NotConfigured) => None,
            Err(e) => {
                reporter.fail(e.to_string().red().to_string());
                Some(e)
            }
        };

        tracing::debug!(target: "gitlink::resolver", "{}: cloning {}", entry.name, entry.repository);
        let resolution = match self.cloner.clone_entry(entry, &target).await {
            Ok(revision) => Resolution::Cloned {
                revision,
            },
            Err(e) => {
                self.report_failure(&entry.name, &e);
                Resolution::Failed(e)
            }
        };
        outcome(Some(target), resolution, rejection)
    }

    fn report_failure(&self, name: &str, e: &GitLinkError) {
        tracing::warn!(target: "gitlink::resolver", kind = e.kind(), "{name}: unresolved");
        let reporter = &self.ctx.reporter;
        reporter.fail(format!(
            "{}{}{}{}",
            "Failed to resolve package: ".red(),
            name.yellow(),
            ": ".red(),
            e.to_string().red()
        ));
        if let Some(reason) = e.reason().filter(|r| !r.is_empty()) {
            reporter.fail(format!("  {reason}"));
        }
    }

    fn report_validation(&self, name: &str, result: &Result<Validation, GitLinkError>) {
        let reporter = &self.ctx.reporter;
        match result {
            Ok(Validation::Eligible(link)) => reporter.step(format!(
                "{}{}{}{}",
                "Package ".blue(),
                name.green(),
                " would link to ".blue(),
                link.source.display().to_string().green()
            )),
            Ok(Validation::NotConfigured) => reporter.step(format!(
                "{}{}{}",
                "Package ".blue(),
                name.green(),
                " would be cloned (local link not configured)".blue()
            )),
            Err(e) => reporter.warn(format!(
                "{}{}{}{}",
                "Package ".yellow(),
                name.green(),
                " would be cloned: ".yellow(),
                e.to_string().red()
            )),
        }
    }
}
