//! Command-line interface for GitLink.
//!
//! ```bash
//! # Link or clone every entry of ./git.link.json
//! gitlink
//!
//! # Same, with an explicit manifest and project root
//! gitlink --config deps/git.link.json --root /work/app resolve
//!
//! # Report what would happen without touching the disk
//! gitlink validate
//! ```
//!
//! Runtime settings derived from the flags are collected in [`CliConfig`] so
//! the execution path can be driven from tests without re-parsing arguments.


use crate::constants::{CONFIG_ENV_VAR, DEFAULT_MANIFEST_PATH};
use crate::core::GitLinkError;
use crate::git::ensure_git_available;
use crate::manifest::Manifest;
use crate::resolver::{ResolveContext, ResolveSummary, Resolver};
use crate::utils::fs::can_create_links;
use crate::utils::{StatusReporter, resolve_against};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Runtime configuration for one CLI invocation.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset
    pub log_level: &'static str,
    /// Colored status output
    pub color: bool,
    /// Suppress non-failure status lines
    pub quiet: bool,
    /// Timeout applied to each git invocation
    pub git_timeout: Option<Duration>,
    /// Base for relative manifest and entry paths
    pub project_root: PathBuf,
    /// Manifest location, relative to `project_root` unless absolute
    pub manifest_path: PathBuf,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "warn",
            color: true,
            quiet: false,
            git_timeout: None,
            project_root: PathBuf::from("."),
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_PATH),
        }
    }
}

impl CliConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Absolute manifest path.
    #[must_use]
    pub fn manifest_file(&self) -> PathBuf {
        resolve_against(&self.project_root, &self.manifest_path)
    }

    /// Status reporter honoring `quiet`.
    #[must_use]
    pub const fn reporter(&self) -> StatusReporter {
        StatusReporter::new(self.quiet)
    }

    /// Install the `tracing` subscriber and the color override.
    ///
    /// `RUST_LOG` takes precedence over `log_level`. Calling this twice is
    /// harmless; the second subscriber is ignored.
    pub fn apply(&self) {
        if !self.color {
            colored::control::set_override(false);
        }

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.log_level));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// GitLink: link local working copies or clone pinned Git packages.
#[derive(Parser, Debug)]
#[command(
    name = "gitlink",
    about = "Link local working copies or clone pinned Git packages from a JSON manifest",
    version,
    long_about = "GitLink materializes every entry of a git.link.json manifest under its target \
                  path, either as a link to a validated local working copy or as a fresh clone \
                  of the repository at the pinned branch or tag with its .git directory removed."
)]
pub struct Cli {
    /// What to do (defaults to `resolve`)
    #[command(subcommand)]
    command: Option<Commands>,

    /// Manifest path, relative to the project root
    #[arg(
        short,
        long,
        global = true,
        env = CONFIG_ENV_VAR,
        default_value = DEFAULT_MANIFEST_PATH
    )]
    config: PathBuf,

    /// Project root for relative paths [default: current directory]
    #[arg(short = 'C', long, global = true)]
    root: Option<PathBuf>,

    /// Timeout in seconds for each git invocation
    #[arg(long, global = true, value_name = "SECS")]
    git_timeout: Option<u64>,

    /// Debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Link or clone every manifest entry
    Resolve,
    /// Report, per entry, whether the local link would be used; writes nothing
    Validate,
}

impl Cli {
    /// Run the parsed command and return the process exit code.
    ///
    /// # Errors
    ///
    /// Process-level failures only: git missing, links unsupported, manifest
    /// unreadable. Per-entry failures are reflected in the exit code.
    pub async fn execute(self) -> Result<i32> {
        let config = self.build_config()?;
        self.execute_with_config(config).await
    }

    /// Translate flags into a [`CliConfig`].
    ///
    /// # Errors
    ///
    /// Fails if no root is given and the current directory cannot be read.
    pub fn build_config(&self) -> Result<CliConfig> {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };

        let project_root = match &self.root {
            Some(root) => root.clone(),
            None => std::env::current_dir().context("Failed to read the current directory")?,
        };

        Ok(CliConfig {
            log_level,
            color: !self.no_color,
            quiet: self.quiet,
            git_timeout: self.git_timeout.map(Duration::from_secs),
            project_root,
            manifest_path: self.config.clone(),
        })
    }

    /// Run with an explicit configuration.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn execute_with_config(self, config: CliConfig) -> Result<i32> {
        config.apply();
        let command = self.command.unwrap_or(Commands::Resolve);
        tracing::debug!("Running {command:?} with root {}", config.project_root.display());

        ensure_git_available().await?;
        if command == Commands::Resolve && !can_create_links() {
            return Err(GitLinkError::LinksUnsupported.into());
        }

        let manifest = Manifest::load(&config.manifest_file()).await?;
        let reporter = config.reporter();
        let ctx = ResolveContext::new(&config.project_root)
            .with_git_timeout(config.git_timeout)
            .with_reporter(reporter);
        let resolver = Resolver::new(ctx);

        reporter.banner();
        match command {
            Commands::Resolve => {
                let outcomes = resolver.resolve(&manifest).await;
                let summary = ResolveSummary::from_outcomes(&outcomes);
                summary.report(&reporter);
                Ok(summary.exit_code())
            }
            Commands::Validate => {
                let outcomes = resolver.validate(&manifest).await;
                let linkable = outcomes.iter().filter(|o| o.would_link()).count();
                reporter.step(format!(
                    "{linkable} of {} package(s) would be linked",
                    outcomes.len()
                ));
                Ok(0)
            }
        }
    }
}
