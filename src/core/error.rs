//! Error handling for GitLink
//!
//! Two layers, as everywhere in the crate:
//! 1. [`GitLinkError`] - strongly-typed failure kinds, one per thing that can go wrong
//!    while resolving a manifest entry, plus the few process-level failures
//! 2. [`ErrorContext`] - a display wrapper adding details and an actionable suggestion
//!
//! Per-entry failures (`InvalidConfig` through `MetadataStripFailed`) are never fatal to
//! the run: the resolver records them in the entry outcome and moves on. The remaining
//! variants abort the process before any entry is touched and are shown to the user via
//! [`user_friendly_error`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use gitlink_cli::core::{GitLinkError, user_friendly_error};
//!
//! let err = anyhow::Error::from(GitLinkError::LinksUnsupported);
//! user_friendly_error(err).display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for GitLink operations.
///
/// # Entry errors
///
/// - [`InvalidConfig`](Self::InvalidConfig) - the manifest entry itself is malformed
/// - [`PathNotFound`](Self::PathNotFound) - `localLinkPath` does not exist
/// - [`NotAGitRepository`](Self::NotAGitRepository) - no remote URL can be read
/// - [`RemoteMismatch`](Self::RemoteMismatch) / [`RevisionMismatch`](Self::RevisionMismatch)
///   - the local copy tracks something other than what the manifest asks for
/// - [`LinkCreationFailed`](Self::LinkCreationFailed) - the link primitive was rejected
/// - [`CloneFailed`](Self::CloneFailed), [`CheckoutFailed`](Self::CheckoutFailed),
///   [`MetadataStripFailed`](Self::MetadataStripFailed) - the clone pipeline broke
///
/// # Process errors
///
/// - [`ManifestNotFound`](Self::ManifestNotFound), [`ManifestParseError`](Self::ManifestParseError)
/// - [`LinksUnsupported`](Self::LinksUnsupported)
/// - [`GitNotFound`](Self::GitNotFound)
#[derive(Error, Debug)]
pub enum GitLinkError {
    /// Manifest entry is malformed (e.g. both `branch` and `tag`, non-string path)
    #[error("Invalid configuration for '{name}': {reason}")]
    InvalidConfig {
        /// Entry name
        name: String,
        /// What is wrong with the entry
        reason: String,
    },

    /// The local link path does not exist
    #[error("Local link path for '{name}' cannot be reached or doesn't exist: {path}")]
    PathNotFound {
        /// Entry name
        name: String,
        /// Absolute path that was checked
        path: String,
    },

    /// No remote URL could be retrieved from the directory
    #[error("No remote git repository found at {path}")]
    NotAGitRepository {
        /// Directory that was inspected
        path: String,
        /// Underlying git failure
        reason: String,
    },

    /// The local copy's remote differs from the manifest's repository
    #[error("Remote URL {actual} does not match {expected} for '{name}'")]
    RemoteMismatch {
        /// Entry name
        name: String,
        /// `repository` from the manifest
        expected: String,
        /// URL reported by the local copy
        actual: String,
    },

    /// The local copy is checked out at a different branch or tag
    #[error("Local branch {actual} does not match {expected} in config for '{name}'")]
    RevisionMismatch {
        /// Entry name
        name: String,
        /// Branch or tag from the manifest
        expected: String,
        /// Label reported by the local copy
        actual: String,
    },

    /// Creating the directory link failed
    #[error("Failed to link '{name}' at {path}: {reason}")]
    LinkCreationFailed {
        /// Entry name
        name: String,
        /// Link location (`targetPath/name`)
        path: String,
        /// Underlying filesystem failure
        reason: String,
    },

    /// `git clone` failed
    #[error("Failed to clone repository: {url}")]
    CloneFailed {
        /// Remote URL
        url: String,
        /// Error output from git
        reason: String,
    },

    /// `git checkout` failed inside a fresh clone
    #[error("Failed to checkout reference '{reference}' in repository")]
    CheckoutFailed {
        /// Branch, tag or commit
        reference: String,
        /// Error output from git
        reason: String,
    },

    /// Removing `.git` from a fresh clone failed
    #[error("Failed to strip git metadata from {path}")]
    MetadataStripFailed {
        /// Clone location
        path: String,
        /// Underlying filesystem failure
        reason: String,
    },

    /// Manifest file not found
    #[error("No file found at: {path}")]
    ManifestNotFound {
        /// Absolute manifest path
        path: String,
    },

    /// Manifest file is not valid JSON or has the wrong shape
    #[error("Invalid manifest file syntax in {file}")]
    ManifestParseError {
        /// Manifest path
        file: String,
        /// Parser message
        reason: String,
    },

    /// The environment refuses to create filesystem links
    #[error("GitLink is unable to create symlinks in the current environment")]
    LinksUnsupported,

    /// Git executable not available
    #[error("Git is not installed or not found in PATH")]
    GitNotFound,

    /// Any other git invocation failure
    #[error("Git operation failed: {operation}")]
    GitCommandError {
        /// First git argument (`remote`, `symbolic-ref`, ...)
        operation: String,
        /// Error output from git
        stderr: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl GitLinkError {
    /// Short machine-stable name of the error kind, used in status lines and tests.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "InvalidConfig",
            Self::PathNotFound { .. } => "PathNotFound",
            Self::NotAGitRepository { .. } => "NotAGitRepository",
            Self::RemoteMismatch { .. } => "RemoteMismatch",
            Self::RevisionMismatch { .. } => "RevisionMismatch",
            Self::LinkCreationFailed { .. } => "LinkCreationFailed",
            Self::CloneFailed { .. } => "CloneFailed",
            Self::CheckoutFailed { .. } => "CheckoutFailed",
            Self::MetadataStripFailed { .. } => "MetadataStripFailed",
            Self::ManifestNotFound { .. } => "ManifestNotFound",
            Self::ManifestParseError { .. } => "ManifestParseError",
            Self::LinksUnsupported => "LinksUnsupported",
            Self::GitNotFound => "GitNotFound",
            Self::GitCommandError { .. } => "GitCommandError",
            Self::IoError(_) => "IoError",
            Self::Other { .. } => "Other",
        }
    }

    /// Extra line shown under the entry status, if the variant carries git output
    /// or a filesystem reason worth surfacing.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::InvalidConfig { reason, .. }
            | Self::NotAGitRepository { reason, .. }
            | Self::LinkCreationFailed { reason, .. }
            | Self::CloneFailed { reason, .. }
            | Self::CheckoutFailed { reason, .. }
            | Self::MetadataStripFailed { reason, .. }
            | Self::ManifestParseError { reason, .. } => Some(reason.trim()),
            Self::GitCommandError { stderr, .. } => Some(stderr.trim()),
            _ => None,
        }
    }
}

/// Error wrapper carrying a suggestion and details for terminal display.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: GitLinkError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: GitLinkError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error (printed in green).
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error (printed in yellow).
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error context to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "GitLink Error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with a tailored suggestion.
///
/// Typed [`GitLinkError`]s get variant-specific help; [`std::io::Error`] and
/// [`serde_json::Error`] are mapped onto the closest variant; everything else
/// becomes [`GitLinkError::Other`] with the full cause chain appended.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let error = match error.downcast::<GitLinkError>() {
        Ok(gitlink_error) => return create_error_context(gitlink_error),
        Err(error) => error,
    };

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::PermissionDenied {
            return ErrorContext::new(GitLinkError::Other {
                message: format!("Permission denied: {io_error}"),
            })
            .with_suggestion("Check ownership of the project root and target paths");
        }
    }

    if let Some(json_error) = error.downcast_ref::<serde_json::Error>() {
        return create_error_context(GitLinkError::ManifestParseError {
            file: "git.link.json".to_string(),
            reason: json_error.to_string(),
        });
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(GitLinkError::Other {
        message,
    })
}

fn create_error_context(error: GitLinkError) -> ErrorContext {
    match &error {
        GitLinkError::GitNotFound => ErrorContext::new(error)
            .with_suggestion("Install git from https://git-scm.com/ or your package manager (e.g., 'brew install git', 'apt install git')")
            .with_details("GitLink runs the system git binary to inspect local copies and clone packages"),

        GitLinkError::LinksUnsupported => ErrorContext::new(error)
            .with_suggestion("It is likely that User/System permissions must be changed to allow GitLink to continue")
            .with_details(if cfg!(windows) {
                "On Windows, enable Developer Mode or run from an elevated prompt to allow directory symlinks"
            } else {
                "The filesystem holding the temp directory rejected a test symlink"
            }),

        GitLinkError::ManifestNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Create a git.link.json file in the project root or pass --config <path>")
            .with_details("The manifest path is resolved relative to the project root (--root, default: current directory)"),

        GitLinkError::ManifestParseError { file, .. } => {
            let suggestion = format!(
                "Check the JSON syntax in {file}. The top level must be an object mapping package names to entries"
            );
            let details = error.reason().map(str::to_string);
            let ctx = ErrorContext::new(error).with_suggestion(suggestion);
            match details {
                Some(details) => ctx.with_details(details),
                None => ctx,
            }
        }

        GitLinkError::GitCommandError { operation, stderr } => {
            let details = format!("git {operation} failed: {}", stderr.trim());
            ErrorContext::new(error)
                .with_suggestion("Try running the git command manually for more details")
                .with_details(details)
        }

        _ => {
            let details = error.reason().map(str::to_string);
            let ctx = ErrorContext::new(error);
            match details {
                Some(details) if !details.is_empty() => ctx.with_details(details),
                _ => ctx,
            }
        }
    }
}
