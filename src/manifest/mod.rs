//! Manifest parsing for GitLink (`git.link.json`)
//!
//! The manifest is a JSON object mapping a package key to its entry:
//!
//! ```json
//! {
//!   "lib-a": {
//!     "name": "lib-a",
//!     "repository": "git@host:org/lib-a.git",
//!     "branch": "main",
//!     "options": { "useLocalLink": true },
//!     "paths": { "localLinkPath": "../lib-a", "targetPath": "./packages" }
//!   }
//! }
//! ```
//!
//! Each entry resolves to exactly one path, `targetPath/name`, either as a link
//! to `localLinkPath` or as a fresh clone of `repository`.
//!
//! # Field rules
//!
//! - `name` defaults to the entry key when absent or empty
//! - `branch` and `tag` are mutually exclusive; empty strings count as unset
//! - linking is attempted only when `options.useLocalLink` is true and
//!   `paths.localLinkPath` is a non-empty string; `localLinkPath` is kept as raw
//!   JSON so a number or object can be reported instead of rejected at parse time
//! - `name` must be a single plain directory name; `..`, absolute paths and
//!   separators are rejected before anything is deleted
//! - relative paths resolve against the project root, never the process cwd


use crate::constants::DEFAULT_REVISION;
use crate::core::GitLinkError;
use crate::utils::platform::resolve_against;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// All entries of one manifest, keyed and ordered by entry key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: BTreeMap<String, ManifestEntry>,
}

/// One declared package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    /// Directory name under `targetPath`
    #[serde(default)]
    pub name: String,

    /// Canonical remote URL; the identity a local copy must match
    pub repository: String,

    /// Required branch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    /// Required tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Link behaviour switches
    #[serde(default)]
    pub options: EntryOptions,

    /// Where the package comes from and goes to
    pub paths: EntryPaths,
}

/// `options` block of an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryOptions {
    /// Prefer linking a local working copy over cloning
    #[serde(default)]
    pub use_local_link: bool,
}

/// `paths` block of an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPaths {
    /// Candidate local working copy, raw so non-string values can be reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_link_path: Option<serde_json::Value>,

    /// Directory the package is materialized under
    pub target_path: String,
}

/// How an entry's `localLinkPath` reads once `useLocalLink` is considered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalLink<'a> {
    /// Linking is off, or on without a usable path (`missing_path` is then true)
    NotConfigured {
        /// `useLocalLink` was true but no path was given
        missing_path: bool,
    },
    /// A path is present but is not a string; carries the JSON type name
    NotAString(&'static str),
    /// Linking is configured with this path
    Path(&'a str),
}

impl Manifest {
    /// Load the manifest at `path`.
    ///
    /// # Errors
    ///
    /// - [`GitLinkError::ManifestNotFound`] if nothing exists at `path`
    /// - [`GitLinkError::ManifestParseError`] if the file is not a valid manifest
    /// - [`GitLinkError::IoError`] for any other read failure
    pub async fn load(path: &Path) -> Result<Self> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(GitLinkError::ManifestNotFound {
                    path: path.display().to_string(),
                }
                .into());
            }
            Err(e) => return Err(GitLinkError::IoError(e).into()),
        };

        let manifest = Self::from_json_str(&content).map_err(|e| GitLinkError::ManifestParseError {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;
        tracing::debug!("Loaded {} manifest entries from {}", manifest.len(), path.display());
        Ok(manifest)
    }

    /// Parse manifest JSON, filling each missing `name` from its key.
    pub fn from_json_str(content: &str) -> serde_json::Result<Self> {
        let mut manifest: Self = serde_json::from_str(content)?;
        for (key, entry) in &mut manifest.entries {
            if entry.name.trim().is_empty() {
                entry.name.clone_from(key);
            }
        }
        Ok(manifest)
    }

    /// Adds or replaces an entry.
    pub fn insert(&mut self, key: impl Into<String>, entry: ManifestEntry) {
        self.entries.insert(key.into(), entry);
    }

    /// Entries in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&String, &ManifestEntry)> {
        self.entries.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the manifest declares nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

impl ManifestEntry {
    /// Entry for `repository` materialized under `target_path`, with no
    /// revision constraint and linking off.
    pub fn new(
        name: impl Into<String>,
        repository: impl Into<String>,
        target_path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            repository: repository.into(),
            paths: EntryPaths {
                local_link_path: None,
                target_path: target_path.into(),
            },
            ..Self::default()
        }
    }

    /// Requires `branch`.
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Requires `tag`.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Turns linking on with `path` as the local working copy.
    #[must_use]
    pub fn with_local_link(mut self, path: impl Into<String>) -> Self {
        self.options.use_local_link = true;
        self.paths.local_link_path = Some(serde_json::Value::String(path.into()));
        self
    }

    /// The branch, if set and non-empty.
    #[must_use]
    pub fn branch(&self) -> Option<&str> {
        non_empty(self.branch.as_ref())
    }

    /// The tag, if set and non-empty.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        non_empty(self.tag.as_ref())
    }

    /// Both `branch` and `tag` are set, which is a configuration error.
    #[must_use]
    pub fn has_conflicting_revisions(&self) -> bool {
        self.branch().is_some() && self.tag().is_some()
    }

    /// Revision a local copy must have checked out: `branch || tag`.
    #[must_use]
    pub fn version_id(&self) -> Option<&str> {
        self.branch().or_else(|| self.tag())
    }

    /// Revision a fresh clone checks out: `branch || tag || "master"`.
    #[must_use]
    pub fn clone_revision(&self) -> &str {
        self.version_id().unwrap_or(DEFAULT_REVISION)
    }

    /// Classify the local-link configuration.
    #[must_use]
    pub fn local_link(&self) -> LocalLink<'_> {
        use serde_json::Value;

        let use_link = self.options.use_local_link;
        match &self.paths.local_link_path {
            None | Some(Value::Null) => LocalLink::NotConfigured {
                missing_path: use_link,
            },
            Some(Value::String(s)) if s.is_empty() => LocalLink::NotConfigured {
                missing_path: use_link,
            },
            _ if !use_link => LocalLink::NotConfigured {
                missing_path: false,
            },
            Some(Value::String(s)) => LocalLink::Path(s),
            Some(Value::Bool(_)) => LocalLink::NotAString("boolean"),
            Some(Value::Number(_)) => LocalLink::NotAString("number"),
            Some(Value::Array(_)) => LocalLink::NotAString("array"),
            Some(Value::Object(_)) => LocalLink::NotAString("object"),
        }
    }

    /// `targetPath/name` resolved against `root`.
    ///
    /// # Errors
    ///
    /// [`GitLinkError::InvalidConfig`] unless `name` is a single plain path
    /// component. Anything else (empty, `.`, `..`, absolute, containing a
    /// separator) would put the package somewhere other than directly under
    /// `targetPath`, and the target is deleted before it is written.
    pub fn target_dir(&self, root: &Path) -> Result<PathBuf, GitLinkError> {
        let mut components = Path::new(&self.name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => {
                return Err(GitLinkError::InvalidConfig {
                    name: self.name.clone(),
                    reason: "'name' must be a single directory name without path separators"
                        .to_string(),
                });
            }
        }
        Ok(resolve_against(root, &self.paths.target_path).join(&self.name))
    }
}
