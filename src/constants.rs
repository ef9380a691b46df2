//! Global constants used throughout the GitLink codebase.

/// Manifest path used when `--config` is not given, relative to the project root.
pub const DEFAULT_MANIFEST_PATH: &str = "./git.link.json";

/// Revision checked out in a fresh clone when the entry names neither branch nor tag.
pub const DEFAULT_REVISION: &str = "master";

/// Version-control metadata directory stripped from fresh clones.
pub const GIT_METADATA_DIR: &str = ".git";

/// Remote whose URL identifies a local working copy.
pub const ORIGIN_REMOTE: &str = "origin";

/// Environment variable that may point at the manifest instead of `--config`.
pub const CONFIG_ENV_VAR: &str = "GITLINK_CONFIG";
