//! GitLink - link local working copies or clone pinned Git packages
//!
//! GitLink reads a JSON manifest (`git.link.json`) of named packages and
//! materializes each one at `targetPath/name`:
//!
//! - as a **link** to a local working copy, when linking is enabled for the entry
//!   and the copy's `origin` URL and checked-out branch or tag match the manifest
//! - otherwise as a **fresh clone** of `repository` at `branch || tag || "master"`,
//!   with its `.git` directory removed
//!
//! Whatever already exists at the target is removed first. Entries resolve
//! concurrently and independently; the run's exit status is non-zero if any
//! entry could be neither linked nor cloned.
//!
//! # Manifest Format
//!
//! ```json
//! {
//!   "lib-a": {
//!     "name": "lib-a",
//!     "repository": "git@host:org/lib-a.git",
//!     "branch": "main",
//!     "options": { "useLocalLink": true },
//!     "paths": { "localLinkPath": "../lib-a", "targetPath": "./packages" }
//!   },
//!   "lib-b": {
//!     "name": "lib-b",
//!     "repository": "git@host:org/lib-b.git",
//!     "tag": "v1.2.0",
//!     "paths": { "targetPath": "./packages" }
//!   }
//! }
//! ```
//!
//! # Modules
//!
//! - [`cli`] - argument parsing and the top-level run
//! - [`core`] - [`GitLinkError`](core::GitLinkError) and user-facing error display
//! - [`git`] - async wrapper over the system git binary
//! - [`manifest`] - manifest parsing
//! - [`resolver`] - link validation and the per-entry state machine
//! - [`installer`] - link creation and cloning
//! - [`utils`] - filesystem primitives, platform helpers, status output

pub mod cli;
pub mod constants;
pub mod core;
pub mod git;
pub mod installer;
pub mod manifest;
pub mod resolver;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
