//! Materializing a package at `targetPath/name`.
//!
//! Two strategies, both destructive towards whatever already sits at the
//! target:
//!
//! - [`LinkCreator`] (the production [`DirLinker`]) points the target at a validated local working copy
//! - [`RepoCloner`] replaces the target with a fresh clone at the pinned
//!   revision and strips its `.git` directory
//!
//! Neither strategy is transactional: a failure after the target was cleared
//! leaves nothing at the target.

mod clone;
mod link;

pub use clone::RepoCloner;
pub use link::LinkCreator;

use crate::core::GitLinkError;
use crate::resolver::ValidatedLink;
use async_trait::async_trait;

/// Puts a directory link at a validated target.
#[async_trait]
pub trait DirLinker: Send + Sync {
    /// Replace whatever is at `link.target` with a link to `link.source`.
    ///
    /// # Errors
    ///
    /// [`GitLinkError::LinkCreationFailed`]
    async fn create(&self, name: &str, link: &ValidatedLink) -> Result<(), GitLinkError>;
}

/// Recover the typed error carried by `err`, or build one with `fallback`.
fn into_typed(err: anyhow::Error, fallback: impl FnOnce(String) -> GitLinkError) -> GitLinkError {
    match err.downcast::<GitLinkError>() {
        Ok(typed) => typed,
        Err(other) => fallback(format!("{other:#}")),
    }
}
