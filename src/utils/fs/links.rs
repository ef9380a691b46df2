//! Directory link creation and the link capability check.

use anyhow::{Context, Result, bail};
use std::path::Path;
use tokio::fs;

/// Creates a directory link at `link` that resolves to `original`.
///
/// `link` must not exist; callers clear it with
/// [`remove_path`](super::remove_path) first.
pub async fn create_dir_link(original: &Path, link: &Path) -> Result<()> {
    tracing::debug!("Creating link from {:?} to {:?}", link, original);

    #[cfg(unix)]
    fs::symlink(original, link).await.context("Failed to create symlink")?;

    #[cfg(windows)]
    fs::symlink_dir(original, link).await.context("Failed to create directory symlink")?;

    if fs::symlink_metadata(link).await.is_err() {
        bail!(
            "Symlink creation reported success but link does not exist: link={:?} target={:?}",
            link,
            original
        );
    }
    Ok(())
}

/// Returns true if `path` itself is a link (not followed).
pub async fn is_link(path: &Path) -> bool {
    fs::symlink_metadata(path).await.map(|m| m.file_type().is_symlink()).unwrap_or(false)
}

/// Checks whether the current user may create directory links.
///
/// Creates a scratch directory and a link to it inside a fresh temp dir. Any
/// failure, including failing to create the temp dir, counts as "cannot link".
#[must_use]
pub fn can_create_links() -> bool {
    let Ok(scratch) = tempfile::Builder::new().prefix("gitlink-linkcheck").tempdir() else {
        return false;
    };
    let original = scratch.path().join("original");
    let link = scratch.path().join("link");

    if std::fs::create_dir(&original).is_err() {
        return false;
    }

    #[cfg(unix)]
    let created = std::os::unix::fs::symlink(&original, &link);
    #[cfg(windows)]
    let created = std::os::windows::fs::symlink_dir(&original, &link);

    match created {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("Link capability check failed: {}", e);
            false
        }
    }
}
