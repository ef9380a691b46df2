//! Directory operations: existence checks, parent creation and recursive removal.

use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

/// Returns true if something exists at `path`, following links.
///
/// A dangling link counts as missing, which is what the local-link validation
/// wants: a link to nowhere is not a usable working copy.
pub async fn path_exists(path: &Path) -> bool {
    fs::metadata(path).await.is_ok()
}

/// Ensures the parent directory of `path` exists.
pub async fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create directory: {}", parent.display())
            })?;
        }
    }
    Ok(())
}

/// Removes whatever lives at `path`: a link, a file, or a whole directory tree.
///
/// - A missing path is a no-op success
/// - A link is removed without touching the directory it points to
/// - A directory is removed recursively
///
/// # Platform Notes
///
/// - **Windows**: directory symlinks must be removed with `remove_dir`, file
///   symlinks with `remove_file`; both are tried
pub async fn remove_path(path: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to stat {}", path.display()));
        }
    };

    let result = if metadata.file_type().is_symlink() {
        remove_link(path).await
    } else if metadata.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    };

    match result {
        Ok(()) => {
            tracing::debug!("Removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
    }
}

#[cfg(unix)]
async fn remove_link(path: &Path) -> std::io::Result<()> {
    fs::remove_file(path).await
}

#[cfg(windows)]
async fn remove_link(path: &Path) -> std::io::Result<()> {
    match fs::remove_dir(path).await {
        Ok(()) => Ok(()),
        Err(_) => fs::remove_file(path).await,
    }
}
