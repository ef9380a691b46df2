//! Platform-specific helpers: git executable lookup and path resolution.

use std::path::{Path, PathBuf};

/// Checks if the current platform is Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Gets the platform-appropriate git command name.
///
/// - **Windows**: `git.exe`
/// - **Unix-like**: `git`, resolved through PATH
#[must_use]
pub const fn get_git_command() -> &'static str {
    if is_windows() {
        "git.exe"
    } else {
        "git"
    }
}

/// Checks whether a command is available on PATH.
#[must_use]
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

/// Resolves a manifest path against the project root.
///
/// Absolute paths are returned unchanged; relative ones are joined onto `root`.
/// No canonicalization happens, so a path that does not exist yet (a clone
/// target) resolves fine.
///
/// # Examples
///
/// ```rust
/// use gitlink_cli::utils::platform::resolve_against;
/// use std::path::Path;
///
/// let root = Path::new("/work/app");
/// assert_eq!(resolve_against(root, "./packages"), Path::new("/work/app/./packages"));
/// ```
#[must_use]
pub fn resolve_against(root: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
