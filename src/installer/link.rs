use super::DirLinker;
use crate::core::GitLinkError;
use crate::resolver::validator::ValidatedLink;
use crate::utils::fs::{create_dir_link, ensure_parent_dir, remove_path};
use async_trait::async_trait;

/// Replaces a package target with a directory link.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkCreator;

impl LinkCreator {
    /// Creates a link creator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DirLinker for LinkCreator {
    /// Remove anything at `link.target`, then link it to `link.source`.
    ///
    /// A symlink already at the target is removed without touching the
    /// directory it points to.
    ///
    /// # Errors
    ///
    /// [`GitLinkError::LinkCreationFailed`] if the removal, the parent
    /// directory creation or the link primitive fails.
    async fn create(&self, name: &str, link: &ValidatedLink) -> Result<(), GitLinkError> {
        let failed = |reason: String| GitLinkError::LinkCreationFailed {
            name: name.to_string(),
            path: link.target.display().to_string(),
            reason,
        };

        remove_path(&link.target).await.map_err(|e| failed(format!("{e:#}")))?;
        ensure_parent_dir(&link.target).await.map_err(|e| failed(format!("{e:#}")))?;
        create_dir_link(&link.source, &link.target).await.map_err(|e| failed(format!("{e:#}")))?;

        tracing::debug!(
            target: "gitlink::resolver",
            "{name}: linked {} -> {}",
            link.target.display(),
            link.source.display()
        );
        Ok(())
    }
}
