//! File system utilities for link and clone targets
//!
//! Everything here is async (`tokio::fs`) so a slow disk operation in one
//! manifest entry suspends only that entry's pipeline.
//!
//! # Examples
//!
//! ```rust,no_run
//! use gitlink_cli::utils::fs::{create_dir_link, remove_path};
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let target = Path::new("packages/lib-a");
//! remove_path(target).await?;
//! create_dir_link(Path::new("/work/lib-a"), target).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Platform Considerations
//!
//! - **Unix**: links are plain symbolic links
//! - **Windows**: links are directory symlinks, which resolve like junctions when
//!   traversed; creating them requires Developer Mode or an elevated prompt, which
//!   is exactly what [`can_create_links`] checks for

pub mod dirs;
pub mod links;

pub use dirs::{ensure_parent_dir, path_exists, remove_path};
pub use links::{can_create_links, create_dir_link, is_link};
