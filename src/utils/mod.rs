//! Cross-platform utilities: filesystem primitives, git executable lookup and
//! the status stream.

pub mod fs;
pub mod platform;
pub mod status;

pub use fs::{can_create_links, create_dir_link, remove_path};
pub use platform::{get_git_command, is_windows, resolve_against};
pub use status::StatusReporter;
