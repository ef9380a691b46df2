//! Core types for GitLink
//!
//! Currently this is the error layer: the typed [`GitLinkError`] every component
//! reports through, and the [`ErrorContext`] wrapper the CLI uses to print fatal
//! errors with a suggestion.

pub mod error;

pub use error::{ErrorContext, GitLinkError, user_friendly_error};
