//! Integration test suite for GitLink
//!
//! End-to-end runs of the `gitlink` binary against real git repositories in
//! temp directories.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **resolve**: linking, clone fallback, stale targets, idempotence
//! - **errors**: process-level failures and per-entry exit status
//! - **validate**: dry run reporting

#[path = "../common/mod.rs"]
mod common;

mod errors;
mod resolve;
mod validate;
