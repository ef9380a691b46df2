//! Test utilities for GitLink
//!
//! Helpers for building throwaway git repositories and project layouts in
//! temp directories. Available to unit tests and, through the `test-utils`
//! feature, to the integration suite.
//!
//! # Example
//!
//! ```rust,no_run
//! use gitlink_cli::test_utils::TestEnvironment;
//!
//! let env = TestEnvironment::new().unwrap();
//! let source = env.create_source_repo("lib-a").unwrap();
//! let local = env.clone_local_copy("lib-a", &source).unwrap();
//! assert!(local.join(".git").exists());
//! ```

pub mod environment;
pub mod git_helper;

pub use environment::TestEnvironment;
pub use git_helper::TestGit;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG` if set, otherwise stays
/// silent. Safe to call from every test.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
