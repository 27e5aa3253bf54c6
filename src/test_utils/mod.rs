//! Test utilities for ckdeps
//!
//! Helpers shared by unit tests and the integration suite: one-time logging setup,
//! JSON manifest fixtures and a temporary project layout with a separate home
//! directory for the user-global extern cache.
//!
//! # Example
//!
//! ```rust,no_run
//! use cutekit_deps::test_utils::{ManifestFixture, TestEnvironment};
//!
//! let env = TestEnvironment::new().unwrap();
//! ManifestFixture::new().git_extern("libx", "https://x").write_lockfile(&env.project_dir).unwrap();
//! env.create_extern_cache("libx").unwrap();
//! ```

pub mod environment;
pub mod fixtures;

pub use environment::TestEnvironment;
pub use fixtures::ManifestFixture;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; without either, logging stays off.
///
/// ```bash
/// RUST_LOG=cutekit_deps=debug cargo test
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
            .try_init();
    });
}
