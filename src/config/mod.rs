//! Configuration management for ckdeps
//!
//! ckdeps reads one optional, user-wide TOML file. Everything in it has a default,
//! so a missing file is equivalent to an empty one.
//!
//! # Location
//!
//! 1. `--config <PATH>` on the command line
//! 2. The `CKDEPS_CONFIG` environment variable
//! 3. `~/.cutekit/ckdeps.toml`
//!
//! # Format
//!
//! ```toml
//! # Home directory whose .cutekit/extern holds the user-global cache
//! home_dir = "~/work/cutekit-home"
//!
//! # Version-control system extern checkouts are registered under
//! vcs_system = "Git"
//!
//! # Window used to coalesce filesystem events before a refresh
//! debounce_ms = 200
//! ```

mod global;

pub use global::SyncConfig;
