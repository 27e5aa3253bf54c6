//! Cross-platform utilities and helpers
//!
//! # Modules
//!
//! - [`paths`] - Path keys used for equality, scope checks and cycle guards
//! - [`platform`] - Home directory lookup and other platform differences
//!
//! # Example
//!
//! ```rust,no_run
//! use cutekit_deps::utils::{is_under_root, normalize_key};
//!
//! let root = normalize_key("/work/app").unwrap();
//! let event = normalize_key("/work/app/.cutekit/extern/libx/src/a.c").unwrap();
//! assert!(is_under_root(&event, &root));
//! ```

pub mod paths;
pub mod platform;

pub use paths::{ROOT_KEY, canonical_key, is_under_root, normalize_key, normalize_path, path_key};
pub use platform::{expand_tilde, get_home_dir, is_windows};
