//! Platform-specific helpers
//!
//! Small wrappers around platform differences that the rest of the crate needs:
//! home directory lookup for the user-global extern cache, and `~` expansion for
//! paths written in the configuration file.

use std::path::{Path, PathBuf};

/// Checks if the current platform is Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Returns `true` where the default filesystem compares names case-insensitively.
///
/// Path keys are lowercased on these platforms so that two spellings of the same
/// directory compare equal.
#[must_use]
pub const fn is_case_insensitive_fs() -> bool {
    cfg!(any(windows, target_os = "macos"))
}

/// Returns the user's home directory, if one can be determined.
///
/// Unlike most lookups in the crate this is not an error when absent: the
/// user-global extern cache is simply skipped.
#[must_use]
pub fn get_home_dir() -> Option<PathBuf> {
    let home = dirs::home_dir();
    if home.is_none() {
        tracing::debug!("No home directory available, skipping the user-global extern cache");
    }
    home
}

/// Expands a leading `~` to the home directory.
///
/// Paths without a leading tilde, or when no home directory is available, are
/// returned unchanged.
///
/// # Examples
///
/// ```rust,no_run
/// use cutekit_deps::utils::platform::expand_tilde;
/// use std::path::Path;
///
/// let expanded = expand_tilde(Path::new("~/.cutekit"));
/// assert!(!expanded.starts_with("~"));
/// ```
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
