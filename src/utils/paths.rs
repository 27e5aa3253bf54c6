//! Path keys: canonical strings used for path equality and scope checks.
//!
//! Every path the synchronizer reasons about (observed roots, event paths,
//! version-control mappings, visited roots during collection) is compared as a
//! *key* rather than as a [`Path`]. A key is absolute, free of `.`/`..`
//! components, uses `/` as separator, carries no trailing separator, and is
//! lowercased on platforms whose filesystems are case-insensitive by default.
//! The filesystem root maps to [`ROOT_KEY`] instead of an empty string.
//!
//! ```rust,no_run
//! use cutekit_deps::utils::paths::{is_under_root, normalize_key};
//!
//! let key = normalize_key("/work/app/./src/../lib/").unwrap();
//! assert_eq!(key, "/work/app/lib");
//! assert!(is_under_root("/work/app/lib/mod.c", "/work/app"));
//! assert!(!is_under_root("/work/application", "/work/app"));
//! ```

use std::path::{Component, Path, PathBuf};

/// Key of the filesystem root.
pub const ROOT_KEY: &str = "/";

/// Normalizes a path by resolving `.` and `..` components.
///
/// This performs logical resolution without touching the filesystem: symbolic
/// links are not followed and the path need not exist. `..` never climbs above
/// a root or prefix component, so `/..` normalizes to `/`.
///
/// # Examples
///
/// ```rust,no_run
/// use cutekit_deps::utils::paths::normalize_path;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(normalize_path(Path::new("/foo/./bar/../baz")), PathBuf::from("/foo/baz"));
/// assert_eq!(normalize_path(Path::new("../src/./lib.rs")), PathBuf::from("../src/lib.rs"));
/// ```
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            c => components.push(c),
        }
    }

    components.iter().collect()
}

/// Makes `path` absolute against the current directory and normalizes it.
///
/// Returns `None` when the path is relative and the current directory cannot
/// be determined.
#[must_use]
pub fn absolutize(path: &Path) -> Option<PathBuf> {
    if path.is_absolute() {
        return Some(normalize_path(path));
    }
    let cwd = std::env::current_dir().ok()?;
    Some(normalize_path(&cwd.join(path)))
}

/// Converts a raw path string into its key.
///
/// Returns `None` for blank input and for input that cannot name a path
/// (an interior NUL byte); callers treat that as "cannot reason about scope"
/// and drop whatever carried the path.
///
/// The result is idempotent: `normalize_key(&normalize_key(p)?) == normalize_key(p)`.
#[must_use]
pub fn normalize_key(raw: &str) -> Option<String> {
    if raw.trim().is_empty() || raw.contains('\0') {
        return None;
    }

    let raw = if cfg!(windows) {
        raw.replace('\\', "/")
    } else {
        raw.to_string()
    };

    let absolute = absolutize(Path::new(&raw))?;
    let mut key = absolute.to_str()?.to_string();
    if cfg!(windows) {
        key = key.replace('\\', "/");
    }
    if super::platform::is_case_insensitive_fs() {
        key = key.to_lowercase();
    }

    let trimmed = key.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() {
        Some(ROOT_KEY.to_string())
    } else {
        Some(trimmed.to_string())
    }
}

/// Key of a [`Path`]; `None` when the path is not valid UTF-8 or not normalizable.
#[must_use]
pub fn path_key(path: &Path) -> Option<String> {
    normalize_key(path.to_str()?)
}

/// Key of the real location of `path`.
///
/// Symbolic links are resolved when the path exists, so two spellings that
/// reach the same directory through a link share a key. Missing paths fall
/// back to [`path_key`].
#[must_use]
pub fn canonical_key(path: &Path) -> Option<String> {
    match std::fs::canonicalize(path) {
        Ok(real) => path_key(&real),
        Err(_) => path_key(path),
    }
}

/// Returns `true` if the key `path` equals `root` or lies inside it.
///
/// A plain string prefix is not enough: the character following the shared
/// prefix must be a separator, so `/foobar` is not under `/foo`. The
/// [`ROOT_KEY`] contains every path.
#[must_use]
pub fn is_under_root(path: &str, root: &str) -> bool {
    if root == ROOT_KEY || path == root {
        return true;
    }
    if !path.starts_with(root) {
        return false;
    }
    matches!(path.as_bytes().get(root.len()), Some(b'/' | b'\\'))
}
