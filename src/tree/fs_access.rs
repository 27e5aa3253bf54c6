//! Scoped, read-only filesystem access for tree building.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use walkdir::WalkDir;

use crate::utils::paths;

/// One directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}

/// Guard returned by [`FileSystemAccess::read_scope`].
///
/// Structural writers that share the same lock are excluded while it is alive.
#[must_use = "the read scope ends when the guard is dropped"]
pub struct ReadGuard<'a> {
    _guard: Option<RwLockReadGuard<'a, ()>>,
}

impl<'a> ReadGuard<'a> {
    /// A guard that excludes nothing.
    pub const fn unguarded() -> Self {
        Self {
            _guard: None,
        }
    }

    /// Wraps a held read lock.
    pub const fn from_lock(guard: RwLockReadGuard<'a, ()>) -> Self {
        Self {
            _guard: Some(guard),
        }
    }
}

impl std::fmt::Debug for ReadGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadGuard").field("locked", &self._guard.is_some()).finish()
    }
}

/// What the tree builder needs from a filesystem.
///
/// Implementations must be callable from a blocking worker thread.
pub trait FileSystemAccess: Send + Sync {
    /// Enters a read-consistent scope held for the duration of a build.
    fn read_scope(&self) -> ReadGuard<'_>;

    /// Immediate children of `dir`; unreadable directories yield nothing.
    fn list_dir(&self, dir: &Path) -> Vec<DirEntry>;

    /// Returns `true` if `path` is a directory, following links.
    fn is_dir(&self, path: &Path) -> bool;

    /// Key of the real location of `path`, used to break symlink cycles.
    fn canonical_key(&self, path: &Path) -> Option<String> {
        paths::canonical_key(path)
    }
}

/// [`FileSystemAccess`] over the local disk.
///
/// Reads are guarded by a shared [`RwLock`]; hosts that move or delete files can
/// take the write side through [`lock`](Self::lock) to serialize against builds.
#[derive(Debug, Clone, Default)]
pub struct LocalFileSystem {
    lock: Arc<RwLock<()>>,
}

impl LocalFileSystem {
    /// Creates an accessor with its own lock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an accessor sharing `lock` with other writers.
    #[must_use]
    pub const fn with_lock(lock: Arc<RwLock<()>>) -> Self {
        Self {
            lock,
        }
    }

    /// The lock guarding structural changes.
    #[must_use]
    pub fn lock(&self) -> Arc<RwLock<()>> {
        Arc::clone(&self.lock)
    }
}

impl FileSystemAccess for LocalFileSystem {
    fn read_scope(&self) -> ReadGuard<'_> {
        ReadGuard::from_lock(self.lock.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn list_dir(&self, dir: &Path) -> Vec<DirEntry> {
        WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    None
                }
            })
            .map(|entry| {
                let path = entry.path().to_path_buf();
                // Links to directories are listed as directories.
                let is_dir = entry.file_type().is_dir() || (entry.path_is_symlink() && path.is_dir());
                DirEntry {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    path,
                    is_dir,
                }
            })
            .collect()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}
