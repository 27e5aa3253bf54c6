//! Filesystem change events consumed by the synchronizer.

use std::path::{Path, PathBuf};

use crate::utils::paths::path_key;

/// Kind of an [`FsEvent`], without its paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsEventKind {
    Created,
    Modified,
    Removed,
    Renamed,
    Moved,
    Copied,
}

/// One change reported by a watcher or a host.
///
/// Renames keep the entry in the same directory; moves and copies place it under a
/// new parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsEvent {
    Created(PathBuf),
    Modified(PathBuf),
    Removed(PathBuf),
    Renamed {
        from: PathBuf,
        to: PathBuf,
    },
    Moved {
        from: PathBuf,
        to: PathBuf,
    },
    Copied {
        from: PathBuf,
        to: PathBuf,
    },
}

impl FsEvent {
    /// Rename of `old_name` to `new_name` inside `parent`.
    pub fn renamed_in(parent: &Path, old_name: &str, new_name: &str) -> Self {
        Self::Renamed {
            from: parent.join(old_name),
            to: parent.join(new_name),
        }
    }

    /// Move of `file` into `new_parent`, keeping its name.
    pub fn moved_into(file: &Path, new_parent: &Path) -> Self {
        let to = match file.file_name() {
            Some(name) => new_parent.join(name),
            None => new_parent.to_path_buf(),
        };
        Self::Moved {
            from: file.to_path_buf(),
            to,
        }
    }

    /// Copy of `file` into `new_parent` as `new_name`.
    pub fn copied_into(file: &Path, new_parent: &Path, new_name: &str) -> Self {
        Self::Copied {
            from: file.to_path_buf(),
            to: new_parent.join(new_name),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> FsEventKind {
        match self {
            Self::Created(_) => FsEventKind::Created,
            Self::Modified(_) => FsEventKind::Modified,
            Self::Removed(_) => FsEventKind::Removed,
            Self::Renamed {
                ..
            } => FsEventKind::Renamed,
            Self::Moved {
                ..
            } => FsEventKind::Moved,
            Self::Copied {
                ..
            } => FsEventKind::Copied,
        }
    }

    /// The path the event is reported for (the source for two-path events).
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Created(path) | Self::Modified(path) | Self::Removed(path) => path,
            Self::Renamed {
                from,
                ..
            }
            | Self::Moved {
                from,
                ..
            }
            | Self::Copied {
                from,
                ..
            } => from,
        }
    }

    /// Keys of every path the event could affect.
    ///
    /// Two-path events yield both the old and the new location. Paths that cannot
    /// be turned into keys are dropped; an event with none left cannot be placed
    /// in scope.
    #[must_use]
    pub fn candidate_paths(&self) -> Vec<String> {
        let raw: Vec<&Path> = match self {
            Self::Created(path) | Self::Modified(path) | Self::Removed(path) => vec![path],
            Self::Renamed {
                from,
                to,
            }
            | Self::Moved {
                from,
                to,
            }
            | Self::Copied {
                from,
                to,
            } => vec![from, to],
        };

        let mut keys: Vec<String> = Vec::with_capacity(raw.len());
        for key in raw.into_iter().filter_map(path_key) {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }
}
