//! Roots whose changes warrant a refresh.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::resolver::ResolvedDependency;
use crate::utils::paths::{is_under_root, path_key};

use super::events::FsEvent;

/// Keys of the project root and every resolved checkout.
///
/// Always rebuilt in full from a dependency list; never patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedRoots {
    roots: BTreeSet<String>,
}

impl ObservedRoots {
    /// Roots for `project_root` and the checkouts of `dependencies`.
    #[must_use]
    pub fn compute(project_root: &Path, dependencies: &[ResolvedDependency]) -> Self {
        let roots = std::iter::once(project_root)
            .chain(dependencies.iter().filter_map(|dep| dep.content_root.as_deref()))
            .filter_map(path_key)
            .collect();
        Self {
            roots,
        }
    }

    /// Returns `true` if the key `path` lies under any root.
    #[must_use]
    pub fn covers(&self, path: &str) -> bool {
        self.roots.iter().any(|root| is_under_root(path, root))
    }

    /// Returns `true` if any candidate path of `event` lies under a root.
    #[must_use]
    pub fn matches(&self, event: &FsEvent) -> bool {
        if self.roots.is_empty() {
            return false;
        }
        event.candidate_paths().iter().any(|path| self.covers(path))
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.roots.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.roots.iter().map(String::as_str)
    }

    /// Roots as paths, for handing to a watcher.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.roots.iter().map(PathBuf::from).collect()
    }
}
