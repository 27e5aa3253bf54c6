//! Candidate checkout lookup for a single extern.

use std::path::{Path, PathBuf};

use crate::constants::{CUTEKIT_DIR, EXTERN_DIR};

/// Computes where an extern's sources may be checked out.
///
/// # Examples
///
/// ```rust,no_run
/// use cutekit_deps::resolver::ExternResolver;
/// use std::path::Path;
///
/// let resolver = ExternResolver::new(None);
/// let candidates = resolver.candidates("libx", Some("https://x"), Path::new("/work/app"));
/// assert_eq!(candidates.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExternResolver {
    home: Option<PathBuf>,
}

impl ExternResolver {
    /// Creates a resolver; `home` enables the user-global cache candidate.
    #[must_use]
    pub const fn new(home: Option<PathBuf>) -> Self {
        Self {
            home,
        }
    }

    /// Home directory used for the user-global cache.
    #[must_use]
    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// Returns the ordered candidate directories for `id` declared at `root`.
    #[must_use]
    pub fn candidates(&self, id: &str, git: Option<&str>, root: &Path) -> Vec<PathBuf> {
        let mut candidates = Vec::with_capacity(3);
        candidates.push(root.join(CUTEKIT_DIR).join(EXTERN_DIR).join(id));
        if let Some(home) = &self.home {
            candidates.push(home.join(CUTEKIT_DIR).join(EXTERN_DIR).join(id));
        }
        if git.is_some() {
            candidates.push(root.join(id));
        }
        candidates
    }

    /// Returns the first candidate that exists and is a directory.
    #[must_use]
    pub fn resolve(&self, id: &str, git: Option<&str>, root: &Path) -> Option<PathBuf> {
        let found = self.candidates(id, git, root).into_iter().find(|candidate| candidate.is_dir());
        match &found {
            Some(path) => tracing::debug!("Resolved extern '{}' to {}", id, path.display()),
            None => tracing::debug!("No local checkout for extern '{}' declared at {}", id, root.display()),
        }
        found
    }
}
