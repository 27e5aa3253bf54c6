//! Resolved dependency values and their identity key.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::manifest::ExternDeclaration;

/// An extern declaration paired with the root that declared it and its checkout.
///
/// Values are rebuilt from scratch on every collection; nothing about a
/// dependency is carried across refreshes except what its key encodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDependency {
    /// Extern id
    pub id: String,
    /// Content root whose manifest declared the extern
    pub origin: PathBuf,
    /// Remote URL
    pub git: Option<String>,
    /// Pinned tag
    pub tag: Option<String>,
    /// Pinned commit
    pub commit: Option<String>,
    /// Declared version
    pub version: Option<String>,
    /// Aliases
    pub names: Vec<String>,
    /// Local checkout directory, absent when no candidate exists on disk
    pub content_root: Option<PathBuf>,
}

/// Composite identity used to deduplicate collected dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DependencyKey {
    id: String,
    git: Option<String>,
    tag: Option<String>,
    commit: Option<String>,
    version: Option<String>,
    origin: String,
    content_root: Option<String>,
}

impl ResolvedDependency {
    /// Builds a dependency from a declaration found at `origin`.
    #[must_use]
    pub fn from_declaration(
        declaration: ExternDeclaration,
        origin: &Path,
        content_root: Option<PathBuf>,
    ) -> Self {
        Self {
            id: declaration.id,
            origin: origin.to_path_buf(),
            git: declaration.git,
            tag: declaration.tag,
            commit: declaration.commit,
            version: declaration.version,
            names: declaration.names,
            content_root,
        }
    }

    /// Deduplication key of this dependency.
    #[must_use]
    pub fn key(&self) -> DependencyKey {
        DependencyKey {
            id: self.id.clone(),
            git: self.git.clone(),
            tag: self.tag.clone(),
            commit: self.commit.clone(),
            version: self.version.clone(),
            origin: self.origin.to_string_lossy().into_owned(),
            content_root: self.content_root.as_ref().map(|p| p.to_string_lossy().into_owned()),
        }
    }

    /// Returns `true` if a local checkout was found.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.content_root.is_some()
    }

    /// The pin shown next to the id: tag, then commit, then version.
    #[must_use]
    pub fn pin(&self) -> Option<&str> {
        self.tag.as_deref().or(self.commit.as_deref()).or(self.version.as_deref())
    }
}
