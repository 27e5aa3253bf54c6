//! CuteKit manifest and lockfile reading.
//!
//! Every content root may carry a lockfile (`project.lock`) and a project manifest
//! (`project`). Both are JSON objects with an optional top-level `extern` object
//! whose keys are dependency ids:
//!
//! ```json
//! {
//!   "id": "my-app",
//!   "extern": {
//!     "skift-org/libheap": {
//!       "git": "https://github.com/skift-org/libheap",
//!       "tag": "v1.2.0",
//!       "names": ["libheap", "heap"]
//!     }
//!   }
//! }
//! ```
//!
//! The lockfile is preferred. The manifest is consulted when the lockfile is
//! missing, cannot be read, is malformed, or pins no externs.
//!
//! # Failure Policy
//!
//! Reading never fails from the collector's point of view: an unreadable or
//! malformed file degrades to "no externs at this root" and is logged at `warn`.
//! [`ManifestReader::read_detailed`] keeps the swallowed errors around for
//! diagnostics, and [`ManifestReader::try_read_file`] exposes the typed error for
//! a single file.
//!
//! # Field Rules
//!
//! - `git`, `tag`, `commit` and `version` are optional; blank strings count as absent
//! - Numbers and booleans are accepted and rendered as strings
//! - `names` keeps non-blank entries in order
//! - Entries whose value is not an object are skipped

mod helpers;
mod manifest_io;


use serde::Serialize;
use std::path::PathBuf;

use crate::core::CutekitError;

pub use manifest_io::ManifestReader;

/// One dependency declared under a manifest's `extern` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternDeclaration {
    /// Key under `extern`, unique within its manifest
    pub id: String,
    /// Remote URL of the dependency
    pub git: Option<String>,
    /// Pinned tag
    pub tag: Option<String>,
    /// Pinned commit
    pub commit: Option<String>,
    /// Declared version
    pub version: Option<String>,
    /// Aliases under which the dependency is known
    pub names: Vec<String>,
}

impl ExternDeclaration {
    /// Creates a declaration carrying only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            git: None,
            tag: None,
            commit: None,
            version: None,
            names: Vec::new(),
        }
    }

    /// Sets the remote URL.
    #[must_use]
    pub fn with_git(mut self, git: impl Into<String>) -> Self {
        self.git = Some(git.into());
        self
    }

    /// Sets the declared version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// Which file a root's externs were taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestSource {
    /// `project.lock`
    Lockfile,
    /// `project`
    Manifest,
    /// Neither file produced a usable declaration list
    None,
}

impl std::fmt::Display for ManifestSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lockfile => write!(f, "lockfile"),
            Self::Manifest => write!(f, "manifest"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Outcome of reading one content root, including the errors that were swallowed.
#[derive(Debug)]
pub struct ManifestRead {
    /// File the externs came from
    pub source: ManifestSource,
    /// Path of that file, when one was used
    pub path: Option<PathBuf>,
    /// Declarations found at the root
    pub externs: Vec<ExternDeclaration>,
    /// Read or parse failures encountered along the way
    pub problems: Vec<CutekitError>,
}

impl ManifestRead {
    fn empty(problems: Vec<CutekitError>) -> Self {
        Self {
            source: ManifestSource::None,
            path: None,
            externs: Vec::new(),
            problems,
        }
    }
}
