//! Tree node variants and their identity segments.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::resolver::ResolvedDependency;

/// Index of a node inside its [`TreeModel`](super::TreeModel).
///
/// Ids are positional: they are only meaningful for the model that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Raw arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Rendering hint for hosts that draw icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconHint {
    Project,
    Module,
    Folder,
    File,
    Warning,
}

/// What a node represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The project directory itself.
    ProjectRoot {
        path: PathBuf,
    },
    /// One collected extern; `root` is its checkout when present on disk.
    Dependency {
        dependency: ResolvedDependency,
        root: Option<PathBuf>,
    },
    /// A file or directory below the project or a checkout.
    FileEntry {
        path: PathBuf,
        is_dir: bool,
    },
    /// Informational leaf, e.g. a missing checkout.
    Placeholder {
        message: String,
    },
}

impl NodeKind {
    /// Position-independent identity of this node.
    #[must_use]
    pub fn key_segment(&self) -> String {
        match self {
            Self::ProjectRoot {
                path,
            } => format!("project:{}", path.display()),
            Self::Dependency {
                dependency,
                ..
            } => format!("dependency:{}:{}", dependency.id, dependency.origin.display()),
            Self::FileEntry {
                path,
                ..
            } => format!("file:{}", path.display()),
            Self::Placeholder {
                message,
            } => format!("message:{message}"),
        }
    }

    /// Text matched by incremental search.
    #[must_use]
    pub fn search_text(&self) -> String {
        match self {
            Self::ProjectRoot {
                path,
            }
            | Self::FileEntry {
                path,
                ..
            } => file_name(path),
            Self::Dependency {
                dependency,
                ..
            } => dependency.id.clone(),
            Self::Placeholder {
                message,
            } => message.clone(),
        }
    }

    /// Display label.
    #[must_use]
    pub fn label(&self) -> String {
        self.search_text()
    }

    /// Icon category.
    #[must_use]
    pub const fn icon(&self) -> IconHint {
        match self {
            Self::ProjectRoot {
                ..
            } => IconHint::Project,
            Self::Dependency {
                ..
            } => IconHint::Module,
            Self::FileEntry {
                is_dir: true,
                ..
            } => IconHint::Folder,
            Self::FileEntry {
                is_dir: false,
                ..
            } => IconHint::File,
            Self::Placeholder {
                ..
            } => IconHint::Warning,
        }
    }

    /// Filesystem entry behind the node, if any.
    ///
    /// Dependencies expose their checkout; placeholders have none.
    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            Self::ProjectRoot {
                path,
            }
            | Self::FileEntry {
                path,
                ..
            } => Some(path),
            Self::Dependency {
                root,
                ..
            } => root.as_deref(),
            Self::Placeholder {
                ..
            } => None,
        }
    }

    /// Path used when following an editor selection.
    ///
    /// Only the project root and file entries take part, so a checkout directory
    /// is found as the dependency's child listing rather than the dependency node.
    #[must_use]
    pub fn navigation_path(&self) -> Option<&Path> {
        match self {
            Self::ProjectRoot {
                path,
            }
            | Self::FileEntry {
                path,
                ..
            } => Some(path),
            _ => None,
        }
    }

    /// Returns `true` for placeholders.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// One node in the arena.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}
