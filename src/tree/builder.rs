//! Builds a [`TreeModel`] from collected dependencies and a filesystem snapshot.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::constants::NO_CHECKOUT_MESSAGE;
use crate::resolver::ResolvedDependency;

use super::fs_access::FileSystemAccess;
use super::model::TreeModel;
use super::node::{NodeId, NodeKind};

/// Lays out the project and its dependencies as a tree.
///
/// # Examples
///
/// ```rust,no_run
/// use cutekit_deps::resolver::DependencyCollector;
/// use cutekit_deps::tree::{LocalFileSystem, TreeBuilder};
/// use std::path::Path;
///
/// let root = Path::new("/work/app");
/// let deps = DependencyCollector::default().collect(root);
/// let model = TreeBuilder::new(LocalFileSystem::new()).build(&deps, root);
/// println!("{} nodes", model.len());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder<F> {
    fs: F,
}

impl<F: FileSystemAccess> TreeBuilder<F> {
    /// Creates a builder reading through `fs`.
    pub const fn new(fs: F) -> Self {
        Self {
            fs,
        }
    }

    /// The filesystem accessor.
    pub const fn fs(&self) -> &F {
        &self.fs
    }

    /// Builds the tree.
    ///
    /// The project root comes first when it is a directory, followed by one node per
    /// dependency ordered by lowercase id, then origin. A dependency without a
    /// usable checkout gets a single placeholder child. All reads happen inside one
    /// [`read_scope`](FileSystemAccess::read_scope).
    pub fn build(&self, dependencies: &[ResolvedDependency], project_root: &Path) -> TreeModel {
        let _scope = self.fs.read_scope();
        let mut model = TreeModel::new();

        if self.fs.is_dir(project_root) {
            let node = model.add_root(NodeKind::ProjectRoot {
                path: project_root.to_path_buf(),
            });
            self.add_listing(&mut model, node, project_root);
        } else {
            tracing::debug!("Project root {} is not a directory", project_root.display());
        }

        let mut ordered: Vec<&ResolvedDependency> = dependencies.iter().collect();
        ordered.sort_by(|a, b| {
            a.id.to_lowercase()
                .cmp(&b.id.to_lowercase())
                .then_with(|| a.origin.as_os_str().cmp(b.origin.as_os_str()))
        });

        for dependency in ordered {
            let root = dependency.content_root.clone().filter(|path| self.fs.is_dir(path));
            let node = model.add_root(NodeKind::Dependency {
                dependency: dependency.clone(),
                root: root.clone(),
            });
            match root {
                Some(root) => self.add_listing(&mut model, node, &root),
                None => {
                    model.add_child(
                        node,
                        NodeKind::Placeholder {
                            message: NO_CHECKOUT_MESSAGE.to_string(),
                        },
                    );
                }
            }
        }

        model
    }

    /// Adds the recursive listing of `dir` below `parent`.
    ///
    /// Directories come first, then names compare case-insensitively. Each listing
    /// has its own visited set keyed by real location, so a link back to an
    /// ancestor appears as an entry but is not expanded again.
    fn add_listing(&self, model: &mut TreeModel, parent: NodeId, dir: &Path) {
        let mut visited: HashSet<String> = HashSet::new();
        let mut stack: Vec<(NodeId, PathBuf)> = vec![(parent, dir.to_path_buf())];

        while let Some((node, path)) = stack.pop() {
            let Some(key) = self.fs.canonical_key(&path) else {
                continue;
            };
            if !visited.insert(key) {
                continue;
            }

            let mut entries = self.fs.list_dir(&path);
            entries.sort_by(|a, b| {
                b.is_dir.cmp(&a.is_dir).then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            });

            let mut subdirs = Vec::new();
            for entry in entries {
                let child = model.add_child(
                    node,
                    NodeKind::FileEntry {
                        path: entry.path.clone(),
                        is_dir: entry.is_dir,
                    },
                );
                if entry.is_dir {
                    subdirs.push((child, entry.path));
                }
            }
            // Reverse so the first directory is expanded first.
            stack.extend(subdirs.into_iter().rev());
        }
    }
}
