//! Breadth-first collection of extern dependencies across content roots.

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::path::{Path, PathBuf};

use crate::manifest::ManifestReader;
use crate::utils::paths::{absolutize, canonical_key};

use super::{DependencyKey, ExternResolver, ResolvedDependency};

/// Result of a collection run.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Unique dependencies sorted by lowercase id, then origin
    pub dependencies: Vec<ResolvedDependency>,
    /// Keys of every content root that was read, project root included
    pub visited_roots: BTreeSet<String>,
}

/// Walks a project and every checked-out extern below it.
///
/// # Examples
///
/// ```rust,no_run
/// use cutekit_deps::resolver::{DependencyCollector, ExternResolver};
/// use std::path::Path;
///
/// let collector = DependencyCollector::new(ExternResolver::new(dirs::home_dir()));
/// for dep in collector.collect(Path::new("/work/app")) {
///     println!("{} -> {:?}", dep.id, dep.content_root);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct DependencyCollector {
    reader: ManifestReader,
    resolver: ExternResolver,
}

impl DependencyCollector {
    /// Creates a collector using `resolver` for checkout lookup.
    #[must_use]
    pub const fn new(resolver: ExternResolver) -> Self {
        Self {
            reader: ManifestReader::new(),
            resolver,
        }
    }

    /// The resolver used for checkout lookup.
    #[must_use]
    pub const fn resolver(&self) -> &ExternResolver {
        &self.resolver
    }

    /// Returns the deduplicated, sorted dependencies of `project_root`.
    #[must_use]
    pub fn collect(&self, project_root: &Path) -> Vec<ResolvedDependency> {
        self.collect_with_visited(project_root).dependencies
    }

    /// Like [`collect`](Self::collect), also reporting which roots were read.
    #[must_use]
    pub fn collect_with_visited(&self, project_root: &Path) -> Collection {
        let mut queue: VecDeque<PathBuf> = VecDeque::new();
        queue.push_back(project_root.to_path_buf());

        let mut visited: HashSet<String> = HashSet::new();
        let mut seen: HashSet<DependencyKey> = HashSet::new();
        let mut dependencies = Vec::new();

        while let Some(next) = queue.pop_front() {
            let Some(root) = absolutize(&next) else {
                tracing::debug!("Skipping root that cannot be made absolute: {}", next.display());
                continue;
            };
            let Some(key) = canonical_key(&root) else {
                tracing::debug!("Skipping root without a usable path key: {}", root.display());
                continue;
            };
            if !visited.insert(key) {
                continue;
            }

            for declaration in self.reader.read(&root) {
                let content_root =
                    self.resolver.resolve(&declaration.id, declaration.git.as_deref(), &root);
                let dependency =
                    ResolvedDependency::from_declaration(declaration, &root, content_root.clone());

                if seen.insert(dependency.key()) {
                    dependencies.push(dependency);
                }

                // Traverse even when the entry was a duplicate; the visited guard
                // on the root keeps this to one read per checkout.
                if let Some(content_root) = content_root {
                    queue.push_back(content_root);
                }
            }
        }

        dependencies.sort_by(|a, b| {
            a.id.to_lowercase()
                .cmp(&b.id.to_lowercase())
                .then_with(|| a.origin.as_os_str().cmp(b.origin.as_os_str()))
        });

        tracing::debug!(
            "Collected {} dependencies from {} content roots",
            dependencies.len(),
            visited.len()
        );

        Collection {
            dependencies,
            visited_roots: visited.into_iter().collect(),
        }
    }
}
