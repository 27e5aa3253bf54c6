//! ckdeps - CuteKit dependency browser
//!
//! Collects the externs a CuteKit project declares (transitively, through the
//! manifests of their checkouts), resolves each to a local checkout, and keeps a
//! navigable tree of the project and its dependencies in sync with the filesystem.
//!
//! # Architecture Overview
//!
//! A refresh runs the same pipeline every time and replaces its result wholesale:
//!
//! ```text
//! ManifestReader ─► ExternResolver ─► DependencyCollector ─► TreeBuilder ─► TreeModel
//!   (project.lock        (extern           (breadth-first,        (project + one
//!    or project)          caches)           deduplicated)          node per extern)
//! ```
//!
//! The [`sync::Synchronizer`] decides when to refresh (change events under an
//! observed root), carries expansion and selection across rebuilds through
//! [`tree::TreeStateStore`], and reconciles the version-control host's root
//! mappings with [`vcs::reconcile`].
//!
//! # Core Modules
//!
//! - [`manifest`] - Extern declarations read from `project.lock` / `project`
//! - [`resolver`] - Checkout lookup and transitive collection
//! - [`tree`] - Tree model, builder, filesystem access and view state
//! - [`sync`] - Refresh cycle, event filtering and notifications
//! - [`vcs`] - Version-control root mapping reconciliation
//! - [`watch`] - `notify`-backed filesystem watcher
//!
//! # Supporting Modules
//!
//! - [`cli`] - The `ckdeps` command line
//! - [`config`] - `~/.cutekit/ckdeps.toml`
//! - [`core`] - Error types and user-facing error reporting
//! - [`utils`] - Path keys and platform helpers
//!
//! # Manifest Format
//!
//! Both files are JSON objects with an optional `extern` object keyed by extern id:
//!
//! ```json
//! {
//!     "id": "app",
//!     "extern": {
//!         "cute-engineering/libheap": {
//!             "git": "https://github.com/cute-engineering/libheap.git",
//!             "tag": "v1.1.0"
//!         }
//!     }
//! }
//! ```
//!
//! An extern `libheap` is looked up, in order, at
//! `<root>/.cutekit/extern/<id>`, `~/.cutekit/extern/<id>` and, when it declares a
//! `git` remote, the vendored `<root>/<id>`.
//!
//! # Example
//!
//! ```rust,no_run
//! use cutekit_deps::resolver::{DependencyCollector, ExternResolver};
//! use cutekit_deps::tree::{LocalFileSystem, TreeBuilder};
//! use std::path::Path;
//!
//! let root = Path::new("/work/app");
//! let collector = DependencyCollector::new(ExternResolver::new(dirs::home_dir()));
//! let dependencies = collector.collect(root);
//! let model = TreeBuilder::new(LocalFileSystem::new()).build(&dependencies, root);
//! println!("{} dependencies, {} nodes", model.dependency_count(), model.len());
//! ```

// Core functionality modules
pub mod manifest;
pub mod resolver;
pub mod sync;
pub mod tree;
pub mod vcs;
pub mod watch;

// Supporting modules
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
