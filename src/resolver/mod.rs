//! Extern dependency resolution for CuteKit projects.
//!
//! Resolution turns the extern declarations found in manifests into a flat list of
//! [`ResolvedDependency`] values, each pointing at a local checkout when one exists.
//!
//! # Architecture
//!
//! - [`ExternResolver`] maps one declaration to its ordered candidate checkout
//!   directories and picks the first that exists
//! - [`DependencyCollector`] walks content roots breadth-first, starting at the
//!   project root, reading each root's externs with
//!   [`ManifestReader`](crate::manifest::ManifestReader) and descending into every
//!   resolved checkout
//!
//! # Candidate Order
//!
//! For an extern `id` declared at `root`:
//!
//! 1. `root/.cutekit/extern/<id>` (per-project cache)
//! 2. `<home>/.cutekit/extern/<id>` (user-global cache, only with a home directory)
//! 3. `root/<id>` (vendored checkout, only when the extern has a `git` remote)
//!
//! The order never changes: the project cache wins over the global cache, which
//! wins over a vendored sibling.
//!
//! # Cycle Safety
//!
//! Traversal is an explicit work queue. Every popped root is reduced to the key of
//! its real location ([`canonical_key`](crate::utils::paths::canonical_key)) and
//! skipped if that key was already visited, so symlink loops, diamond graphs and
//! externs pointing back at the project terminate without a depth limit.
//!
//! # Deduplication
//!
//! Two declarations collapse into one entry when their [`DependencyKey`] is equal:
//! id, remote, tag, commit, version, declaring root and content root. Aliases in
//! `names` do not take part. A commit bump on the same id therefore yields a
//! separate entry.

mod collector;
mod extern_resolver;
mod types;

#[cfg(test)]
mod tests;

pub use collector::{Collection, DependencyCollector};
pub use extern_resolver::ExternResolver;
pub use types::{DependencyKey, ResolvedDependency};
