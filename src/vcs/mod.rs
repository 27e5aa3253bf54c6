//! Version-control root mappings for checked-out externs.
//!
//! Hosts with version-control integration keep a list of directory → system
//! mappings. After every refresh the synchronizer registers each resolved extern
//! checkout as a root of the configured system (Git by default) and retracts the
//! roots it registered earlier that are no longer resolved.
//!
//! # Ownership Rules
//!
//! - Only mappings the synchronizer registered itself (tracked in a
//!   [`GitRootRegistry`]) are ever retracted, and only when they still name the
//!   configured system
//! - A desired root without a mapping of the configured system gets one; mappings
//!   of other systems for the same directory are kept next to it
//! - A mapping of the configured system that existed before the synchronizer
//!   registered it belongs to the user and is never retracted
//! - When nothing changes, [`VcsMappings::set_mappings`] is not called at all

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Mutex;

use crate::resolver::ResolvedDependency;
use crate::utils::paths::{normalize_key, path_key};

/// One directory → version-control system entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VcsMapping {
    pub directory: String,
    pub vcs: String,
}

impl VcsMapping {
    pub fn new(directory: impl Into<String>, vcs: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            vcs: vcs.into(),
        }
    }
}

/// Host collaborator owning the persisted mapping list.
pub trait VcsMappings: Send + Sync {
    /// Returns `true` if the host knows the version-control system `name`.
    fn supports(&self, name: &str) -> bool {
        let _ = name;
        true
    }

    fn list_mappings(&self) -> Vec<VcsMapping>;

    fn set_mappings(&self, mappings: Vec<VcsMapping>);
}

/// Mapping store kept in memory; used by the CLI and in tests.
#[derive(Debug, Default)]
pub struct InMemoryMappings {
    mappings: Mutex<Vec<VcsMapping>>,
    writes: Mutex<usize>,
    unsupported: BTreeSet<String>,
}

impl InMemoryMappings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing mapping list.
    #[must_use]
    pub fn with_mappings(mappings: Vec<VcsMapping>) -> Self {
        Self {
            mappings: Mutex::new(mappings),
            ..Self::default()
        }
    }

    /// Marks `name` as a system the host does not provide.
    #[must_use]
    pub fn without_system(mut self, name: impl Into<String>) -> Self {
        self.unsupported.insert(name.into());
        self
    }

    /// Number of [`set_mappings`](VcsMappings::set_mappings) calls so far.
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl VcsMappings for InMemoryMappings {
    fn supports(&self, name: &str) -> bool {
        !self.unsupported.contains(name)
    }

    fn list_mappings(&self) -> Vec<VcsMapping> {
        self.mappings.lock().unwrap_or_else(std::sync::PoisonError::into_inner).clone()
    }

    fn set_mappings(&self, mappings: Vec<VcsMapping>) {
        *self.mappings.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = mappings;
        *self.writes.lock().unwrap_or_else(std::sync::PoisonError::into_inner) += 1;
    }
}

/// Keys of the roots the synchronizer has registered itself.
pub type GitRootRegistry = BTreeSet<String>;

/// What a reconciliation did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    /// `true` when the mapping list was written
    pub changed: bool,
}

/// Keys of resolved checkouts, excluding the project root itself.
#[must_use]
pub fn desired_roots(dependencies: &[ResolvedDependency], project_root: &Path) -> BTreeSet<String> {
    let project_key = path_key(project_root);
    dependencies
        .iter()
        .filter_map(|dep| dep.content_root.as_deref())
        .filter_map(path_key)
        .filter(|key| Some(key) != project_key.as_ref())
        .collect()
}

/// Brings the host's mappings in line with `desired` and updates `registry`.
///
/// Does nothing when the host does not support `system`.
pub fn reconcile(
    host: &dyn VcsMappings,
    system: &str,
    registry: &mut GitRootRegistry,
    desired: &BTreeSet<String>,
) -> ReconcileOutcome {
    if !host.supports(system) {
        tracing::debug!("Version control system '{}' unavailable, skipping mappings", system);
        return ReconcileOutcome::default();
    }

    let existing = host.list_mappings();
    let retract: BTreeSet<&String> = registry.difference(desired).collect();

    let mut removed = Vec::new();
    let mut kept = Vec::with_capacity(existing.len());
    for mapping in existing {
        let key = normalize_key(&mapping.directory);
        let owned = mapping.vcs == system && key.as_ref().is_some_and(|k| retract.contains(k));
        if owned {
            if let Some(key) = key {
                removed.push(key);
            }
        } else {
            kept.push(mapping);
        }
    }

    let mapped: BTreeSet<String> = kept
        .iter()
        .filter(|mapping| mapping.vcs == system)
        .filter_map(|mapping| normalize_key(&mapping.directory))
        .collect();
    let added: Vec<String> = desired.iter().filter(|root| !mapped.contains(*root)).cloned().collect();

    // Only roots written by us are owned; a user's own mapping is never adopted.
    registry.retain(|root| desired.contains(root));
    registry.extend(added.iter().cloned());

    if added.is_empty() && removed.is_empty() {
        return ReconcileOutcome::default();
    }

    for root in &added {
        tracing::debug!("Registering {} as a {} root", root, system);
        kept.push(VcsMapping::new(root.clone(), system));
    }
    for root in &removed {
        tracing::debug!("Retracting {} root {}", system, root);
    }

    host.set_mappings(kept);
    ReconcileOutcome {
        added,
        removed,
        changed: true,
    }
}
