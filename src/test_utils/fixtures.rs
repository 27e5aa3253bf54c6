//! Builders for CuteKit manifest and lockfile JSON.

use anyhow::{Context, Result};
use serde_json::{Map, Value, json};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{LOCKFILE_NAME, MANIFEST_NAME};

/// Builder for a `project` / `project.lock` document.
#[derive(Clone, Debug, Default)]
pub struct ManifestFixture {
    externs: Map<String, Value>,
}

impl ManifestFixture {
    /// Empty document with an empty `extern` object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an extern with arbitrary fields.
    pub fn extern_entry(mut self, id: &str, fields: Value) -> Self {
        self.externs.insert(id.to_string(), fields);
        self
    }

    /// Adds an extern with only a `git` remote.
    pub fn git_extern(self, id: &str, git: &str) -> Self {
        self.extern_entry(
            id,
            json!({
                "git": git
            }),
        )
    }

    /// Adds an extern without a remote, so the vendored candidate is never used.
    pub fn bare_extern(self, id: &str) -> Self {
        self.extern_entry(id, json!({}))
    }

    /// Document as JSON text.
    pub fn render(&self) -> String {
        let document = json!({
            "$schema": "https://schemas.cute.engineering/stable/cutekit.manifest.project.v1",
            "id": "fixture",
            "extern": Value::Object(self.externs.clone()),
        });
        serde_json::to_string_pretty(&document).unwrap_or_default()
    }

    /// Writes `project.lock` into `dir`.
    pub fn write_lockfile(&self, dir: &Path) -> Result<PathBuf> {
        self.write_as(dir, LOCKFILE_NAME)
    }

    /// Writes `project` into `dir`.
    pub fn write_manifest(&self, dir: &Path) -> Result<PathBuf> {
        self.write_as(dir, MANIFEST_NAME)
    }

    fn write_as(&self, dir: &Path, name: &str) -> Result<PathBuf> {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        let path = dir.join(name);
        fs::write(&path, self.render()).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}
