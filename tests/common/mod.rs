//! Common test utilities and fixtures for ckdeps integration tests
//!
//! [`ProjectFixture`] lays out a temporary CuteKit project next to a fake home
//! directory and a configuration file pointing at it, so neither the user's real
//! extern cache nor their configuration leak into a test.

// Allow dead code because these utilities are used across different test files
// and not all utilities are used in every test file
#![allow(dead_code)]

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use cutekit_deps::constants::{CUTEKIT_DIR, EXTERN_DIR, LOCKFILE_NAME, MANIFEST_NAME};
use cutekit_deps::resolver::{DependencyCollector, ExternResolver};

/// Temporary project, home directory and configuration file
pub struct ProjectFixture {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    project_dir: PathBuf,
    home_dir: PathBuf,
    config_path: PathBuf,
}

impl ProjectFixture {
    /// Create a new fixture with an empty project
    pub fn new() -> Result<Self> {
        cutekit_deps::test_utils::init_test_logging(None);

        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().join("app");
        let home_dir = temp_dir.path().join("home");
        let config_path = temp_dir.path().join("ckdeps.toml");

        fs::create_dir_all(&project_dir)?;
        fs::create_dir_all(&home_dir)?;
        fs::write(&config_path, format!("home_dir = {:?}\n", home_dir.display().to_string()))?;

        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
            home_dir,
            config_path,
        })
    }

    pub fn project_path(&self) -> &Path {
        &self.project_dir
    }

    pub fn home_path(&self) -> &Path {
        &self.home_dir
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Collector using this fixture's home as the global cache
    pub fn collector(&self) -> DependencyCollector {
        DependencyCollector::new(ExternResolver::new(Some(self.home_dir.clone())))
    }

    /// Write `project.lock` at `dir` declaring `externs` (`[(id, fields)]`)
    pub fn write_lockfile(dir: &Path, externs: &[(&str, Value)]) -> Result<PathBuf> {
        Self::write_document(&dir.join(LOCKFILE_NAME), externs)
    }

    /// Write `project` at `dir` declaring `externs`
    pub fn write_manifest(dir: &Path, externs: &[(&str, Value)]) -> Result<PathBuf> {
        Self::write_document(&dir.join(MANIFEST_NAME), externs)
    }

    /// Create `<root>/.cutekit/extern/<id>` with a `README.md`
    pub fn create_extern_cache(root: &Path, id: &str) -> Result<PathBuf> {
        let dir = root.join(CUTEKIT_DIR).join(EXTERN_DIR).join(id);
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        fs::write(dir.join("README.md"), format!("# {id}\n"))?;
        Ok(dir)
    }

    /// Create `<home>/.cutekit/extern/<id>` with a `README.md`
    pub fn create_global_cache(&self, id: &str) -> Result<PathBuf> {
        Self::create_extern_cache(&self.home_dir, id)
    }

    /// Write a file relative to the project root, creating parents
    pub fn write_file(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.project_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// `ckdeps` command pinned to this fixture's project and configuration
    pub fn ckdeps(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("ckdeps").expect("ckdeps binary is built");
        cmd.arg("--project")
            .arg(&self.project_dir)
            .arg("--config")
            .arg(&self.config_path)
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }

    fn write_document(path: &Path, externs: &[(&str, Value)]) -> Result<PathBuf> {
        let externs: serde_json::Map<String, Value> =
            externs.iter().map(|(id, fields)| ((*id).to_string(), fields.clone())).collect();
        let document = json!({
            "$schema": "https://schemas.cute.engineering/stable/cutekit.manifest.project.v1",
            "extern": externs,
        });
        fs::write(path, serde_json::to_string_pretty(&document)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path.to_path_buf())
    }
}

/// `{"git": url}`
pub fn git(url: &str) -> Value {
    json!({ "git": url })
}

/// `{"git": url, "tag": tag}`
pub fn git_tag(url: &str, tag: &str) -> Value {
    json!({ "git": url, "tag": tag })
}
