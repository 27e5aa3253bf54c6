//! Test environment setup and management
//!
//! A temporary directory holding a project root and a fake home directory, so
//! tests control both the per-project and the user-global extern caches.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::constants::{CUTEKIT_DIR, EXTERN_DIR};
use crate::resolver::{DependencyCollector, ExternResolver};

/// Test environment helper that sets up a CuteKit project layout
pub struct TestEnvironment {
    pub temp_dir: TempDir,
    pub project_dir: PathBuf,
    pub home_dir: PathBuf,
}

impl TestEnvironment {
    /// Create a new test environment with empty `project` and `home` directories
    pub fn new() -> Result<Self> {
        super::init_test_logging(None);

        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().join("project");
        let home_dir = temp_dir.path().join("home");

        fs::create_dir_all(&project_dir)?;
        fs::create_dir_all(&home_dir)?;

        Ok(Self {
            temp_dir,
            project_dir,
            home_dir,
        })
    }

    /// Creates `<project>/.cutekit/extern/<id>`
    pub fn create_extern_cache(&self, id: &str) -> Result<PathBuf> {
        Self::create_dir(&self.project_dir.join(CUTEKIT_DIR).join(EXTERN_DIR).join(id))
    }

    /// Creates `<home>/.cutekit/extern/<id>`
    pub fn create_global_cache(&self, id: &str) -> Result<PathBuf> {
        Self::create_dir(&self.home_dir.join(CUTEKIT_DIR).join(EXTERN_DIR).join(id))
    }

    /// Creates `<project>/<id>`
    pub fn create_vendored(&self, id: &str) -> Result<PathBuf> {
        Self::create_dir(&self.project_dir.join(id))
    }

    /// Writes a file relative to the project root, creating parents
    pub fn write_file(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.project_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Collector whose global cache lives in this environment's home
    pub fn collector(&self) -> DependencyCollector {
        DependencyCollector::new(ExternResolver::new(Some(self.home_dir.clone())))
    }

    /// Get the path to the project directory
    pub fn project_path(&self) -> &Path {
        &self.project_dir
    }

    fn create_dir(path: &Path) -> Result<PathBuf> {
        fs::create_dir_all(path).with_context(|| format!("Failed to create {}", path.display()))?;
        Ok(path.to_path_buf())
    }
}
