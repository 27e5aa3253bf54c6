//! Reading lockfiles and manifests from disk.

use std::path::Path;

use crate::constants::{LOCKFILE_NAME, MANIFEST_NAME};
use crate::core::CutekitError;

use super::helpers::parse_externs;
use super::{ExternDeclaration, ManifestRead, ManifestSource};

/// Loads extern declarations from a content root.
///
/// The reader is stateless; it exists as a type so that the collector and the
/// `check` command share one policy for choosing between lockfile and manifest.
///
/// # Examples
///
/// ```rust,no_run
/// use cutekit_deps::manifest::ManifestReader;
/// use std::path::Path;
///
/// let externs = ManifestReader::new().read(Path::new("/work/app"));
/// for extern_decl in &externs {
///     println!("{}", extern_decl.id);
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestReader;

impl ManifestReader {
    /// Creates a reader.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns the externs declared at `root`, or an empty list.
    #[must_use]
    pub fn read(&self, root: &Path) -> Vec<ExternDeclaration> {
        self.read_detailed(root).externs
    }

    /// Reads `root` and reports which file was used and what went wrong.
    ///
    /// Failures are logged and collected in [`ManifestRead::problems`]; they never
    /// abort the read.
    #[must_use]
    pub fn read_detailed(&self, root: &Path) -> ManifestRead {
        let mut problems = Vec::new();

        let lockfile = root.join(LOCKFILE_NAME);
        if lockfile.is_file() {
            match self.try_read_file(&lockfile) {
                Ok(externs) if !externs.is_empty() => {
                    return ManifestRead {
                        source: ManifestSource::Lockfile,
                        path: Some(lockfile),
                        externs,
                        problems,
                    };
                }
                Ok(_) => {
                    tracing::debug!("{} declares no externs, trying {}", lockfile.display(), MANIFEST_NAME);
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    problems.push(e);
                }
            }
        }

        let manifest = root.join(MANIFEST_NAME);
        if manifest.is_file() {
            match self.try_read_file(&manifest) {
                Ok(externs) => {
                    return ManifestRead {
                        source: ManifestSource::Manifest,
                        path: Some(manifest),
                        externs,
                        problems,
                    };
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    problems.push(e);
                }
            }
        }

        ManifestRead::empty(problems)
    }

    /// Reads and parses a single manifest or lockfile.
    ///
    /// # Errors
    ///
    /// - [`CutekitError::ManifestReadError`] when the file cannot be read as UTF-8
    /// - [`CutekitError::ManifestParseError`] when it is not a JSON object
    pub fn try_read_file(&self, path: &Path) -> Result<Vec<ExternDeclaration>, CutekitError> {
        let content = std::fs::read_to_string(path).map_err(|e| CutekitError::ManifestReadError {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let document: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| CutekitError::ManifestParseError {
                file: path.display().to_string(),
                reason: e.to_string(),
            })?;

        match document {
            serde_json::Value::Object(map) => Ok(parse_externs(&map)),
            _ => Err(CutekitError::ManifestParseError {
                file: path.display().to_string(),
                reason: "top-level value is not an object".to_string(),
            }),
        }
    }
}
