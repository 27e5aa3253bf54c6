//! User-wide synchronizer settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use crate::constants::{
    CONFIG_ENV_VAR, CONFIG_FILE_NAME, CUTEKIT_DIR, DEFAULT_DEBOUNCE_MS, DEFAULT_VCS_SYSTEM,
};
use crate::core::CutekitError;
use crate::utils::platform::{expand_tilde, get_home_dir};

/// Upper bound accepted for `debounce_ms` (one minute).
const MAX_DEBOUNCE_MS: u64 = 60_000;

fn default_vcs_system() -> String {
    DEFAULT_VCS_SYSTEM.to_string()
}

const fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

/// Settings shared by the CLI commands and the synchronizer.
///
/// # Examples
///
/// ```rust,no_run
/// use cutekit_deps::config::SyncConfig;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = SyncConfig::load().await?;
/// println!("registering externs as {} roots", config.vcs_system);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// Overrides the home directory used for `<home>/.cutekit/extern`.
    ///
    /// A leading `~` is expanded. When unset, the user's home directory is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_dir: Option<PathBuf>,

    /// Version-control system name used for extern root mappings.
    #[serde(default = "default_vcs_system")]
    pub vcs_system: String,

    /// Filesystem event coalescing window in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            home_dir: None,
            vcs_system: default_vcs_system(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl SyncConfig {
    /// Loads from the default location, falling back to defaults when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, is not valid TOML,
    /// or holds out-of-range values.
    pub async fn load() -> Result<Self> {
        Self::load_with_optional(None).await
    }

    /// Loads from `path` when given, otherwise from [`default_path`](Self::default_path).
    ///
    /// A missing file yields defaults in both cases.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let Some(path) = path.or_else(Self::default_path) else {
            tracing::debug!("No configuration path available, using defaults");
            return Ok(Self::default());
        };
        if fs::try_exists(&path).await.unwrap_or(false) {
            Self::load_from(&path).await
        } else {
            tracing::debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Loads and validates a specific file.
    ///
    /// # Errors
    ///
    /// Returns [`CutekitError::ConfigParseError`] for invalid TOML and
    /// [`CutekitError::ConfigError`] for invalid values.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        let config: Self = toml::from_str(&content).map_err(|e| CutekitError::ConfigParseError {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;
        config.validate()?;

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`CutekitError::ConfigError`] describing the first invalid value.
    pub fn validate(&self) -> Result<(), CutekitError> {
        if self.vcs_system.trim().is_empty() {
            return Err(CutekitError::ConfigError {
                message: "vcs_system must not be empty".to_string(),
            });
        }
        if self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(CutekitError::ConfigError {
                message: format!(
                    "debounce_ms must be at most {MAX_DEBOUNCE_MS}, got {}",
                    self.debounce_ms
                ),
            });
        }
        Ok(())
    }

    /// Default configuration path: `$CKDEPS_CONFIG`, else `~/.cutekit/ckdeps.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => return Some(PathBuf::from(path)),
            _ => {}
        }
        dirs::home_dir().map(|home| home.join(CUTEKIT_DIR).join(CONFIG_FILE_NAME))
    }

    /// Home directory for the user-global extern cache.
    #[must_use]
    pub fn effective_home(&self) -> Option<PathBuf> {
        match &self.home_dir {
            Some(home) => Some(expand_tilde(home)),
            None => get_home_dir(),
        }
    }

    /// Event coalescing window.
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
