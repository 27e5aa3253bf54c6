//! Command-line interface for ckdeps.
//!
//! # Commands
//!
//! - `list` - Print the collected dependencies as text or JSON
//! - `tree` - Print the dependency tree the way a side panel would show it
//! - `check` - Report per-root manifest diagnostics and unresolved externs
//! - `watch` - Keep the tree in sync with the filesystem until interrupted
//!
//! # Global Options
//!
//! - `--verbose` / `-v` - Debug logging
//! - `--quiet` / `-q` - Errors only
//! - `--config` / `-c` - Configuration file (otherwise `$CKDEPS_CONFIG` or
//!   `~/.cutekit/ckdeps.toml`)
//! - `--project` / `-p` - Project root (otherwise the current directory)
//!
//! ```bash
//! ckdeps list --format json
//! ckdeps --project ../app tree --depth 2
//! ckdeps -v watch
//! ```

mod check;
mod list;
mod tree;
mod watch;


use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::config::SyncConfig;
use crate::core::CutekitError;
use crate::resolver::{Collection, DependencyCollector, ExternResolver};
use crate::utils::paths::absolutize;

/// Settings derived from the global flags, applied once before a command runs.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Default log filter; `RUST_LOG` takes precedence when set.
    pub log_level: Option<String>,

    /// Explicit configuration file.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the global `tracing` subscriber.
    ///
    /// Logs go to stderr so `list --format json` output stays parseable. Calling
    /// this twice is harmless; the second subscriber is ignored.
    pub fn init_logging(&self) {
        let filter = match std::env::var("RUST_LOG") {
            Ok(value) if !value.trim().is_empty() => EnvFilter::new(value),
            _ => EnvFilter::new(self.log_level.as_deref().unwrap_or("error")),
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

#[derive(Parser)]
#[command(
    name = "ckdeps",
    about = "CuteKit dependency browser - resolve externs and watch their checkouts",
    version,
    author,
    long_about = "ckdeps collects the externs declared by a CuteKit project and its dependencies, \
                  resolves their local checkouts and keeps a tree of them in sync with the filesystem."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, env = "CKDEPS_CONFIG")]
    config: Option<PathBuf>,

    /// Project root (defaults to the current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List collected dependencies
    List(list::ListCommand),

    /// Print the dependency tree
    Tree(tree::TreeCommand),

    /// Report manifest problems and unresolved externs
    Check(check::CheckCommand),

    /// Watch the project and print tree updates
    Watch(watch::WatchCommand),
}

/// What every command needs: where the project is and how to resolve externs.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub project_root: PathBuf,
    pub config: SyncConfig,
}

impl CommandContext {
    /// Loads configuration and validates the project root.
    ///
    /// # Errors
    ///
    /// Fails when the configuration is invalid or the project root is not a directory.
    pub async fn load(project: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<Self> {
        let config = SyncConfig::load_with_optional(config_path).await?;

        let requested = match project {
            Some(path) => path,
            None => std::env::current_dir().context("Failed to determine the current directory")?,
        };
        let project_root = absolutize(&requested).unwrap_or(requested);
        if !project_root.is_dir() {
            return Err(CutekitError::InvalidProjectRoot {
                path: project_root.display().to_string(),
            }
            .into());
        }

        Ok(Self {
            project_root,
            config,
        })
    }

    pub fn collector(&self) -> DependencyCollector {
        DependencyCollector::new(ExternResolver::new(self.config.effective_home()))
    }

    /// Runs a collection on the blocking pool.
    ///
    /// # Errors
    ///
    /// Fails only if the blocking task panics.
    pub async fn collect(&self) -> Result<Collection> {
        let collector = self.collector();
        let root = self.project_root.clone();
        tokio::task::spawn_blocking(move || collector.collect_with_visited(&root))
            .await
            .map_err(|e| CutekitError::WorkerFailed {
                reason: e.to_string(),
            })
            .context("Failed to collect dependencies")
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}

impl Cli {
    /// Runs the selected command with flags applied.
    ///
    /// # Errors
    ///
    /// Propagates the command's failure.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            Some("info".to_string())
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    /// Runs the selected command with an explicit [`CliConfig`].
    ///
    /// # Errors
    ///
    /// Propagates the command's failure.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();
        let context = CommandContext::load(self.project, config.config_path).await?;

        match self.command {
            Commands::List(cmd) => cmd.execute(&context).await,
            Commands::Tree(cmd) => cmd.execute(&context).await,
            Commands::Check(cmd) => cmd.execute(&context).await,
            Commands::Watch(cmd) => cmd.execute(&context).await,
        }
    }
}
