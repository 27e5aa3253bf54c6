//! Error handling for ckdeps
//!
//! This module provides the error types and user-friendly error reporting used by the
//! dependency collector, the tree synchronizer and the `ckdeps` binary. The error system
//! follows two rules:
//! 1. **Strongly-typed errors** for the few edges that can actually fail
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! The core itself never fails outright: unreadable or malformed manifests degrade to
//! "no externs at this root", an extern without a checkout becomes a placeholder node,
//! and an unparseable path drops the event that carried it. The typed errors below
//! surface only from configuration loading, watcher setup, worker failures and the
//! diagnostics exposed by [`ManifestReader::try_read_file`].
//!
//! # Error Conversion and Context
//!
//! Common library errors are automatically converted:
//! - [`std::io::Error`] → [`CutekitError::IoError`]
//! - [`serde_json::Error`] → [`CutekitError::JsonError`]
//! - [`toml::de::Error`] → [`CutekitError::TomlError`]
//!
//! Use [`user_friendly_error`] to convert any error into a user-friendly format with
//! contextual suggestions.
//!
//! # Examples
//!
//! ```rust,no_run
//! use cutekit_deps::core::{CutekitError, ErrorContext};
//!
//! let context = ErrorContext::new(CutekitError::InvalidProjectRoot {
//!     path: "/does/not/exist".to_string(),
//! })
//! .with_suggestion("Pass an existing directory with --project");
//!
//! context.display();
//! ```
//!
//! [`ManifestReader::try_read_file`]: crate::manifest::ManifestReader::try_read_file

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for ckdeps operations
///
/// # Error Categories
///
/// ## Manifests
/// - [`ManifestReadError`] - A manifest or lockfile exists but cannot be read
/// - [`ManifestParseError`] - A manifest or lockfile is not a valid JSON object
///
/// ## Configuration
/// - [`ConfigError`] - Invalid configuration values
/// - [`ConfigParseError`] - The configuration file is not valid TOML
///
/// ## Runtime
/// - [`InvalidProjectRoot`] - The project root is missing or not a directory
/// - [`WatcherError`] - The filesystem watcher could not be set up
/// - [`WorkerFailed`] - A background refresh task panicked or was cancelled
///
/// [`ManifestReadError`]: CutekitError::ManifestReadError
/// [`ManifestParseError`]: CutekitError::ManifestParseError
/// [`ConfigError`]: CutekitError::ConfigError
/// [`ConfigParseError`]: CutekitError::ConfigParseError
/// [`InvalidProjectRoot`]: CutekitError::InvalidProjectRoot
/// [`WatcherError`]: CutekitError::WatcherError
/// [`WorkerFailed`]: CutekitError::WorkerFailed
#[derive(Error, Debug)]
pub enum CutekitError {
    /// Manifest or lockfile could not be read from disk
    #[error("Failed to read {file}: {reason}")]
    ManifestReadError {
        /// Path to the manifest file that could not be read
        file: String,
        /// Underlying I/O failure
        reason: String,
    },

    /// Manifest or lockfile is not a valid JSON object
    ///
    /// The collector downgrades this to an empty extern list and logs it; the
    /// variant is only surfaced by diagnostics.
    #[error("Failed to parse {file}: {reason}")]
    ManifestParseError {
        /// Path to the manifest file that failed to parse
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// Configuration file parsing error
    #[error("Invalid configuration file syntax in {file}")]
    ConfigParseError {
        /// Path to the configuration file
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// Project root is missing or not a directory
    #[error("Project root is not a directory: {path}")]
    InvalidProjectRoot {
        /// The offending path
        path: String,
    },

    /// Filesystem watcher could not be created or attached to a path
    #[error("Failed to watch {path}: {reason}")]
    WatcherError {
        /// Path that could not be watched
        path: String,
        /// Reason reported by the watcher backend
        reason: String,
    },

    /// Background refresh task did not complete
    #[error("Refresh worker failed: {reason}")]
    WorkerFailed {
        /// Join error reported by the runtime
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl CutekitError {
    /// Rebuild an equivalent error for display purposes.
    ///
    /// Wrapped library errors do not implement `Clone`, so they are flattened
    /// into [`CutekitError::Other`] with the same message.
    fn to_owned_error(&self) -> Self {
        match self {
            Self::ManifestReadError {
                file,
                reason,
            } => Self::ManifestReadError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::ManifestParseError {
                file,
                reason,
            } => Self::ManifestParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::ConfigParseError {
                file,
                reason,
            } => Self::ConfigParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::InvalidProjectRoot {
                path,
            } => Self::InvalidProjectRoot {
                path: path.clone(),
            },
            Self::WatcherError {
                path,
                reason,
            } => Self::WatcherError {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::WorkerFailed {
                reason,
            } => Self::WorkerFailed {
                reason: reason.clone(),
            },
            other => Self::Other {
                message: other.to_string(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// When displayed, errors show:
/// 1. **Error**: The main error message in red
/// 2. **Details**: Additional context about the error in yellow (optional)
/// 3. **Suggestion**: Actionable steps to resolve the issue in green (optional)
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: CutekitError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: CutekitError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`CutekitError`] variants, [`std::io::Error`] and [`toml::de::Error`];
/// anything else is reported with its full cause chain.
///
/// # Examples
///
/// ```rust,no_run
/// use cutekit_deps::core::user_friendly_error;
///
/// let error = anyhow::anyhow!("Something went wrong");
/// let context = user_friendly_error(error);
/// context.display();
/// ```
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(ck_error) = error.downcast_ref::<CutekitError>() {
        return create_error_context(ck_error.to_owned_error());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(CutekitError::Other {
                    message: format!("Permission denied: {io_error}"),
                })
                .with_suggestion("Check the ownership and permissions of the project directory");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(CutekitError::Other {
                    message: format!("File not found: {io_error}"),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(CutekitError::ConfigParseError {
            file: "ckdeps.toml".to_string(),
            reason: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax of your configuration file");
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(CutekitError::Other {
        message,
    })
}

fn create_error_context(error: CutekitError) -> ErrorContext {
    match &error {
        CutekitError::ManifestReadError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the file permissions of the manifest or lockfile")
            .with_details("Unreadable manifests are skipped during collection"),
        CutekitError::ManifestParseError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Make sure the file is a JSON object with an optional \"extern\" object")
            .with_details("Malformed manifests are treated as declaring no externs"),
        CutekitError::ConfigParseError {
            reason,
            ..
        } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Fix the TOML syntax or remove the file to fall back to defaults")
                .with_details(details)
        }
        CutekitError::InvalidProjectRoot {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Run ckdeps from a CuteKit project or pass --project <DIR>"),
        CutekitError::WatcherError {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "On Linux, raise fs.inotify.max_user_watches or reduce the number of checked-out externs",
        ),
        CutekitError::WorkerFailed {
            ..
        } => ErrorContext::new(error).with_suggestion("Re-run with --verbose to see the worker logs"),
        _ => ErrorContext::new(error),
    }
}
