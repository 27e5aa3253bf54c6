//! Global constants used throughout the crate.
//!
//! File names, cache layout segments, user-facing view texts and the
//! defaults for the configurable knobs live here so the values are
//! discoverable from a single place.

/// Lockfile name looked up at every content root (preferred over the manifest).
pub const LOCKFILE_NAME: &str = "project.lock";

/// Project manifest name looked up at every content root.
pub const MANIFEST_NAME: &str = "project";

/// Name of the per-project (and per-user) CuteKit metadata directory.
pub const CUTEKIT_DIR: &str = ".cutekit";

/// Directory under [`CUTEKIT_DIR`] holding extern checkouts.
pub const EXTERN_DIR: &str = "extern";

/// Placeholder shown under a dependency that has no local checkout.
pub const NO_CHECKOUT_MESSAGE: &str = "No local checkout found";

/// View text while a refresh is in flight.
pub const LOADING_TEXT: &str = "Loading CuteKit dependencies…";

/// View text when a refresh found no dependencies.
pub const EMPTY_TEXT: &str = "No CuteKit dependencies detected";

/// Separator joining key segments into a key path.
pub const KEY_PATH_SEPARATOR: &str = "|";

/// Version-control system name the reconciliation registers roots under.
pub const DEFAULT_VCS_SYSTEM: &str = "Git";

/// Default window used to coalesce filesystem events (200ms).
///
/// Bulk operations such as a `git checkout` inside an extern produce
/// hundreds of events; batching them keeps one refresh per burst.
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV_VAR: &str = "CKDEPS_CONFIG";

/// Configuration file name inside the user's [`CUTEKIT_DIR`].
pub const CONFIG_FILE_NAME: &str = "ckdeps.toml";

/// Capacity of the outbound notification channel.
pub const NOTIFICATION_BUFFER: usize = 64;
