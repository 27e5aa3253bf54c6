//! Core types shared across the crate
//!
//! Currently this is the error taxonomy: [`CutekitError`] for the fallible edges,
//! [`ErrorContext`] for user-facing presentation and [`user_friendly_error`] to
//! turn any [`anyhow::Error`] into something printable by the CLI.

pub mod error;

pub use error::{CutekitError, ErrorContext, user_friendly_error};
