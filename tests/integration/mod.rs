//! Integration test suite for ckdeps
//!
//! End-to-end tests over real temporary directories: transitive collection,
//! tree building, the synchronizer's refresh cycle and the `ckdeps` binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **collection**: Manifest selection, checkout lookup and transitive traversal
//! - **tree_view**: Tree shape, placeholders and state restoration across rebuilds
//! - **synchronizer**: Refresh cycle, event filtering and mapping reconciliation
//! - **cli**: The `ckdeps` binary

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod cli;
mod collection;
mod synchronizer;
mod tree_view;
