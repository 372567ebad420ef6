//! iedit installer library.
//!
//! Fetches, verifies and installs the iedit editor for the current
//! platform from a release manifest. Used by the `iedit-installer` binary
//! and consumable programmatically for testing or custom installs.
//!
//! # Modules
//!
//! - [`artefact`] - Release manifests, platform dispatch and integrity
//! - [`builder`] - Building from source tarballs with cargo
//! - [`cli`] - Command-line argument definitions
//! - [`dirs`] - Directory resolution abstraction for platform-specific paths
//! - [`error`] - Installer error types
//! - [`install_flow`] - Install orchestration
//! - [`output`] - Progress and dry-run output
//! - [`smoke_test`] - Post-install `--version` check

pub mod artefact;
pub mod builder;
pub mod cli;
pub mod dirs;
pub mod error;
pub mod install_flow;
pub mod output;

#[cfg(test)]
mod test_utils;
