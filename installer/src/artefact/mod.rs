//! Release artefacts: platform dispatch, naming, manifests and integrity.
//!
//! # Sub-modules
//!
//! - [`download`]: artefact download trait and HTTP implementation.
//! - [`error`]: validation error types.
//! - [`extraction`]: tarball extraction with path traversal protection.
//! - [`manifest`]: release manifest schema and parsing.
//! - [`naming`]: artefact file names and download URLs.
//! - [`sha256_digest`]: pinned digests and checksum computation.
//! - [`target`]: platform detection and artefact targets.
//! - [`version`]: release version newtype.

pub mod download;
pub mod error;
pub mod extraction;
pub mod manifest;
pub mod naming;
pub mod sha256_digest;
pub mod target;
pub mod version;
