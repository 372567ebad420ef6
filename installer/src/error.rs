//! Error types for the iedit installer.
//!
//! Every failure aborts the install; nothing is retried. Variants that can
//! happen before the bin directory is touched say so in their message.

use crate::artefact::download::DownloadError;
use crate::artefact::error::ArtefactError;
use crate::artefact::extraction::ExtractionError;
use crate::artefact::manifest::ManifestError;
use crate::artefact::target::ArtefactTarget;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during installation.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// The host platform or requested target is not supported.
    #[error(transparent)]
    Artefact(#[from] ArtefactError),

    /// The release manifest could not be loaded.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// The release publishes nothing for the selected target.
    #[error("release {version} has no artefact for {target}")]
    NoArtefactForTarget {
        /// The selected target.
        target: ArtefactTarget,
        /// The release version.
        version: String,
    },

    /// The selected artefact's digest is still a placeholder.
    #[error("artefact for {target} has no pinned digest ({placeholder}); refusing to install")]
    UnpinnedDigest {
        /// The selected target.
        target: ArtefactTarget,
        /// The placeholder found in the manifest.
        placeholder: String,
    },

    /// Downloading the artefact failed.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// The downloaded bytes do not match the pinned digest.
    #[error("checksum mismatch for {url}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// The artefact URL.
        url: String,
        /// The pinned digest.
        expected: String,
        /// The digest of the downloaded file.
        actual: String,
    },

    /// Unpacking an archive failed.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Building from a source tarball failed.
    #[error("building from source failed: {reason}")]
    BuildFailed {
        /// Description of the build failure.
        reason: String,
    },

    /// No bin directory was given and none could be determined.
    #[error("could not determine a bin directory; pass --bin-dir")]
    NoBinDir,

    /// The bin directory cannot be written.
    #[error("bin directory {path} is not writable: {reason}")]
    BinDirNotWritable {
        /// Path to the bin directory.
        path: PathBuf,
        /// Description of the underlying I/O error.
        reason: String,
    },

    /// The installed binary did not report the expected version.
    #[error("smoke test of {binary} failed: {reason}")]
    SmokeTestFailed {
        /// The binary that was run.
        binary: PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;
