//! Error types for release manifests and artefact selection.
//!
//! Each variant names the rejected input and the constraint it violated.

use thiserror::Error;

/// Errors arising from invalid artefact-related values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtefactError {
    /// The host operating system or CPU architecture has no artefacts.
    #[error("unsupported platform {os}/{arch}")]
    UnsupportedPlatform {
        /// The operating system name as reported by the standard library.
        os: String,
        /// The architecture name as reported by the standard library.
        arch: String,
    },

    /// A target name is not one of the published artefact targets.
    #[error("unknown artefact target \"{value}\"; expected one of: {expected}")]
    UnknownTarget {
        /// The rejected target string.
        value: String,
        /// Comma-separated list of accepted targets.
        expected: String,
    },

    /// A SHA-256 digest is not a valid 64-character hex string.
    #[error("invalid SHA-256 digest: {reason}")]
    InvalidSha256Digest {
        /// Description of the validation failure.
        reason: String,
    },

    /// A release version is not of the form `MAJOR.MINOR.PATCH`.
    #[error("invalid release version \"{value}\": {reason}")]
    InvalidVersion {
        /// The rejected version string.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// The manifest lists more than one artefact for a target.
    #[error("manifest lists more than one artefact for {target}")]
    DuplicateTarget {
        /// The repeated target.
        target: String,
    },
}

/// Result type alias using [`ArtefactError`].
pub type Result<T> = std::result::Result<T, ArtefactError>;
