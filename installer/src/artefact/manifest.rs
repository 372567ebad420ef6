//! Release manifest schema and parsing.
//!
//! A manifest describes one release and the artefacts published for it:
//!
//! ```json
//! {
//!   "name": "iedit",
//!   "version": "0.1.0",
//!   "description": "...",
//!   "homepage": "https://github.com/gooplancton/iedit",
//!   "artefacts": [
//!     { "target": "linux", "format": "raw-binary", "sha256": "..." }
//!   ]
//! }
//! ```
//!
//! Newtype validation runs during deserialization; cross-entry checks run
//! in [`parse_manifest`].

use super::error::ArtefactError;
use super::naming::{ArtefactName, expand_url, release_url, source_url};
use super::sha256_digest::PinnedDigest;
use super::target::ArtefactTarget;
use super::version::ReleaseVersion;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// The manifest describing the current release, compiled into the binary.
const EMBEDDED_MANIFEST: &str = include_str!("../../release.json");

/// How an artefact carries the executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtefactFormat {
    /// The file is the executable.
    RawBinary,
    /// A gzip tarball containing a single `iedit` executable.
    TarGz,
    /// A gzip tarball of the source tree, built with cargo.
    SourceTarGz,
}

/// One downloadable artefact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtefactEntry {
    /// The platform slot this artefact serves.
    pub target: ArtefactTarget,
    /// How the artefact carries the executable.
    pub format: ArtefactFormat,
    /// Download location; may contain `{version}`. Derived from the naming
    /// policy when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// The pinned checksum.
    pub sha256: PinnedDigest,
}

impl ArtefactEntry {
    /// The asset file name used for the download.
    #[must_use]
    pub fn artefact_name(&self, version: &ReleaseVersion) -> ArtefactName {
        match self.format {
            ArtefactFormat::RawBinary => ArtefactName::raw(self.target),
            ArtefactFormat::TarGz => ArtefactName::archive(self.target),
            ArtefactFormat::SourceTarGz => ArtefactName::source_archive(version.clone()),
        }
    }

    /// The resolved download URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use iedit_installer::artefact::manifest::{ArtefactEntry, ArtefactFormat};
    /// use iedit_installer::artefact::sha256_digest::PinnedDigest;
    /// use iedit_installer::artefact::target::ArtefactTarget;
    /// use iedit_installer::artefact::version::ReleaseVersion;
    ///
    /// let entry = ArtefactEntry {
    ///     target: ArtefactTarget::Linux,
    ///     format: ArtefactFormat::RawBinary,
    ///     url: None,
    ///     sha256: PinnedDigest::try_from("a".repeat(64)).expect("valid digest"),
    /// };
    /// let version = ReleaseVersion::try_from("0.2.0").expect("valid version");
    /// assert!(entry.url(&version).ends_with("/v0.2.0/iedit-linux"));
    /// ```
    #[must_use]
    pub fn url(&self, version: &ReleaseVersion) -> String {
        if let Some(template) = &self.url {
            return expand_url(template, version);
        }
        match self.format {
            ArtefactFormat::SourceTarGz => source_url(version),
            ArtefactFormat::RawBinary | ArtefactFormat::TarGz => {
                release_url(version, &self.artefact_name(version).filename())
            }
        }
    }
}

/// A release and its artefacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReleaseManifest {
    /// Package name.
    pub name: String,
    /// Release version.
    pub version: ReleaseVersion,
    /// One-line description.
    #[serde(default)]
    pub description: String,
    /// Project homepage.
    #[serde(default)]
    pub homepage: String,
    /// Published artefacts, at most one per target.
    #[serde(default)]
    pub artefacts: Vec<ArtefactEntry>,
}

impl ReleaseManifest {
    /// The artefact serving `target`, if published.
    #[must_use]
    pub fn artefact_for(&self, target: ArtefactTarget) -> Option<&ArtefactEntry> {
        self.artefacts.iter().find(|entry| entry.target == target)
    }

    fn validate(&self) -> Result<(), ArtefactError> {
        let mut seen = HashSet::new();
        for entry in &self.artefacts {
            if !seen.insert(entry.target) {
                return Err(ArtefactError::DuplicateTarget {
                    target: entry.target.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Errors arising from manifest loading.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// JSON deserialization or field validation failed.
    #[error("manifest parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The manifest parsed but is inconsistent.
    #[error("invalid manifest: {0}")]
    Invalid(#[from] ArtefactError),

    /// The manifest file could not be read.
    #[error("failed to read manifest {path}: {source}")]
    Read {
        /// The manifest path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Parse a JSON string into a validated [`ReleaseManifest`].
///
/// # Errors
///
/// Returns [`ManifestError::Json`] when the JSON is malformed or any field
/// fails validation, and [`ManifestError::Invalid`] when two artefacts
/// share a target.
///
/// # Examples
///
/// ```
/// use iedit_installer::artefact::manifest::parse_manifest;
/// use iedit_installer::artefact::target::ArtefactTarget;
///
/// let json = concat!(
///     r#"{"name":"iedit","version":"0.1.0","artefacts":["#,
///     r#"{"target":"linux","format":"raw-binary","#,
///     r#""sha256":"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"}]}"#,
/// );
/// let manifest = parse_manifest(json).expect("valid manifest");
/// assert!(manifest.artefact_for(ArtefactTarget::Linux).is_some());
/// ```
pub fn parse_manifest(json: &str) -> Result<ReleaseManifest, ManifestError> {
    let manifest: ReleaseManifest = serde_json::from_str(json)?;
    manifest.validate()?;
    Ok(manifest)
}

/// Read and parse the manifest at `path`.
///
/// # Errors
///
/// Returns [`ManifestError::Read`] when the file cannot be read, otherwise
/// as [`parse_manifest`].
pub fn load_manifest(path: &Path) -> Result<ReleaseManifest, ManifestError> {
    let json = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest(&json)
}

/// The manifest of the release this installer was built for.
///
/// # Errors
///
/// Fails only if the embedded manifest is malformed.
pub fn embedded_manifest() -> Result<ReleaseManifest, ManifestError> {
    parse_manifest(EMBEDDED_MANIFEST)
}
