//! SHA-256 digests pinned in release manifests.
//!
//! A manifest digest is either a 64-character lowercase hexadecimal string
//! or an unresolved `REPLACE_WITH_...` placeholder left in the recipe. The
//! latter parses so that the manifest stays readable, but an install that
//! selects it fails before any download.

use super::error::{ArtefactError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::Read;
use std::path::Path;

/// Expected length of a hex-encoded SHA-256 digest.
const DIGEST_HEX_LEN: usize = 64;

/// Prefix of the placeholder digests found in unfinished recipes.
pub const UNRESOLVED_PREFIX: &str = "REPLACE_WITH";

/// A validated hex-encoded SHA-256 digest string.
///
/// # Examples
///
/// ```
/// use iedit_installer::artefact::sha256_digest::Sha256Digest;
///
/// let hex = "a".repeat(64);
/// let digest = Sha256Digest::try_from(hex.as_str()).expect("valid digest");
/// assert_eq!(digest.as_str().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Return the digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Sha256Digest {
    type Error = ArtefactError;

    fn try_from(value: &str) -> Result<Self> {
        validate_sha256(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for Sha256Digest {
    type Error = ArtefactError;

    fn try_from(value: String) -> Result<Self> {
        validate_sha256(&value)?;
        Ok(Self(value))
    }
}

impl AsRef<str> for Sha256Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate that `value` is a well-formed hex-encoded SHA-256 digest.
fn validate_sha256(value: &str) -> Result<()> {
    if value.len() != DIGEST_HEX_LEN {
        return Err(ArtefactError::InvalidSha256Digest {
            reason: format!(
                "expected {DIGEST_HEX_LEN} hex characters, got {}",
                value.len()
            ),
        });
    }
    if let Some(bad) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ArtefactError::InvalidSha256Digest {
            reason: format!("non-hex character '{bad}'"),
        });
    }
    if value.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ArtefactError::InvalidSha256Digest {
            reason: "digest must be lowercase".to_owned(),
        });
    }
    Ok(())
}

/// The digest recorded for one artefact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PinnedDigest {
    /// A real checksum.
    Sha256(Sha256Digest),
    /// A placeholder that was never filled in.
    Unresolved(String),
}

impl PinnedDigest {
    /// The checksum, unless the digest is still a placeholder.
    #[must_use]
    pub fn resolved(&self) -> Option<&Sha256Digest> {
        match self {
            Self::Sha256(digest) => Some(digest),
            Self::Unresolved(_) => None,
        }
    }
}

impl TryFrom<String> for PinnedDigest {
    type Error = ArtefactError;

    fn try_from(value: String) -> Result<Self> {
        if value.starts_with(UNRESOLVED_PREFIX) {
            return Ok(Self::Unresolved(value));
        }
        Sha256Digest::try_from(value).map(Self::Sha256)
    }
}

impl From<PinnedDigest> for String {
    fn from(digest: PinnedDigest) -> Self {
        match digest {
            PinnedDigest::Sha256(digest) => digest.0,
            PinnedDigest::Unresolved(placeholder) => placeholder,
        }
    }
}

impl fmt::Display for PinnedDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256(digest) => write!(f, "{digest}"),
            Self::Unresolved(placeholder) => write!(f, "{placeholder} (unresolved)"),
        }
    }
}

/// Compute the SHA-256 digest of the file at `path`, streaming it in 8 KiB
/// chunks.
///
/// # Errors
///
/// Returns any I/O error raised while reading the file.
pub fn compute_sha256(path: &Path) -> std::io::Result<Sha256Digest> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(buffer.get(..bytes_read).unwrap_or_default());
    }
    Ok(Sha256Digest(format!("{:x}", hasher.finalize())))
}
