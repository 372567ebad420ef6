//! Release version newtype.
//!
//! Accepts `MAJOR.MINOR.PATCH` with an optional `-prerelease` suffix. A
//! leading `v`, as used by release tags, is stripped.

use super::error::{ArtefactError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated release version, without the tag's leading `v`.
///
/// # Examples
///
/// ```
/// use iedit_installer::artefact::version::ReleaseVersion;
///
/// let version = ReleaseVersion::try_from("v0.1.0").expect("valid version");
/// assert_eq!(version.as_str(), "0.1.0");
/// assert_eq!(version.tag(), "v0.1.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReleaseVersion(String);

impl ReleaseVersion {
    /// Return the version as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The release tag, `v<version>`.
    #[must_use]
    pub fn tag(&self) -> String {
        format!("v{}", self.0)
    }
}

fn validate_version(value: &str) -> Result<()> {
    let invalid = |reason: &str| ArtefactError::InvalidVersion {
        value: value.to_owned(),
        reason: reason.to_owned(),
    };

    if value.is_empty() {
        return Err(invalid("version is empty"));
    }
    let (core, prerelease) = match value.split_once('-') {
        Some((core, prerelease)) => (core, Some(prerelease)),
        None => (value, None),
    };

    let parts: Vec<&str> = core.split('.').collect();
    if parts.len() != 3 {
        return Err(invalid("expected MAJOR.MINOR.PATCH"));
    }
    if parts
        .iter()
        .any(|part| part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()))
    {
        return Err(invalid("version components must be numeric"));
    }
    if prerelease.is_some_and(|suffix| {
        suffix.is_empty()
            || !suffix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    }) {
        return Err(invalid("malformed pre-release suffix"));
    }
    Ok(())
}

impl TryFrom<&str> for ReleaseVersion {
    type Error = ArtefactError;

    fn try_from(value: &str) -> Result<Self> {
        let bare = value.strip_prefix('v').unwrap_or(value);
        validate_version(bare)?;
        Ok(Self(bare.to_owned()))
    }
}

impl TryFrom<String> for ReleaseVersion {
    type Error = ArtefactError;

    fn try_from(value: String) -> Result<Self> {
        Self::try_from(value.as_str())
    }
}

impl From<ReleaseVersion> for String {
    fn from(version: ReleaseVersion) -> Self {
        version.0
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
