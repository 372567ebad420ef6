//! Artefact file naming and download URLs.
//!
//! Raw binaries are published as `iedit-<target>`, archives as
//! `iedit-<target>.tar.gz`, and source tarballs as `iedit-<version>.tar.gz`.
//! Whatever the artefact, the installed executable is always [`BINARY_NAME`].

use super::target::ArtefactTarget;
use super::version::ReleaseVersion;
use std::fmt;

/// The canonical name of the installed executable.
pub const BINARY_NAME: &str = "iedit";

/// The GitHub repository owner/name for URL construction.
const GITHUB_REPO: &str = "gooplancton/iedit";

/// The fixed file extension for gzip-compressed tarballs.
const ARCHIVE_EXTENSION: &str = ".tar.gz";

/// Placeholder substituted in manifest URL templates.
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// A release asset file name.
///
/// # Examples
///
/// ```
/// use iedit_installer::artefact::naming::ArtefactName;
/// use iedit_installer::artefact::target::ArtefactTarget;
///
/// assert_eq!(ArtefactName::raw(ArtefactTarget::Linux).to_string(), "iedit-linux");
/// assert_eq!(
///     ArtefactName::archive(ArtefactTarget::MacOsArm64).to_string(),
///     "iedit-macos-arm64.tar.gz"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtefactName {
    /// A bare executable for one target.
    Raw(ArtefactTarget),
    /// A tarball holding the executable for one target.
    Archive(ArtefactTarget),
    /// The source tree of a release.
    Source(ReleaseVersion),
}

impl ArtefactName {
    /// Name of the bare executable for `target`.
    #[must_use]
    pub fn raw(target: ArtefactTarget) -> Self {
        Self::Raw(target)
    }

    /// Name of the binary tarball for `target`.
    #[must_use]
    pub fn archive(target: ArtefactTarget) -> Self {
        Self::Archive(target)
    }

    /// Name of the source tarball for `version`.
    #[must_use]
    pub fn source_archive(version: ReleaseVersion) -> Self {
        Self::Source(version)
    }

    /// Return the filename as a string without consuming the value.
    #[must_use]
    pub fn filename(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ArtefactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(target) => write!(f, "{BINARY_NAME}-{target}"),
            Self::Archive(target) => write!(f, "{BINARY_NAME}-{target}{ARCHIVE_EXTENSION}"),
            Self::Source(version) => write!(f, "{BINARY_NAME}-{version}{ARCHIVE_EXTENSION}"),
        }
    }
}

/// The default download URL of `filename` in the `version` release.
///
/// # Examples
///
/// ```
/// use iedit_installer::artefact::naming::release_url;
/// use iedit_installer::artefact::version::ReleaseVersion;
///
/// let version = ReleaseVersion::try_from("0.1.0").expect("valid");
/// assert_eq!(
///     release_url(&version, "iedit-linux"),
///     "https://github.com/gooplancton/iedit/releases/download/v0.1.0/iedit-linux"
/// );
/// ```
#[must_use]
pub fn release_url(version: &ReleaseVersion, filename: &str) -> String {
    format!(
        "https://github.com/{GITHUB_REPO}/releases/download/{}/{filename}",
        version.tag()
    )
}

/// The default download URL of the `version` source tarball.
#[must_use]
pub fn source_url(version: &ReleaseVersion) -> String {
    format!(
        "https://github.com/{GITHUB_REPO}/archive/refs/tags/{}{ARCHIVE_EXTENSION}",
        version.tag()
    )
}

/// Substitute `{version}` in a manifest URL template.
#[must_use]
pub fn expand_url(template: &str, version: &ReleaseVersion) -> String {
    template.replace(VERSION_PLACEHOLDER, version.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn version() -> ReleaseVersion {
        ReleaseVersion::try_from("0.1.0").expect("valid version")
    }

    #[rstest]
    #[case::intel_mac(ArtefactTarget::MacOsX86_64, "iedit-macos-x86_64")]
    #[case::arm_mac(ArtefactTarget::MacOsArm64, "iedit-macos-arm64")]
    #[case::linux(ArtefactTarget::Linux, "iedit-linux")]
    fn raw_names_follow_release_convention(#[case] target: ArtefactTarget, #[case] expected: &str) {
        assert_eq!(ArtefactName::raw(target).filename(), expected);
        assert_eq!(
            ArtefactName::archive(target).filename(),
            format!("{expected}.tar.gz")
        );
    }

    #[rstest]
    fn source_archive_is_versioned(version: ReleaseVersion) {
        assert_eq!(
            ArtefactName::source_archive(version).filename(),
            "iedit-0.1.0.tar.gz"
        );
    }

    #[rstest]
    fn templates_expand_version(version: ReleaseVersion) {
        assert_eq!(
            expand_url(
                "https://github.com/gooplancton/iedit/archive/refs/tags/v{version}.tar.gz",
                &version
            ),
            "https://github.com/gooplancton/iedit/archive/refs/tags/v0.1.0.tar.gz"
        );
    }

    #[rstest]
    fn source_url_points_at_tag_archive(version: ReleaseVersion) {
        assert_eq!(
            source_url(&version),
            "https://github.com/gooplancton/iedit/archive/refs/tags/v0.1.0.tar.gz"
        );
    }

    #[rstest]
    fn release_url_uses_tag(version: ReleaseVersion) {
        let url = release_url(&version, "iedit-macos-arm64.tar.gz");
        assert!(url.contains(GITHUB_REPO));
        assert!(url.ends_with("/v0.1.0/iedit-macos-arm64.tar.gz"));
    }
}
