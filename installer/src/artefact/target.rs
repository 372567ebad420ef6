//! Platform detection and artefact target dispatch.
//!
//! Releases publish one artefact per [`ArtefactTarget`]. Dispatch happens
//! in two levels: first on the operating system, then, for macOS only, on
//! the CPU architecture. Every Linux architecture shares one artefact.

use super::error::{ArtefactError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating systems with published artefacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    /// Apple macOS.
    MacOs,
    /// Any Linux distribution.
    Linux,
}

/// CPU architectures with published artefacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    /// 64-bit Intel or AMD.
    X86_64,
    /// 64-bit ARM (Apple silicon on macOS).
    Aarch64,
}

/// An operating system and architecture pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
    /// Operating system.
    pub os: Os,
    /// CPU architecture.
    pub arch: Arch,
}

impl Platform {
    /// Build a platform from `std::env::consts`-style names.
    ///
    /// # Errors
    ///
    /// Returns [`ArtefactError::UnsupportedPlatform`] when either name is
    /// not one iedit ships for.
    ///
    /// # Examples
    ///
    /// ```
    /// use iedit_installer::artefact::target::{Arch, Os, Platform};
    ///
    /// let platform = Platform::from_names("macos", "aarch64").expect("supported");
    /// assert_eq!(platform.os, Os::MacOs);
    /// assert_eq!(platform.arch, Arch::Aarch64);
    /// assert!(Platform::from_names("windows", "x86_64").is_err());
    /// ```
    pub fn from_names(os: &str, arch: &str) -> Result<Self> {
        let unsupported = || ArtefactError::UnsupportedPlatform {
            os: os.to_owned(),
            arch: arch.to_owned(),
        };

        let os_kind = match os {
            "macos" => Os::MacOs,
            "linux" => Os::Linux,
            _ => return Err(unsupported()),
        };
        let arch_kind = match arch {
            "x86_64" => Arch::X86_64,
            "aarch64" => Arch::Aarch64,
            _ => return Err(unsupported()),
        };

        Ok(Self {
            os: os_kind,
            arch: arch_kind,
        })
    }

    /// The platform this binary runs on.
    ///
    /// # Errors
    ///
    /// Returns [`ArtefactError::UnsupportedPlatform`] on any other host.
    pub fn current() -> Result<Self> {
        Self::from_names(std::env::consts::OS, std::env::consts::ARCH)
    }
}

/// The published artefact slots of a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ArtefactTarget {
    /// macOS on Intel.
    MacOsX86_64,
    /// macOS on Apple silicon.
    MacOsArm64,
    /// Linux on any architecture.
    Linux,
}

const ALL_TARGETS: &[ArtefactTarget] = &[
    ArtefactTarget::MacOsX86_64,
    ArtefactTarget::MacOsArm64,
    ArtefactTarget::Linux,
];

impl ArtefactTarget {
    /// Select the artefact slot for `platform`.
    ///
    /// # Examples
    ///
    /// ```
    /// use iedit_installer::artefact::target::{Arch, ArtefactTarget, Os, Platform};
    ///
    /// let intel_mac = Platform { os: Os::MacOs, arch: Arch::X86_64 };
    /// assert_eq!(ArtefactTarget::for_platform(intel_mac), ArtefactTarget::MacOsX86_64);
    ///
    /// let arm_linux = Platform { os: Os::Linux, arch: Arch::Aarch64 };
    /// assert_eq!(ArtefactTarget::for_platform(arm_linux), ArtefactTarget::Linux);
    /// ```
    #[must_use]
    pub fn for_platform(platform: Platform) -> Self {
        match platform.os {
            Os::MacOs => match platform.arch {
                Arch::X86_64 => Self::MacOsX86_64,
                Arch::Aarch64 => Self::MacOsArm64,
            },
            Os::Linux => Self::Linux,
        }
    }

    /// The name used in manifests and artefact file names.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MacOsX86_64 => "macos-x86_64",
            Self::MacOsArm64 => "macos-arm64",
            Self::Linux => "linux",
        }
    }

    /// Every target, in manifest order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        ALL_TARGETS
    }
}

impl TryFrom<&str> for ArtefactTarget {
    type Error = ArtefactError;

    fn try_from(value: &str) -> Result<Self> {
        ALL_TARGETS
            .iter()
            .copied()
            .find(|target| target.as_str() == value)
            .ok_or_else(|| ArtefactError::UnknownTarget {
                value: value.to_owned(),
                expected: ALL_TARGETS
                    .iter()
                    .map(|target| target.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl TryFrom<String> for ArtefactTarget {
    type Error = ArtefactError;

    fn try_from(value: String) -> Result<Self> {
        Self::try_from(value.as_str())
    }
}

impl From<ArtefactTarget> for String {
    fn from(target: ArtefactTarget) -> Self {
        target.as_str().to_owned()
    }
}

impl std::str::FromStr for ArtefactTarget {
    type Err = ArtefactError;

    fn from_str(value: &str) -> Result<Self> {
        Self::try_from(value)
    }
}

impl fmt::Display for ArtefactTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::intel_mac("macos", "x86_64", ArtefactTarget::MacOsX86_64)]
    #[case::arm_mac("macos", "aarch64", ArtefactTarget::MacOsArm64)]
    #[case::intel_linux("linux", "x86_64", ArtefactTarget::Linux)]
    #[case::arm_linux("linux", "aarch64", ArtefactTarget::Linux)]
    fn dispatches_on_os_then_arch(
        #[case] os: &str,
        #[case] arch: &str,
        #[case] expected: ArtefactTarget,
    ) {
        let platform = Platform::from_names(os, arch).expect("supported platform");
        assert_eq!(ArtefactTarget::for_platform(platform), expected);
    }

    #[rstest]
    #[case::windows("windows", "x86_64")]
    #[case::riscv("linux", "riscv64")]
    #[case::freebsd("freebsd", "aarch64")]
    fn rejects_unsupported_platforms(#[case] os: &str, #[case] arch: &str) {
        let err = Platform::from_names(os, arch).expect_err("unsupported");
        assert!(
            matches!(err, ArtefactError::UnsupportedPlatform { .. }),
            "expected UnsupportedPlatform, got {err:?}"
        );
    }

    #[test]
    fn names_round_trip_through_try_from() {
        for target in ArtefactTarget::all() {
            assert_eq!(ArtefactTarget::try_from(target.as_str()), Ok(*target));
        }
    }

    #[test]
    fn unknown_target_lists_accepted_names() {
        let err = ArtefactTarget::try_from("windows").expect_err("unknown");
        assert_eq!(
            err.to_string(),
            "unknown artefact target \"windows\"; expected one of: macos-x86_64, macos-arm64, linux"
        );
    }

    #[test]
    fn serialises_as_manifest_name() {
        let json = serde_json::to_string(&ArtefactTarget::MacOsArm64).expect("serialise");
        assert_eq!(json, "\"macos-arm64\"");
        let parsed: ArtefactTarget = serde_json::from_str("\"linux\"").expect("deserialise");
        assert_eq!(parsed, ArtefactTarget::Linux);
    }
}
