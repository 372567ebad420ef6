//! Output formatting for the installer CLI.
//!
//! Progress and results go to an injected writer (stderr in production)
//! so that tests can capture them.

use crate::artefact::manifest::ArtefactFormat;
use crate::artefact::sha256_digest::PinnedDigest;
use crate::artefact::target::ArtefactTarget;
use std::io::Write;
use std::path::Path;

/// Write one line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort progress output; ignore write failures.
    }
}

/// Human-readable name of an artefact format.
#[must_use]
pub fn format_label(format: ArtefactFormat) -> &'static str {
    match format {
        ArtefactFormat::RawBinary => "raw binary",
        ArtefactFormat::TarGz => "tar.gz archive",
        ArtefactFormat::SourceTarGz => "source tarball (built with cargo)",
    }
}

/// Format a success message after installation.
#[must_use]
pub fn success_message(binary: &Path, version: &str) -> String {
    format!("Installed iedit {version} to {}", binary.display())
}

/// What a dry run would have done.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use iedit_installer::artefact::manifest::ArtefactFormat;
/// use iedit_installer::artefact::sha256_digest::PinnedDigest;
/// use iedit_installer::artefact::target::ArtefactTarget;
/// use iedit_installer::output::DryRunInfo;
///
/// let digest = PinnedDigest::try_from("a".repeat(64)).expect("valid digest");
/// let info = DryRunInfo {
///     version: "0.1.0",
///     target: ArtefactTarget::Linux,
///     format: ArtefactFormat::RawBinary,
///     url: "https://example.test/iedit-linux",
///     digest: &digest,
///     destination: Path::new("/home/user/.local/bin/iedit"),
///     smoke_test: true,
/// };
///
/// let output = info.display_text();
/// assert!(output.contains("Dry run"));
/// assert!(output.contains("iedit-linux"));
/// ```
#[derive(Debug)]
pub struct DryRunInfo<'a> {
    /// Release version.
    pub version: &'a str,
    /// Selected target.
    pub target: ArtefactTarget,
    /// Artefact format.
    pub format: ArtefactFormat,
    /// Resolved download URL.
    pub url: &'a str,
    /// Pinned digest.
    pub digest: &'a PinnedDigest,
    /// Path the binary would be installed to.
    pub destination: &'a Path,
    /// Whether the smoke test would run.
    pub smoke_test: bool,
}

impl DryRunInfo<'_> {
    /// Format the dry-run information for display.
    #[must_use]
    pub fn display_text(&self) -> String {
        [
            "Dry run - no files will be modified".to_owned(),
            String::new(),
            format!("Release: iedit {}", self.version),
            format!("Target: {}", self.target),
            format!("Format: {}", format_label(self.format)),
            format!("URL: {}", self.url),
            format!("SHA-256: {}", self.digest),
            format!("Destination: {}", self.destination.display()),
            format!("Smoke test: {}", if self.smoke_test { "yes" } else { "no" }),
        ]
        .join("\n")
    }
}
