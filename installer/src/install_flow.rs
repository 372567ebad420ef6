//! Install orchestration: select, verify, materialise, install, test.
//!
//! Installation is a one-shot sequence with no retries. Every check that
//! can fail without I/O runs first, and the bin directory is only touched
//! once the artefact has been verified and the executable produced. The
//! executable is written to a temporary sibling and renamed over any
//! previous install, so an existing `iedit` is replaced wholesale.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::artefact::download::{ArtefactDownloader, HttpDownloader};
use crate::artefact::extraction::{ArtefactExtractor, TarGzExtractor, locate_binary};
use crate::artefact::manifest::{ArtefactEntry, ArtefactFormat, ReleaseManifest};
use crate::artefact::naming::BINARY_NAME;
use crate::artefact::sha256_digest::{Sha256Digest, compute_sha256};
use crate::artefact::target::ArtefactTarget;
use crate::builder::{CommandExecutor, SystemCommandExecutor, build_from_source};
use crate::error::{InstallerError, Result};
use crate::output::{DryRunInfo, success_message, write_stderr_line};
use crate::smoke_test::run_smoke_test;

/// Configuration for one install.
#[derive(Debug)]
pub struct InstallConfig<'a> {
    /// The release to install.
    pub manifest: &'a ReleaseManifest,
    /// The artefact slot to install from.
    pub target: ArtefactTarget,
    /// Directory the executable is installed into.
    pub bin_dir: &'a Path,
    /// Report what would happen and stop.
    pub dry_run: bool,
    /// Skip the post-install `--version` check.
    pub skip_smoke_test: bool,
    /// Suppress progress output.
    pub quiet: bool,
}

/// The outcome of a successful [`install_release_with`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The binary was installed at `binary`.
    Installed {
        /// Path of the installed executable.
        binary: PathBuf,
    },
    /// Nothing was done.
    DryRun,
}

/// Install using production HTTP, extraction and command execution.
///
/// # Errors
///
/// As [`install_release_with`].
pub fn install_release(
    config: &InstallConfig<'_>,
    stderr: &mut dyn Write,
) -> Result<InstallOutcome> {
    install_release_with(
        config,
        &HttpDownloader,
        &TarGzExtractor,
        &SystemCommandExecutor,
        stderr,
    )
}

/// Testable inner function with injected dependencies.
///
/// # Errors
///
/// Returns [`InstallerError::NoArtefactForTarget`] or
/// [`InstallerError::UnpinnedDigest`] before any I/O, then download,
/// checksum, extraction, build, install and smoke test errors in that
/// order.
pub fn install_release_with(
    config: &InstallConfig<'_>,
    downloader: &dyn ArtefactDownloader,
    extractor: &dyn ArtefactExtractor,
    executor: &dyn CommandExecutor,
    stderr: &mut dyn Write,
) -> Result<InstallOutcome> {
    let manifest = config.manifest;
    let entry = manifest
        .artefact_for(config.target)
        .ok_or_else(|| InstallerError::NoArtefactForTarget {
            target: config.target,
            version: manifest.version.to_string(),
        })?;
    let url = entry.url(&manifest.version);
    let destination = config.bin_dir.join(BINARY_NAME);

    if config.dry_run {
        let info = DryRunInfo {
            version: manifest.version.as_str(),
            target: config.target,
            format: entry.format,
            url: &url,
            digest: &entry.sha256,
            destination: &destination,
            smoke_test: !config.skip_smoke_test,
        };
        write_stderr_line(stderr, info.display_text());
        return Ok(InstallOutcome::DryRun);
    }

    let digest = entry
        .sha256
        .resolved()
        .ok_or_else(|| InstallerError::UnpinnedDigest {
            target: config.target,
            placeholder: entry.sha256.to_string(),
        })?;

    let progress = |stderr: &mut dyn Write, message: String| {
        if !config.quiet {
            write_stderr_line(stderr, message);
        }
    };

    let work_dir = tempfile::tempdir()?;
    let filename = entry.artefact_name(&manifest.version).filename();
    let download_path = work_dir.path().join(&filename);

    progress(stderr, format!("Downloading {url}..."));
    downloader.download(&url, &download_path)?;

    verify_checksum(&url, digest, &download_path)?;
    progress(stderr, format!("Verified SHA-256 of {filename}."));

    if entry.format == ArtefactFormat::SourceTarGz {
        progress(stderr, "Building iedit from source with cargo...".to_owned());
    }
    let binary = materialise(entry, &download_path, work_dir.path(), extractor, executor)?;

    let installed = install_binary(&binary, config.bin_dir)?;
    log::info!("installed {}", installed.display());

    if !config.skip_smoke_test {
        progress(stderr, format!("Running {} --version...", installed.display()));
        run_smoke_test(&installed, manifest.version.as_str())?;
    }

    progress(stderr, success_message(&installed, manifest.version.as_str()));
    Ok(InstallOutcome::Installed { binary: installed })
}

/// Verify the downloaded artefact against the pinned digest.
fn verify_checksum(url: &str, expected: &Sha256Digest, path: &Path) -> Result<()> {
    let actual = compute_sha256(path)?;
    if actual != *expected {
        return Err(InstallerError::ChecksumMismatch {
            url: url.to_owned(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }
    Ok(())
}

/// Produce the executable from a verified download.
fn materialise(
    entry: &ArtefactEntry,
    download_path: &Path,
    work_dir: &Path,
    extractor: &dyn ArtefactExtractor,
    executor: &dyn CommandExecutor,
) -> Result<PathBuf> {
    match entry.format {
        ArtefactFormat::RawBinary => Ok(download_path.to_path_buf()),
        ArtefactFormat::TarGz => {
            let unpacked = work_dir.join("unpacked");
            std::fs::create_dir_all(&unpacked)?;
            extractor.extract(download_path, &unpacked)?;
            Ok(locate_binary(&unpacked)?)
        }
        ArtefactFormat::SourceTarGz => {
            let source = work_dir.join("source");
            std::fs::create_dir_all(&source)?;
            extractor.extract(download_path, &source)?;
            build_from_source(executor, &source, &work_dir.join("staging"))
        }
    }
}

/// Copy `binary` to `<bin_dir>/iedit` through a temporary sibling.
///
/// # Errors
///
/// Returns [`InstallerError::BinDirNotWritable`] when the directory cannot
/// be created or written.
pub fn install_binary(binary: &Path, bin_dir: &Path) -> Result<PathBuf> {
    let not_writable = |err: std::io::Error| InstallerError::BinDirNotWritable {
        path: bin_dir.to_path_buf(),
        reason: err.to_string(),
    };

    std::fs::create_dir_all(bin_dir).map_err(not_writable)?;
    let mut staged = tempfile::NamedTempFile::new_in(bin_dir).map_err(not_writable)?;
    let mut source = std::fs::File::open(binary)?;
    std::io::copy(&mut source, staged.as_file_mut())?;
    staged.as_file().sync_all()?;
    set_executable(staged.path())?;

    let destination = bin_dir.join(BINARY_NAME);
    staged
        .persist(&destination)
        .map_err(|err| not_writable(err.error))?;
    Ok(destination)
}

#[cfg(unix)]
fn set_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
#[path = "install_flow_tests.rs"]
mod tests;
