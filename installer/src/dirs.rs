//! Directory resolution abstraction for platform-specific paths.

use std::path::PathBuf;

use camino::Utf8Path;

use crate::error::{InstallerError, Result};

/// Paths the installer needs from the host.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// The user's home directory.
    fn home_dir(&self) -> Option<PathBuf>;

    /// Where user executables live.
    fn bin_dir(&self) -> Option<PathBuf>;
}

/// [`BaseDirs`] backed by `directories-next`.
///
/// # Examples
///
/// ```no_run
/// use iedit_installer::dirs::{BaseDirs, SystemBaseDirs};
///
/// let dirs = SystemBaseDirs::new().expect("failed to initialise directories");
/// println!("{:?}", dirs.bin_dir());
/// ```
#[derive(Debug, Clone)]
pub struct SystemBaseDirs {
    inner: directories_next::BaseDirs,
}

impl SystemBaseDirs {
    /// Resolve directories for the current user, if a home directory exists.
    #[must_use]
    pub fn new() -> Option<Self> {
        directories_next::BaseDirs::new().map(|inner| Self { inner })
    }
}

impl BaseDirs for SystemBaseDirs {
    fn home_dir(&self) -> Option<PathBuf> {
        Some(self.inner.home_dir().to_path_buf())
    }

    fn bin_dir(&self) -> Option<PathBuf> {
        self.inner
            .executable_dir()
            .map(std::path::Path::to_path_buf)
            .or_else(|| local_bin_dir(self))
    }
}

/// `~/.local/bin`, the fallback where the platform has no executable dir.
pub(crate) fn local_bin_dir(dirs: &dyn BaseDirs) -> Option<PathBuf> {
    dirs.home_dir()
        .map(|home| home.join(".local").join("bin"))
}

/// The bin directory to install into: `requested` when given, else the one
/// `dirs` reports.
///
/// # Errors
///
/// Returns [`InstallerError::NoBinDir`] when neither source yields one.
pub fn resolve_bin_dir(requested: Option<&Utf8Path>, dirs: Option<&dyn BaseDirs>) -> Result<PathBuf> {
    if let Some(dir) = requested {
        return Ok(dir.as_std_path().to_path_buf());
    }
    dirs.and_then(BaseDirs::bin_dir).ok_or(InstallerError::NoBinDir)
}
