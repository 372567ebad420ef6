//! Archive extraction for release tarballs.
//!
//! Extracts `.tar.gz` archives to a target directory with path traversal
//! protection, then locates the executable among the extracted files.
//! Symbolic and hard link entries are refused outright.

use super::naming::BINARY_NAME;
use flate2::read::GzDecoder;
use std::path::{Component, Path, PathBuf};

/// Trait for extracting artefact archives, enabling test mocking.
///
/// # Examples
///
/// ```
/// use iedit_installer::artefact::extraction::TarGzExtractor;
///
/// let extractor = TarGzExtractor;
/// // Use extractor.extract(archive_path, dest_dir) in production
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArtefactExtractor {
    /// Extract the archive at `archive_path` into `dest_dir`.
    ///
    /// Returns the names of the regular files that were extracted.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::PathTraversal`] if any entry
    /// attempts to escape the destination directory.
    /// Returns [`ExtractionError::LinkEntry`] for symbolic or hard links.
    /// Returns [`ExtractionError::EmptyArchive`] if no files are found.
    /// Returns [`ExtractionError::Io`] on I/O failures.
    fn extract(&self, archive_path: &Path, dest_dir: &Path)
    -> Result<Vec<String>, ExtractionError>;
}

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// I/O error during extraction.
    #[error("extraction I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A path in the archive attempts to traverse outside the destination.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending path from the archive entry.
        path: String,
    },

    /// The archive contains a symbolic or hard link.
    #[error("archive entry {path} is a link")]
    LinkEntry {
        /// The offending path from the archive entry.
        path: String,
    },

    /// The archive contains no files.
    #[error("archive contains no files")]
    EmptyArchive,

    /// No extracted file is named like the executable.
    #[error("archive does not contain an executable named {BINARY_NAME}")]
    BinaryNotFound,

    /// More than one extracted file is named like the executable.
    #[error("archive contains {count} files named {BINARY_NAME}")]
    AmbiguousBinary {
        /// Number of candidates found.
        count: usize,
    },
}

/// Default extractor using the `tar` and `flate2` crates.
pub struct TarGzExtractor;

impl ArtefactExtractor for TarGzExtractor {
    fn extract(
        &self,
        archive_path: &Path,
        dest_dir: &Path,
    ) -> Result<Vec<String>, ExtractionError> {
        let file = std::fs::File::open(archive_path)?;
        let mut archive = tar::Archive::new(GzDecoder::new(file));
        let mut extracted = Vec::new();

        for entry_result in archive.entries()? {
            let mut entry = entry_result?;
            let entry_path = entry.path()?.into_owned();

            validate_entry_path(&entry_path)?;

            let entry_type = entry.header().entry_type();
            if entry_type.is_symlink() || entry_type.is_hard_link() {
                return Err(ExtractionError::LinkEntry {
                    path: entry_path.display().to_string(),
                });
            }

            if !entry.unpack_in(dest_dir)? {
                return Err(ExtractionError::PathTraversal {
                    path: entry_path.display().to_string(),
                });
            }

            if !entry_type.is_file() {
                continue;
            }
            if let Some(name) = entry_path.file_name() {
                extracted.push(name.to_string_lossy().into_owned());
            }
        }

        if extracted.is_empty() {
            return Err(ExtractionError::EmptyArchive);
        }

        Ok(extracted)
    }
}

/// Validate that a tar entry path does not escape the destination
/// directory via `..` components or absolute paths.
fn validate_entry_path(path: &Path) -> Result<(), ExtractionError> {
    if path.is_absolute() || path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(ExtractionError::PathTraversal {
            path: path.display().to_string(),
        });
    }
    Ok(())
}

/// Find the single regular file named [`BINARY_NAME`] below `dir`.
///
/// # Errors
///
/// Returns [`ExtractionError::BinaryNotFound`] or
/// [`ExtractionError::AmbiguousBinary`] when there is not exactly one
/// candidate, and [`ExtractionError::Io`] if `dir` cannot be walked.
pub fn locate_binary(dir: &Path) -> Result<PathBuf, ExtractionError> {
    let mut candidates = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for dir_entry in std::fs::read_dir(&current)? {
            let entry = dir_entry?;
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                pending.push(entry.path());
            } else if file_type.is_file() && entry.file_name() == BINARY_NAME {
                candidates.push(entry.path());
            }
        }
    }

    match candidates.len() {
        0 => Err(ExtractionError::BinaryNotFound),
        1 => Ok(candidates.remove(0)),
        count => Err(ExtractionError::AmbiguousBinary { count }),
    }
}
