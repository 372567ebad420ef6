//! File loading with end-of-line detection and line offset tracking.
//!
//! The loader keeps the opened file handle so that later saves can truncate
//! and append in place instead of rewriting unchanged prefixes.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{DocumentError, Result};
use crate::line::DocumentLine;

/// End-of-line sequence used for new or empty documents.
pub const DEFAULT_EOL: &str = "\n";

/// The outcome of loading a path from disk.
#[derive(Debug)]
pub struct LoadedFile {
    /// Open handle, absent when the path does not exist yet.
    pub file: Option<File>,
    /// The path the document is bound to.
    pub path: PathBuf,
    /// Lines without their terminators.
    pub lines: Vec<DocumentLine>,
    /// Byte offset at which each line starts.
    pub line_offsets: Vec<u64>,
    /// The terminator detected on the first line.
    pub end_of_line_seq: String,
    /// Whether the file could only be opened for reading.
    pub is_readonly: bool,
}

impl LoadedFile {
    fn empty(path: PathBuf) -> Self {
        Self {
            file: None,
            path,
            lines: Vec::new(),
            line_offsets: Vec::new(),
            end_of_line_seq: DEFAULT_EOL.to_owned(),
            is_readonly: false,
        }
    }
}

/// Load `path` into lines.
///
/// A missing file, or an empty path, produces an empty document bound to the
/// path so that the first save creates it.
///
/// # Errors
///
/// Returns [`DocumentError::IsDirectory`] when `path` is a directory and
/// [`DocumentError::Io`] for any other open or read failure.
pub fn read_file(file_path: impl AsRef<Path>) -> Result<LoadedFile> {
    let path = file_path.as_ref();
    if path.as_os_str().is_empty() {
        return Ok(LoadedFile::empty(PathBuf::new()));
    }

    let (file, is_readonly) = match open_file(path) {
        Ok(opened) => opened,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            log::debug!("{} does not exist yet; starting empty", path.display());
            return Ok(LoadedFile::empty(path.to_owned()));
        }
        Err(err) if err.kind() == io::ErrorKind::IsADirectory => {
            return Err(DocumentError::IsDirectory {
                path: path.to_owned(),
            });
        }
        Err(err) => return Err(err.into()),
    };

    if file.metadata()?.is_dir() {
        return Err(DocumentError::IsDirectory {
            path: path.to_owned(),
        });
    }

    let mut reader = BufReader::new(file);
    let (lines, line_offsets, end_of_line_seq) = read_lines(&mut reader)?;

    log::debug!(
        "loaded {} lines from {} (readonly: {is_readonly})",
        lines.len(),
        path.display()
    );

    Ok(LoadedFile {
        file: Some(reader.into_inner()),
        path: path.to_owned(),
        lines,
        line_offsets,
        end_of_line_seq,
        is_readonly,
    })
}

/// Open for read/write, falling back to read-only on permission errors.
fn open_file(path: &Path) -> io::Result<(File, bool)> {
    match OpenOptions::new().read(true).write(true).open(path) {
        Ok(file) => Ok((file, false)),
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            File::open(path).map(|file| (file, true))
        }
        // Directories cannot be opened for writing on every platform.
        Err(err) if path.is_dir() => {
            log::debug!("refusing to open directory {}: {err}", path.display());
            Err(io::Error::new(io::ErrorKind::IsADirectory, err))
        }
        Err(err) => Err(err),
    }
}

type ReadLines = (Vec<DocumentLine>, Vec<u64>, String);

fn read_lines(reader: &mut impl BufRead) -> io::Result<ReadLines> {
    let mut lines = Vec::new();
    let mut line_offsets = Vec::new();
    let mut last_offset = 0_u64;
    let mut end_of_line_seq: Option<String> = None;
    let mut is_last_line_terminated = false;
    let mut raw = String::new();

    while reader.read_line(&mut raw)? > 0 {
        let bytes_read = raw.len();
        let content = match &end_of_line_seq {
            Some(eol) => raw.strip_suffix(eol.as_str()).unwrap_or(&raw),
            None => {
                let trimmed = raw.trim_end_matches(['\n', '\r']);
                let terminator = raw.get(trimmed.len()..).unwrap_or_default();
                if !terminator.is_empty() {
                    end_of_line_seq = Some(terminator.to_owned());
                }
                trimmed
            }
        };

        is_last_line_terminated = content.len() < bytes_read;
        lines.push(DocumentLine::pristine(content.to_owned()));
        line_offsets.push(last_offset);
        last_offset += bytes_read as u64;
        raw.clear();
    }

    if is_last_line_terminated {
        lines.push(DocumentLine::pristine(String::new()));
        line_offsets.push(last_offset);
    }

    Ok((
        lines,
        line_offsets,
        end_of_line_seq.unwrap_or_else(|| DEFAULT_EOL.to_owned()),
    ))
}
