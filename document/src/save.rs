//! Incremental write-back to disk.
//!
//! When the file has not been touched since the last save, only the lines
//! from the first modified one onwards are rewritten: the file is truncated
//! at that line's recorded offset and the tail appended. Any outside change
//! to the file falls back to a full rewrite.

use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::time::SystemTime;

use crate::document::Document;
use crate::error::{DocumentError, Result};

impl Document {
    /// Write the document to its path, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NoPath`] for unnamed buffers,
    /// [`DocumentError::Readonly`] for read-only documents and
    /// [`DocumentError::Io`] when creating or writing the file fails.
    pub fn save(&mut self) -> Result<usize> {
        if !self.has_path() {
            return Err(DocumentError::NoPath);
        }
        if self.is_readonly {
            return Err(DocumentError::Readonly {
                path: self.path.clone(),
            });
        }

        let mut file = match self.file.take() {
            Some(file) => file,
            None => {
                log::debug!("creating {}", self.path.display());
                File::create_new(&self.path)?
            }
        };
        let result = self.write_to(&mut file);
        self.file = Some(file);

        let bytes_written = result?;
        self.last_save_time = SystemTime::now();
        self.has_been_edited = false;
        log::info!("saved {} ({bytes_written} bytes)", self.path.display());

        Ok(bytes_written)
    }

    fn is_untouched_since_last_save(&self, file: &File) -> bool {
        file.metadata()
            .and_then(|metadata| metadata.modified())
            .is_ok_and(|modified| modified <= self.last_save_time)
    }

    fn first_line_to_write(&self) -> usize {
        let n_lines = self.n_lines();
        let first_modified = self
            .lines
            .iter()
            .position(|line| line.has_been_modified)
            .unwrap_or(n_lines);

        if n_lines == self.line_offsets.len() {
            first_modified
        } else {
            // Lines were appended or removed at the end.
            first_modified.min(n_lines.saturating_sub(1))
        }
    }

    fn write_to(&mut self, file: &mut File) -> Result<usize> {
        let n_lines = self.n_lines();
        let eol_len = self.end_of_line_seq.len();

        let first_line_idx = if self.is_untouched_since_last_save(file) {
            self.first_line_to_write()
        } else {
            log::debug!(
                "{} changed on disk since last save; rewriting",
                self.path.display()
            );
            0
        };

        let mut bytes_written = 0;
        match self.line_offsets.get(first_line_idx) {
            Some(&offset) => {
                file.set_len(offset)?;
                file.seek(SeekFrom::Start(offset))?;
            }
            None if first_line_idx == 0 => {
                file.set_len(0)?;
                file.seek(SeekFrom::Start(0))?;
            }
            None if first_line_idx < n_lines => {
                file.seek(SeekFrom::End(0))?;
                file.write_all(self.end_of_line_seq.as_bytes())?;
                bytes_written += eol_len;
            }
            None => {
                self.line_offsets.truncate(n_lines);
                return Ok(0);
            }
        }

        let mut writer = BufWriter::new(file);
        let mut last_offset = writer.stream_position()?;
        let mut new_offsets = Vec::with_capacity(n_lines - first_line_idx);

        for (line_idx, line) in self.lines.iter_mut().enumerate().skip(first_line_idx) {
            let text: &str = line.as_ref();
            writer.write_all(text.as_bytes())?;
            let mut line_bytes = text.len();
            if line_idx + 1 != n_lines {
                writer.write_all(self.end_of_line_seq.as_bytes())?;
                line_bytes += eol_len;
            }

            line.has_been_modified = false;
            new_offsets.push(last_offset);
            bytes_written += line_bytes;
            last_offset += line_bytes as u64;
        }
        writer.flush()?;

        self.line_offsets.truncate(first_line_idx);
        self.line_offsets.extend(new_offsets);

        Ok(bytes_written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::{EditOperation, Text};
    use std::fs;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;

    fn write_fixture(dir: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("file.txt");
        fs::write(&path, contents).expect("write fixture");
        path
    }

    fn read(path: &Path) -> String {
        fs::read_to_string(path).expect("read back")
    }

    #[test]
    fn unnamed_buffer_has_no_path() {
        let mut document = Document::from_strings(vec!["x".to_owned()], "", false);
        assert!(matches!(document.save(), Err(DocumentError::NoPath)));
    }

    #[test]
    fn readonly_document_refuses_to_save() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("ro.txt");
        let mut document = Document::from_strings(vec!["x".to_owned()], &path, true);
        assert!(matches!(document.save(), Err(DocumentError::Readonly { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn new_file_is_created_without_trailing_terminator() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("new.txt");
        let mut document = Document::from_file(&path).expect("open");
        document.lines.push("one".into());
        document.lines.push("two".into());

        assert_eq!(document.save().expect("save"), 7);
        assert_eq!(read(&path), "one\ntwo");
        assert!(!document.has_been_modified());
    }

    #[test]
    fn only_the_modified_tail_is_rewritten() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_fixture(&dir, "a\nb\nc\n");
        let mut document = Document::from_file(&path).expect("open");

        document.apply_edit(EditOperation::Replacement {
            pos_from: (0, 1),
            pos_to: (1, 1),
            text: Text::String("B".to_owned()),
        });

        assert_eq!(document.save().expect("save"), 4);
        assert_eq!(read(&path), "a\nB\nc\n");
        assert!(!document.has_been_edited());
    }

    #[test]
    fn crlf_files_keep_their_terminator() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_fixture(&dir, "a\r\nb");
        let mut document = Document::from_file(&path).expect("open");
        document.lines[1].push('!');

        assert_eq!(document.save().expect("save"), 2);
        assert_eq!(read(&path), "a\r\nb!");
    }

    #[test]
    fn appended_lines_extend_the_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_fixture(&dir, "a\nb");
        let mut document = Document::from_file(&path).expect("open");
        document.lines.push("c".into());

        document.save().expect("save");
        assert_eq!(read(&path), "a\nb\nc");
    }

    #[test]
    fn removing_the_last_line_truncates() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_fixture(&dir, "a\nb\nc");
        let mut document = Document::from_file(&path).expect("open");
        document.remove_line(2);

        document.save().expect("save");
        assert_eq!(read(&path), "a\nb");
    }

    #[test]
    fn outside_changes_force_a_full_rewrite() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_fixture(&dir, "a\nb");
        let mut document = Document::from_file(&path).expect("open");
        document.lines[1].push('!');

        let future = SystemTime::now() + Duration::from_secs(3600);
        File::options()
            .write(true)
            .open(&path)
            .and_then(|file| file.set_modified(future))
            .expect("touch");

        assert_eq!(document.save().expect("save"), 4);
        assert_eq!(read(&path), "a\nb!");
    }

    #[test]
    fn unchanged_document_writes_nothing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_fixture(&dir, "a\nb\n");
        let mut document = Document::from_file(&path).expect("open");

        assert_eq!(document.save().expect("save"), 0);
        assert_eq!(read(&path), "a\nb\n");
    }
}
