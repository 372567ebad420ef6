//! The [`Document`] buffer.

use std::fs::File;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::edit::EditOperation;
use crate::error::Result;
use crate::io::{DEFAULT_EOL, read_file};
use crate::line::DocumentLine;
use crate::syntax::{DocumentSyntax, SyntaxBlock};
use crate::vocabulary::DocumentVocabulary;

/// An editable text buffer, optionally bound to a file on disk.
///
/// # Examples
///
/// ```
/// use iedit_document::Document;
///
/// let doc = Document::from_strings(vec!["fn main() {}".to_owned()], "main.rs", false);
/// assert_eq!(doc.n_lines(), 1);
/// assert!(!doc.has_been_edited());
/// ```
#[derive(Debug)]
pub struct Document {
    /// The lines of the buffer, without terminators.
    pub lines: Vec<DocumentLine>,
    pub(crate) file: Option<File>,
    pub(crate) path: PathBuf,
    pub(crate) line_offsets: Vec<u64>,
    pub(crate) undo_stack: Vec<EditOperation>,
    pub(crate) redo_stack: Vec<EditOperation>,
    pub(crate) end_of_line_seq: String,
    pub(crate) last_save_time: SystemTime,
    pub(crate) is_readonly: bool,
    pub(crate) has_been_edited: bool,
    pub(crate) syntax: Option<DocumentSyntax>,
    pub(crate) syntax_blocks: Vec<SyntaxBlock>,
    pub(crate) vocabulary: DocumentVocabulary,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            file: None,
            path: PathBuf::new(),
            line_offsets: Vec::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            end_of_line_seq: DEFAULT_EOL.to_owned(),
            last_save_time: SystemTime::now(),
            is_readonly: false,
            has_been_edited: false,
            syntax: None,
            syntax_blocks: Vec::new(),
            vocabulary: DocumentVocabulary::default(),
        }
    }
}

impl Document {
    /// Build an in-memory document, not backed by any file.
    #[must_use]
    pub fn from_strings(strings: Vec<String>, name: impl Into<PathBuf>, is_readonly: bool) -> Self {
        let mut document = Self {
            lines: strings.into_iter().map(DocumentLine::new).collect(),
            path: name.into(),
            is_readonly,
            ..Self::default()
        };
        document.init_vocabulary();
        document
    }

    /// Load a document from `path`.
    ///
    /// # Errors
    ///
    /// Propagates failures from [`read_file`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let loaded = read_file(path)?;
        let is_readonly = loaded.is_readonly
            || loaded
                .file
                .as_ref()
                .and_then(|file| file.metadata().ok())
                .is_some_and(|metadata| metadata.permissions().readonly());

        let mut document = Self {
            lines: loaded.lines,
            file: loaded.file,
            path: loaded.path,
            line_offsets: loaded.line_offsets,
            end_of_line_seq: loaded.end_of_line_seq,
            is_readonly,
            ..Self::default()
        };
        document.init_vocabulary();
        Ok(document)
    }

    /// The path this document is bound to; empty for unnamed buffers.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the document has a path to save to.
    #[must_use]
    pub fn has_path(&self) -> bool {
        !self.path.as_os_str().is_empty()
    }

    /// Bind the document to a new path; the next save creates it.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
        self.file = None;
        self.line_offsets.clear();
        self.lines
            .iter_mut()
            .for_each(|line| line.has_been_modified = true);
    }

    /// Whether edits are refused.
    #[must_use]
    pub const fn is_readonly(&self) -> bool {
        self.is_readonly
    }

    /// Whether any edit was applied since the document was opened or saved.
    #[must_use]
    pub const fn has_been_edited(&self) -> bool {
        self.has_been_edited
    }

    /// The end-of-line sequence used when saving.
    #[must_use]
    pub fn end_of_line_seq(&self) -> &str {
        &self.end_of_line_seq
    }

    /// Number of lines in the buffer.
    #[inline]
    #[must_use]
    pub fn n_lines(&self) -> usize {
        self.lines.len()
    }

    /// Whether any line differs from the file on disk.
    #[must_use]
    pub fn has_been_modified(&self) -> bool {
        self.lines.iter().any(|line| line.has_been_modified)
    }

    /// Borrow the line at `y`, appending an empty one when `y == n_lines()`.
    pub fn get_or_add_line(&mut self, y: usize) -> Option<&mut DocumentLine> {
        if y == self.n_lines() {
            self.lines.push(DocumentLine::default());
        }
        self.lines.get_mut(y)
    }

    /// Whether the line at `line_idx` must be redrawn; rows past the end
    /// always are.
    #[must_use]
    pub fn line_needs_render(&self, line_idx: usize) -> bool {
        self.lines
            .get(line_idx)
            .is_none_or(|line| line.needs_render)
    }

    /// Clear the redraw flag for every line in `line_range`.
    pub fn reset_lines_need_render(&mut self, line_range: Range<usize>) {
        self.lines
            .iter_mut()
            .skip(line_range.start)
            .take(line_range.len())
            .for_each(|line| line.needs_render = false);
    }

    /// Mark every line from `from_y` on as changed.
    pub(crate) fn mark_dirty_from(&mut self, from_y: usize) {
        self.lines
            .iter_mut()
            .skip(from_y)
            .for_each(DocumentLine::set_dirty);
    }

    /// The full text joined with the document's end-of-line sequence.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join(&self.end_of_line_seq)
    }

    /// Attach highlighting rules and rescan multiline blocks.
    pub fn set_syntax(&mut self, syntax: Option<DocumentSyntax>) {
        self.syntax = syntax;
        self.recompute_syntax_blocks();
    }

    /// The attached highlighting rules.
    #[must_use]
    pub const fn syntax(&self) -> Option<&DocumentSyntax> {
        self.syntax.as_ref()
    }

    /// Multiline blocks found by the last scan.
    #[must_use]
    pub fn syntax_blocks(&self) -> &[SyntaxBlock] {
        &self.syntax_blocks
    }

    /// Words known to autocomplete.
    #[must_use]
    pub const fn vocabulary(&self) -> &DocumentVocabulary {
        &self.vocabulary
    }

    /// Register every identifier-like word of the buffer.
    pub fn init_vocabulary(&mut self) {
        let vocabulary = &mut self.vocabulary;
        for line in &self.lines {
            for word in crate::vocabulary::words(line.as_ref()) {
                vocabulary.register_word(word);
            }
        }
    }

    /// Register the words of line `y`, typically after it was edited.
    pub fn register_words_in_line(&mut self, y: usize) {
        if let Some(line) = self.lines.get(y) {
            for word in crate::vocabulary::words(line.as_ref()) {
                self.vocabulary.register_word(word);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn doc(lines: &[&str]) -> Document {
        Document::from_strings(lines.iter().map(|l| (*l).to_owned()).collect(), "", false)
    }

    #[rstest]
    #[case::existing(1, true, 2)]
    #[case::append(2, true, 3)]
    #[case::beyond_end(3, false, 2)]
    fn get_or_add_line_appends_only_at_end(
        #[case] y: usize,
        #[case] found: bool,
        #[case] n_lines: usize,
    ) {
        let mut document = doc(&["a", "b"]);
        assert_eq!(document.get_or_add_line(y).is_some(), found);
        assert_eq!(document.n_lines(), n_lines);
    }

    #[test]
    fn rows_past_the_end_need_render() {
        let mut document = doc(&["a"]);
        document.reset_lines_need_render(0..1);
        assert!(!document.line_needs_render(0));
        assert!(document.line_needs_render(5));
    }

    #[test]
    fn text_joins_with_end_of_line_sequence() {
        let mut document = doc(&["a", "b"]);
        document.end_of_line_seq = "\r\n".to_owned();
        assert_eq!(document.text(), "a\r\nb");
    }

    #[test]
    fn vocabulary_is_seeded_from_lines() {
        let document = doc(&["let counter = compute_total(x);"]);
        let words = document.vocabulary().words_with_prefix("co");
        assert!(words.iter().any(|word| word == "counter"));
        assert!(words.iter().any(|word| word == "compute_total"));
        assert!(document.vocabulary().words_with_prefix("x").is_empty());
    }

    #[test]
    fn set_path_marks_lines_for_full_write() {
        let mut document = doc(&["a"]);
        document.lines[0].has_been_modified = false;
        document.set_path("/tmp/elsewhere.txt");
        assert!(document.has_path());
        assert!(document.has_been_modified());
    }
}
