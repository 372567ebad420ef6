//! Character-indexed line storage.
//!
//! Every index accepted or returned by [`DocumentLine`] counts `char`s, not
//! bytes. Tab expansion helpers translate between character columns and the
//! visual columns a terminal displays.

use std::ops::{Bound, Range, RangeBounds};

/// Character counting helpers for string slices.
pub trait CharacterIndexable {
    /// Number of `char`s in the string.
    fn n_chars(&self) -> usize;

    /// Convert a byte offset to a character index, if it lies on a boundary.
    fn byte_to_char_idx(&self, byte_idx: usize) -> Option<usize>;
}

impl CharacterIndexable for str {
    #[inline]
    fn n_chars(&self) -> usize {
        self.chars().count()
    }

    #[inline]
    fn byte_to_char_idx(&self, byte_idx: usize) -> Option<usize> {
        if byte_idx == self.len() {
            return Some(self.n_chars());
        }
        self.char_indices()
            .position(|(char_byte_idx, _)| char_byte_idx == byte_idx)
    }
}

/// A single line of a document.
///
/// Lines are created dirty: both `needs_render` and `has_been_modified` are
/// set on construction and after every mutation. Loaders clear
/// `has_been_modified` for lines that match the file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLine {
    buf: String,
    /// The line must be redrawn on the next frame.
    pub needs_render: bool,
    /// The line differs from what was last written to disk.
    pub has_been_modified: bool,
}

impl Default for DocumentLine {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl DocumentLine {
    /// Wrap `line` as a new dirty line.
    #[must_use]
    pub fn new(line: String) -> Self {
        Self {
            buf: line,
            needs_render: true,
            has_been_modified: true,
        }
    }

    /// Wrap `line` as a line that matches the file on disk.
    #[must_use]
    pub fn pristine(line: String) -> Self {
        Self {
            buf: line,
            needs_render: true,
            has_been_modified: false,
        }
    }

    /// Mark the line as modified and in need of a redraw.
    #[inline]
    pub fn set_dirty(&mut self) {
        self.has_been_modified = true;
        self.needs_render = true;
    }

    /// Number of characters in the line.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.chars().count()
    }

    /// Whether the line holds no characters.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Whether the line starts with `prefix`.
    #[inline]
    #[must_use]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.buf.starts_with(prefix)
    }

    /// Append a character.
    pub fn push(&mut self, ch: char) {
        self.buf.push(ch);
        self.set_dirty();
    }

    /// Append a string.
    pub fn push_str(&mut self, string: &str) {
        self.buf.push_str(string);
        self.set_dirty();
    }

    /// Keep only the first `new_len` characters.
    pub fn truncate(&mut self, new_len: usize) {
        let byte_idx = self.char_to_byte_idx(new_len);
        self.buf.truncate(byte_idx);
        self.set_dirty();
    }

    /// Insert `ch` before the character at `idx`, clamping to the line end.
    pub fn insert(&mut self, idx: usize, ch: char) {
        let byte_idx = self.char_to_byte_idx(idx);
        self.buf.insert(byte_idx, ch);
        self.set_dirty();
    }

    /// Insert `string` before the character at `idx`, clamping to the line end.
    pub fn insert_str(&mut self, idx: usize, string: &str) {
        let byte_idx = self.char_to_byte_idx(idx);
        self.buf.insert_str(byte_idx, string);
        self.set_dirty();
    }

    /// The character at `idx`.
    #[inline]
    #[must_use]
    pub fn at(&self, idx: usize) -> Option<char> {
        self.buf.chars().nth(idx)
    }

    /// Remove and return the character at `idx`.
    pub fn remove(&mut self, idx: usize) -> Option<char> {
        let byte_idx = self.char_to_byte_idx(idx);
        let ch = self.buf.get(byte_idx..)?.chars().next()?;
        self.buf.replace_range(byte_idx..byte_idx + ch.len_utf8(), "");
        self.set_dirty();

        Some(ch)
    }

    /// Remove and return the characters in `range`.
    pub fn remove_range(&mut self, range: impl RangeBounds<usize>) -> String {
        let byte_range = self.char_to_byte_range(range);
        let removed: String = self.buf.drain(byte_range).collect();
        self.set_dirty();

        removed
    }

    /// Borrow the characters in `range`.
    #[must_use]
    pub fn get_range(&self, range: impl RangeBounds<usize>) -> &str {
        let byte_range = self.char_to_byte_range(range);
        self.buf.get(byte_range).unwrap_or_default()
    }

    /// Byte offset of the character at `char_idx`, or the byte length when
    /// `char_idx` is past the end.
    #[must_use]
    pub fn char_to_byte_idx(&self, char_idx: usize) -> usize {
        self.buf
            .char_indices()
            .nth(char_idx)
            .map_or(self.buf.len(), |(i, _)| i)
    }

    /// Character index of the byte offset, if it lies on a boundary.
    #[must_use]
    pub fn byte_to_char_idx(&self, byte_idx: usize) -> Option<usize> {
        self.buf.as_str().byte_to_char_idx(byte_idx)
    }

    /// Visual column of `char_idx` once tabs are expanded to `tab_size` stops.
    #[must_use]
    pub fn char_to_visual_idx(&self, char_idx: usize, tab_stop: usize) -> usize {
        let tab_size = tab_stop.max(1);
        self.iter().take(char_idx).fold(0, |visual_idx, ch| {
            if ch == '\t' {
                visual_idx + tab_size - visual_idx.rem_euclid(tab_size)
            } else {
                visual_idx + 1
            }
        })
    }

    /// Character index displayed at `visual_idx` once tabs are expanded.
    #[must_use]
    pub fn visual_to_char_idx(&self, visual_idx: usize, tab_stop: usize) -> usize {
        let tab_size = tab_stop.max(1);
        let mut running_visual_idx: usize = 0;
        for (char_idx, ch) in self.iter().enumerate() {
            running_visual_idx += if ch == '\t' {
                tab_size - running_visual_idx.rem_euclid(tab_size)
            } else {
                1
            };

            if running_visual_idx > visual_idx {
                return char_idx;
            }
        }

        self.len()
    }

    /// Iterate over the characters of the line.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.buf.chars()
    }

    /// Split the line at `idx`, keeping the head and returning the tail.
    pub fn split_off(&mut self, idx: usize) -> Self {
        let byte_idx = self.char_to_byte_idx(idx);
        let other_buf = self.buf.split_off(byte_idx);
        self.set_dirty();
        Self::new(other_buf)
    }

    /// Borrow the halves either side of `idx`.
    #[must_use]
    pub fn split_at(&self, idx: usize) -> (&str, &str) {
        let byte_idx = self.char_to_byte_idx(idx);
        self.buf.split_at(byte_idx)
    }

    /// Leading whitespace of the line.
    #[must_use]
    pub fn indentation(&self) -> &str {
        let trimmed = self.buf.trim_start_matches([' ', '\t']);
        self.buf
            .get(..self.buf.len() - trimmed.len())
            .unwrap_or_default()
    }

    fn char_to_byte_range(&self, range: impl RangeBounds<usize>) -> Range<usize> {
        let start = match range.start_bound() {
            Bound::Included(&idx) => self.char_to_byte_idx(idx),
            Bound::Excluded(&idx) => self.char_to_byte_idx(idx + 1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&idx) => self.char_to_byte_idx(idx + 1),
            Bound::Excluded(&idx) => self.char_to_byte_idx(idx),
            Bound::Unbounded => self.buf.len(),
        };
        start..end.max(start)
    }
}

impl AsRef<str> for DocumentLine {
    fn as_ref(&self) -> &str {
        &self.buf
    }
}

impl From<DocumentLine> for String {
    fn from(line: DocumentLine) -> Self {
        line.buf
    }
}

impl From<&str> for DocumentLine {
    fn from(line: &str) -> Self {
        Self::new(line.to_owned())
    }
}
