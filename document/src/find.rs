//! Navigation queries over a [`Document`].
//!
//! All positions are `(column, line)` in characters. Pattern searches wrap
//! around the end (or start) of the document and skip empty matches.

use std::ops::Range;

use regex::Regex;

use crate::Pos;
use crate::document::Document;
use crate::line::{CharacterIndexable, DocumentLine};

/// A match found by a search, measured in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMatch {
    /// Position of the first matched character.
    pub pos: Pos,
    /// Number of matched characters.
    pub len: usize,
}

impl TextMatch {
    /// Position just past the last matched character.
    #[must_use]
    pub const fn end(&self) -> Pos {
        (self.pos.0 + self.len, self.pos.1)
    }
}

/// Whether `ch` belongs to a word.
#[inline]
#[must_use]
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

const BRACKETS: [(char, char); 3] = [('(', ')'), ('[', ']'), ('{', '}')];

impl Document {
    /// Character range of the word containing, or ending at, `(x, y)`.
    #[must_use]
    pub fn word_boundaries(&self, (x, y): Pos) -> Option<Range<usize>> {
        let chars: Vec<char> = self.lines.get(y)?.iter().collect();
        let column = x.min(chars.len());
        let (before, after) = chars.split_at_checked(column)?;

        let start = before
            .iter()
            .rposition(|&ch| !is_word_char(ch))
            .map_or(0, |idx| idx + 1);
        let end = after
            .iter()
            .position(|&ch| !is_word_char(ch))
            .map_or(chars.len(), |idx| column + idx);

        (start < end).then_some(start..end)
    }

    /// End of the next word, moving to the start of the next line at a line
    /// end.
    #[must_use]
    pub fn next_word_end(&self, (x, y): Pos) -> Pos {
        let Some(line) = self.lines.get(y) else {
            return (x, y);
        };
        if x >= line.len() {
            return if y + 1 < self.n_lines() { (0, y + 1) } else { (line.len(), y) };
        }

        let mut chars = line.iter().skip(x).peekable();
        let mut idx = x;
        while chars.next_if(|&ch| !is_word_char(ch)).is_some() {
            idx += 1;
        }
        while chars.next_if(|&ch| is_word_char(ch)).is_some() {
            idx += 1;
        }
        (idx, y)
    }

    /// Start of the previous word, moving to the end of the previous line at
    /// column 0.
    #[must_use]
    pub fn previous_word_start(&self, (x, y): Pos) -> Pos {
        let Some(line) = self.lines.get(y) else {
            return (x, y);
        };
        let column = x.min(line.len());
        if column == 0 {
            return match y.checked_sub(1) {
                Some(prev_y) => (self.lines.get(prev_y).map_or(0, DocumentLine::len), prev_y),
                None => (0, 0),
            };
        }

        let chars: Vec<char> = line.iter().take(column).collect();
        let gap = chars.iter().rev().take_while(|&&ch| !is_word_char(ch)).count();
        let word = chars
            .iter()
            .rev()
            .skip(gap)
            .take_while(|&&ch| is_word_char(ch))
            .count();
        (column - gap - word, y)
    }

    /// Index of the first blank line after `y`, or the last line.
    #[must_use]
    pub fn next_blank_line_idx(&self, y: usize) -> usize {
        self.lines
            .iter()
            .enumerate()
            .skip(y + 1)
            .find(|(_, line)| is_blank(line))
            .map_or(self.n_lines().saturating_sub(1), |(idx, _)| idx)
    }

    /// Index of the last blank line before `y`, or 0.
    #[must_use]
    pub fn previous_blank_line_idx(&self, y: usize) -> usize {
        self.lines
            .iter()
            .take(y)
            .rposition(is_blank)
            .unwrap_or_default()
    }

    /// Position of the bracket matching the one at `(x, y)`.
    #[must_use]
    pub fn matching_bracket_pos(&self, (x, y): Pos) -> Option<Pos> {
        let ch = self.lines.get(y)?.at(x)?;
        if let Some(&(open, close)) = BRACKETS.iter().find(|(open, _)| *open == ch) {
            return self.scan_brackets_forward((x, y), open, close);
        }
        let &(open, close) = BRACKETS.iter().find(|(_, close)| *close == ch)?;
        self.scan_brackets_backward((x, y), open, close)
    }

    fn scan_brackets_forward(&self, (x, y): Pos, open: char, close: char) -> Option<Pos> {
        let mut depth = 0_usize;
        for (line_y, line) in self.lines.iter().enumerate().skip(y) {
            let skip = if line_y == y { x } else { 0 };
            for (line_x, ch) in line.iter().enumerate().skip(skip) {
                if ch == open {
                    depth += 1;
                } else if ch == close {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some((line_x, line_y));
                    }
                }
            }
        }
        None
    }

    fn scan_brackets_backward(&self, (x, y): Pos, open: char, close: char) -> Option<Pos> {
        let mut depth = 0_usize;
        for line_y in (0..=y).rev() {
            let Some(line) = self.lines.get(line_y) else {
                continue;
            };
            let chars: Vec<char> = line.iter().collect();
            let end = if line_y == y { x + 1 } else { chars.len() };
            for (line_x, &ch) in chars.iter().enumerate().take(end).rev() {
                if ch == close {
                    depth += 1;
                } else if ch == open {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some((line_x, line_y));
                    }
                }
            }
        }
        None
    }

    /// Next occurrence of `ch` after `(x, y)`.
    #[must_use]
    pub fn next_occurrence_of_char(&self, pos: Pos, ch: char) -> Option<Pos> {
        let mut buf = [0_u8; 4];
        self.find_next(pos, ch.encode_utf8(&mut buf))
            .map(|found| found.pos)
    }

    /// Previous occurrence of `ch` before `(x, y)`.
    #[must_use]
    pub fn previous_occurrence_of_char(&self, pos: Pos, ch: char) -> Option<Pos> {
        let mut buf = [0_u8; 4];
        self.find_previous(pos, ch.encode_utf8(&mut buf))
            .map(|found| found.pos)
    }

    /// Next literal match of `needle` starting after `pos`.
    #[must_use]
    pub fn find_next(&self, pos: Pos, needle: &str) -> Option<TextMatch> {
        if needle.is_empty() {
            return None;
        }
        self.search_forward(pos, |line, from| {
            line.get(from..)?
                .find(needle)
                .map(|start| (from + start, from + start + needle.len()))
        })
    }

    /// Previous literal match of `needle` starting before `pos`.
    #[must_use]
    pub fn find_previous(&self, pos: Pos, needle: &str) -> Option<TextMatch> {
        if needle.is_empty() {
            return None;
        }
        self.search_backward(pos, |line, before| {
            line.match_indices(needle)
                .take_while(|(start, _)| *start < before)
                .last()
                .map(|(start, found)| (start, start + found.len()))
        })
    }

    /// Next match of `pattern` starting after `pos`.
    #[must_use]
    pub fn find_next_regex(&self, pos: Pos, pattern: &Regex) -> Option<TextMatch> {
        self.search_forward(pos, |line, from| {
            pattern
                .find_iter(line.get(from..)?)
                .find(|found| !found.is_empty())
                .map(|found| (from + found.start(), from + found.end()))
        })
    }

    /// Previous match of `pattern` starting before `pos`.
    #[must_use]
    pub fn find_previous_regex(&self, pos: Pos, pattern: &Regex) -> Option<TextMatch> {
        self.search_backward(pos, |line, before| {
            pattern
                .find_iter(line)
                .filter(|found| !found.is_empty() && found.start() < before)
                .last()
                .map(|found| (found.start(), found.end()))
        })
    }

    /// First match of `pattern` at or after `pos`, used for live search.
    #[must_use]
    pub fn find_regex_from(&self, (x, y): Pos, pattern: &Regex) -> Option<TextMatch> {
        match x.checked_sub(1) {
            Some(prev_x) => self.find_next_regex((prev_x, y), pattern),
            None if y == 0 => self.find_next_regex_wrapping_from_start(pattern),
            None => {
                let prev_y = y - 1;
                let prev_len = self.lines.get(prev_y).map_or(0, DocumentLine::len);
                self.find_next_regex((prev_len, prev_y), pattern)
            }
        }
    }

    fn find_next_regex_wrapping_from_start(&self, pattern: &Regex) -> Option<TextMatch> {
        let last_y = self.n_lines().checked_sub(1)?;
        let last_len = self.lines.get(last_y)?.len();
        self.find_next_regex((last_len, last_y), pattern)
    }

    /// Scan forward from the character after `(x, y)`, wrapping once.
    /// `find_in(line, from_byte)` returns the byte range of a match.
    fn search_forward<F>(&self, (x, y): Pos, find_in: F) -> Option<TextMatch>
    where
        F: Fn(&str, usize) -> Option<(usize, usize)>,
    {
        let n_lines = self.n_lines();
        if n_lines == 0 {
            return None;
        }
        let start_y = y.min(n_lines - 1);

        for step in 0..=n_lines {
            let line_y = (start_y + step).rem_euclid(n_lines);
            let Some(line) = self.lines.get(line_y) else {
                continue;
            };
            let from = if step == 0 { line.char_to_byte_idx(x + 1) } else { 0 };
            if let Some(found) = find_in(line.as_ref(), from).and_then(|range| to_match(line, line_y, range)) {
                if step == n_lines && found.pos.0 > x {
                    return None;
                }
                return Some(found);
            }
        }
        None
    }

    /// Scan backward from the character before `(x, y)`, wrapping once.
    /// `find_in(line, before_byte)` returns the byte range of the last match
    /// starting before `before_byte`.
    fn search_backward<F>(&self, (x, y): Pos, find_in: F) -> Option<TextMatch>
    where
        F: Fn(&str, usize) -> Option<(usize, usize)>,
    {
        let n_lines = self.n_lines();
        if n_lines == 0 {
            return None;
        }
        let start_y = y.min(n_lines - 1);

        for step in 0..=n_lines {
            let line_y = (start_y + n_lines * 2 - step).rem_euclid(n_lines);
            let Some(line) = self.lines.get(line_y) else {
                continue;
            };
            let before = if step == 0 { line.char_to_byte_idx(x) } else { line.as_ref().len() };
            if let Some(found) = find_in(line.as_ref(), before).and_then(|range| to_match(line, line_y, range)) {
                return Some(found);
            }
        }
        None
    }
}

fn is_blank(line: &DocumentLine) -> bool {
    line.iter().all(char::is_whitespace)
}

fn to_match(line: &DocumentLine, y: usize, (start, end): (usize, usize)) -> Option<TextMatch> {
    let text = line.as_ref();
    let start_char = text.byte_to_char_idx(start)?;
    let len = text.get(start..end)?.n_chars();
    Some(TextMatch {
        pos: (start_char, y),
        len,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn code() -> Document {
        Document::from_strings(
            vec![
                "fn main() {".to_owned(),
                "    let value = compute(1, [2]);".to_owned(),
                String::new(),
                "    println!(\"{value}\");".to_owned(),
                "}".to_owned(),
            ],
            "main.rs",
            false,
        )
    }

    #[rstest]
    #[case::inside((6, 1), Some(4..7))]
    #[case::at_end((7, 1), Some(4..7))]
    #[case::on_space((3, 1), None)]
    #[case::past_line_end((99, 1), None)]
    fn word_boundaries_cases(code: Document, #[case] pos: Pos, #[case] expected: Option<Range<usize>>) {
        assert_eq!(code.word_boundaries(pos), expected);
    }

    #[rstest]
    #[case::skips_space((0, 1), (7, 1))]
    #[case::mid_word((5, 1), (7, 1))]
    #[case::line_end((11, 0), (0, 1))]
    fn next_word_end_cases(code: Document, #[case] pos: Pos, #[case] expected: Pos) {
        assert_eq!(code.next_word_end(pos), expected);
    }

    #[rstest]
    #[case::to_word_start((9, 1), (8, 1))]
    #[case::over_space((8, 1), (4, 1))]
    #[case::line_start((0, 1), (11, 0))]
    #[case::origin((0, 0), (0, 0))]
    #[case::clamped_to_line_end((99, 0), (3, 0))]
    fn previous_word_start_cases(code: Document, #[case] pos: Pos, #[case] expected: Pos) {
        assert_eq!(code.previous_word_start(pos), expected);
    }

    #[rstest]
    fn blank_line_navigation(code: Document) {
        assert_eq!(code.next_blank_line_idx(0), 2);
        assert_eq!(code.next_blank_line_idx(2), 4);
        assert_eq!(code.previous_blank_line_idx(4), 2);
        assert_eq!(code.previous_blank_line_idx(2), 0);
    }

    #[rstest]
    #[case::brace_forward((10, 0), Some((0, 4)))]
    #[case::brace_backward((0, 4), Some((10, 0)))]
    #[case::paren((23, 1), Some((30, 1)))]
    #[case::square_backward((29, 1), Some((27, 1)))]
    #[case::not_a_bracket((0, 0), None)]
    fn matching_bracket_cases(code: Document, #[case] pos: Pos, #[case] expected: Option<Pos>) {
        assert_eq!(code.matching_bracket_pos(pos), expected);
    }

    #[rstest]
    fn char_occurrences(code: Document) {
        assert_eq!(code.next_occurrence_of_char((0, 1), 'e'), Some((5, 1)));
        assert_eq!(code.previous_occurrence_of_char((5, 1), 'n'), Some((6, 0)));
    }

    #[rstest]
    fn literal_search_wraps(code: Document) {
        let first = code.find_next((0, 0), "value").expect("first");
        assert_eq!(first, TextMatch { pos: (8, 1), len: 5 });
        let second = code.find_next(first.pos, "value").expect("second");
        assert_eq!(second.pos, (15, 3));
        let wrapped = code.find_next(second.pos, "value").expect("wrapped");
        assert_eq!(wrapped.pos, (8, 1));
        assert_eq!(code.find_previous((8, 1), "value").map(|m| m.pos), Some((15, 3)));
    }

    #[rstest]
    fn regex_search_reports_character_length(code: Document) {
        let pattern = Regex::new(r"\d+").expect("regex");
        let found = code.find_next_regex((0, 0), &pattern).expect("match");
        assert_eq!(found, TextMatch { pos: (24, 1), len: 1 });
        assert_eq!(found.end(), (25, 1));
        let previous = code.find_previous_regex((0, 0), &pattern).expect("previous");
        assert_eq!(previous.pos, (28, 1));
    }

    #[rstest]
    fn regex_from_includes_current_position(code: Document) {
        let pattern = Regex::new("fn").expect("regex");
        assert_eq!(
            code.find_regex_from((0, 0), &pattern).map(|m| m.pos),
            Some((0, 0))
        );
    }

    #[test]
    fn multibyte_matches_use_character_columns() {
        let document = Document::from_strings(vec!["ééx é".to_owned()], "", false);
        assert_eq!(document.find_next((0, 0), "x").map(|m| m.pos), Some((2, 0)));
        assert_eq!(document.find_previous((4, 0), "é").map(|m| m.pos), Some((1, 0)));
    }
}
