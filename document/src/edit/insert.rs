use crate::Pos;
use crate::document::Document;
use crate::edit::EditResult;
use crate::line::{CharacterIndexable, DocumentLine};

impl Document {
    /// Insert `ch` at `(x, y)`.
    pub fn insert_char_at(&mut self, (x, y): Pos, ch: char) -> EditResult {
        let line = self.get_or_add_line(y)?;
        line.insert(x, ch);

        Some((x.min(line.len() - 1) + 1, y))
    }

    /// Insert a string without line breaks at `(x, y)`.
    pub fn insert_string_at(&mut self, (x, y): Pos, string: &str) -> EditResult {
        let line = self.get_or_add_line(y)?;
        let column = x.min(line.len());
        line.insert_str(column, string);

        Some((column + string.n_chars(), y))
    }

    /// Splice `strings` in at `(x, y)`: the first entry joins the head of
    /// line `y`, the last one joins its tail.
    pub fn insert_strings_at(&mut self, (x, y): Pos, strings: Vec<String>) -> EditResult {
        let n_strings = strings.len();
        if n_strings == 0 {
            return Some((x, y));
        }

        let line = self.get_or_add_line(y)?;
        let column = x.min(line.len());
        let right = line.split_off(column);
        let right_len = right.len();

        let mut pieces = strings.into_iter();
        if let Some(first) = pieces.next() {
            line.push_str(&first);
        }

        let mut new_lines: Vec<DocumentLine> = pieces.map(DocumentLine::new).collect();
        match new_lines.last_mut() {
            Some(last) => last.push_str(right.as_ref()),
            None => line.push_str(right.as_ref()),
        }

        self.lines.splice(y + 1..y + 1, new_lines);
        self.mark_dirty_from(y);

        let final_y = y + n_strings - 1;
        let final_x = self.lines.get(final_y).map_or(0, DocumentLine::len) - right_len;
        Some((final_x, final_y))
    }

    /// Break line `y` at `x`, carrying its leading whitespace onto the new
    /// line.
    pub fn insert_newline_at(&mut self, (x, y): Pos) -> EditResult {
        let line = self.get_or_add_line(y)?;
        let column = x.min(line.len());

        let indent_len = line
            .iter()
            .take(column)
            .position(|ch| !ch.is_whitespace())
            .unwrap_or(column);

        let mut new_line = DocumentLine::new(line.get_range(..indent_len).to_owned());
        let tail = line.split_off(column);
        new_line.push_str(tail.as_ref());

        self.lines.insert(y + 1, new_line);
        self.mark_dirty_from(y);

        Some((indent_len, y + 1))
    }
}
