use crate::Pos;
use crate::document::Document;
use crate::edit::Text;
use crate::line::DocumentLine;

impl Document {
    /// Backspace at `(x, y)`, returning the removed character and the new
    /// cursor position.
    ///
    /// At column 0 the line merges into the previous one and the removed
    /// character is `'\n'`. Nothing happens at `(0, 0)` or past the last line.
    pub fn delete_char_at(&mut self, (x, y): Pos) -> Option<(char, Pos)> {
        if y >= self.n_lines() || (x == 0 && y == 0) {
            return None;
        }

        if x == 0 {
            let previous_y = y - 1;
            let current = self.lines.remove(y);
            let previous = self.lines.get_mut(previous_y)?;
            let previous_len = previous.len();
            previous.push_str(current.as_ref());
            self.mark_dirty_from(previous_y);

            return Some(('\n', (previous_len, previous_y)));
        }

        let line = self.lines.get_mut(y)?;
        let column = x.min(line.len());
        let ch = line.remove(column.checked_sub(1)?)?;

        Some((ch, (column - 1, y)))
    }

    /// Delete `[pos_from, pos_to)` and return the removed text.
    ///
    /// `(0, y)..(len, y)` empties line `y` and yields [`Text::String`];
    /// `(0, y)..(0, y + 1)` removes line `y` entirely and yields
    /// `Text::Lines([line, ""])`. An end past the last line is clamped to the
    /// end of the document.
    pub fn delete_range(&mut self, pos_from: Pos, pos_to: Pos) -> Text {
        let Some(last_y) = self.n_lines().checked_sub(1) else {
            return Text::Empty;
        };
        if pos_from.1 > last_y {
            return Text::Empty;
        }
        let end = if pos_to.1 > last_y {
            (self.lines.get(last_y).map_or(0, DocumentLine::len), last_y)
        } else {
            pos_to
        };

        if pos_from.1 == end.1 {
            return self.lines.get_mut(pos_from.1).map_or(Text::Empty, |line| {
                Text::String(line.remove_range(pos_from.0..end.0))
            });
        }
        if pos_from.1 > end.1 {
            return Text::Empty;
        }

        let mut last_line = self.lines.remove(end.1);
        let last_tail = last_line.split_off(end.0);

        let Some(first_line) = self.lines.get_mut(pos_from.1) else {
            return Text::Empty;
        };
        let mut deleted = vec![String::from(first_line.split_off(pos_from.0))];
        first_line.push_str(last_tail.as_ref());

        deleted.extend(
            self.lines
                .drain(pos_from.1 + 1..end.1)
                .map(String::from),
        );
        deleted.push(String::from(last_line));
        self.mark_dirty_from(pos_from.1);

        Text::Lines(deleted)
    }

    /// Remove line `y`, returning it.
    pub fn remove_line(&mut self, y: usize) -> Option<DocumentLine> {
        if y >= self.n_lines() {
            return None;
        }
        let line = self.lines.remove(y);
        self.mark_dirty_from(y);
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn doc(lines: &[&str]) -> Document {
        Document::from_strings(lines.iter().map(|l| (*l).to_owned()).collect(), "", false)
    }

    fn contents(document: &Document) -> Vec<&str> {
        document.lines.iter().map(AsRef::as_ref).collect()
    }

    #[rstest]
    #[case::origin((0, 0), None, vec!["ab", "cd"])]
    #[case::past_end((0, 2), None, vec!["ab", "cd"])]
    #[case::merge((0, 1), Some(('\n', (2, 0))), vec!["abcd"])]
    #[case::middle((1, 1), Some(('c', (0, 1))), vec!["ab", "d"])]
    #[case::clamped((9, 0), Some(('b', (1, 0))), vec!["a", "cd"])]
    fn delete_char_at_cases(
        #[case] pos: Pos,
        #[case] expected: Option<(char, Pos)>,
        #[case] lines: Vec<&str>,
    ) {
        let mut document = doc(&["ab", "cd"]);
        assert_eq!(document.delete_char_at(pos), expected);
        assert_eq!(contents(&document), lines);
    }

    #[test]
    fn same_line_range_returns_string() {
        let mut document = doc(&["hello world"]);
        let text = document.delete_range((0, 0), (6, 0));
        assert_eq!(text, Text::String("hello ".to_owned()));
        assert_eq!(contents(&document), vec!["world"]);
    }

    #[test]
    fn whole_line_range_leaves_empty_line() {
        let mut document = doc(&["abc", "def"]);
        let text = document.delete_range((0, 0), (3, 0));
        assert_eq!(text, Text::String("abc".to_owned()));
        assert_eq!(contents(&document), vec!["", "def"]);
    }

    #[test]
    fn line_break_range_removes_the_line() {
        let mut document = doc(&["abc", "def"]);
        let text = document.delete_range((0, 0), (0, 1));
        assert_eq!(text, Text::Lines(vec!["abc".to_owned(), String::new()]));
        assert_eq!(contents(&document), vec!["def"]);
    }

    #[test]
    fn multi_line_range_collects_every_piece() {
        let mut document = doc(&["one", "two", "three", "four"]);
        let text = document.delete_range((1, 0), (2, 2));
        assert_eq!(
            text,
            Text::Lines(vec!["ne".to_owned(), "two".to_owned(), "th".to_owned()])
        );
        assert_eq!(contents(&document), vec!["oree", "four"]);
    }

    #[test]
    fn range_end_past_document_is_clamped() {
        let mut document = doc(&["ab", "cd"]);
        let text = document.delete_range((1, 0), (0, 9));
        assert_eq!(text, Text::Lines(vec!["b".to_owned(), "cd".to_owned()]));
        assert_eq!(contents(&document), vec!["a"]);
    }

    #[rstest]
    #[case::start_past_document((0, 5), (0, 6))]
    #[case::reversed((0, 1), (0, 0))]
    fn unusable_ranges_delete_nothing(#[case] pos_from: Pos, #[case] pos_to: Pos) {
        let mut document = doc(&["ab", "cd"]);
        assert_eq!(document.delete_range(pos_from, pos_to), Text::Empty);
        assert_eq!(contents(&document), vec!["ab", "cd"]);
    }

    #[test]
    fn remove_line_shifts_following_lines() {
        let mut document = doc(&["a", "b", "c"]);
        assert_eq!(document.remove_line(1).map(String::from), Some("b".to_owned()));
        assert_eq!(contents(&document), vec!["a", "c"]);
        assert!(document.remove_line(5).is_none());
    }
}
