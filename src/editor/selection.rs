//! Yank, cut, paste and searching for the word under the cursor.

use iedit_document::{EditOperation, Pos, Text};

use crate::editor::Editor;
use crate::editor::clipboard::text_to_string;

fn describe(text: &Text) -> String {
    match text {
        Text::Lines(lines) => format!("{} lines", lines.len()),
        text => format!("{} characters", text_to_string(text).chars().count()),
    }
}

impl Editor {
    /// Text between `from` and `to`, in document order.
    #[must_use]
    pub fn text_between(&self, from: Pos, to: Pos) -> Text {
        let lines = &self.document.lines;
        let line_range = |y: usize, range: std::ops::Range<usize>| {
            lines
                .get(y)
                .map_or_else(String::new, |line| line.get_range(range).to_owned())
        };
        if from.1 == to.1 {
            return Text::String(line_range(from.1, from.0..to.0));
        }

        let mut selected = vec![line_range(from.1, from.0..usize::MAX)];
        selected.extend((from.1 + 1..to.1).map(|y| line_range(y, 0..usize::MAX)));
        selected.push(line_range(to.1, 0..to.0));
        Text::Lines(selected)
    }

    pub(crate) fn yank_selection(&mut self) {
        let Some((from, to)) = self.cursor.selected_range() else {
            self.status.notify("Nothing selected");
            return;
        };
        let text = self.text_between(from, to);
        self.status.notify(format!("Yanked {}", describe(&text)));
        self.clipboard.set_text(text);
    }

    pub(crate) fn cut_selection(&mut self) {
        let Some((from, to)) = self.cursor.selected_range() else {
            self.status.notify("Nothing selected");
            return;
        };
        if self.document.is_readonly() {
            self.status.notify("Buffer is read-only");
            return;
        }
        let text = self.text_between(from, to);
        let message = format!("Cut {}", describe(&text));
        self.clipboard.set_text(text);
        self.apply_edit(EditOperation::Replacement {
            pos_from: from,
            pos_to: to,
            text: Text::Empty,
        });
        self.status.notify(message);
    }

    pub(crate) fn paste(&mut self) {
        let text = match self.clipboard.get_text() {
            None | Some(Text::Empty) => {
                self.status.notify("Clipboard is empty");
                return;
            }
            Some(text) => text,
        };
        let message = format!("Pasted {}", describe(&text));
        let op = match self.cursor.selected_range() {
            Some((pos_from, pos_to)) => EditOperation::Replacement {
                pos_from,
                pos_to,
                text,
            },
            None => EditOperation::Insertion {
                pos: self.cursor.pos(),
                text,
            },
        };
        let was_readonly = self.document.is_readonly();
        self.apply_edit(op);
        if !was_readonly {
            self.status.notify(message);
        }
        self.needs_full_rerender = true;
    }

    /// Jump to the next or previous occurrence of the selection, or of the
    /// word under the cursor.
    pub(crate) fn find_word_or_selection(&mut self, backwards: bool) {
        let (x, y) = self.cursor.pos();
        let (needle, start) = match self.cursor.selected_range() {
            Some((from, to)) if from.1 == to.1 => {
                (text_to_string(&self.text_between(from, to)), from)
            }
            Some(_) => {
                self.status.notify("Select text on one line to search for it");
                return;
            }
            None => match self.document.word_boundaries((x, y)) {
                Some(range) => {
                    let start = range.start;
                    (text_to_string(&self.text_between((start, y), (range.end, y))), (start, y))
                }
                None => {
                    self.status.notify("No word under the cursor");
                    return;
                }
            },
        };
        if needle.is_empty() {
            return;
        }

        let found = if backwards {
            self.document.find_previous(start, &needle)
        } else {
            self.document.find_next(start, &needle)
        };
        match found {
            Some(found) if found.pos != start => {
                self.cursor.selection_anchor = None;
                self.show_match(found);
            }
            _ => self.status.notify("No other matches"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::editor::clipboard::MockEditorClipboard;
    use crate::editor::test_support::*;
    use crate::input::Key;
    use iedit_document::Text;
    use rstest::rstest;

    fn select_right(n: usize) -> Vec<Key> {
        vec![Key::ShiftRight; n]
    }

    #[rstest]
    fn yank_then_paste_copies_text() {
        let (mut editor, _rx) = editor_with(&["hello world", ""]);
        press(&mut editor, &select_right(5));
        press(&mut editor, &[Key::Ctrl('y')]);
        assert_eq!(editor.status.notification, "Yanked 5 characters");

        press(&mut editor, &[Key::Down, Key::Home, Key::Ctrl('p')]);
        assert_eq!(contents(&editor), ["hello world", "hello"]);
        assert_eq!(editor.status.notification, "Pasted 5 characters");
    }

    #[rstest]
    fn cut_across_lines_removes_and_stores_lines() {
        let (mut editor, _rx) = editor_with(&["one", "two", "three"]);
        press(&mut editor, &[Key::Right, Key::ShiftDown, Key::ShiftDown]);
        press(&mut editor, &[Key::Ctrl('x')]);
        assert_eq!(contents(&editor), ["ohree"]);
        assert_eq!(editor.cursor.pos(), (1, 0));
        assert_eq!(editor.status.notification, "Cut 3 lines");

        press(&mut editor, &[Key::Ctrl('p')]);
        assert_eq!(contents(&editor), ["one", "two", "three"]);
    }

    #[rstest]
    #[case::yank(Key::Ctrl('y'))]
    #[case::cut(Key::Ctrl('x'))]
    fn clipboard_keys_need_a_selection(#[case] key: Key) {
        let (mut editor, _rx) = editor_with(&["text"]);
        press(&mut editor, &[key]);
        assert_eq!(editor.status.notification, "Nothing selected");
    }

    #[rstest]
    fn paste_reads_from_the_clipboard_backend() {
        let (mut editor, _rx) = editor_with(&["ab"]);
        let mut clipboard = MockEditorClipboard::new();
        clipboard
            .expect_get_text()
            .times(1)
            .returning(|| Some(Text::Lines(vec!["x".to_owned(), "y".to_owned()])));
        editor.clipboard = Box::new(clipboard);

        press(&mut editor, &[Key::Right, Key::Ctrl('p')]);
        assert_eq!(contents(&editor), ["ax", "yb"]);
        assert_eq!(editor.cursor.pos(), (1, 1));
    }

    #[rstest]
    fn paste_with_an_empty_clipboard_says_so() {
        let (mut editor, _rx) = editor_with(&["ab"]);
        let mut clipboard = MockEditorClipboard::new();
        clipboard.expect_get_text().returning(|| None);
        editor.clipboard = Box::new(clipboard);

        press(&mut editor, &[Key::Ctrl('p')]);
        assert_eq!(editor.status.notification, "Clipboard is empty");
        assert_eq!(contents(&editor), ["ab"]);
    }

    #[rstest]
    fn yank_sends_the_selection_to_the_backend() {
        let (mut editor, _rx) = editor_with(&["abc"]);
        let mut clipboard = MockEditorClipboard::new();
        clipboard
            .expect_set_text()
            .withf(|text| *text == Text::String("ab".to_owned()))
            .times(1)
            .return_const(());
        editor.clipboard = Box::new(clipboard);

        press(&mut editor, &select_right(2));
        press(&mut editor, &[Key::Ctrl('y')]);
    }

    #[rstest]
    #[case::forward(Key::Alt('n'), (4, 1))]
    #[case::backward(Key::Alt('m'), (0, 2))]
    fn word_search_finds_other_occurrences(#[case] key: Key, #[case] expected: (usize, usize)) {
        let (mut editor, _rx) = editor_with(&["value", "let value", "value"]);
        press(&mut editor, &[key]);
        assert_eq!(editor.cursor.pos(), expected);
        assert!(editor.matched_range.is_some());
    }

    #[rstest]
    fn lone_words_have_no_other_matches() {
        let (mut editor, _rx) = editor_with(&["unique words here"]);
        press(&mut editor, &[Key::Alt('n')]);
        assert_eq!(editor.status.notification, "No other matches");
    }

    #[rstest]
    fn selection_search_uses_the_selected_text() {
        let (mut editor, _rx) = editor_with(&["a-b c a-b"]);
        press(&mut editor, &select_right(3));
        press(&mut editor, &[Key::Alt('n')]);
        assert_eq!(editor.cursor.pos(), (6, 0));
        assert!(editor.cursor.selection_anchor.is_none());
    }
}
