//! Search mode: a regex query with a live jump to the nearest match.

use iedit_document::{Pos, TextMatch};
use regex::Regex;

use crate::editor::Editor;
use crate::editor::commands::EditorCommand;
use crate::input::{Input, Key};
use crate::modes::EditorMode;

impl Editor {
    pub(super) fn search_mode_parse_command(input: Input) -> Option<EditorCommand> {
        use EditorCommand as C;

        let Input::Keypress(key) = input else {
            return None;
        };
        let command = match key {
            Key::Esc => C::CancelPrompt,
            Key::Char('\n') => C::SubmitPrompt,
            Key::Ctrl('n') => C::FindMatch { backwards: false },
            Key::Ctrl('b') => C::FindMatch { backwards: true },
            Key::Backspace | Key::Delete => C::DeleteCharPrompt,
            Key::Left => C::MovePromptCursorLeft,
            Key::Right => C::MovePromptCursorRight,
            Key::Char('\t') => return None,
            Key::Char(ch) => C::InsertCharPrompt(ch),
            _ => return None,
        };
        Some(command)
    }

    pub(super) fn search_mode_execute_command(
        &mut self,
        command: EditorCommand,
        original: Pos,
        backwards: bool,
    ) {
        if self.edit_prompt(&command) {
            self.live_search(original, backwards);
            return;
        }

        match command {
            EditorCommand::FindMatch { backwards } => self.step_search(backwards),
            EditorCommand::SubmitPrompt => {
                if self.cursor.pos() != original {
                    self.cursor.record_jump_at(original);
                }
                self.enter_mode(EditorMode::Insert);
            }
            EditorCommand::CancelPrompt => {
                self.cursor.update_pos(original, false);
                self.matched_range = None;
                self.search_pattern = None;
                self.needs_full_rerender = true;
                self.enter_mode(EditorMode::Insert);
            }
            _ => {}
        }
    }

    fn live_search(&mut self, original: Pos, backwards: bool) {
        self.needs_full_rerender = true;
        let query = &self.status.prompt_line;
        self.search_pattern = if query.is_empty() {
            None
        } else {
            match Regex::new(query) {
                Ok(pattern) => Some(pattern),
                Err(err) => {
                    log::debug!("incomplete search pattern {query:?}: {err}");
                    None
                }
            }
        };

        let found = self.search_pattern.as_ref().and_then(|pattern| {
            if backwards {
                self.document.find_previous_regex(original, pattern)
            } else {
                self.document.find_regex_from(original, pattern)
            }
        });
        match found {
            Some(found) => self.show_match(found),
            None => {
                self.matched_range = None;
                self.cursor.update_pos(original, false);
            }
        }
    }

    fn step_search(&mut self, backwards: bool) {
        let Some(pattern) = &self.search_pattern else {
            return;
        };
        let pos = self.cursor.pos();
        let found = if backwards {
            self.document.find_previous_regex(pos, pattern)
        } else {
            self.document.find_next_regex(pos, pattern)
        };
        match found {
            Some(found) => self.show_match(found),
            None => self.status.notify("No matches"),
        }
    }

    /// Highlight `found` and put the cursor on its start.
    pub(crate) fn show_match(&mut self, found: TextMatch) {
        self.matched_range = Some((found.pos, found.end()));
        self.cursor.update_pos(found.pos, false);
        self.needs_full_rerender = true;
    }
}

#[cfg(test)]
mod tests {
    use crate::editor::test_support::*;
    use crate::input::Key;
    use crate::modes::EditorMode;
    use rstest::rstest;

    const TEXT: &[&str] = &["fn main() {", "    let x = 1;", "    let y = 2;", "}"];

    #[rstest]
    fn typing_jumps_to_the_first_match() {
        let (mut editor, _rx) = editor_with(TEXT);
        press(&mut editor, &[Key::Ctrl('f')]);
        type_text(&mut editor, "let");
        assert_eq!(editor.cursor.pos(), (4, 1));
        assert_eq!(editor.matched_range, Some(((4, 1), (7, 1))));
    }

    #[rstest]
    fn next_and_previous_cycle_through_matches() {
        let (mut editor, _rx) = editor_with(TEXT);
        press(&mut editor, &[Key::Ctrl('f')]);
        type_text(&mut editor, r"let \w");
        press(&mut editor, &[Key::Ctrl('n')]);
        assert_eq!(editor.cursor.pos(), (4, 2));
        press(&mut editor, &[Key::Ctrl('n')]);
        assert_eq!(editor.cursor.pos(), (4, 1));
        press(&mut editor, &[Key::Ctrl('b')]);
        assert_eq!(editor.cursor.pos(), (4, 2));
    }

    #[rstest]
    fn backwards_search_finds_the_previous_match() {
        let (mut editor, _rx) = editor_with(TEXT);
        press(&mut editor, &[Key::Down, Key::Down, Key::Down, Key::Ctrl('b')]);
        type_text(&mut editor, "let");
        assert_eq!(editor.cursor.pos(), (4, 2));
    }

    #[rstest]
    fn enter_keeps_the_match_and_records_the_jump() {
        let (mut editor, _rx) = editor_with(TEXT);
        press(&mut editor, &[Key::Ctrl('f')]);
        type_text(&mut editor, "y");
        press(&mut editor, &[Key::Char('\n')]);
        assert_eq!(editor.mode, EditorMode::Insert);
        assert_eq!(editor.cursor.pos(), (8, 2));
        assert!(editor.matched_range.is_some());
        assert_eq!(editor.cursor.jump_history(), &[(0, 0)]);
    }

    #[rstest]
    fn escape_restores_and_clears() {
        let (mut editor, _rx) = editor_with(TEXT);
        press(&mut editor, &[Key::Ctrl('f')]);
        type_text(&mut editor, "2");
        assert_eq!(editor.cursor.y, 2);
        press(&mut editor, &[Key::Esc]);
        assert_eq!(editor.cursor.pos(), (0, 0));
        assert_eq!(editor.matched_range, None);
        assert_eq!(editor.mode, EditorMode::Insert);
    }

    #[rstest]
    #[case::no_match("zzz")]
    #[case::invalid_regex("(")]
    fn failed_queries_leave_the_cursor_home(#[case] query: &str) {
        let (mut editor, _rx) = editor_with(TEXT);
        press(&mut editor, &[Key::Down, Key::Ctrl('f')]);
        type_text(&mut editor, query);
        assert_eq!(editor.cursor.pos(), (0, 1));
        assert_eq!(editor.matched_range, None);
    }
}
