//! Goto mode: jump to a line number as it is typed.

use iedit_document::Pos;

use crate::editor::Editor;
use crate::editor::commands::{CursorMovement, EditorCommand};
use crate::input::{Input, Key};
use crate::modes::EditorMode;

impl Editor {
    pub(super) fn goto_mode_parse_command(input: Input) -> Option<EditorCommand> {
        use CursorMovement as M;
        use EditorCommand as C;

        let Input::Keypress(key) = input else {
            return None;
        };
        let command = match key {
            Key::Esc => C::CancelPrompt,
            Key::Char('\n') => C::SubmitPrompt,
            Key::Backspace | Key::Delete => C::DeleteCharPrompt,
            Key::Left => C::MovePromptCursorLeft,
            Key::Right => C::MovePromptCursorRight,
            Key::Char(digit) if digit.is_ascii_digit() => C::InsertCharPrompt(digit),
            Key::Char('w') => C::MoveCursor {
                movement: M::StartOfFile,
                with_selection: false,
            },
            Key::Char('e') => C::MoveCursor {
                movement: M::EndOfFile,
                with_selection: false,
            },
            _ => return None,
        };
        Some(command)
    }

    pub(super) fn goto_mode_execute_command(&mut self, command: EditorCommand, original: Pos) {
        if self.edit_prompt(&command) {
            self.jump_to_typed_line();
            return;
        }

        match command {
            EditorCommand::MoveCursor { movement, .. } => {
                let y = match movement {
                    CursorMovement::EndOfFile => self.document.n_lines().saturating_sub(1),
                    _ => 0,
                };
                self.cursor.update_pos((0, y), false);
                self.finish_goto(original);
            }
            EditorCommand::SubmitPrompt => self.finish_goto(original),
            EditorCommand::CancelPrompt => {
                self.cursor.update_pos(original, false);
                self.enter_mode(EditorMode::Insert);
            }
            _ => {}
        }
    }

    fn jump_to_typed_line(&mut self) {
        let Ok(line) = self.status.prompt_line.parse::<usize>() else {
            return;
        };
        if line == 0 {
            return;
        }
        let y = (line - 1).min(self.document.n_lines().saturating_sub(1));
        self.cursor.update_pos((0, y), false);
    }

    fn finish_goto(&mut self, original: Pos) {
        if self.cursor.pos() != original {
            self.cursor.record_jump_at(original);
        }
        self.enter_mode(EditorMode::Insert);
    }
}
