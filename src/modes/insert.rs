//! Insert mode: typing, movement, clipboard and chords.

use iedit_document::find::is_word_char;
use iedit_document::{EditOperation, Pos, Text};

use crate::editor::Editor;
use crate::editor::commands::{CommandExecutionResult, CursorMovement, EditorCommand};
use crate::editor::execute::Executor;
use crate::editor::keybindings::Popup;
use crate::input::{CHORD_LEADER, Input, Key};
use crate::modes::{EditorMode, PromptAction};

impl Editor {
    pub(super) fn insert_mode_parse_command(&self, input: Input) -> Option<EditorCommand> {
        match input {
            Input::KeyChord(chord) => Self::parse_chord(chord),
            Input::Keypress(key) => self
                .parse_autocomplete_key(key)
                .or_else(|| self.movement_for_key(key))
                .or_else(|| self.parse_insert_key(key)),
            Input::NoOp | Input::ExternalNotification(_) | Input::Resize(..) => None,
        }
    }

    fn parse_autocomplete_key(&self, key: Key) -> Option<EditorCommand> {
        if !self.autocomplete.is_open() {
            return None;
        }
        match key {
            Key::Ctrl('n') | Key::Down => Some(EditorCommand::AutocompleteNext),
            Key::Up => Some(EditorCommand::AutocompletePrevious),
            Key::Char('\n') => Some(EditorCommand::AutocompleteInsert),
            _ => None,
        }
    }

    fn movement_for_key(&self, key: Key) -> Option<EditorCommand> {
        use CursorMovement as M;

        let page = usize::from(self.layout.editor_lines).max(1);
        let (movement, shifted) = match key {
            Key::Up | Key::Alt('k') => (M::Up(1), false),
            Key::Down | Key::Alt('j') => (M::Down(1), false),
            Key::Left | Key::Alt('h') => (M::Left(1), false),
            Key::Right | Key::Alt('l') => (M::Right(1), false),
            Key::ShiftUp => (M::Up(1), true),
            Key::ShiftDown => (M::Down(1), true),
            Key::ShiftLeft => (M::Left(1), true),
            Key::ShiftRight => (M::Right(1), true),
            Key::CtrlUp => (M::PreviousParagraph, false),
            Key::CtrlDown => (M::NextParagraph, false),
            Key::CtrlShiftUp => (M::PreviousParagraph, true),
            Key::CtrlShiftDown => (M::NextParagraph, true),
            Key::CtrlLeft | Key::Alt('b') => (M::PreviousWordStart, false),
            Key::CtrlRight | Key::Alt('w') => (M::NextWordEnd, false),
            Key::CtrlShiftLeft => (M::PreviousWordStart, true),
            Key::CtrlShiftRight => (M::NextWordEnd, true),
            Key::Home | Key::Alt('a') => (M::StartOfLine, false),
            Key::End | Key::Alt('s') => (M::EndOfLine, false),
            Key::PageUp | Key::Ctrl('u') => (M::Up(page), false),
            Key::PageDown | Key::Ctrl('d') => (M::Down(page), false),
            Key::Alt('p') => (M::MatchingBracket, false),
            Key::Alt('i') => (M::NextJump, false),
            Key::Alt('o') => (M::PreviousJump, false),
            _ => return None,
        };
        Some(EditorCommand::MoveCursor {
            movement,
            with_selection: shifted || self.is_selection_locked,
        })
    }

    fn parse_insert_key(&self, key: Key) -> Option<EditorCommand> {
        use EditorCommand as C;

        let pos = self.cursor.pos();
        let command = match key {
            Key::Esc => C::ClearSelection,
            Key::Ctrl('z') => C::UndoLastEdit,
            Key::Ctrl('r') => C::RedoLastEdit,
            Key::Ctrl('f') => C::SwitchMode(EditorMode::Search {
                original: pos,
                backwards: false,
            }),
            Key::Ctrl('b') => C::SwitchMode(EditorMode::Search {
                original: pos,
                backwards: true,
            }),
            Key::Ctrl('g') => C::SwitchMode(EditorMode::Goto { original: pos }),
            Key::AltUp => C::ScrollViewportUp,
            Key::AltDown => C::ScrollViewportDown,
            Key::Alt('n') => C::FindMatch { backwards: false },
            Key::Alt('m') => C::FindMatch { backwards: true },
            Key::Ctrl('e') | Key::Alt('e') => C::OpenCommandLine,
            Key::Ctrl('y') => C::YankSelection,
            Key::Ctrl('x') => C::CutSelection,
            Key::Ctrl('p') => C::Paste,
            Key::Ctrl('n') => C::AutocompleteDisplay,
            Key::Ctrl('t') => C::ShowPopup(Popup::Help),
            Key::Char(ch) => C::Edit(self.typed_edit(ch)),
            Key::Backspace => C::Edit(self.selection_deletion().unwrap_or(EditOperation::Deletion { pos })),
            Key::Delete => C::Edit(self.selection_deletion().or_else(|| self.forward_deletion())?),
            Key::Ctrl('h') | Key::AltBackspace => C::Edit(self.word_deletion()),
            _ => return None,
        };
        Some(command)
    }

    fn typed_edit(&self, ch: char) -> EditOperation {
        let pos = self.cursor.pos();
        let text = if ch == '\t' && self.config.tab_emit_spaces {
            let tab_size = self.config.tab_width();
            let col = self
                .document
                .lines
                .get(pos.1)
                .map_or(0, |line| line.char_to_visual_idx(pos.0, tab_size));
            Text::String(" ".repeat(tab_size - col.rem_euclid(tab_size)))
        } else {
            Text::Char(ch)
        };

        match self.cursor.selected_range() {
            Some((pos_from, pos_to)) => EditOperation::Replacement {
                pos_from,
                pos_to,
                text,
            },
            None => EditOperation::Insertion { pos, text },
        }
    }

    fn selection_deletion(&self) -> Option<EditOperation> {
        let (pos_from, pos_to) = self.cursor.selected_range()?;
        Some(EditOperation::Replacement {
            pos_from,
            pos_to,
            text: Text::Empty,
        })
    }

    fn forward_deletion(&self) -> Option<EditOperation> {
        let (x, y) = self.cursor.pos();
        let line_len = self.document.lines.get(y)?.len();
        let pos_to = if x < line_len {
            (x + 1, y)
        } else if y + 1 < self.document.n_lines() {
            (0, y + 1)
        } else {
            return None;
        };
        Some(EditOperation::Replacement {
            pos_from: (x, y),
            pos_to,
            text: Text::Empty,
        })
    }

    fn word_deletion(&self) -> EditOperation {
        let (x, y) = self.cursor.pos();
        if x == 0 {
            return EditOperation::Deletion { pos: (x, y) };
        }
        let (start_x, start_y) = self.document.previous_word_start((x, y));
        EditOperation::Replacement {
            pos_from: if start_y == y { (start_x, y) } else { (0, y) },
            pos_to: (x, y),
            text: Text::Empty,
        }
    }

    fn parse_chord(chord: [Key; 3]) -> Option<EditorCommand> {
        use CursorMovement as M;
        use EditorCommand as C;

        let command = match chord {
            [leader, ..] if leader != CHORD_LEADER => return None,
            [_, Key::Null, Key::Null] => C::ShowPopup(Popup::Chords),
            [_, Key::Char('l'), Key::Null] => C::ShowPopup(Popup::LineChords),
            [_, Key::Char('x'), Key::Null] => C::ShowPopup(Popup::ExecuteChords),
            [_, Key::Char('v'), Key::Null] => C::ShowPopup(Popup::ViewChords),
            [_, Key::Char('s'), Key::Null] => C::ShowPopup(Popup::SelectionChords),
            [_, Key::Char('t' | 'T'), Key::Null] => C::ShowPopup(Popup::PressCharacter),
            [_, Key::Char('l'), Key::Char('n')] => C::ToggleLineNumbers,
            [_, Key::Char('l'), Key::Char('d')] => C::DeleteLine,
            [_, Key::Char('l'), Key::Char('w')] => C::MoveCursor {
                movement: M::StartOfLine,
                with_selection: false,
            },
            [_, Key::Char('l'), Key::Char('e')] => C::MoveCursor {
                movement: M::EndOfLine,
                with_selection: false,
            },
            [_, Key::Char('t'), Key::Char(ch)] => C::MoveCursor {
                movement: M::NextOccurrenceOf(ch),
                with_selection: false,
            },
            [_, Key::Char('T'), Key::Char(ch)] => C::MoveCursor {
                movement: M::PreviousOccurrenceOf(ch),
                with_selection: false,
            },
            [_, Key::Char('x'), Key::Char('?')] => C::PromptExecutor,
            [_, Key::Char('x'), key] => C::ExecuteFile(Executor::from_key(key)?),
            [_, Key::Char('v'), Key::Char('o')] => C::ToggleExecutionOutput,
            [_, Key::Char('s'), Key::Char('l')] => C::ToggleLockSelection,
            _ => return None,
        };
        Some(command)
    }

    pub(super) fn insert_mode_execute_command(&mut self, command: EditorCommand) -> CommandExecutionResult {
        use EditorCommand as C;

        match command {
            C::ClearSelection => self.clear_selection(),
            C::SwitchMode(mode) => self.enter_mode(mode),
            C::Edit(op) => self.apply_edit(op),
            C::DeleteLine => self.delete_line(),
            C::UndoLastEdit => {
                let pos = self.document.undo_last_edit();
                self.after_history_step(pos, "Nothing to undo");
            }
            C::RedoLastEdit => {
                let pos = self.document.redo_last_edit();
                self.after_history_step(pos, "Nothing to redo");
            }
            C::YankSelection => self.yank_selection(),
            C::CutSelection => self.cut_selection(),
            C::Paste => self.paste(),
            C::FindMatch { backwards } => self.find_word_or_selection(backwards),
            C::AutocompleteDisplay => {
                if self.autocomplete.is_open() {
                    self.autocomplete.select_next();
                } else {
                    self.refresh_autocomplete();
                    if !self.autocomplete.is_open() {
                        self.status.notify("No completions");
                    }
                }
            }
            C::AutocompleteNext => self.autocomplete.select_next(),
            C::AutocompletePrevious => self.autocomplete.select_previous(),
            C::AutocompleteInsert => self.insert_completion(),
            C::OpenCommandLine => self.enter_mode(EditorMode::Prompt(PromptAction::CommandLine)),
            C::PromptExecutor => self.enter_mode(EditorMode::Prompt(PromptAction::Executor)),
            C::ExecuteFile(executor) => self.execute_file(executor),
            C::ToggleExecutionOutput => self.toggle_execution_output(),
            C::MoveCursor {
                movement,
                with_selection,
            } => self.move_cursor(movement, with_selection),
            _ => {}
        }
        CommandExecutionResult::Continue
    }

    fn clear_selection(&mut self) {
        self.autocomplete.close();
        self.is_selection_locked = false;
        self.cursor.selection_anchor = None;
        self.matched_range = None;
        self.search_pattern = None;
        self.popup = None;
        self.needs_full_rerender = true;
    }

    /// Apply `op` to the document and move the cursor after it.
    pub(crate) fn apply_edit(&mut self, op: EditOperation) {
        if self.document.is_readonly() {
            self.status.notify("Buffer is read-only");
            return;
        }
        let start_y = edit_start_y(&op);
        let typed_word_char = matches!(
            op,
            EditOperation::Insertion { text: Text::Char(ch), .. } if is_word_char(ch)
        );
        if self.cursor.selection_anchor.take().is_some() {
            self.needs_full_rerender = true;
        }
        self.matched_range = None;

        let Some(pos) = self.document.apply_edit(op) else {
            return;
        };
        self.cursor.update_pos(pos, false);
        self.first_quit_sent = false;

        if typed_word_char {
            self.refresh_autocomplete();
        } else {
            self.autocomplete.close();
            self.document.register_words_in_line(start_y);
        }
    }

    fn delete_line(&mut self) {
        let y = self.cursor.y;
        if y >= self.document.n_lines() {
            return;
        }
        self.apply_edit(EditOperation::Replacement {
            pos_from: (0, y),
            pos_to: (0, y + 1),
            text: Text::Empty,
        });
    }

    fn after_history_step(&mut self, pos: Option<Pos>, nothing_left: &str) {
        match pos {
            Some(pos) => {
                self.cursor.update_pos(pos, false);
                self.cursor.selection_anchor = None;
                self.matched_range = None;
                self.first_quit_sent = false;
                self.needs_full_rerender = true;
            }
            None => self.status.notify(nothing_left),
        }
        self.autocomplete.close();
    }

    fn refresh_autocomplete(&mut self) {
        let (x, y) = self.cursor.pos();
        let prefix = self
            .document
            .word_boundaries((x, y))
            .zip(self.document.lines.get(y))
            .map(|(range, line)| line.get_range(range.start..x).to_owned());
        match prefix {
            Some(prefix) => {
                self.autocomplete.update(self.document.vocabulary(), &prefix);
                self.autocomplete.open();
            }
            None => self.autocomplete.close(),
        }
    }

    fn insert_completion(&mut self) {
        let Some(suffix) = self.autocomplete.take_selected_suffix() else {
            return;
        };
        let pos = self.cursor.pos();
        self.apply_edit(EditOperation::Insertion {
            pos,
            text: Text::String(suffix),
        });
        self.needs_full_rerender = true;
    }
}

fn edit_start_y(op: &EditOperation) -> usize {
    match op {
        EditOperation::Deletion { pos } => pos.1.saturating_sub(usize::from(pos.0 == 0)),
        EditOperation::Insertion { pos, .. } => pos.1,
        EditOperation::Replacement { pos_from, .. } => pos_from.1,
    }
}
