//! Status line prompts and the command line.

use crate::editor::Editor;
use crate::editor::commands::{CommandExecutionResult, EditorCommand};
use crate::editor::execute::Executor;
use crate::error::EditorError;
use crate::input::{Input, Key};
use crate::modes::{EditorMode, PromptAction};

impl Editor {
    pub(super) fn prompt_mode_parse_command(input: Input) -> Option<EditorCommand> {
        use EditorCommand as C;

        match input {
            Input::Keypress(Key::Esc) => Some(C::CancelPrompt),
            Input::Keypress(Key::Left) => Some(C::MovePromptCursorLeft),
            Input::Keypress(Key::Right) => Some(C::MovePromptCursorRight),
            Input::Keypress(Key::Backspace | Key::Delete) => Some(C::DeleteCharPrompt),
            Input::Keypress(Key::Char('\n' | '\r')) => Some(C::SubmitPrompt),
            Input::Keypress(Key::Char('\t')) => None,
            Input::Keypress(Key::Char(ch)) => Some(C::InsertCharPrompt(ch)),
            _ => None,
        }
    }

    /// Apply a prompt editing command, returning whether it was one.
    pub(super) fn edit_prompt(&mut self, command: &EditorCommand) -> bool {
        match command {
            EditorCommand::MovePromptCursorLeft => self.status.move_left(),
            EditorCommand::MovePromptCursorRight => self.status.move_right(),
            EditorCommand::InsertCharPrompt(ch) => self.status.insert_char(*ch),
            EditorCommand::DeleteCharPrompt => self.status.delete_char(),
            _ => return false,
        }
        true
    }

    pub(super) fn prompt_mode_execute_command(
        &mut self,
        command: EditorCommand,
        action: PromptAction,
    ) -> CommandExecutionResult {
        if self.edit_prompt(&command) {
            return CommandExecutionResult::Continue;
        }

        match command {
            EditorCommand::SubmitPrompt => {
                let entry = self.status.take_prompt();
                self.mode = EditorMode::Insert;
                match action {
                    PromptAction::CommandLine => return self.run_command_line(&entry),
                    PromptAction::Executor => self.execute_file(Executor::Literal(entry)),
                    PromptAction::SaveAs => self.save_as(&entry),
                }
            }
            EditorCommand::CancelPrompt => self.enter_mode(EditorMode::Insert),
            _ => {}
        }
        CommandExecutionResult::Continue
    }

    /// Run one command line entry.
    pub(crate) fn run_command_line(&mut self, input: &str) -> CommandExecutionResult {
        let entry = input.trim();
        match entry {
            "" => {}
            "q" | "quit" => return self.quit(false),
            "q!" | "quit!" => return self.quit(true),
            "w" | "write" => {
                self.save(true);
            }
            "wq" => {
                if self.save(false) {
                    return self.quit(false);
                }
            }
            _ => {
                if let Some(command) = entry.strip_prefix('!') {
                    self.execute_shell_command(command);
                } else if let Some(assignment) = entry.strip_prefix("set ") {
                    self.apply_setting(assignment);
                } else {
                    let err = EditorError::UnknownCommand {
                        command: entry.to_owned(),
                    };
                    self.status.notify(err.to_string());
                }
            }
        }
        CommandExecutionResult::Continue
    }

    fn apply_setting(&mut self, assignment: &str) {
        let Some((key, value)) = assignment.split_once('=') else {
            self.status.notify("Usage: set key=value");
            return;
        };
        match self.config.set(key, value) {
            Ok(()) => {
                log::info!("set {}={}", key.trim(), value.trim());
                self.status.notify(format!("{} = {}", key.trim(), value.trim()));
                if key.trim() == "enable_syntax_highlighting" || key.trim() == "syntax_highlighting_dir" {
                    self.attach_syntax();
                }
                self.needs_full_rerender = true;
            }
            Err(err) => self.status.notify(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::editor::commands::CommandExecutionResult;
    use crate::editor::test_support::*;
    use crate::input::{Input, Key};
    use crate::modes::{EditorMode, PromptAction};
    use rstest::rstest;

    fn command_line(editor: &mut crate::editor::Editor, entry: &str) -> CommandExecutionResult {
        press(editor, &[Key::Ctrl('e')]);
        type_text(editor, entry);
        editor.process_input(Input::Keypress(Key::Char('\n')))
    }

    #[rstest]
    fn command_line_opens_a_prompt() {
        let (mut editor, _rx) = editor_with(&[""]);
        press(&mut editor, &[Key::Alt('e')]);
        assert_eq!(editor.mode, EditorMode::Prompt(PromptAction::CommandLine));
        type_text(&mut editor, "wq");
        assert_eq!(editor.status.prompt_line, "wq");
        press(&mut editor, &[Key::Esc]);
        assert_eq!(editor.mode, EditorMode::Insert);
        assert!(editor.status.prompt_line.is_empty());
    }

    #[rstest]
    #[case::quit("q")]
    #[case::quit_long("quit")]
    #[case::force("q!")]
    fn quit_commands_leave_a_clean_buffer(#[case] entry: &str) {
        let (mut editor, _rx) = editor_with(&[""]);
        assert_eq!(command_line(&mut editor, entry), CommandExecutionResult::ShouldQuit);
    }

    #[rstest]
    fn forced_quit_ignores_unsaved_changes() {
        let (mut editor, _rx) = editor_with(&[""]);
        type_text(&mut editor, "dirty");
        assert_eq!(command_line(&mut editor, "q"), CommandExecutionResult::Continue);
        assert_eq!(command_line(&mut editor, "quit!"), CommandExecutionResult::ShouldQuit);
    }

    #[rstest]
    fn set_changes_the_session_config() {
        let (mut editor, _rx) = editor_with(&[""]);
        command_line(&mut editor, "set tab_size=2");
        assert_eq!(editor.config.tab_size, 2);
        assert_eq!(editor.status.notification, "tab_size = 2");
    }

    #[rstest]
    #[case::bad_value("set show_line_numbers=maybe", "true or false")]
    #[case::no_equals("set tab_size", "Usage")]
    #[case::unknown("frobnicate", "unknown command")]
    fn bad_entries_are_reported(#[case] entry: &str, #[case] message: &str) {
        let (mut editor, _rx) = editor_with(&[""]);
        command_line(&mut editor, entry);
        assert!(
            editor.status.notification.contains(message),
            "{}",
            editor.status.notification
        );
    }

    #[rstest]
    fn write_on_an_unnamed_buffer_asks_for_a_name() {
        let (mut editor, _rx) = editor_with(&["text"]);
        command_line(&mut editor, "w");
        assert_eq!(editor.mode, EditorMode::Prompt(PromptAction::SaveAs));
    }

    #[rstest]
    fn write_quit_saves_then_quits() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("notes.txt");
        let (mut editor, _rx) = editor_with(&[""]);
        editor.document.set_path(&path);
        type_text(&mut editor, "kept");

        assert_eq!(command_line(&mut editor, "wq"), CommandExecutionResult::ShouldQuit);
        assert_eq!(std::fs::read_to_string(&path).expect("saved file"), "kept");
    }
}
