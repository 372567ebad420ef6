//! Editing modes and their keybindings.
//!
//! Each mode parses input into an [`EditorCommand`] and carries out the
//! commands that only make sense inside it. Commands every mode shares are
//! handled by [`Editor`] itself before a mode sees them.

mod goto;
mod insert;
mod prompt;
mod search;

use iedit_document::Pos;

use crate::editor::Editor;
use crate::editor::commands::{CommandExecutionResult, EditorCommand};
use crate::input::Input;

/// What submitting a prompt does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    /// Run a command line entry such as `wq` or `set tab_size=2`.
    CommandLine,
    /// Run the file with the typed program.
    Executor,
    /// Name an unnamed buffer and save it.
    SaveAs,
}

impl PromptAction {
    /// Text shown before the prompt.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CommandLine => "> ",
            Self::Executor => "Run with: ",
            Self::SaveAs => "File name: ",
        }
    }
}

/// The active editing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    /// Typing into the document.
    Insert,
    /// Typing into the status line.
    Prompt(PromptAction),
    /// Typing a line number; the cursor follows live.
    Goto {
        /// Restored when the jump is cancelled.
        original: Pos,
    },
    /// Typing a search pattern; the cursor follows the nearest match.
    Search {
        /// Restored when the search is cancelled.
        original: Pos,
        /// Look for the previous match rather than the next.
        backwards: bool,
    },
}

impl EditorMode {
    /// Status line label for modes that read a prompt.
    #[must_use]
    pub const fn label(&self) -> Option<&'static str> {
        match self {
            Self::Insert => None,
            Self::Prompt(action) => Some(action.label()),
            Self::Goto { .. } => Some("Go to line: "),
            Self::Search { backwards: false, .. } => Some("Find: "),
            Self::Search { backwards: true, .. } => Some("Find backwards: "),
        }
    }
}

impl Editor {
    pub(crate) fn parse_mode_command(&self, input: Input) -> Option<EditorCommand> {
        match self.mode {
            EditorMode::Insert => self.insert_mode_parse_command(input),
            EditorMode::Prompt(_) => Self::prompt_mode_parse_command(input),
            EditorMode::Goto { .. } => Self::goto_mode_parse_command(input),
            EditorMode::Search { .. } => Self::search_mode_parse_command(input),
        }
    }

    pub(crate) fn execute_mode_command(&mut self, command: EditorCommand) -> CommandExecutionResult {
        match self.mode {
            EditorMode::Insert => self.insert_mode_execute_command(command),
            EditorMode::Prompt(action) => self.prompt_mode_execute_command(command, action),
            EditorMode::Goto { original } => {
                self.goto_mode_execute_command(command, original);
                CommandExecutionResult::Continue
            }
            EditorMode::Search { original, backwards } => {
                self.search_mode_execute_command(command, original, backwards);
                CommandExecutionResult::Continue
            }
        }
    }
}
