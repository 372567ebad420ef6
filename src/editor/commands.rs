//! Commands produced by the mode parsers and carried out by the editor.

use iedit_document::{EditOperation, Pos};

use crate::editor::execute::Executor;
use crate::editor::keybindings::Popup;
use crate::modes::EditorMode;

/// Whether the main loop keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandExecutionResult {
    /// Keep reading input.
    Continue,
    /// Leave the editor.
    ShouldQuit,
}

/// Where a [`EditorCommand::MoveCursor`] goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorMovement {
    /// A fixed position.
    AbsolutePos(Pos),
    /// Lines up.
    Up(usize),
    /// Lines down.
    Down(usize),
    /// Columns left.
    Left(usize),
    /// Columns right.
    Right(usize),
    /// End of the next word.
    NextWordEnd,
    /// Start of the previous word.
    PreviousWordStart,
    /// Next blank line.
    NextParagraph,
    /// Previous blank line.
    PreviousParagraph,
    /// Column zero.
    StartOfLine,
    /// Past the last character.
    EndOfLine,
    /// First line.
    StartOfFile,
    /// Row after the last line.
    EndOfFile,
    /// Bracket matching the one under the cursor.
    MatchingBracket,
    /// Next occurrence of a character.
    NextOccurrenceOf(char),
    /// Previous occurrence of a character.
    PreviousOccurrenceOf(char),
    /// Forward through the jump history.
    NextJump,
    /// Back through the jump history.
    PreviousJump,
}

/// Everything the editor can be asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCommand {
    /// Quit, unconditionally when `force`.
    Quit {
        /// Skip the unsaved changes warning.
        force: bool,
    },
    /// Save the document.
    Save,
    /// Show a message from a background task.
    DisplayExternalNotification(String),
    /// Move the cursor, extending the selection when `with_selection`.
    MoveCursor {
        /// Target of the move.
        movement: CursorMovement,
        /// Keep or start a selection.
        with_selection: bool,
    },
    /// Keep extending the selection with plain moves.
    ToggleLockSelection,
    /// Show or hide the gutter.
    ToggleLineNumbers,
    /// Scroll one line without moving the cursor.
    ScrollViewportUp,
    /// Scroll one line without moving the cursor.
    ScrollViewportDown,
    /// Drop the selection, search match and popups.
    ClearSelection,
    /// Enter another mode.
    SwitchMode(EditorMode),
    /// Apply a document edit.
    Edit(EditOperation),
    /// Remove the cursor's line.
    DeleteLine,
    /// Revert the last edit.
    UndoLastEdit,
    /// Reapply the last undone edit.
    RedoLastEdit,
    /// Copy the selection to the clipboard.
    YankSelection,
    /// Move the selection to the clipboard.
    CutSelection,
    /// Insert the clipboard, replacing any selection.
    Paste,
    /// Jump to the next or previous match, of the word under the cursor in
    /// insert mode or of the query in search mode.
    FindMatch {
        /// Search towards the start of the document.
        backwards: bool,
    },
    /// Open the completion popup.
    AutocompleteDisplay,
    /// Select the next completion.
    AutocompleteNext,
    /// Select the previous completion.
    AutocompletePrevious,
    /// Insert the selected completion.
    AutocompleteInsert,
    /// Prompt for a command line entry.
    OpenCommandLine,
    /// Prompt for the program to run the file with.
    PromptExecutor,
    /// Save and run the file.
    ExecuteFile(Executor),
    /// Swap between the document and the last execution's output.
    ToggleExecutionOutput,
    /// Show a help popup.
    ShowPopup(Popup),
    /// Move the prompt cursor left.
    MovePromptCursorLeft,
    /// Move the prompt cursor right.
    MovePromptCursorRight,
    /// Type into the prompt.
    InsertCharPrompt(char),
    /// Delete the prompt character before the cursor.
    DeleteCharPrompt,
    /// Confirm the prompt.
    SubmitPrompt,
    /// Leave the prompt, restoring what it changed.
    CancelPrompt,
}
