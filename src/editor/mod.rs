//! The editor state machine.
//!
//! [`Editor::process_input`] turns one [`Input`] into a command through the
//! active mode's parser, carries it out, then clamps the cursor and scrolls
//! the viewport. Nothing here touches the terminal: drawing is done by
//! [`crate::render`] from the state left behind.

pub mod autocomplete;
pub mod clipboard;
pub mod commands;
pub mod cursor;
pub mod execute;
pub mod io;
pub mod keybindings;
pub mod selection;
pub mod status;
pub mod viewport;

use std::sync::mpsc::Sender;

use iedit_document::{Document, DocumentLine, DocumentSyntax, Pos};
use regex::Regex;

use crate::config::EditorConfig;
use crate::input::{Input, Key};
use crate::modes::EditorMode;
use crate::terminal::UiLayout;
use autocomplete::Autocomplete;
use clipboard::EditorClipboard;
use commands::{CommandExecutionResult, CursorMovement, EditorCommand};
use cursor::Cursor;
use keybindings::Popup;
use status::StatusBar;
use viewport::{CursorSpot, Viewport, ViewportFrame};

const UNSAVED_CHANGES_WARNING: &str = "Unsaved changes: Ctrl+s to save, Ctrl+q again to quit";

/// An open document with everything needed to edit and draw it.
pub struct Editor {
    pub(crate) config: EditorConfig,
    pub(crate) document: Document,
    pub(crate) mode: EditorMode,
    pub(crate) status: StatusBar,
    pub(crate) cursor: Cursor,
    pub(crate) viewport: Viewport,
    pub(crate) layout: UiLayout,
    pub(crate) clipboard: Box<dyn EditorClipboard>,
    pub(crate) autocomplete: Autocomplete,
    pub(crate) popup: Option<Popup>,
    /// A popup was on screen in the last frame.
    pub(crate) popup_drawn: bool,
    /// Last search or word match, `(start, end)`.
    pub(crate) matched_range: Option<(Pos, Pos)>,
    pub(crate) search_pattern: Option<Regex>,
    pub(crate) is_selection_locked: bool,
    pub(crate) first_quit_sent: bool,
    pub(crate) needs_full_rerender: bool,
    /// Lines streamed by the last background command.
    pub(crate) execution_output: Vec<String>,
    /// The document and cursor set aside while the output is shown.
    pub(crate) stashed_document: Option<(Document, Pos)>,
    notifier: Sender<String>,
}

impl Editor {
    /// Open `document` in a UI laid out as `layout`.
    ///
    /// Background commands report through `notifier`, whose receiver feeds
    /// [`Input::ExternalNotification`] back into the loop.
    #[must_use]
    pub fn new(
        config: EditorConfig,
        document: Document,
        layout: UiLayout,
        clipboard: Box<dyn EditorClipboard>,
        notifier: Sender<String>,
    ) -> Self {
        let popup = config.show_keybindings.then_some(Popup::Help);
        let mut editor = Self {
            config,
            document,
            mode: EditorMode::Insert,
            status: StatusBar::default(),
            cursor: Cursor::default(),
            viewport: Viewport::default(),
            layout,
            clipboard,
            autocomplete: Autocomplete::default(),
            popup,
            popup_drawn: false,
            matched_range: None,
            search_pattern: None,
            is_selection_locked: false,
            first_quit_sent: false,
            needs_full_rerender: true,
            execution_output: Vec::new(),
            stashed_document: None,
            notifier,
        };
        editor.attach_syntax();
        editor
    }

    /// Put the cursor on 1-based `line`, centring the view on it.
    pub fn open_at_line(&mut self, line: usize) {
        let y = line
            .saturating_sub(1)
            .min(self.document.n_lines().saturating_sub(1));
        self.cursor = Cursor::new((0, y));
        self.viewport = Viewport::centred_on(y, usize::from(self.layout.editor_lines));
        self.needs_full_rerender = true;
    }

    /// The buffer being edited, or the execution output while it is shown.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// The editing cursor.
    #[must_use]
    pub const fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// The active mode.
    #[must_use]
    pub const fn mode(&self) -> &EditorMode {
        &self.mode
    }

    /// Prompt and notification state.
    #[must_use]
    pub const fn status(&self) -> &StatusBar {
        &self.status
    }

    /// Settings for this session.
    #[must_use]
    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The visible window.
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Where the editor draws.
    #[must_use]
    pub const fn layout(&self) -> &UiLayout {
        &self.layout
    }

    /// The help popup on screen, if any.
    #[must_use]
    pub const fn popup(&self) -> Option<Popup> {
        self.popup
    }

    /// Completion state.
    #[must_use]
    pub const fn autocomplete(&self) -> &Autocomplete {
        &self.autocomplete
    }

    /// The highlighted match, `(start, end)`.
    #[must_use]
    pub const fn matched_range(&self) -> Option<(Pos, Pos)> {
        self.matched_range
    }

    /// Whether the execution output replaces the document.
    #[must_use]
    pub const fn is_viewing_execution_output(&self) -> bool {
        self.stashed_document.is_some()
    }

    /// Whether the buffer, shown or set aside, has unsaved edits.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.document.has_been_edited()
            || self
                .stashed_document
                .as_ref()
                .is_some_and(|(document, _)| document.has_been_edited())
    }

    /// Handle one input, returning whether the loop should continue.
    pub fn process_input(&mut self, input: Input) -> CommandExecutionResult {
        if let Input::Resize(columns, rows) = input {
            self.layout.resize(columns, rows);
            self.needs_full_rerender = true;
            self.adjust_viewport();
            return CommandExecutionResult::Continue;
        }

        self.cursor.set_last_pos();
        if matches!(input, Input::Keypress(_) | Input::KeyChord(_)) {
            self.status.clear_notification();
            self.popup = None;
        }

        let Some(command) = self.parse_command(input) else {
            return CommandExecutionResult::Continue;
        };
        log::trace!("executing {command:?}");
        if self.execute_command(command) == CommandExecutionResult::ShouldQuit {
            return CommandExecutionResult::ShouldQuit;
        }

        self.clamp_cursor();
        self.adjust_viewport();
        CommandExecutionResult::Continue
    }

    fn parse_command(&self, input: Input) -> Option<EditorCommand> {
        match input {
            Input::ExternalNotification(message) => {
                Some(EditorCommand::DisplayExternalNotification(message))
            }
            Input::Keypress(Key::Ctrl('q')) => Some(EditorCommand::Quit { force: false }),
            Input::Keypress(Key::Ctrl('s')) => Some(EditorCommand::Save),
            _ => self.parse_mode_command(input),
        }
    }

    fn execute_command(&mut self, command: EditorCommand) -> CommandExecutionResult {
        use EditorCommand as C;

        match command {
            C::Quit { force } => return self.quit(force),
            C::Save => {
                self.save(true);
            }
            C::DisplayExternalNotification(message) => {
                self.status.notify(&message);
                self.execution_output.push(message);
                if self.is_viewing_execution_output() {
                    self.refresh_execution_output();
                }
            }
            C::ToggleLockSelection => {
                self.is_selection_locked = !self.is_selection_locked;
                let state = if self.is_selection_locked { "locked" } else { "unlocked" };
                self.status.notify(format!("Selection {state}"));
            }
            C::ToggleLineNumbers => {
                self.config.show_line_numbers = !self.config.show_line_numbers;
                self.needs_full_rerender = true;
            }
            C::ScrollViewportUp => {
                if self.viewport.top_line > 0 {
                    self.viewport.vertical_offset -= 1;
                }
            }
            C::ScrollViewportDown => {
                let bottom = self.viewport.top_line + usize::from(self.layout.editor_lines);
                if bottom < self.document.n_lines() {
                    self.viewport.vertical_offset += 1;
                }
            }
            C::ShowPopup(popup) => self.popup = Some(popup),
            command => return self.execute_mode_command(command),
        }
        CommandExecutionResult::Continue
    }

    /// Quit unless unsaved changes need confirming first.
    pub(crate) fn quit(&mut self, force: bool) -> CommandExecutionResult {
        if force
            || self.first_quit_sent
            || !self.config.confirm_quit_unsaved_changes
            || !self.has_unsaved_changes()
        {
            return CommandExecutionResult::ShouldQuit;
        }
        self.status.notify(UNSAVED_CHANGES_WARNING);
        self.first_quit_sent = true;
        CommandExecutionResult::Continue
    }

    /// Switch to `mode` with an empty prompt.
    pub(crate) fn enter_mode(&mut self, mode: EditorMode) {
        self.status.take_prompt();
        self.autocomplete.close();
        self.mode = mode;
    }

    /// Attach the highlighting rules matching the document's path.
    pub(crate) fn attach_syntax(&mut self) {
        if !self.config.enable_syntax_highlighting {
            return;
        }
        let syntax = DocumentSyntax::for_path(
            self.document.path(),
            self.config.syntax_highlighting_dir.as_deref(),
        );
        if let Some(found) = &syntax {
            log::debug!("highlighting {} as {}", self.document.path().display(), found.name);
        }
        self.document.set_syntax(syntax);
    }

    pub(crate) fn move_cursor(&mut self, movement: CursorMovement, with_selection: bool) {
        use CursorMovement as M;

        if !with_selection && self.cursor.selection_anchor.is_some() {
            self.cursor.selection_anchor = None;
            self.needs_full_rerender = true;
        } else if with_selection && self.cursor.selection_anchor.is_none() {
            self.cursor.selection_anchor = Some(self.cursor.pos());
        }
        if with_selection {
            self.needs_full_rerender = true;
        }
        self.autocomplete.close();

        let (x, y) = self.cursor.pos();
        let line_len = |y: usize| self.document.lines.get(y).map_or(0, DocumentLine::len);
        match movement {
            M::AbsolutePos(pos) => self.cursor.update_pos(pos, true),
            M::Up(lines) => self.cursor.move_up(lines),
            M::Down(lines) => self.cursor.move_down(lines),
            M::Left(1) if x == 0 && y > 0 => {
                let end = (line_len(y - 1), y - 1);
                self.cursor.update_pos(end, false);
            }
            M::Left(cols) => self.cursor.move_left(cols),
            M::Right(1) if x >= line_len(y) && y < self.document.n_lines() => {
                self.cursor.update_pos((0, y + 1), false);
            }
            M::Right(cols) => self.cursor.move_right(cols),
            M::NextWordEnd => {
                let pos = self.document.next_word_end((x, y));
                self.cursor.update_pos(pos, false);
            }
            M::PreviousWordStart => {
                let pos = self.document.previous_word_start((x, y));
                self.cursor.update_pos(pos, false);
            }
            M::NextParagraph => {
                let next_y = self.document.next_blank_line_idx(y);
                self.cursor.update_pos((0, next_y), true);
                self.needs_full_rerender = true;
            }
            M::PreviousParagraph => {
                let previous_y = self.document.previous_blank_line_idx(y);
                self.cursor.update_pos((0, previous_y), true);
                self.needs_full_rerender = true;
            }
            M::StartOfLine => self.cursor.update_pos((0, y), false),
            M::EndOfLine => self.cursor.update_pos((line_len(y), y), false),
            M::StartOfFile => self.cursor.update_pos((0, 0), true),
            M::EndOfFile => {
                let last_y = self.document.n_lines().saturating_sub(1);
                self.cursor.update_pos((0, last_y), true);
            }
            M::MatchingBracket => {
                if let Some(pos) = self.document.matching_bracket_pos((x, y)) {
                    self.cursor.update_pos(pos, true);
                }
            }
            M::NextOccurrenceOf(ch) => {
                if let Some(pos) = self.document.next_occurrence_of_char((x, y), ch) {
                    self.cursor.update_pos(pos, false);
                }
            }
            M::PreviousOccurrenceOf(ch) => {
                if let Some(pos) = self.document.previous_occurrence_of_char((x, y), ch) {
                    self.cursor.update_pos(pos, false);
                }
            }
            M::NextJump => self.cursor.jump_forward(),
            M::PreviousJump => self.cursor.jump_back(),
        }
    }

    fn clamp_cursor(&mut self) {
        let lines = &self.document.lines;
        self.cursor
            .clamp(lines.len(), |y| lines.get(y).map_or(0, DocumentLine::len));
    }

    fn adjust_viewport(&mut self) {
        let tab_size = self.config.tab_width();
        let visual_col = |(x, y): Pos| {
            self.document
                .lines
                .get(y)
                .map_or(0, |line| line.char_to_visual_idx(x, tab_size))
        };
        let (x, y) = self.cursor.pos();
        let spot = CursorSpot {
            y,
            col: visual_col((x, y)),
            past_y: self.cursor.past.1,
            past_col: visual_col(self.cursor.past),
            line_width: visual_col((usize::MAX, y)),
        };
        let frame = ViewportFrame {
            editor_lines: usize::from(self.layout.editor_lines),
            text_width: self.text_width(),
            vertical_margin: usize::from(self.config.vertical_margin),
            horizontal_margin: usize::from(self.config.horizontal_margin),
            n_lines: self.document.n_lines(),
        };
        if self.viewport.adjust(spot, frame) {
            self.needs_full_rerender = true;
        }
    }

    /// Digits needed for the largest line number.
    #[must_use]
    pub fn line_number_width(&self) -> usize {
        self.document.n_lines().max(1).to_string().len()
    }

    /// Columns taken by the line number gutter, separator included.
    #[must_use]
    pub fn gutter_width(&self) -> usize {
        if self.config.show_line_numbers {
            self.line_number_width() + 2
        } else {
            0
        }
    }

    /// Columns left for text.
    #[must_use]
    pub fn text_width(&self) -> usize {
        usize::from(self.layout.term_width).saturating_sub(self.gutter_width())
    }

    /// Status line name of the buffer.
    #[must_use]
    pub fn display_path(&self) -> String {
        if self.is_viewing_execution_output() {
            return "[Execution Output]".to_owned();
        }
        if !self.document.has_path() {
            return "[Unnamed Buffer]".to_owned();
        }
        let modified = if self.document.has_been_edited() { "*" } else { "" };
        let readonly = if self.document.is_readonly() { " [read-only]" } else { "" };
        format!("{}{modified}{readonly}", self.document.path().display())
    }

    /// Whether any popup is on screen.
    #[must_use]
    pub fn is_popup_visible(&self) -> bool {
        self.popup.is_some() || self.autocomplete.is_open()
    }

    /// Record that a frame was drawn from the current state.
    pub fn frame_drawn(&mut self) {
        let top = self.viewport.top_line;
        let rows = usize::from(self.layout.editor_lines);
        self.document.reset_lines_need_render(top..top + rows);
        self.needs_full_rerender = false;
        self.popup_drawn = self.is_popup_visible();
    }

    pub(crate) fn notifier(&self) -> Sender<String> {
        self.notifier.clone()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::mpsc::{self, Receiver};

    use super::*;
    use crate::editor::clipboard::BuiltinClipboard;

    pub(crate) fn layout() -> UiLayout {
        UiLayout {
            origin_y: 0,
            term_width: 80,
            term_height: 24,
            editor_lines: 20,
        }
    }

    pub(crate) fn config() -> EditorConfig {
        EditorConfig {
            show_keybindings: false,
            use_system_clipboard: false,
            ..EditorConfig::default()
        }
    }

    pub(crate) fn editor_with(lines: &[&str]) -> (Editor, Receiver<String>) {
        let (sender, receiver) = mpsc::channel();
        let document = Document::from_strings(
            lines.iter().map(|line| (*line).to_owned()).collect(),
            "",
            false,
        );
        let editor = Editor::new(
            config(),
            document,
            layout(),
            Box::new(BuiltinClipboard::default()),
            sender,
        );
        (editor, receiver)
    }

    pub(crate) fn press(editor: &mut Editor, keys: &[Key]) -> CommandExecutionResult {
        let mut result = CommandExecutionResult::Continue;
        for key in keys {
            result = editor.process_input(Input::Keypress(*key));
        }
        result
    }

    pub(crate) fn type_text(editor: &mut Editor, text: &str) {
        for ch in text.chars() {
            editor.process_input(Input::Keypress(Key::Char(ch)));
        }
    }

    pub(crate) fn contents(editor: &Editor) -> Vec<&str> {
        editor.document.lines.iter().map(AsRef::as_ref).collect()
    }
}
