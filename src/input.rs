//! Keyboard input, key chords and background notifications.
//!
//! Terminal events are translated into the editor's own [`Key`] type so that
//! keybindings can be matched as plain patterns and tested without a
//! terminal. `Ctrl+k` opens a three-key chord; each key of a chord is
//! reported as soon as it arrives so the editor can show the matching help
//! popup while the user is still typing it.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A key press as the editor understands it.
///
/// Enter is `Char('\n')` and Tab is `Char('\t')`.
#[expect(missing_docs, reason = "navigation variants are named after their keys")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Padding for unfilled chord slots.
    Null,
    /// A printable character.
    Char(char),
    /// A letter with Control held, always lower case.
    Ctrl(char),
    /// A character with Alt held.
    Alt(char),
    Backspace,
    AltBackspace,
    Delete,
    Esc,
    Left,
    Right,
    Up,
    Down,
    ShiftLeft,
    ShiftRight,
    ShiftUp,
    ShiftDown,
    CtrlLeft,
    CtrlRight,
    CtrlUp,
    CtrlDown,
    CtrlShiftLeft,
    CtrlShiftRight,
    CtrlShiftUp,
    CtrlShiftDown,
    AltUp,
    AltDown,
    Home,
    End,
    PageUp,
    PageDown,
}

impl From<KeyEvent> for Key {
    fn from(event: KeyEvent) -> Self {
        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        let alt = event.modifiers.contains(KeyModifiers::ALT);
        let shift = event.modifiers.contains(KeyModifiers::SHIFT);

        match event.code {
            KeyCode::Char(ch) if ctrl => Self::Ctrl(ch.to_ascii_lowercase()),
            KeyCode::Char(ch) if alt => Self::Alt(ch),
            KeyCode::Char(ch) => Self::Char(ch),
            KeyCode::Enter => Self::Char('\n'),
            KeyCode::Tab => Self::Char('\t'),
            KeyCode::Backspace if alt => Self::AltBackspace,
            KeyCode::Backspace if ctrl => Self::Ctrl('h'),
            KeyCode::Backspace => Self::Backspace,
            KeyCode::Delete => Self::Delete,
            KeyCode::Esc => Self::Esc,
            KeyCode::Left => arrow(ctrl, shift, [Self::Left, Self::ShiftLeft, Self::CtrlLeft, Self::CtrlShiftLeft]),
            KeyCode::Right => arrow(ctrl, shift, [Self::Right, Self::ShiftRight, Self::CtrlRight, Self::CtrlShiftRight]),
            KeyCode::Up if alt => Self::AltUp,
            KeyCode::Up => arrow(ctrl, shift, [Self::Up, Self::ShiftUp, Self::CtrlUp, Self::CtrlShiftUp]),
            KeyCode::Down if alt => Self::AltDown,
            KeyCode::Down => arrow(ctrl, shift, [Self::Down, Self::ShiftDown, Self::CtrlDown, Self::CtrlShiftDown]),
            KeyCode::Home => Self::Home,
            KeyCode::End => Self::End,
            KeyCode::PageUp => Self::PageUp,
            KeyCode::PageDown => Self::PageDown,
            _ => Self::Null,
        }
    }
}

/// Pick `[plain, shift, ctrl, ctrl+shift]` by modifier.
const fn arrow(ctrl: bool, shift: bool, variants: [Key; 4]) -> Key {
    let [plain, shifted, with_ctrl, with_both] = variants;
    match (ctrl, shift) {
        (false, false) => plain,
        (false, true) => shifted,
        (true, false) => with_ctrl,
        (true, true) => with_both,
    }
}

/// One unit of input for the editor loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Nothing happened before the poll timed out.
    NoOp,
    /// A single key press.
    Keypress(Key),
    /// A chord, complete or in progress; unfilled slots are [`Key::Null`].
    KeyChord([Key; 3]),
    /// A message from a background task.
    ExternalNotification(String),
    /// The terminal was resized to `(columns, rows)`.
    Resize(u16, u16),
}

/// The key opening a chord.
pub const CHORD_LEADER: Key = Key::Ctrl('k');

/// Groups key presses into chords.
#[derive(Debug, Default)]
pub struct ChordParser {
    buf: Option<[Key; 3]>,
}

impl ChordParser {
    /// Feed one key, returning what the editor should see.
    ///
    /// # Examples
    ///
    /// ```
    /// use iedit::input::{ChordParser, Input, Key};
    ///
    /// let mut parser = ChordParser::default();
    /// parser.feed(Key::Ctrl('k'));
    /// parser.feed(Key::Char('l'));
    /// assert_eq!(
    ///     parser.feed(Key::Char('n')),
    ///     Input::KeyChord([Key::Ctrl('k'), Key::Char('l'), Key::Char('n')])
    /// );
    /// assert_eq!(parser.feed(Key::Char('n')), Input::Keypress(Key::Char('n')));
    /// ```
    pub fn feed(&mut self, key: Key) -> Input {
        let Some([leader, second, _]) = self.buf else {
            if key == CHORD_LEADER {
                let opening = [CHORD_LEADER, Key::Null, Key::Null];
                self.buf = Some(opening);
                return Input::KeyChord(opening);
            }
            return Input::Keypress(key);
        };

        if key == Key::Esc {
            self.buf = None;
            return Input::Keypress(Key::Esc);
        }

        if second == Key::Null {
            let pending = [leader, key, Key::Null];
            self.buf = Some(pending);
            return Input::KeyChord(pending);
        }
        self.buf = None;
        Input::KeyChord([leader, second, key])
    }

    /// Whether a chord is in progress.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.buf.is_some()
    }
}

/// How long one poll waits for a terminal event.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Reads terminal events and background notifications.
pub struct InputSource {
    chords: ChordParser,
    notifications: Receiver<String>,
}

impl InputSource {
    /// Listen for notifications on `notifications` alongside the terminal.
    #[must_use]
    pub fn new(notifications: Receiver<String>) -> Self {
        Self {
            chords: ChordParser::default(),
            notifications,
        }
    }

    /// Wait briefly for the next input.
    ///
    /// Pending notifications are delivered before terminal events.
    ///
    /// # Errors
    ///
    /// Propagates failures reading terminal events.
    pub fn next_input(&mut self) -> std::io::Result<Input> {
        match self.notifications.try_recv() {
            Ok(message) => return Ok(Input::ExternalNotification(message)),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => {}
        }

        if !event::poll(POLL_INTERVAL)? {
            return Ok(Input::NoOp);
        }

        Ok(match event::read()? {
            Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
                self.chords.feed(Key::from(key_event))
            }
            Event::Resize(columns, rows) => Input::Resize(columns, rows),
            _ => Input::NoOp,
        })
    }
}
