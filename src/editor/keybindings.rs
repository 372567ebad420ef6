//! Help popups listing the keybindings.

/// A help popup drawn in the top-right corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    /// General keybindings, shown by `Ctrl+t` and on start.
    Help,
    /// Chord families after `Ctrl+k`.
    Chords,
    /// `Ctrl+k l` line chords.
    LineChords,
    /// `Ctrl+k x` executors.
    ExecuteChords,
    /// `Ctrl+k v` view chords.
    ViewChords,
    /// `Ctrl+k s` selection chords.
    SelectionChords,
    /// `Ctrl+k t` and `Ctrl+k T` waiting for a character.
    PressCharacter,
}

const HELP: &[&str] = &[
    "^q: quit  ^s: save",
    "^f/^b: find forward/back",
    "^g: go to line",
    "^z/^r: undo/redo",
    "^y/^x/^p: yank/cut/paste",
    "^e: command line",
    "^n: autocomplete",
    "^k: chords",
    "^t: this help",
];

const CHORDS: &[&str] = &[
    "l: line",
    "x: execute",
    "t: find char forward",
    "T: find char backward",
    "v: view",
    "s: selection",
];

const LINE_CHORDS: &[&str] = &[
    "d: delete",
    "n: toggle numbers",
    "w: start of line",
    "e: end of line",
];

const EXECUTE_CHORDS: &[&str] = &[
    "x: auto (shebang)",
    "p: python3",
    "P: python",
    "n: node",
    "b: bash",
    "?: ask",
];

const VIEW_CHORDS: &[&str] = &["o: output/original"];

const SELECTION_CHORDS: &[&str] = &["l: toggle lock"];

const PRESS_CHARACTER: &[&str] = &["press a character"];

impl Popup {
    /// The popup's text, one entry per row.
    #[must_use]
    pub const fn lines(self) -> &'static [&'static str] {
        match self {
            Self::Help => HELP,
            Self::Chords => CHORDS,
            Self::LineChords => LINE_CHORDS,
            Self::ExecuteChords => EXECUTE_CHORDS,
            Self::ViewChords => VIEW_CHORDS,
            Self::SelectionChords => SELECTION_CHORDS,
            Self::PressCharacter => PRESS_CHARACTER,
        }
    }
}
