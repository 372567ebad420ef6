//! iedit: a terminal text editor that opens inline, below the shell prompt.
//!
//! The binary wires these modules together:
//!
//! - [`config`] loads [`config::EditorConfig`] from TOML.
//! - [`terminal`] reserves rows under the prompt and owns raw mode.
//! - [`input`] turns terminal events and background messages into
//!   [`input::Input`].
//! - [`editor`] holds the state machine driven by
//!   [`editor::Editor::process_input`], with the keybindings of each mode in
//!   [`modes`].
//! - [`render`] draws the state with crossterm.
//!
//! Documents themselves live in the `iedit-document` crate.
//!
//! # Examples
//!
//! ```
//! use std::sync::mpsc;
//!
//! use iedit::config::EditorConfig;
//! use iedit::editor::Editor;
//! use iedit::editor::clipboard::BuiltinClipboard;
//! use iedit::input::{Input, Key};
//! use iedit::terminal::UiLayout;
//! use iedit_document::Document;
//!
//! let (layout, _) = UiLayout::compute(0, 80, 24, 10, false);
//! let document = Document::from_strings(vec![String::new()], "", false);
//! let (sender, _receiver) = mpsc::channel();
//! let mut editor = Editor::new(
//!     EditorConfig::default(),
//!     document,
//!     layout,
//!     Box::new(BuiltinClipboard::default()),
//!     sender,
//! );
//! for ch in "hi".chars() {
//!     editor.process_input(Input::Keypress(Key::Char(ch)));
//! }
//! assert_eq!(editor.document().lines[0].as_ref(), "hi");
//! ```

pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod input;
pub mod logging;
pub mod modes;
pub mod render;
pub mod terminal;
