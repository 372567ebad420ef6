//! Behaviour-driven tests for editing sessions.
//!
//! The editor is driven through [`Editor::process_input`] with synthetic key
//! presses against files in a temporary directory; nothing is drawn.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};

use iedit::config::EditorConfig;
use iedit::editor::Editor;
use iedit::editor::clipboard::BuiltinClipboard;
use iedit::editor::commands::CommandExecutionResult;
use iedit::input::{Input, Key};
use iedit::terminal::UiLayout;
use iedit_document::Document;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

struct EditorWorld {
    temp_dir: tempfile::TempDir,
    /// The editor and the receiving end of its notification channel.
    session: Option<(Editor, Receiver<String>)>,
    last_result: Option<CommandExecutionResult>,
}

impl Default for EditorWorld {
    fn default() -> Self {
        Self {
            temp_dir: tempfile::tempdir().expect("temp dir"),
            session: None,
            last_result: None,
        }
    }
}

impl EditorWorld {
    fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    fn editor(&mut self) -> &mut Editor {
        &mut self.session.as_mut().expect("a file was opened").0
    }

    fn send(&mut self, key: Key) {
        let result = self.editor().process_input(Input::Keypress(key));
        self.last_result = Some(result);
    }
}

fn lines(joined: &str) -> String {
    joined.replace('|', "\n")
}

fn parse_key(name: &str) -> Key {
    match name {
        "Enter" => Key::Char('\n'),
        "Esc" => Key::Esc,
        "End" => Key::End,
        "Home" => Key::Home,
        "Up" => Key::Up,
        "Down" => Key::Down,
        "Backspace" => Key::Backspace,
        other => {
            let letter = other
                .strip_prefix("Ctrl+")
                .and_then(|rest| rest.chars().next())
                .unwrap_or_else(|| panic!("unknown key {other:?}"));
            Key::Ctrl(letter)
        }
    }
}

#[fixture]
fn world() -> EditorWorld {
    EditorWorld::default()
}

#[given("a file \"{name}\" containing \"{text}\"")]
fn given_file(world: &mut EditorWorld, name: String, text: String) {
    let path = world.path(&name);
    std::fs::write(&path, lines(&text)).expect("write file");

    let config = EditorConfig {
        show_keybindings: false,
        use_system_clipboard: false,
        ..EditorConfig::default()
    };
    let (layout, _) = UiLayout::compute(0, 80, 24, 10, false);
    let (sender, receiver) = mpsc::channel();
    let document = Document::from_file(&path).expect("open file");
    let editor = Editor::new(
        config,
        document,
        layout,
        Box::new(BuiltinClipboard::default()),
        sender,
    );
    world.session = Some((editor, receiver));
}

#[when("I type \"{text}\"")]
fn when_type(world: &mut EditorWorld, text: String) {
    for ch in text.chars() {
        world.send(Key::Char(ch));
    }
}

#[when("I press \"{key}\"")]
fn when_press(world: &mut EditorWorld, key: String) {
    world.send(parse_key(&key));
}

#[then("the file \"{name}\" contains \"{text}\"")]
fn then_file_contains(world: &mut EditorWorld, name: String, text: String) {
    let saved = std::fs::read_to_string(world.path(&name)).expect("read file");
    assert_eq!(saved, lines(&text));
}

#[then("the buffer reads \"{text}\"")]
fn then_buffer_reads(world: &mut EditorWorld, text: String) {
    let buffer: Vec<String> = world
        .editor()
        .document()
        .lines
        .iter()
        .map(|line| line.as_ref().to_owned())
        .collect();
    assert_eq!(buffer.join("\n"), lines(&text));
}

#[then("the status reads \"{message}\"")]
fn then_status_reads(world: &mut EditorWorld, message: String) {
    let notification = &world.editor().status().notification;
    assert!(
        notification.starts_with(&message),
        "expected {message:?} in {notification:?}"
    );
}

#[then("the editor keeps running")]
fn then_keeps_running(world: &mut EditorWorld) {
    assert_eq!(world.last_result, Some(CommandExecutionResult::Continue));
}

#[then("the editor quits")]
fn then_quits(world: &mut EditorWorld) {
    assert_eq!(world.last_result, Some(CommandExecutionResult::ShouldQuit));
}

#[then("the cursor is at line {line}")]
fn then_cursor_line(world: &mut EditorWorld, line: usize) {
    assert_eq!(world.editor().cursor().y + 1, line);
}

#[scenario(
    path = "tests/features/editor.feature",
    name = "Typed text is saved to the file"
)]
fn scenario_save(world: EditorWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/editor.feature",
    name = "Undo brings back the original text"
)]
fn scenario_undo(world: EditorWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/editor.feature",
    name = "Quitting with unsaved changes asks first"
)]
fn scenario_quit_confirmation(world: EditorWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/editor.feature",
    name = "Go to line moves the cursor"
)]
fn scenario_goto(world: EditorWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/editor.feature",
    name = "Search jumps to the first match"
)]
fn scenario_search(world: EditorWorld) {
    let _ = world;
}
