//! Running the file or a shell command in the background.
//!
//! Commands run under `sh -c` on a worker thread. Every line they print is
//! sent back over the notification channel, prefixed with the stream it came
//! from, and ends with the exit status.

use std::io::{BufRead, BufReader, Read};
use std::process::{Command, Stdio};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use iedit_document::{Document, Pos};

use crate::editor::Editor;
use crate::editor::viewport::Viewport;
use crate::input::Key;

/// The program a file is run with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Executor {
    /// `python3` via `env`.
    Python3,
    /// `python` via `env`.
    Python,
    /// `node` via `env`.
    Node,
    /// `bash` via `env`.
    Bash,
    /// The interpreter named on the file's `#!` line.
    Shebang,
    /// A command typed at the prompt.
    Literal(String),
}

impl Executor {
    /// The executor bound to the last key of a `Ctrl+k x` chord.
    #[must_use]
    pub const fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Char('p') => Some(Self::Python3),
            Key::Char('P') => Some(Self::Python),
            Key::Char('n') => Some(Self::Node),
            Key::Char('b') => Some(Self::Bash),
            Key::Char('x') => Some(Self::Shebang),
            _ => None,
        }
    }

    /// The command prefix the file path is appended to.
    #[must_use]
    pub fn program(&self, document: &Document) -> Option<String> {
        match self {
            Self::Python3 => Some("/usr/bin/env python3".to_owned()),
            Self::Python => Some("/usr/bin/env python".to_owned()),
            Self::Node => Some("/usr/bin/env node".to_owned()),
            Self::Bash => Some("/usr/bin/env bash".to_owned()),
            Self::Shebang => document
                .lines
                .first()
                .and_then(|line| line.as_ref().strip_prefix("#!"))
                .map(|program| program.trim().to_owned())
                .filter(|program| !program.is_empty()),
            Self::Literal(command) => {
                let program = command.trim();
                (!program.is_empty()).then(|| program.to_owned())
            }
        }
    }
}

/// Quote `arg` for `sh` when it holds anything but safe characters.
#[must_use]
pub fn shell_quote(arg: &str) -> String {
    let is_safe = |ch: char| ch.is_ascii_alphanumeric() || "/._-+:,@".contains(ch);
    if !arg.is_empty() && arg.chars().all(is_safe) {
        arg.to_owned()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// Run `command` under `sh -c` on a new thread, streaming its output to
/// `notifier`.
#[must_use]
pub fn spawn_streaming(command: String, notifier: Sender<String>) -> JoinHandle<()> {
    thread::spawn(move || run_streaming(&command, &notifier))
}

fn run_streaming(command: &str, notifier: &Sender<String>) {
    log::info!("running {command:?}");
    if notifier.send(format!("Executing: {command}")).is_err() {
        return;
    }

    let spawned = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn();
    let mut child = match spawned {
        Ok(child) => child,
        Err(err) => {
            log::warn!("could not start {command:?}: {err}");
            send_or_log(notifier, format!("Failed to run {command}: {err}"));
            return;
        }
    };

    let stderr_forwarder = child.stderr.take().map(|stderr| {
        let stderr_notifier = notifier.clone();
        thread::spawn(move || forward_lines(stderr, "stderr", &stderr_notifier))
    });
    if let Some(stdout) = child.stdout.take() {
        forward_lines(stdout, "stdout", notifier);
    }
    if stderr_forwarder.is_some_and(|handle| handle.join().is_err()) {
        log::warn!("stderr forwarder panicked");
    }

    let message = match child.wait() {
        Ok(status) => format!("Process finished ({status})"),
        Err(err) => format!("Could not wait for {command}: {err}"),
    };
    send_or_log(notifier, message);
}

fn forward_lines(stream: impl Read, prefix: &str, notifier: &Sender<String>) {
    for read in BufReader::new(stream).lines() {
        let Ok(line) = read else {
            break;
        };
        if notifier.send(format!("{prefix}: {line}")).is_err() {
            break;
        }
    }
}

fn send_or_log(notifier: &Sender<String>, message: String) {
    if notifier.send(message).is_err() {
        log::debug!("editor closed before the command finished");
    }
}

const OUTPUT_HOME: Pos = (0, 0);

impl Editor {
    /// Save the file and run it with `executor` in the background.
    pub(crate) fn execute_file(&mut self, executor: Executor) {
        if self.is_viewing_execution_output() {
            self.status.notify("Switch back to the file to run it");
            return;
        }
        let Some(program) = executor.program(&self.document) else {
            let message = match executor {
                Executor::Shebang => "No #! line to run the file with",
                _ => "No program given",
            };
            self.status.notify(message);
            return;
        };
        if !self.save(false) {
            return;
        }
        let path = self.document.path().to_string_lossy().into_owned();
        self.start_background(format!("{program} {}", shell_quote(&path)));
    }

    /// Run a command line `!command` in the background.
    pub(crate) fn execute_shell_command(&mut self, command_line: &str) {
        let command = command_line.trim();
        if command.is_empty() {
            self.status.notify("No command given");
            return;
        }
        self.start_background(command.to_owned());
    }

    fn start_background(&mut self, command: String) {
        self.execution_output.clear();
        if self.is_viewing_execution_output() {
            self.refresh_execution_output();
        }
        drop(spawn_streaming(command, self.notifier()));
    }

    /// Swap between the buffer and a read-only view of the collected output.
    pub(crate) fn toggle_execution_output(&mut self) {
        match self.stashed_document.take() {
            Some((document, pos)) => {
                self.document = document;
                self.cursor.update_pos(pos, false);
                self.viewport = Viewport::centred_on(pos.1, usize::from(self.layout.editor_lines));
            }
            None => {
                let output = self.output_document();
                let document = std::mem::replace(&mut self.document, output);
                self.stashed_document = Some((document, self.cursor.pos()));
                self.cursor.update_pos(OUTPUT_HOME, false);
                self.viewport = Viewport::default();
            }
        }
        self.cursor.selection_anchor = None;
        self.matched_range = None;
        self.autocomplete.close();
        self.needs_full_rerender = true;
    }

    /// Rebuild the output view after new lines arrived.
    pub(crate) fn refresh_execution_output(&mut self) {
        self.document = self.output_document();
        self.needs_full_rerender = true;
    }

    fn output_document(&self) -> Document {
        let lines = if self.execution_output.is_empty() {
            vec![String::new()]
        } else {
            self.execution_output.clone()
        };
        Document::from_strings(lines, "", true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::test_support::*;
    use crate::input::Input;
    use rstest::rstest;
    use std::sync::mpsc;
    use std::time::Duration;

    fn doc(first_line: &str) -> Document {
        Document::from_strings(vec![first_line.to_owned()], "script", false)
    }

    #[rstest]
    #[case::python3(Key::Char('p'), Some(Executor::Python3))]
    #[case::python(Key::Char('P'), Some(Executor::Python))]
    #[case::node(Key::Char('n'), Some(Executor::Node))]
    #[case::bash(Key::Char('b'), Some(Executor::Bash))]
    #[case::shebang(Key::Char('x'), Some(Executor::Shebang))]
    #[case::unbound(Key::Char('q'), None)]
    fn executors_by_key(#[case] key: Key, #[case] expected: Option<Executor>) {
        assert_eq!(Executor::from_key(key), expected);
    }

    #[rstest]
    #[case::shebang("#!/usr/bin/env ruby", Some("/usr/bin/env ruby"))]
    #[case::no_shebang("puts 1", None)]
    #[case::empty_shebang("#!", None)]
    fn shebang_program(#[case] first_line: &str, #[case] expected: Option<&str>) {
        assert_eq!(
            Executor::Shebang.program(&doc(first_line)).as_deref(),
            expected
        );
    }

    #[rstest]
    #[case::plain("/tmp/run.py", "/tmp/run.py")]
    #[case::space("/tmp/my file.py", "'/tmp/my file.py'")]
    #[case::quote("it's", r"'it'\''s'")]
    fn quotes_paths_for_sh(#[case] arg: &str, #[case] expected: &str) {
        assert_eq!(shell_quote(arg), expected);
    }

    #[rstest]
    fn streams_output_and_exit_status() {
        let (sender, receiver) = mpsc::channel();
        spawn_streaming("echo hello".to_owned(), sender)
            .join()
            .expect("worker thread");

        let messages: Vec<String> = receiver.try_iter().collect();
        assert_eq!(messages.first().map(String::as_str), Some("Executing: echo hello"));
        assert!(messages.contains(&"stdout: hello".to_owned()), "{messages:?}");
        let last = messages.last().expect("exit message");
        assert!(last.starts_with("Process finished"), "{last}");
    }

    #[rstest]
    fn stderr_is_labelled() {
        let (sender, receiver) = mpsc::channel();
        spawn_streaming("echo oops >&2".to_owned(), sender)
            .join()
            .expect("worker thread");

        let messages: Vec<String> = receiver.try_iter().collect();
        assert!(messages.contains(&"stderr: oops".to_owned()), "{messages:?}");
    }

    fn drain_until_finished(receiver: &mpsc::Receiver<String>) -> Vec<String> {
        let mut messages = Vec::new();
        while let Ok(message) = receiver.recv_timeout(Duration::from_secs(10)) {
            let finished = message.starts_with("Process finished");
            messages.push(message);
            if finished {
                break;
            }
        }
        messages
    }

    #[rstest]
    fn shell_commands_stream_into_the_output_view() {
        let (mut editor, receiver) = editor_with(&["source"]);
        editor.run_command_line("!echo from-shell");
        for message in drain_until_finished(&receiver) {
            editor.process_input(Input::ExternalNotification(message));
        }

        editor.process_input(Input::KeyChord([Key::Ctrl('k'), Key::Char('v'), Key::Char('o')]));
        assert!(editor.is_viewing_execution_output());
        assert!(editor.document.is_readonly());
        assert!(contents(&editor).contains(&"stdout: from-shell"));

        editor.process_input(Input::KeyChord([Key::Ctrl('k'), Key::Char('v'), Key::Char('o')]));
        assert_eq!(contents(&editor), ["source"]);
    }

    #[rstest]
    fn running_the_file_saves_it_first() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("run me.sh");
        let (mut editor, receiver) = editor_with(&["#!/bin/sh", ""]);
        editor.document.set_path(&path);
        press(&mut editor, &[Key::Down]);
        type_text(&mut editor, "echo ran");

        editor.process_input(Input::KeyChord([Key::Ctrl('k'), Key::Char('x'), Key::Char('x')]));
        assert!(!editor.has_unsaved_changes());

        let messages = drain_until_finished(&receiver);
        assert!(messages.contains(&"stdout: ran".to_owned()), "{messages:?}");
    }

    #[rstest]
    fn shebang_is_required_for_auto_execution() {
        let (mut editor, _receiver) = editor_with(&["echo nothing"]);
        editor.execute_file(Executor::Shebang);
        assert_eq!(editor.status.notification, "No #! line to run the file with");
    }
}
