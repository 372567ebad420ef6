//! iedit entrypoint.
//!
//! Loads the configuration and the document, claims rows under the shell
//! prompt, then feeds input to the editor until it asks to quit.

use std::io::{self, Write};
use std::sync::mpsc;

use clap::Parser;
use iedit::cli::Cli;
use iedit::config::EditorConfig;
use iedit::editor::Editor;
use iedit::editor::clipboard;
use iedit::editor::commands::CommandExecutionResult;
use iedit::error::Result;
use iedit::input::InputSource;
use iedit::terminal::{TerminalGuard, UiLayout};
use iedit::{logging, render};
use iedit_document::Document;

fn main() {
    let cli = Cli::parse();
    logging::init();

    let run_result = run(&cli);
    let mut stderr = io::stderr();
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = EditorConfig::load();
    let document = match &cli.path {
        Some(path) => Document::from_file(path)?,
        None => Document::from_file("")?,
    };

    let mut stdout = io::stdout();
    let layout = UiLayout::reserve(&mut stdout, config.min_lines, config.fullscreen)?;
    let _guard = TerminalGuard::enable(layout.origin_y)?;

    let (sender, receiver) = mpsc::channel();
    let clipboard = clipboard::for_session(config.use_system_clipboard);
    let mut editor = Editor::new(config, document, layout, clipboard, sender);
    if let Some(line) = cli.line {
        editor.open_at_line(line);
    }

    let mut input = InputSource::new(receiver);
    event_loop(&mut editor, &mut input, &mut stdout)?;
    log::info!("editor closed");
    Ok(())
}

fn event_loop(editor: &mut Editor, input: &mut InputSource, out: &mut impl Write) -> Result<()> {
    loop {
        render::draw(editor, out)?;
        editor.frame_drawn();
        let next = input.next_input()?;
        if editor.process_input(next) == CommandExecutionResult::ShouldQuit {
            return Ok(());
        }
    }
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            log::error!("{err}");
            if writeln!(stderr, "iedit: {err}").is_err() {
                // Nowhere left to report the failure.
            }
            1
        }
    }
}
