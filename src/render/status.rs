//! The separator bar and the status line.

use std::io::{self, Write};

use crossterm::style::Color;
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, queue};

use crate::editor::Editor;
use crate::render::{Cell, CellStyle, write_cells};

const INDENT: &str = "  ";

pub(crate) fn draw(editor: &Editor, out: &mut impl Write) -> io::Result<()> {
    let layout = editor.layout();
    let width = usize::from(layout.term_width);
    let bar = Cell::text(&"─".repeat(width), CellStyle::fg(Color::DarkGrey));

    queue!(out, cursor::MoveTo(0, layout.status_y()))?;
    write_cells(out, &bar)?;
    queue!(
        out,
        cursor::MoveTo(0, layout.status_y() + 1),
        Clear(ClearType::CurrentLine)
    )?;
    let mut line = status_cells(editor);
    line.truncate(width);
    write_cells(out, &line)
}

/// The status line: the active prompt, else the notification, else the
/// buffer name and cursor position.
pub(crate) fn status_cells(editor: &Editor) -> Vec<Cell> {
    if let Some(label) = editor.mode().label() {
        return prompt_cells(editor, label);
    }

    let status = editor.status();
    let text = if status.notification.is_empty() {
        let (x, y) = editor.cursor().pos();
        format!(
            "{INDENT}{} | Ln: {}, Col: {}",
            editor.display_path(),
            y + 1,
            x + 1
        )
    } else {
        format!("{INDENT}{}", status.notification)
    };
    Cell::text(&text, CellStyle::default())
}

fn prompt_cells(editor: &Editor, label: &str) -> Vec<Cell> {
    let status = editor.status();
    let mut cells = Cell::text(&format!("{INDENT}{label}"), CellStyle::default());
    cells.extend(status.prompt_line.chars().enumerate().map(|(idx, ch)| Cell {
        ch,
        style: if idx == status.cursor_pos {
            CellStyle::reverse()
        } else {
            CellStyle::default()
        },
    }));
    if status.cursor_pos >= status.prompt_line.chars().count() {
        cells.push(Cell::cursor());
    }
    cells
}
