//! Drawing the editor state with crossterm.
//!
//! Rows are built as [`Cell`]s first and written in runs of equal style, so
//! the layout logic can be tested without a terminal. Unless a full redraw is
//! pending only dirty lines and the cursor's current and previous lines are
//! written.

mod line;
mod popup;
mod status;

use std::io::{self, Write};

use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, queue};

use crate::editor::Editor;

/// Colours and attributes of one terminal cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellStyle {
    /// Foreground, terminal default when `None`.
    pub fg: Option<Color>,
    /// Background, terminal default when `None`.
    pub bg: Option<Color>,
    /// Swap foreground and background.
    pub reverse: bool,
}

impl CellStyle {
    /// Only a foreground colour.
    #[must_use]
    pub const fn fg(colour: Color) -> Self {
        Self {
            fg: Some(colour),
            bg: None,
            reverse: false,
        }
    }

    /// Inverse video.
    #[must_use]
    pub const fn reverse() -> Self {
        Self {
            fg: None,
            bg: None,
            reverse: true,
        }
    }
}

/// One character on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// The character shown.
    pub ch: char,
    /// How it is drawn.
    pub style: CellStyle,
}

impl Cell {
    /// `text` as cells sharing `style`.
    #[must_use]
    pub fn text(text: &str, style: CellStyle) -> Vec<Self> {
        text.chars().map(|ch| Self { ch, style }).collect()
    }

    /// The inverse blank marking the cursor after the last character.
    #[must_use]
    pub const fn cursor() -> Self {
        Self {
            ch: ' ',
            style: CellStyle::reverse(),
        }
    }
}

/// Write `cells` at the terminal cursor, grouping runs of equal style.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_cells(out: &mut impl Write, cells: &[Cell]) -> io::Result<()> {
    for run in cells.chunk_by(|left, right| left.style == right.style) {
        let Some(first) = run.first() else {
            continue;
        };
        let style = first.style;
        let text: String = run.iter().map(|cell| cell.ch).collect();
        let attribute = if style.reverse { Attribute::Reverse } else { Attribute::NoReverse };
        queue!(
            out,
            SetForegroundColor(style.fg.unwrap_or(Color::Reset)),
            SetBackgroundColor(style.bg.unwrap_or(Color::Reset)),
            SetAttribute(attribute),
            Print(text)
        )?;
    }
    queue!(out, SetAttribute(Attribute::Reset), ResetColor)
}

/// Draw one frame of `editor`.
///
/// Follow with [`Editor::frame_drawn`] so the next frame only redraws what
/// changed.
///
/// # Errors
///
/// Propagates write failures.
pub fn draw(editor: &Editor, out: &mut impl Write) -> io::Result<()> {
    let layout = editor.layout();
    let full_redraw = editor.needs_full_rerender || editor.is_popup_visible() || editor.popup_drawn;
    let top_line = editor.viewport().top_line;
    let cursor_y = editor.cursor().y;
    let past_y = editor.cursor().past.1;

    for row in 0..layout.editor_lines {
        let y = top_line + usize::from(row);
        let is_dirty = editor.document().line_needs_render(y) || y == cursor_y || y == past_y;
        if !full_redraw && !is_dirty {
            continue;
        }
        queue!(out, cursor::MoveTo(0, layout.origin_y + row))?;
        write_cells(out, &line::document_row(editor, y))?;
        queue!(out, Clear(ClearType::UntilNewLine))?;
    }

    if editor.is_popup_visible() {
        popup::draw(editor, out)?;
    }
    status::draw(editor, out)?;
    out.flush()
}
