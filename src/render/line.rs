//! Document rows: gutter, text and highlights.

use crossterm::style::Color;
use iedit_document::{DocumentLine, Highlight, Pos, Rgb};

use crate::editor::Editor;
use crate::modes::EditorMode;
use crate::render::{Cell, CellStyle};

const TRAILING_SPACE: char = '•';
const TRAILING_TAB: char = '─';

/// Everything drawn on the row showing line `y`.
pub(crate) fn document_row(editor: &Editor, y: usize) -> Vec<Cell> {
    let mut cells = gutter(editor, y);
    match editor.document().lines.get(y) {
        Some(line) => {
            let left_col = editor.viewport().left_col;
            cells.extend(
                text_cells(editor, line, y)
                    .into_iter()
                    .skip(left_col)
                    .take(editor.text_width()),
            );
        }
        None => cells.push(past_end_cell(editor, y)),
    }
    cells
}

fn gutter(editor: &Editor, y: usize) -> Vec<Cell> {
    if !editor.config().show_line_numbers {
        return Vec::new();
    }
    let width = editor.line_number_width();
    if y >= editor.document().n_lines() {
        return Cell::text(&" ".repeat(width + 2), CellStyle::default());
    }
    let fg = if y == editor.cursor().y { Color::White } else { Color::DarkGrey };
    Cell::text(&format!("{:>width$} │", y + 1), CellStyle::fg(fg))
}

fn past_end_cell(editor: &Editor, y: usize) -> Cell {
    if shows_document_cursor(editor) && editor.cursor().pos() == (0, y) {
        Cell::cursor()
    } else {
        Cell {
            ch: '~',
            style: CellStyle::fg(Color::DarkGrey),
        }
    }
}

fn shows_document_cursor(editor: &Editor) -> bool {
    !matches!(editor.mode(), EditorMode::Prompt(_))
}

fn text_cells(editor: &Editor, line: &DocumentLine, y: usize) -> Vec<Cell> {
    let tab_size = editor.config().tab_width();
    let chars: Vec<char> = line.iter().collect();
    let styler = LineStyler {
        y,
        trailing_from: chars
            .iter()
            .rposition(|ch| !ch.is_whitespace())
            .map_or(0, |idx| idx + 1),
        highlights: if editor.config().enable_syntax_highlighting {
            editor.document().syntax_highlights(y)
        } else {
            Vec::new()
        },
        selection: editor.cursor().selected_range(),
        matched: editor.matched_range(),
        cursor: shows_document_cursor(editor).then(|| editor.cursor().pos()),
    };

    let mut cells = Vec::with_capacity(chars.len());
    for (idx, &ch) in chars.iter().enumerate() {
        let is_trailing = idx >= styler.trailing_from;
        let (shown, width) = match ch {
            '\t' => {
                let width = tab_size - cells.len().rem_euclid(tab_size);
                (if is_trailing { TRAILING_TAB } else { ' ' }, width)
            }
            ' ' if is_trailing => (TRAILING_SPACE, 1),
            ch if ch.is_control() => ('?', 1),
            ch => (ch, 1),
        };
        let style = styler.style(idx);
        cells.extend(std::iter::repeat_n(Cell { ch: shown, style }, width));
    }
    if styler.cursor == Some((chars.len(), y)) {
        cells.push(Cell::cursor());
    }
    cells
}

struct LineStyler {
    y: usize,
    trailing_from: usize,
    highlights: Vec<Highlight>,
    selection: Option<(Pos, Pos)>,
    matched: Option<(Pos, Pos)>,
    cursor: Option<Pos>,
}

impl LineStyler {
    fn style(&self, idx: usize) -> CellStyle {
        let pos = (idx, self.y);
        let mut fg = self
            .highlights
            .iter()
            .find(|highlight| highlight.range.contains(&idx))
            .map(|highlight| rgb(highlight.colour));
        if idx >= self.trailing_from {
            fg = Some(Color::DarkGrey);
        }
        if self.matched.is_some_and(|range| range_contains(range, pos)) {
            fg = Some(Color::Blue);
        }
        CellStyle {
            fg,
            bg: self
                .selection
                .filter(|&range| range_contains(range, pos))
                .map(|_| Color::Blue),
            reverse: self.cursor == Some(pos),
        }
    }
}

const fn rgb(colour: Rgb) -> Color {
    Color::Rgb {
        r: colour.r,
        g: colour.g,
        b: colour.b,
    }
}

fn range_contains((from, to): (Pos, Pos), (x, y): Pos) -> bool {
    (from.1, from.0) <= (y, x) && (y, x) < (to.1, to.0)
}
