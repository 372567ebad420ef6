//! Framed popups in the top-right corner.

use std::io::{self, Write};

use crossterm::{cursor, queue};

use crate::editor::Editor;
use crate::render::{Cell, CellStyle, write_cells};

/// Rows taken by the top and bottom borders.
const FRAME_ROWS: usize = 2;

pub(crate) fn draw(editor: &Editor, out: &mut impl Write) -> io::Result<()> {
    let layout = editor.layout();
    let rows = popup_rows(editor, usize::from(layout.editor_lines), usize::from(layout.term_width));
    for (row, cells) in (0_u16..).zip(&rows) {
        let width = u16::try_from(cells.len()).unwrap_or(u16::MAX);
        queue!(
            out,
            cursor::MoveTo(layout.term_width.saturating_sub(width), layout.origin_y + row)
        )?;
        write_cells(out, cells)?;
    }
    Ok(())
}

/// Framed rows of the visible popup, at most `max_rows` high and
/// `max_width` wide; autocomplete wins over help.
pub(crate) fn popup_rows(editor: &Editor, max_rows: usize, max_width: usize) -> Vec<Vec<Cell>> {
    let max_entries = max_rows.saturating_sub(FRAME_ROWS);
    if max_entries == 0 {
        return Vec::new();
    }

    let autocomplete = editor.autocomplete();
    if autocomplete.is_open() {
        let (start, choices) = autocomplete.visible_choices(max_entries);
        let selected = autocomplete.selected_idx().checked_sub(start);
        return framed(choices, selected, max_width);
    }
    match editor.popup() {
        Some(popup) => {
            let lines = popup.lines();
            let shown = lines.get(..lines.len().min(max_entries)).unwrap_or_default();
            framed(shown, None, max_width)
        }
        None => Vec::new(),
    }
}

fn framed(entries: &[impl AsRef<str>], selected: Option<usize>, max_width: usize) -> Vec<Vec<Cell>> {
    let inner = entries
        .iter()
        .map(|entry| entry.as_ref().chars().count() + 2)
        .max()
        .unwrap_or(2)
        .min(max_width.saturating_sub(FRAME_ROWS));
    let border = CellStyle::default();

    let mut rows = Vec::with_capacity(entries.len() + FRAME_ROWS);
    rows.push(Cell::text(&format!("╭{}╮", "─".repeat(inner)), border));
    for (idx, entry) in entries.iter().enumerate() {
        let style = if selected == Some(idx) {
            CellStyle::reverse()
        } else {
            CellStyle::default()
        };
        let mut text: String = format!(" {}", entry.as_ref()).chars().take(inner).collect();
        let padding = inner - text.chars().count();
        text.extend(std::iter::repeat_n(' ', padding));

        let mut row = Cell::text("│", border);
        row.extend(Cell::text(&text, style));
        row.extend(Cell::text("│", border));
        rows.push(row);
    }
    rows.push(Cell::text(&format!("╰{}╯", "─".repeat(inner)), border));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::keybindings::Popup;
    use crate::editor::test_support::*;
    use crate::input::Key;
    use rstest::rstest;

    fn shown(rows: &[Vec<Cell>]) -> Vec<String> {
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.ch).collect())
            .collect()
    }

    #[rstest]
    fn entries_are_framed_and_padded() {
        let rows = framed(&["ab", "abcd"], None, 80);
        assert_eq!(shown(&rows), ["╭──────╮", "│ ab   │", "│ abcd │", "╰──────╯"]);
    }

    #[rstest]
    fn help_is_cut_to_the_editor_height() {
        let (mut editor, _rx) = editor_with(&[""]);
        editor.popup = Some(Popup::Help);
        let rows = popup_rows(&editor, 5, 80);
        assert_eq!(rows.len(), 5);
        assert!(shown(&rows)[1].contains("^q: quit"));
    }

    #[rstest]
    fn autocomplete_marks_the_selection() {
        let (mut editor, _rx) = editor_with(&["renderer rendering", ""]);
        press(&mut editor, &[Key::Down]);
        type_text(&mut editor, "ren");
        press(&mut editor, &[Key::Down]);

        let rows = popup_rows(&editor, 20, 80);
        assert_eq!(rows.len(), 4);
        let selected: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.iter().any(|cell| cell.style.reverse))
            .map(|(idx, _)| idx)
            .collect();
        assert_eq!(selected, [2]);
    }

    #[rstest]
    fn nothing_fits_in_a_tiny_editor() {
        let (mut editor, _rx) = editor_with(&[""]);
        editor.popup = Some(Popup::Help);
        assert!(popup_rows(&editor, 2, 80).is_empty());
    }
}
