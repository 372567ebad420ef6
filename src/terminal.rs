//! Inline terminal layout and raw-mode lifetime.
//!
//! iedit draws below the shell prompt instead of switching to the alternate
//! screen. [`UiLayout::reserve`] claims rows under the cursor, scrolling the
//! scrollback up when the prompt sits too close to the bottom, and
//! [`TerminalGuard`] restores the terminal on every exit path.

use std::io::Write;

use crossterm::{cursor, execute, queue, style, terminal};

/// Rows below the editing area: a separator and the status line.
pub const STATUS_ROWS: u16 = 2;

/// Where the editor draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiLayout {
    /// Terminal row of the first editing row.
    pub origin_y: u16,
    /// Terminal width in columns.
    pub term_width: u16,
    /// Terminal height in rows.
    pub term_height: u16,
    /// Rows available for document lines.
    pub editor_lines: u16,
}

impl UiLayout {
    /// Compute the layout for a prompt at `cursor_row`, returning it with the
    /// number of rows the scrollback must move up to make room.
    ///
    /// `min_lines` editing rows are requested, half the terminal when it is
    /// 0, or the whole terminal when `fullscreen` is set.
    ///
    /// # Examples
    ///
    /// ```
    /// use iedit::terminal::UiLayout;
    ///
    /// let (layout, scroll) = UiLayout::compute(20, 80, 24, 10, false);
    /// assert_eq!(scroll, 8);
    /// assert_eq!(layout.origin_y, 12);
    /// assert_eq!(layout.editor_lines, 10);
    /// ```
    #[must_use]
    pub fn compute(
        cursor_row: u16,
        term_width: u16,
        term_height: u16,
        min_lines: u16,
        fullscreen: bool,
    ) -> (Self, u16) {
        let wanted = if fullscreen {
            term_height
        } else if min_lines == 0 {
            term_height.div_euclid(2)
        } else {
            min_lines.saturating_add(STATUS_ROWS)
        }
        .min(term_height);

        let row = cursor_row.min(term_height.saturating_sub(1));
        let available = term_height - row;
        let scroll = wanted.saturating_sub(available);

        let layout = Self {
            origin_y: row - scroll,
            term_width,
            term_height,
            editor_lines: wanted.saturating_sub(STATUS_ROWS),
        };
        (layout, scroll)
    }

    /// Measure the terminal and claim rows below the cursor.
    ///
    /// # Errors
    ///
    /// Propagates failures querying or writing to the terminal.
    pub fn reserve(out: &mut impl Write, min_lines: u16, fullscreen: bool) -> std::io::Result<Self> {
        let (term_width, term_height) = terminal::size()?;
        let (_, cursor_row) = cursor::position()?;
        let (layout, scroll) =
            Self::compute(cursor_row, term_width, term_height, min_lines, fullscreen);

        if scroll > 0 {
            queue!(
                out,
                cursor::MoveTo(0, term_height.saturating_sub(1)),
                style::Print("\n".repeat(usize::from(scroll)))
            )?;
        }
        queue!(out, cursor::MoveTo(0, layout.origin_y))?;
        out.flush()?;

        log::debug!("reserved {layout:?} (scrolled {scroll})");
        Ok(layout)
    }

    /// Adapt to a new terminal size without moving the origin.
    pub fn resize(&mut self, term_width: u16, term_height: u16) {
        let rows = self.editor_lines.saturating_add(STATUS_ROWS);
        let origin_y = self.origin_y.min(term_height.saturating_sub(STATUS_ROWS));
        let available = term_height - origin_y;

        self.term_width = term_width;
        self.term_height = term_height;
        self.origin_y = origin_y;
        self.editor_lines = rows.min(available).saturating_sub(STATUS_ROWS);
    }

    /// Terminal row of the separator bar.
    #[must_use]
    pub const fn status_y(&self) -> u16 {
        self.origin_y + self.editor_lines
    }
}

/// Keeps the terminal in raw mode with a hidden cursor until dropped.
///
/// Dropping clears everything the editor drew and leaves the shell cursor at
/// the row where the editor started.
pub struct TerminalGuard {
    origin_y: u16,
}

impl TerminalGuard {
    /// Enter raw mode for an editor drawn from `origin_y`.
    ///
    /// # Errors
    ///
    /// Propagates failures switching the terminal mode.
    pub fn enable(origin_y: u16) -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(std::io::stdout(), cursor::Hide)?;
        Ok(Self { origin_y })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = std::io::stdout();
        if let Err(err) = execute!(
            stdout,
            cursor::MoveTo(0, self.origin_y),
            terminal::Clear(terminal::ClearType::FromCursorDown),
            cursor::Show
        ) {
            log::warn!("failed to clear the editor area: {err}");
        }
        if let Err(err) = terminal::disable_raw_mode() {
            log::warn!("failed to leave raw mode: {err}");
        }
    }
}
