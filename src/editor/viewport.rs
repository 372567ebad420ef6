//! The visible window onto the document.
//!
//! Vertical positions are line indices. Horizontal positions are visual
//! columns, after tab expansion, so `left_col` lines up with what the
//! terminal shows.

/// The first visible line and column.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Viewport {
    /// First line drawn.
    pub top_line: usize,
    /// First visual column drawn.
    pub left_col: usize,
    /// `top_line` before the user's own scrolling is applied.
    pub pre_scroll_top_line: usize,
    /// Lines the user scrolled with `Alt+↑/↓` since the last cursor move.
    pub vertical_offset: isize,
}

/// Dimensions and margins the viewport is fitted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportFrame {
    /// Rows available for document lines.
    pub editor_lines: usize,
    /// Columns available for text, after the gutter.
    pub text_width: usize,
    /// Rows kept between the cursor and the top or bottom edge.
    pub vertical_margin: usize,
    /// Columns kept between the cursor and the left or right edge.
    pub horizontal_margin: usize,
    /// Lines in the document.
    pub n_lines: usize,
}

/// The cursor as the viewport sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorSpot {
    /// Line of the cursor.
    pub y: usize,
    /// Visual column of the cursor.
    pub col: usize,
    /// Line before the last input.
    pub past_y: usize,
    /// Visual column before the last input.
    pub past_col: usize,
    /// Visual width of the cursor's line.
    pub line_width: usize,
}

impl Viewport {
    /// A viewport centred on `line`.
    #[must_use]
    pub const fn centred_on(line: usize, editor_lines: usize) -> Self {
        let top_line = line.saturating_sub(editor_lines.div_euclid(2));
        Self {
            top_line,
            left_col: 0,
            pre_scroll_top_line: top_line,
            vertical_offset: 0,
        }
    }

    /// Whether line `y` is on screen.
    #[must_use]
    pub const fn contains_y(&self, y: usize, editor_lines: usize) -> bool {
        self.top_line <= y && y < self.top_line + editor_lines
    }

    /// Scroll so that the cursor stays inside the margins, returning whether
    /// the view moved.
    pub fn adjust(&mut self, cursor: CursorSpot, frame: ViewportFrame) -> bool {
        let before = (self.top_line, self.left_col);
        self.adjust_vertically(cursor, frame);
        self.adjust_horizontally(cursor, frame);
        before != (self.top_line, self.left_col)
    }

    fn adjust_vertically(&mut self, cursor: CursorSpot, frame: ViewportFrame) {
        let lines = frame.editor_lines.max(1);
        let is_visible = self.contains_y(cursor.y, lines);
        let has_moved = (cursor.y, cursor.col) != (cursor.past_y, cursor.past_col);

        if has_moved && !is_visible {
            self.vertical_offset = 0;
            self.pre_scroll_top_line = cursor.y.saturating_sub(lines.div_euclid(2));
        } else if self.vertical_offset != 0 && is_visible {
            self.pre_scroll_top_line = self
                .pre_scroll_top_line
                .saturating_add_signed(self.vertical_offset);
            self.vertical_offset = 0;
        }

        let margin = frame.vertical_margin.min(lines.saturating_sub(1).div_euclid(2));
        let top_limit = self.pre_scroll_top_line + margin;
        let bottom_limit = self.pre_scroll_top_line + lines.saturating_sub(margin + 1);
        // The cursor may sit on the row after the last line.
        let lines_below = (frame.n_lines + 1).saturating_sub(self.pre_scroll_top_line + lines);

        if cursor.y < top_limit && cursor.y < cursor.past_y {
            self.pre_scroll_top_line = self
                .pre_scroll_top_line
                .saturating_sub(top_limit - cursor.y);
        } else if cursor.y > bottom_limit && cursor.y > cursor.past_y && lines_below > 0 {
            self.pre_scroll_top_line += lines_below.min(cursor.y - bottom_limit);
        }

        self.top_line = self
            .pre_scroll_top_line
            .saturating_add_signed(self.vertical_offset)
            .min(frame.n_lines);
    }

    fn adjust_horizontally(&mut self, cursor: CursorSpot, frame: ViewportFrame) {
        let width = frame.text_width.max(1);
        let margin = frame.horizontal_margin.min(width.saturating_sub(1).div_euclid(2));
        let left_limit = self.left_col + margin;
        let right_limit = self.left_col + width.saturating_sub(margin + 1);
        // One extra column for the cursor after the last character.
        let max_left_col = (cursor.line_width + 1).saturating_sub(width);

        if cursor.col < self.left_col || (cursor.col < left_limit && cursor.col < cursor.past_col) {
            self.left_col = cursor.col.saturating_sub(margin);
        } else if cursor.col >= self.left_col + width
            || (cursor.col > right_limit && cursor.col > cursor.past_col)
        {
            let wanted = (cursor.col + margin + 1).saturating_sub(width);
            self.left_col = self.left_col.max(wanted.min(max_left_col));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn frame() -> ViewportFrame {
        ViewportFrame {
            editor_lines: 10,
            text_width: 40,
            vertical_margin: 2,
            horizontal_margin: 4,
            n_lines: 100,
        }
    }

    fn spot(y: usize, past_y: usize) -> CursorSpot {
        CursorSpot {
            y,
            col: 0,
            past_y,
            past_col: 0,
            line_width: 10,
        }
    }

    #[rstest]
    fn moving_down_past_the_margin_scrolls(frame: ViewportFrame) {
        let mut viewport = Viewport::default();
        assert!(!viewport.adjust(spot(7, 6), frame));
        assert!(viewport.adjust(spot(8, 7), frame));
        assert_eq!(viewport.top_line, 1);
    }

    #[rstest]
    fn moving_up_past_the_margin_scrolls(frame: ViewportFrame) {
        let mut viewport = Viewport::centred_on(50, 10);
        assert_eq!(viewport.top_line, 45);
        viewport.adjust(spot(46, 47), frame);
        assert_eq!(viewport.top_line, 44);
    }

    #[rstest]
    fn jumping_out_of_view_recentres(frame: ViewportFrame) {
        let mut viewport = Viewport::default();
        viewport.adjust(spot(80, 0), frame);
        assert_eq!(viewport.top_line, 75);
    }

    #[rstest]
    fn user_scroll_survives_while_the_cursor_is_visible(frame: ViewportFrame) {
        let mut viewport = Viewport::centred_on(50, 10);
        viewport.vertical_offset = 2;
        viewport.adjust(spot(50, 50), frame);
        assert_eq!(viewport.top_line, 47);
        assert_eq!(viewport.vertical_offset, 0);

        viewport.adjust(spot(50, 50), frame);
        assert_eq!(viewport.top_line, 47);
    }

    #[rstest]
    fn scrolling_stops_at_the_end_of_the_document(frame: ViewportFrame) {
        let frame = ViewportFrame { n_lines: 12, ..frame };
        let mut viewport = Viewport {
            top_line: 3,
            pre_scroll_top_line: 3,
            ..Viewport::default()
        };
        viewport.adjust(spot(12, 11), frame);
        assert_eq!(viewport.top_line, 3);
    }

    #[rstest]
    fn wide_lines_scroll_horizontally(frame: ViewportFrame) {
        let mut viewport = Viewport::default();
        let cursor = CursorSpot {
            y: 0,
            col: 40,
            past_y: 0,
            past_col: 39,
            line_width: 60,
        };
        viewport.adjust(cursor, frame);
        assert_eq!(viewport.left_col, 5);

        let back = CursorSpot {
            col: 0,
            past_col: 40,
            ..cursor
        };
        viewport.adjust(back, frame);
        assert_eq!(viewport.left_col, 0);
    }
}
