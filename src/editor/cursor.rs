//! Cursor position, selection anchor and jump history.

use iedit_document::Pos;

/// The editing cursor.
///
/// `ideal_x` remembers the column the user last chose so that moving through
/// shorter lines does not lose it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Column, in characters.
    pub x: usize,
    /// Line index.
    pub y: usize,
    /// Column restored when the line is long enough.
    pub ideal_x: usize,
    /// Position before the input being processed.
    pub past: Pos,
    /// Other end of the selection, if any.
    pub selection_anchor: Option<Pos>,
    jump_history: Vec<Pos>,
    jump_head: usize,
}

impl Cursor {
    /// A cursor at `pos` with no history.
    #[must_use]
    pub fn new(pos: Pos) -> Self {
        Self {
            x: pos.0,
            y: pos.1,
            ideal_x: pos.0,
            past: pos,
            ..Self::default()
        }
    }

    /// Current `(x, y)`.
    #[must_use]
    pub const fn pos(&self) -> Pos {
        (self.x, self.y)
    }

    /// Move to `pos`, recording the current position as a jump when `record`.
    pub fn update_pos(&mut self, pos: Pos, record: bool) {
        if record && pos != self.pos() {
            self.record_jump();
        }
        self.x = pos.0;
        self.y = pos.1;
        self.ideal_x = pos.0;
    }

    /// Push the current position onto the jump history, dropping any
    /// forward entries.
    pub fn record_jump(&mut self) {
        self.record_jump_at(self.pos());
    }

    /// Push `pos` onto the jump history, as when a prompt that moved the
    /// cursor live is confirmed.
    pub fn record_jump_at(&mut self, pos: Pos) {
        self.jump_history.truncate(self.jump_head);
        self.jump_history.push(pos);
        self.jump_head = self.jump_history.len();
    }

    /// Return to the previous jump; the current position becomes reachable
    /// with [`Self::jump_forward`].
    pub fn jump_back(&mut self) {
        if self.jump_head == 0 {
            return;
        }
        if self.jump_head == self.jump_history.len() {
            self.jump_history.push(self.pos());
        }
        self.jump_head -= 1;
        if let Some(&pos) = self.jump_history.get(self.jump_head) {
            self.update_pos(pos, false);
        }
    }

    /// Undo a [`Self::jump_back`].
    pub fn jump_forward(&mut self) {
        if self.jump_head + 1 >= self.jump_history.len() {
            return;
        }
        self.jump_head += 1;
        if let Some(&pos) = self.jump_history.get(self.jump_head) {
            self.update_pos(pos, false);
        }
    }

    /// Recorded jump positions, oldest first.
    #[must_use]
    pub fn jump_history(&self) -> &[Pos] {
        &self.jump_history
    }

    /// Remember the position before processing input.
    pub const fn set_last_pos(&mut self) {
        self.past = (self.x, self.y);
    }

    /// Move `lines` down at the ideal column; long moves are jumps.
    pub fn move_down(&mut self, lines: usize) {
        let ideal_x = self.ideal_x;
        self.update_pos((ideal_x, self.y.saturating_add(lines)), lines > 1);
        self.ideal_x = ideal_x;
    }

    /// Move `lines` up at the ideal column; long moves are jumps.
    pub fn move_up(&mut self, lines: usize) {
        let ideal_x = self.ideal_x;
        self.update_pos((ideal_x, self.y.saturating_sub(lines)), lines > 1);
        self.ideal_x = ideal_x;
    }

    /// Move `cols` right.
    pub fn move_right(&mut self, cols: usize) {
        self.update_pos((self.x.saturating_add(cols), self.y), cols > 1);
    }

    /// Move `cols` left.
    pub fn move_left(&mut self, cols: usize) {
        self.update_pos((self.x.saturating_sub(cols), self.y), cols > 1);
    }

    /// Keep the cursor on the document: at most one row past the last line,
    /// and within the line at the ideal column.
    pub fn clamp(&mut self, n_lines: usize, line_len: impl Fn(usize) -> usize) {
        self.y = self.y.min(n_lines);
        self.x = self.ideal_x.min(line_len(self.y));
    }

    /// The selection as `(start, end)` in document order.
    #[must_use]
    pub fn selected_range(&self) -> Option<(Pos, Pos)> {
        let cursor = self.pos();
        self.selection_anchor.map(|anchor| {
            if (anchor.1, anchor.0) < (cursor.1, cursor.0) {
                (anchor, cursor)
            } else {
                (cursor, anchor)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::forward((1, 0), (4, 2), ((1, 0), (4, 2)))]
    #[case::backward((4, 2), (1, 0), ((1, 0), (4, 2)))]
    #[case::same_line_backward((5, 3), (2, 3), ((2, 3), (5, 3)))]
    fn selection_is_ordered(#[case] anchor: Pos, #[case] cursor: Pos, #[case] expected: (Pos, Pos)) {
        let mut subject = Cursor::new(cursor);
        subject.selection_anchor = Some(anchor);
        assert_eq!(subject.selected_range(), Some(expected));
    }

    #[test]
    fn clamping_restores_the_ideal_column() {
        let lens = [10, 2, 10];
        let mut cursor = Cursor::new((8, 0));
        cursor.move_down(1);
        cursor.clamp(3, |y| lens.get(y).copied().unwrap_or(0));
        assert_eq!(cursor.pos(), (2, 1));
        cursor.move_down(1);
        cursor.clamp(3, |y| lens.get(y).copied().unwrap_or(0));
        assert_eq!(cursor.pos(), (8, 2));
    }

    #[test]
    fn only_long_moves_are_recorded() {
        let mut cursor = Cursor::new((0, 0));
        cursor.move_down(1);
        assert!(cursor.jump_history().is_empty());
        cursor.move_down(20);
        assert_eq!(cursor.jump_history(), &[(0, 1)]);
    }

    #[test]
    fn jump_history_walks_back_and_forth() {
        let mut cursor = Cursor::new((0, 0));
        cursor.update_pos((0, 10), true);
        cursor.update_pos((3, 20), true);

        cursor.jump_back();
        assert_eq!(cursor.pos(), (0, 10));
        cursor.jump_back();
        assert_eq!(cursor.pos(), (0, 0));
        cursor.jump_back();
        assert_eq!(cursor.pos(), (0, 0));

        cursor.jump_forward();
        assert_eq!(cursor.pos(), (0, 10));
        cursor.jump_forward();
        assert_eq!(cursor.pos(), (3, 20));
        cursor.jump_forward();
        assert_eq!(cursor.pos(), (3, 20));
    }

    #[test]
    fn new_jump_discards_forward_history() {
        let mut cursor = Cursor::new((0, 0));
        cursor.update_pos((0, 10), true);
        cursor.jump_back();
        cursor.update_pos((0, 5), true);
        assert_eq!(cursor.jump_history(), &[(0, 0)]);
        cursor.jump_forward();
        assert_eq!(cursor.pos(), (0, 5));
    }
}
