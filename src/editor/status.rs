//! Status line state: the prompt being edited and the latest notification.

use iedit_document::CharacterIndexable;

/// Text shown below the editing area.
///
/// `cursor_pos` counts characters of `prompt_line`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatusBar {
    /// What the user typed into the active prompt.
    pub prompt_line: String,
    /// Prompt cursor, in characters.
    pub cursor_pos: usize,
    /// Message replacing the position line until the next key press.
    pub notification: String,
}

impl StatusBar {
    /// Replace the notification.
    pub fn notify(&mut self, message: impl AsRef<str>) {
        self.notification.clear();
        self.notification.push_str(message.as_ref());
    }

    /// Drop the notification.
    pub fn clear_notification(&mut self) {
        self.notification.clear();
    }

    /// Type `ch` at the prompt cursor.
    pub fn insert_char(&mut self, ch: char) {
        let byte_idx = self.byte_idx(self.cursor_pos);
        self.prompt_line.insert(byte_idx, ch);
        self.cursor_pos += 1;
    }

    /// Delete the character before the prompt cursor.
    pub fn delete_char(&mut self) {
        let Some(before) = self.cursor_pos.checked_sub(1) else {
            return;
        };
        let byte_idx = self.byte_idx(before);
        self.prompt_line.remove(byte_idx);
        self.cursor_pos = before;
    }

    /// Move the prompt cursor one character left.
    pub const fn move_left(&mut self) {
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    /// Move the prompt cursor one character right.
    pub fn move_right(&mut self) {
        self.cursor_pos = (self.cursor_pos + 1).min(self.prompt_line.n_chars());
    }

    /// Take the prompt text, leaving an empty prompt.
    pub fn take_prompt(&mut self) -> String {
        self.cursor_pos = 0;
        std::mem::take(&mut self.prompt_line)
    }

    fn byte_idx(&self, char_idx: usize) -> usize {
        self.prompt_line
            .char_indices()
            .nth(char_idx)
            .map_or(self.prompt_line.len(), |(idx, _)| idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn typed(text: &str) -> StatusBar {
        let mut status = StatusBar::default();
        text.chars().for_each(|ch| status.insert_char(ch));
        status
    }

    #[rstest]
    fn editing_in_the_middle_respects_multibyte_chars() {
        let mut status = typed("héllo");
        status.move_left();
        status.move_left();
        status.insert_char('_');
        assert_eq!(status.prompt_line, "hél_lo");

        status.delete_char();
        status.delete_char();
        assert_eq!(status.prompt_line, "hélo");
        assert_eq!(status.cursor_pos, 2);
    }

    #[rstest]
    #[case::left_edge(0, 0)]
    #[case::right_edge(9, 3)]
    fn cursor_stays_inside_the_prompt(#[case] moves_right: usize, #[case] expected: usize) {
        let mut status = typed("abc");
        status.cursor_pos = 0;
        status.move_left();
        (0..moves_right).for_each(|_| status.move_right());
        assert_eq!(status.cursor_pos, expected);
    }

    #[rstest]
    fn delete_at_start_does_nothing() {
        let mut status = typed("ab");
        status.cursor_pos = 0;
        status.delete_char();
        assert_eq!(status.prompt_line, "ab");
    }

    #[rstest]
    fn take_prompt_resets() {
        let mut status = typed("wq");
        assert_eq!(status.take_prompt(), "wq");
        assert!(status.prompt_line.is_empty());
        assert_eq!(status.cursor_pos, 0);
    }
}
