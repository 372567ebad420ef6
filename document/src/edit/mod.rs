//! Edit operations and the undo/redo history.
//!
//! Every applied operation pushes its inverse onto one of the two history
//! stacks. Fresh edits push onto the undo stack and clear the redo stack;
//! undo and redo move inverses between the stacks without discarding either.

mod delete;
mod insert;

use crate::Pos;
use crate::document::Document;

/// Text carried by an insertion or replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Text {
    /// Nothing; a replacement with `Empty` is a pure deletion.
    #[default]
    Empty,
    /// A single character. `'\n'` and `'\r'` split the line.
    Char(char),
    /// A string without line breaks.
    String(String),
    /// A string stored in reverse, as accumulated by repeated backspaces.
    InverseString(String),
    /// Several lines; `n` entries describe `n - 1` line breaks.
    Lines(Vec<String>),
}

/// A single reversible change to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOperation {
    /// Backspace at `pos`: remove the character before it.
    Deletion {
        /// Cursor position before the deletion.
        pos: Pos,
    },
    /// Insert `text` at `pos`.
    Insertion {
        /// Insertion point.
        pos: Pos,
        /// Text to insert.
        text: Text,
    },
    /// Delete `[pos_from, pos_to)` and insert `text` at `pos_from`.
    Replacement {
        /// Inclusive start.
        pos_from: Pos,
        /// Exclusive end.
        pos_to: Pos,
        /// Replacement text.
        text: Text,
    },
}

/// Cursor position following an edit, `None` when nothing changed.
pub type EditResult = Option<Pos>;

/// The history stack an inverse operation is pushed onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InverseStack {
    /// Operations that undo past edits.
    Undo,
    /// Operations that redo undone edits.
    Redo,
}

impl Document {
    /// Apply a fresh edit, recording its inverse for undo.
    ///
    /// Read-only documents are never edited. Consecutive non-whitespace
    /// character insertions on one line, and consecutive backspaces, join a
    /// single undo step.
    ///
    /// # Examples
    ///
    /// ```
    /// use iedit_document::{Document, EditOperation, Text};
    ///
    /// let mut doc = Document::from_strings(vec![String::new()], "", false);
    /// for (x, ch) in "abc".chars().enumerate() {
    ///     doc.apply_edit(EditOperation::Insertion { pos: (x, 0), text: Text::Char(ch) });
    /// }
    /// assert_eq!(doc.undo_last_edit(), Some((0, 0)));
    /// assert_eq!(doc.lines[0].as_ref(), "");
    /// ```
    pub fn apply_edit(&mut self, op: EditOperation) -> EditResult {
        if self.is_readonly {
            return None;
        }
        self.redo_stack.clear();
        self.apply_onto(op, InverseStack::Undo, true)
    }

    /// Revert the most recent edit.
    pub fn undo_last_edit(&mut self) -> EditResult {
        let op = self.undo_stack.pop()?;
        self.apply_onto(op, InverseStack::Redo, false)
    }

    /// Reapply the most recently undone edit.
    pub fn redo_last_edit(&mut self) -> EditResult {
        let op = self.redo_stack.pop()?;
        self.apply_onto(op, InverseStack::Undo, false)
    }

    /// The operations recorded on `stack`, oldest first.
    #[must_use]
    pub fn history(&self, stack: InverseStack) -> &[EditOperation] {
        match stack {
            InverseStack::Undo => &self.undo_stack,
            InverseStack::Redo => &self.redo_stack,
        }
    }

    fn inverse_stack(&mut self, stack: InverseStack) -> &mut Vec<EditOperation> {
        match stack {
            InverseStack::Undo => &mut self.undo_stack,
            InverseStack::Redo => &mut self.redo_stack,
        }
    }

    fn apply_onto(&mut self, op: EditOperation, stack: InverseStack, fresh: bool) -> EditResult {
        if self.is_readonly {
            return None;
        }

        let recompute_syntax = self.syntax.is_some()
            && (self.should_recompute_syntax_blocks(&op) || op_touches_block_delimiter(&op));
        let new_pos = self.apply_inner(op, stack, fresh)?;
        self.has_been_edited = true;

        if recompute_syntax {
            self.recompute_syntax_blocks();
        }

        Some(new_pos)
    }

    fn apply_inner(&mut self, op: EditOperation, stack: InverseStack, fresh: bool) -> EditResult {
        use EditOperation as Op;
        use Text as T;

        match op {
            Op::Insertion {
                pos,
                text: T::Char(newline),
            } if newline == '\n' || newline == '\r' => {
                let new_pos = self.insert_newline_at(pos)?;
                self.inverse_stack(stack).push(Op::Replacement {
                    pos_from: pos,
                    pos_to: new_pos,
                    text: T::Empty,
                });
                Some(new_pos)
            }
            Op::Insertion {
                pos,
                text: T::Char(ch),
            } => {
                let new_pos = self.insert_char_at(pos, ch)?;
                let history = self.inverse_stack(stack);
                match history.last_mut() {
                    Some(Op::Replacement {
                        pos_from,
                        pos_to,
                        text: T::Empty,
                    }) if fresh
                        && !ch.is_whitespace()
                        && pos_from.1 == pos_to.1
                        && *pos_to == pos =>
                    {
                        *pos_to = new_pos;
                    }
                    _ => history.push(Op::Replacement {
                        pos_from: pos,
                        pos_to: new_pos,
                        text: T::Empty,
                    }),
                }
                Some(new_pos)
            }
            Op::Insertion { pos, text } => {
                let new_pos = self.insert_text_at(pos, text)?;
                self.inverse_stack(stack).push(Op::Replacement {
                    pos_from: pos,
                    pos_to: new_pos,
                    text: T::Empty,
                });
                Some(new_pos)
            }
            Op::Deletion { pos } => {
                let (ch, new_pos) = self.delete_char_at(pos)?;
                if ch == '\n' {
                    self.inverse_stack(stack).push(Op::Insertion {
                        pos: new_pos,
                        text: T::Lines(vec![String::new(); 2]),
                    });
                    return Some(new_pos);
                }

                let history = self.inverse_stack(stack);
                match history.last_mut() {
                    Some(Op::Insertion {
                        pos: last_pos,
                        text: T::InverseString(string),
                    }) if fresh
                        && !ch.is_whitespace()
                        && new_pos.1 == last_pos.1
                        && new_pos.0 + 1 == last_pos.0 =>
                    {
                        *last_pos = new_pos;
                        string.push(ch);
                    }
                    _ => history.push(Op::Insertion {
                        pos: new_pos,
                        text: T::InverseString(String::from(ch)),
                    }),
                }
                Some(new_pos)
            }
            Op::Replacement {
                pos_from,
                pos_to,
                text,
            } => {
                let deleted = self.delete_range(pos_from, pos_to);
                let new_pos = self.insert_text_at(pos_from, text)?;
                self.inverse_stack(stack).push(Op::Replacement {
                    pos_from,
                    pos_to: new_pos,
                    text: deleted,
                });
                Some(new_pos)
            }
        }
    }

    fn insert_text_at(&mut self, pos: Pos, text: Text) -> EditResult {
        match text {
            Text::Empty => Some(pos),
            Text::Char('\n' | '\r') => self.insert_strings_at(pos, vec![String::new(); 2]),
            Text::Char(ch) => self.insert_char_at(pos, ch),
            Text::String(string) => self.insert_string_at(pos, &string),
            Text::InverseString(reversed) => {
                let string: String = reversed.chars().rev().collect();
                self.insert_string_at(pos, &string)
            }
            Text::Lines(lines) => self.insert_strings_at(pos, lines),
        }
    }
}

/// Whether an edit could open or close a multiline block, judged by the
/// characters it inserts. Edits are small, so any punctuation triggers a scan.
fn op_touches_block_delimiter(op: &EditOperation) -> bool {
    let is_delimiter = |ch: char| ch.is_ascii_punctuation();
    match op {
        EditOperation::Deletion { .. } => false,
        EditOperation::Insertion { text, .. } | EditOperation::Replacement { text, .. } => {
            match text {
                Text::Empty => matches!(op, EditOperation::Replacement { .. }),
                Text::Char(ch) => is_delimiter(*ch),
                Text::String(string) | Text::InverseString(string) => string.chars().any(is_delimiter),
                Text::Lines(_) => true,
            }
        }
    }
}
