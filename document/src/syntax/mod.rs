//! Syntax highlighting rules and multiline block detection.
//!
//! A [`DocumentSyntax`] is an ordered list of rules. Inline rules colour a
//! match within one line; multiline rules open a block at a start pattern
//! and close it at an end pattern, possibly lines later. Blocks are found by
//! [`Document::recompute_syntax_blocks`] and take precedence over inline
//! rules when a line is highlighted.

mod builtin;
mod definition;

use std::fmt;
use std::ops::Range;

use regex::Regex;

use crate::Pos;
use crate::document::Document;
use crate::edit::EditOperation;
use crate::error::DocumentError;
use crate::line::{CharacterIndexable, DocumentLine};

pub use definition::{RuleDefinition, SyntaxDefinition};

/// A 24-bit colour written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl TryFrom<&str> for Rgb {
    type Error = DocumentError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let invalid = || DocumentError::InvalidColour {
            value: value.to_owned(),
        };
        let hex = value.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |range: Range<usize>| {
            hex.get(range)
                .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                .ok_or_else(invalid)
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// A compiled highlighting rule.
#[derive(Debug, Clone)]
pub enum SyntaxRule {
    /// Colours a match within a single line.
    Inline {
        /// The match pattern.
        pattern: Regex,
        /// Foreground colour for matches.
        colour: Rgb,
    },
    /// Colours everything from a start match through the next end match.
    Multiline {
        /// Opens a block.
        start: Regex,
        /// Closes the open block.
        end: Regex,
        /// Foreground colour for the block.
        colour: Rgb,
    },
}

impl SyntaxRule {
    /// The rule's colour.
    #[must_use]
    pub const fn colour(&self) -> Rgb {
        match self {
            Self::Inline { colour, .. } | Self::Multiline { colour, .. } => *colour,
        }
    }
}

/// A named set of highlighting rules and the files they apply to.
#[derive(Debug, Clone)]
pub struct DocumentSyntax {
    /// Display name, e.g. `Rust`.
    pub name: String,
    /// File extensions without the leading dot.
    pub extensions: Vec<String>,
    /// Exact file names, for files without a telling extension.
    pub file_names: Vec<String>,
    /// Rules in priority order.
    pub rules: Vec<SyntaxRule>,
}

/// A multiline block found in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxBlock {
    /// Position of the first character of the start match.
    pub start_pos: Pos,
    /// Position just past the end match; `None` runs to the end of the document.
    pub end_pos: Option<Pos>,
    /// Length in characters of the end match.
    pub end_symbol_len: usize,
    /// Index of the multiline rule that opened the block.
    pub rule_idx: usize,
}

impl SyntaxBlock {
    /// Whether `pos` falls inside the block.
    #[inline]
    #[must_use]
    pub fn contains_pos(&self, (x, y): Pos) -> bool {
        let after_start = y > self.start_pos.1 || (y == self.start_pos.1 && x >= self.start_pos.0);
        after_start
            && self
                .end_pos
                .is_none_or(|(end_x, end_y)| y < end_y || (y == end_y && x < end_x))
    }

    /// Whether the block covers any part of line `y`.
    #[inline]
    #[must_use]
    pub fn intersects_y(&self, y: usize) -> bool {
        y >= self.start_pos.1 && self.end_pos.is_none_or(|(_, end_y)| y <= end_y)
    }

    /// Character range the block covers on `line`, which must be line `y`.
    #[must_use]
    pub fn range_on_line(&self, line: &DocumentLine, y: usize) -> Option<Range<usize>> {
        if !self.intersects_y(y) {
            return None;
        }
        let start = if self.start_pos.1 == y { self.start_pos.0 } else { 0 };
        let end = match self.end_pos {
            Some((end_x, end_y)) if end_y == y => end_x,
            _ => line.len(),
        };
        (start < end).then_some(start..end)
    }
}

/// A coloured span of one line, in characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    /// Characters covered.
    pub range: Range<usize>,
    /// Foreground colour.
    pub colour: Rgb,
}

/// First non-empty match of `pattern` starting at or after `from` bytes.
fn find_non_empty(pattern: &Regex, text: &str, from: usize) -> Option<(usize, usize)> {
    let mut at = from;
    while at <= text.len() {
        let found = pattern.find_at(text, at)?;
        if !found.is_empty() {
            return Some((found.start(), found.end()));
        }
        at = found.end() + text.get(found.end()..)?.chars().next()?.len_utf8();
    }
    None
}

impl DocumentSyntax {
    /// Colour spans for line `y`, blocks first, inline rules in the gaps.
    #[must_use]
    pub fn highlight_line(&self, line: &DocumentLine, y: usize, blocks: &[SyntaxBlock]) -> Vec<Highlight> {
        let text = line.as_ref();
        let mut block_spans: Vec<(Range<usize>, Rgb)> = blocks
            .iter()
            .filter_map(|block| {
                let range = block.range_on_line(line, y)?;
                let colour = self.rules.get(block.rule_idx)?.colour();
                let bytes = line.char_to_byte_idx(range.start)..line.char_to_byte_idx(range.end);
                Some((bytes, colour))
            })
            .collect();
        block_spans.sort_by_key(|(range, _)| range.start);

        let inline_rules: Vec<(&Regex, Rgb)> = self
            .rules
            .iter()
            .filter_map(|rule| match rule {
                SyntaxRule::Inline { pattern, colour } => Some((pattern, *colour)),
                SyntaxRule::Multiline { .. } => None,
            })
            .collect();
        let mut next_matches: Vec<Option<(usize, usize)>> = inline_rules
            .iter()
            .map(|(pattern, _)| find_non_empty(pattern, text, 0))
            .collect();

        let mut spans: Vec<(Range<usize>, Rgb)> = Vec::new();
        let mut byte = 0;
        while byte < text.len() {
            if let Some((range, colour)) = block_spans
                .iter()
                .find(|(range, _)| range.start <= byte && byte < range.end)
            {
                spans.push((byte..range.end, *colour));
                byte = range.end;
                continue;
            }
            let limit = block_spans
                .iter()
                .map(|(range, _)| range.start)
                .find(|&start| start > byte)
                .unwrap_or(text.len());

            for (next_match, (pattern, _)) in next_matches.iter_mut().zip(&inline_rules) {
                if next_match.is_some_and(|(start, _)| start < byte) {
                    *next_match = find_non_empty(pattern, text, byte);
                }
            }

            let best = next_matches
                .iter()
                .enumerate()
                .filter_map(|(idx, found)| found.map(|found| (idx, found)))
                .min_by_key(|(idx, (start, _))| (*start, *idx));

            match best {
                Some((idx, (start, end))) if start < limit => {
                    let span_end = end.min(limit);
                    if let Some((_, colour)) = inline_rules.get(idx) {
                        spans.push((start..span_end, *colour));
                    }
                    byte = span_end;
                }
                _ => byte = limit,
            }
        }

        spans
            .into_iter()
            .filter_map(|(bytes, colour)| {
                let start = text.byte_to_char_idx(bytes.start)?;
                let end = text.byte_to_char_idx(bytes.end)?;
                (start < end).then_some(Highlight {
                    range: start..end,
                    colour,
                })
            })
            .collect()
    }
}

impl Document {
    /// Rescan the document for multiline blocks. An unclosed block runs to
    /// the end of the document.
    pub fn recompute_syntax_blocks(&mut self) {
        let Some(syntax) = self.syntax.as_ref() else {
            self.syntax_blocks.clear();
            return;
        };

        let mut blocks = Vec::new();
        let mut open: Option<SyntaxBlock> = None;
        let mut y = 0;
        let mut byte = 0;

        while let Some(line) = self.lines.get(y) {
            let text = line.as_ref();
            let found = match &open {
                Some(block) => match syntax.rules.get(block.rule_idx) {
                    Some(SyntaxRule::Multiline { end, .. }) => {
                        find_non_empty(end, text, byte).map(|found| (block.rule_idx, found))
                    }
                    _ => None,
                },
                None => syntax
                    .rules
                    .iter()
                    .enumerate()
                    .filter_map(|(rule_idx, rule)| match rule {
                        SyntaxRule::Multiline { start, .. } => {
                            find_non_empty(start, text, byte).map(|found| (rule_idx, found))
                        }
                        SyntaxRule::Inline { .. } => None,
                    })
                    .min_by_key(|(rule_idx, (start, _))| (*start, *rule_idx)),
            };

            let Some((rule_idx, (start, end))) = found else {
                y += 1;
                byte = 0;
                continue;
            };

            let start_x = text.byte_to_char_idx(start).unwrap_or(line.len());
            let end_x = text.byte_to_char_idx(end).unwrap_or(line.len());
            byte = end;

            match open.take() {
                Some(mut block) => {
                    block.end_pos = Some((end_x, y));
                    block.end_symbol_len = end_x - start_x;
                    blocks.push(block);
                }
                None => {
                    open = Some(SyntaxBlock {
                        start_pos: (start_x, y),
                        end_pos: None,
                        end_symbol_len: 0,
                        rule_idx,
                    });
                }
            }
        }

        blocks.extend(open);
        log::trace!("found {} syntax blocks", blocks.len());
        self.syntax_blocks = blocks;
    }

    /// Whether `op` touches a line covered by a known block.
    #[must_use]
    pub fn should_recompute_syntax_blocks(&self, op: &EditOperation) -> bool {
        match *op {
            EditOperation::Deletion { pos: (_, y) } | EditOperation::Insertion { pos: (_, y), .. } => {
                self.syntax_blocks.iter().any(|block| block.intersects_y(y))
            }
            EditOperation::Replacement {
                pos_from: (_, y_from),
                pos_to: (_, y_to),
                ..
            } => self.syntax_blocks.iter().any(|block| {
                block.intersects_y(y_from)
                    || block.intersects_y(y_to)
                    || (y_from < block.start_pos.1
                        && block.end_pos.is_none_or(|(_, end_y)| y_to > end_y))
            }),
        }
    }

    /// Colour spans for line `y` under the attached syntax.
    #[must_use]
    pub fn syntax_highlights(&self, y: usize) -> Vec<Highlight> {
        match (self.syntax.as_ref(), self.lines.get(y)) {
            (Some(syntax), Some(line)) => syntax.highlight_line(line, y, &self.syntax_blocks),
            _ => Vec::new(),
        }
    }
}
