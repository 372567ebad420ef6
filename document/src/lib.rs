//! Document model for the iedit terminal editor.
//!
//! This crate owns everything that can be reasoned about without a terminal:
//! the line buffer, file loading and incremental saving, the undo/redo
//! history, cursor-free navigation queries, syntax highlighting rules and the
//! autocomplete vocabulary. The editor binary drives it; nothing here draws
//! to the screen.
//!
//! # Modules
//!
//! - [`document`] - The [`Document`] buffer and its bookkeeping
//! - [`edit`] - Edit operations with coalescing undo and redo
//! - [`error`] - Semantic error types for document operations
//! - [`find`] - Word, paragraph, bracket and pattern navigation
//! - [`io`] - File loading with end-of-line detection
//! - [`line`] - Character-indexed line storage
//! - [`save`] - Incremental write-back to disk
//! - [`syntax`] - Highlighting rules and block detection
//! - [`vocabulary`] - Prefix trie feeding autocomplete

pub mod document;
pub mod edit;
pub mod error;
pub mod find;
pub mod io;
pub mod line;
pub mod save;
pub mod syntax;
pub mod vocabulary;

pub use document::Document;
pub use edit::{EditOperation, EditResult, InverseStack, Text};
pub use error::{DocumentError, Result};
pub use line::{CharacterIndexable, DocumentLine};
pub use find::TextMatch;
pub use syntax::{DocumentSyntax, Highlight, Rgb, SyntaxBlock, SyntaxRule};
pub use vocabulary::DocumentVocabulary;

/// A `(column, line)` position measured in characters.
pub type Pos = (usize, usize);
