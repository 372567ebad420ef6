//! Error types for the editor binary.

use iedit_document::DocumentError;
use thiserror::Error;

/// Errors surfaced by the editor outside of the document model.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Loading or saving the document failed.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// `set` named a key the configuration does not have.
    #[error("unknown setting {key:?}")]
    UnknownSetting {
        /// The key as typed.
        key: String,
    },

    /// `set` gave a value the setting cannot hold.
    #[error("invalid value {value:?} for {key}: expected {expected}")]
    InvalidSetting {
        /// The setting being changed.
        key: String,
        /// The rejected value.
        value: String,
        /// What the setting accepts.
        expected: &'static str,
    },

    /// A command line entry could not be understood.
    #[error("unknown command {command:?}")]
    UnknownCommand {
        /// The entry as typed.
        command: String,
    },

    /// A terminal or process operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`EditorError`].
pub type Result<T> = std::result::Result<T, EditorError>;
