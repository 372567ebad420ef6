//! Error types for document loading, saving and syntax definitions.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while working with a [`crate::Document`].
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The path points at a directory rather than a file.
    #[error("{path} is a directory")]
    IsDirectory {
        /// The offending path.
        path: PathBuf,
    },

    /// The document is not bound to a path, so it cannot be saved.
    #[error("buffer has no file name")]
    NoPath,

    /// The document was opened read-only.
    #[error("{path} is read-only")]
    Readonly {
        /// Path of the read-only document.
        path: PathBuf,
    },

    /// A syntax definition file could not be parsed.
    #[error("invalid syntax definition {name}: {reason}")]
    InvalidSyntax {
        /// Name or path of the definition.
        name: String,
        /// Description of the parse failure.
        reason: String,
    },

    /// A syntax rule's regular expression failed to compile.
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The pattern as written in the definition.
        pattern: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// A colour was not written as `#RRGGBB`.
    #[error("invalid colour {value:?}; expected #RRGGBB")]
    InvalidColour {
        /// The rejected colour string.
        value: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`DocumentError`].
pub type Result<T> = std::result::Result<T, DocumentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readonly_error_names_the_path() {
        let err = DocumentError::Readonly {
            path: PathBuf::from("/etc/hosts"),
        };
        assert!(err.to_string().contains("/etc/hosts"));
    }

    #[test]
    fn invalid_colour_mentions_expected_format() {
        let err = DocumentError::InvalidColour {
            value: "red".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("red"));
        assert!(msg.contains("#RRGGBB"));
    }
}
