//! Error types for the scanner.

use thiserror::Error;

/// Errors that can occur while scanning a buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Attempted to read or move past the end, or before the start, of the current view.
    #[error("Scanner overflow")]
    Overflow,

    /// The caller asked for something that can never succeed, such as a view
    /// that splits a codepoint.
    #[error("Unexpected input: {0}")]
    Unexpected(String),

    /// A zero-length literal was passed to a matching operation.
    #[error("Empty pattern")]
    EmptyPattern,

    /// The buffer is not well-formed UTF-8.
    #[error("Invalid UTF-8 at byte {offset}")]
    InvalidUtf8 {
        /// Offset of the first offending byte.
        offset: usize,
    },
}
