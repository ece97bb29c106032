//! Parse error types.

use thiserror::Error;

/// Errors that can occur during parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The source text is invalid.
    #[error("Invalid source at byte {offset}: {message}")]
    InvalidSource {
        /// Error message.
        message: String,
        /// Byte offset where the error occurred.
        offset: usize,
    },

    /// A brace was opened and never closed, or closed without being opened.
    #[error("Unbalanced '{delimiter}' at byte {offset}")]
    Unbalanced {
        /// The offending delimiter.
        delimiter: char,
        /// Byte offset of the delimiter.
        offset: usize,
    },

    /// The source is larger than byte offsets can address.
    #[error("Source too large: {0} bytes")]
    TooLarge(usize),
}

impl ParseError {
    /// Creates a new invalid source error at `offset`.
    pub fn invalid_source_at(message: impl Into<String>, offset: usize) -> Self {
        Self::InvalidSource {
            message: message.into(),
            offset,
        }
    }

    /// Creates a new unbalanced delimiter error.
    pub fn unbalanced(delimiter: char, offset: usize) -> Self {
        Self::Unbalanced { delimiter, offset }
    }

    /// Returns the byte offset the error refers to, if any.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::InvalidSource { offset, .. } | Self::Unbalanced { offset, .. } => Some(*offset),
            Self::TooLarge(_) => None,
        }
    }
}
