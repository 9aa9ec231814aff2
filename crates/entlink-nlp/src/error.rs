//! Error types for the nlp crate.

use thiserror::Error;

use crate::text::Span;

/// Result type alias for nlp operations.
pub type Result<T> = std::result::Result<T, NlpError>;

/// Errors raised while validating annotated text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NlpError {
    /// An annotation span lies outside the text or is empty/inverted.
    #[error("invalid span [{start},{end}) for text of length {text_len}")]
    InvalidSpan {
        start: usize,
        end: usize,
        text_len: usize,
    },

    /// An annotation span cuts through a multi-byte character.
    #[error("span [{start},{end}) is not on a char boundary")]
    NotCharBoundary { start: usize, end: usize },

    /// Configuration value out of range.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl NlpError {
    /// Create an invalid span error for the given span.
    pub fn invalid_span(span: Span, text_len: usize) -> Self {
        Self::InvalidSpan {
            start: span.start,
            end: span.end,
            text_len,
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_span_display() {
        let err = NlpError::invalid_span(Span::new(5, 3), 10);
        assert_eq!(err.to_string(), "invalid span [5,3) for text of length 10");
    }

    #[test]
    fn test_config_display() {
        let err = NlpError::config("min_pos_probability out of range");
        assert!(err.to_string().contains("Configuration error"));
    }
}
