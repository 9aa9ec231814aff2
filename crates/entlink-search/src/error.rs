//! Error types for the search crate.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors raised by an [`EntitySearcher`](crate::EntitySearcher) or while
/// loading a knowledge base.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The backend could not answer (connection refused, overloaded, ...).
    #[error("Search unavailable: {0}")]
    Unavailable(String),

    /// The query itself was rejected.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Knowledge base content is malformed.
    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    /// I/O error while reading a knowledge base.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error while parsing a knowledge base.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SearchError {
    /// Create an unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create an invalid query error.
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    /// Create a knowledge base error.
    pub fn knowledge_base(msg: impl Into<String>) -> Self {
        Self::KnowledgeBase(msg.into())
    }

    /// Whether retrying later might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
