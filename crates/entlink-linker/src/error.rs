//! Error types for the linker crate.

use thiserror::Error;

/// Result type alias for linker operations.
pub type Result<T> = std::result::Result<T, LinkerError>;

/// Fatal linker errors.
///
/// Search failures and invalid annotations are not errors: they are
/// recovered per mention and reported as
/// [`SoftFailure`](crate::SoftFailure)s.
#[derive(Debug, Error)]
pub enum LinkerError {
    /// Invalid configuration, detected before any processing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The linking pass was cancelled; no partial result is returned.
    #[error("Linking cancelled")]
    Cancelled,
}

impl LinkerError {
    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

impl From<entlink_nlp::NlpError> for LinkerError {
    fn from(err: entlink_nlp::NlpError) -> Self {
        match err {
            entlink_nlp::NlpError::Config(msg) => Self::Configuration(msg),
            other => Self::Configuration(other.to_string()),
        }
    }
}
