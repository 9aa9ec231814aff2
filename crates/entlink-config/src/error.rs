//! Configuration error types.

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur during configuration loading and conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a config file.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize config.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A name that does not denote any known value.
    #[error("unknown value '{value}' for '{field}'")]
    UnknownValue { field: String, value: String },

    /// Values that parse but are out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn unknown_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::UnknownValue {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl From<entlink_linker::LinkerError> for ConfigError {
    fn from(err: entlink_linker::LinkerError) -> Self {
        Self::Invalid(err.to_string())
    }
}

impl From<entlink_nlp::NlpError> for ConfigError {
    fn from(err: entlink_nlp::NlpError) -> Self {
        Self::Invalid(err.to_string())
    }
}
