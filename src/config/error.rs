use thiserror::Error;

/// Errors produced when reading or validating [`Config`](super::Config).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Values are readable but unusable together.
    #[error("config validation: {0}")]
    Validation(String),

    /// The variable is set but is not valid Unicode.
    #[error("env var {key}: {message}")]
    EnvVar { key: String, message: String },

    /// The variable is set but does not parse into the expected type.
    #[error("env var {key}={value:?}: {message}")]
    Parse {
        key: String,
        value: String,
        message: String,
    },
}
