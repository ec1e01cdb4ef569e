//! CLI error types.

use sso_protocol_saml::SamlError;
use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An input file could not be parsed.
    #[error("invalid {kind} in {path}: {message}")]
    Input {
        /// What the file was expected to hold.
        kind: &'static str,
        /// File path as given.
        path: String,
        /// Parser message.
        message: String,
    },

    /// The identity provider rejected the operation.
    #[error(transparent)]
    Saml(#[from] SamlError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
