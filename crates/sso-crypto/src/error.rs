//! Error type for cryptographic operations.

use thiserror::Error;

/// Result alias for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Error type for cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key material could not be parsed.
    #[error("invalid key format: {0}")]
    InvalidKey(String),

    /// PEM armour was missing, malformed, or carried an unexpected label.
    #[error("invalid PEM: {0}")]
    Pem(String),

    /// Signing failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// Algorithm name is not recognised.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_failure() {
        let error = CryptoError::InvalidKey("truncated".to_string());
        assert_eq!(error.to_string(), "invalid key format: truncated");

        let error = CryptoError::UnknownAlgorithm("md5".to_string());
        assert_eq!(error.to_string(), "unknown algorithm: md5");
    }
}
